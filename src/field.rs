// The live particle set: spawned in bursts at the pointer, shrunk every frame,
// dropped once small enough to be invisible.

use crate::config::{FieldConfig, RemovalPolicy};
use crate::error::Result;
use crate::particle::Particle;
use crate::surface::Surface;
use rand::rngs::ThreadRng;
use rand::Rng;

pub struct ParticleField<R: Rng = ThreadRng> {
    particles: Vec<Particle>,
    config: FieldConfig,
    rng: R,
}

impl ParticleField<ThreadRng> {
    pub fn new(config: FieldConfig) -> Result<Self> {
        ParticleField::with_rng(config, rand::thread_rng())
    }
}

impl<R: Rng> ParticleField<R> {
    pub fn with_rng(config: FieldConfig, rng: R) -> Result<Self> {
        config.validate()?;
        Ok(ParticleField {
            particles: Vec::new(),
            config,
            rng,
        })
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Adds a burst of randomized particles at `(x, y)` and returns how many
    /// were added. Only a configured `max_live` cap makes that fewer than
    /// `spawn_count`.
    pub fn spawn(&mut self, x: f64, y: f64) -> usize {
        let mut count = self.config.spawn_count as usize;
        if let Some(max_live) = self.config.max_live {
            count = count.min(max_live.saturating_sub(self.particles.len()));
        }
        self.particles.reserve(count);

        let [min_size, max_size] = self.config.size_range;
        let [min_vel, max_vel] = self.config.velocity_range;
        for _ in 0..count {
            let size = self.rng.gen::<f64>() * (max_size - min_size) + min_size;
            let vel_x = self.rng.gen::<f64>() * (max_vel - min_vel) + min_vel;
            let vel_y = self.rng.gen::<f64>() * (max_vel - min_vel) + min_vel;
            // Non-empty, checked when the field was built
            let palette = &self.config.palette;
            let color = palette[self.rng.gen_range(0, palette.len())];
            self.particles.push(Particle::new(x, y, vel_x, vel_y, size, color));
        }
        count
    }

    /// Clears `surface`, then moves, shrinks and draws every live particle,
    /// dropping the ones that fall to the removal threshold.
    pub fn advance_and_render<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        surface.clear()?;
        match self.config.removal_policy {
            RemovalPolicy::Compact => self.advance_compact(surface),
            RemovalPolicy::SpliceInPlace => self.advance_splicing(surface),
        }
    }

    fn advance_compact<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        let decay = self.config.decay;
        let threshold = self.config.removal_threshold;
        let mut kept = 0;
        for i in 0..self.particles.len() {
            let mut p = self.particles[i];
            p.update(decay);
            if let Err(err) = surface.fill_circle(p.pos[0], p.pos[1], p.size, p.color) {
                // Keep the unvisited tail so a failed frame loses nothing
                self.particles.drain(kept..i);
                return Err(err);
            }
            if !p.is_spent(threshold) {
                self.particles[kept] = p;
                kept += 1;
            }
        }
        self.particles.truncate(kept);
        Ok(())
    }

    fn advance_splicing<S: Surface>(&mut self, surface: &mut S) -> Result<()> {
        let decay = self.config.decay;
        let threshold = self.config.removal_threshold;
        let len_at_start = self.particles.len();
        let mut i = 0;
        while i < len_at_start && i < self.particles.len() {
            let p = &mut self.particles[i];
            p.update(decay);
            surface.fill_circle(p.pos[0], p.pos[1], p.size, p.color)?;
            if p.is_spent(threshold) {
                self.particles.remove(i);
            }
            i += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{Color, DEFAULT_PALETTE};
    use crate::error::OverlayError;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[derive(Default)]
    struct RecordingSurface {
        clears: usize,
        circles: Vec<(f64, f64, f64, Color)>,
        fail_after: Option<usize>,
    }

    impl Surface for RecordingSurface {
        fn clear(&mut self) -> Result<()> {
            self.clears += 1;
            self.circles.clear();
            Ok(())
        }

        fn fill_circle(&mut self, x: f64, y: f64, radius: f64, color: Color) -> Result<()> {
            if self.fail_after == Some(self.circles.len()) {
                return Err(OverlayError::Dom("arc".to_owned()));
            }
            self.circles.push((x, y, radius, color));
            Ok(())
        }

        fn size(&self) -> (u32, u32) {
            (800, 600)
        }
    }

    fn seeded(config: FieldConfig) -> ParticleField<StdRng> {
        ParticleField::with_rng(config, StdRng::seed_from_u64(7)).unwrap()
    }

    fn field_of_sizes(sizes: &[f64], policy: RemovalPolicy) -> ParticleField<StdRng> {
        let mut field = seeded(FieldConfig::default().with_removal_policy(policy));
        for &size in sizes {
            field
                .particles
                .push(Particle::new(0.0, 0.0, 0.0, 0.0, size, Color::BLUE));
        }
        field
    }

    #[test]
    fn spawn_adds_a_burst_at_the_pointer() {
        let mut field = seeded(FieldConfig::default());
        assert_eq!(field.spawn(100.0, 200.0), 100);
        assert_eq!(field.len(), 100);
        for p in field.particles() {
            assert_eq!(p.pos, [100.0, 200.0]);
            assert!(p.size >= 2.0 && p.size < 12.0, "size {}", p.size);
            for v in p.vel.iter() {
                assert!(*v >= -0.25 && *v < 0.45, "velocity {}", v);
            }
            assert!(DEFAULT_PALETTE.contains(&p.color));
        }
    }

    #[test]
    fn spawn_samples_from_configured_ranges() {
        let config = FieldConfig::default()
            .with_size_range(3.0, 3.5)
            .with_velocity_range(1.0, 2.0)
            .with_palette(vec![Color::PURPLE]);
        let mut field = seeded(config);
        field.spawn(0.0, 0.0);
        for p in field.particles() {
            assert!(p.size >= 3.0 && p.size < 3.5, "size {}", p.size);
            assert!(p.vel.iter().all(|v| *v >= 1.0 && *v < 2.0));
            assert_eq!(p.color, Color::PURPLE);
        }
    }

    #[test]
    fn empty_palette_is_refused() {
        let config = FieldConfig::default().with_palette(vec![]);
        let result = ParticleField::with_rng(config, StdRng::seed_from_u64(7));
        assert!(matches!(result, Err(OverlayError::Config(_))));
    }

    #[test]
    fn faster_decay_and_higher_threshold_remove_sooner() {
        // 1.0 -> 0.5 -> 0.25: spent on the second frame
        let config = FieldConfig::default()
            .with_size_range(1.0, 1.0 + 1e-9)
            .with_decay(0.5)
            .with_removal_threshold(0.3);
        let mut field = seeded(config);
        field.spawn(0.0, 0.0);
        let mut surface = RecordingSurface::default();
        field.advance_and_render(&mut surface).unwrap();
        assert_eq!(field.len(), 100);
        field.advance_and_render(&mut surface).unwrap();
        assert!(field.is_empty());
    }

    #[test]
    fn two_spawns_before_a_frame_stack_up() {
        let mut field = seeded(FieldConfig::default());
        field.spawn(1.0, 1.0);
        field.spawn(2.0, 2.0);
        assert_eq!(field.len(), 200);
    }

    #[test]
    fn spawn_respects_max_live() {
        let mut field = seeded(FieldConfig::default().with_max_live(Some(150)));
        assert_eq!(field.spawn(0.0, 0.0), 100);
        assert_eq!(field.spawn(0.0, 0.0), 50);
        assert_eq!(field.spawn(0.0, 0.0), 0);
        assert_eq!(field.len(), 150);
    }

    #[test]
    fn empty_frame_only_clears() {
        let mut field = seeded(FieldConfig::default());
        let mut surface = RecordingSurface::default();
        field.advance_and_render(&mut surface).unwrap();
        field.advance_and_render(&mut surface).unwrap();
        assert_eq!(surface.clears, 2);
        assert!(surface.circles.is_empty());
        assert!(field.is_empty());
    }

    #[test]
    fn frame_moves_shrinks_and_draws() {
        let mut field = field_of_sizes(&[], RemovalPolicy::Compact);
        field
            .particles
            .push(Particle::new(10.0, 10.0, 0.25, -0.25, 5.0, Color::ORANGE));
        let mut surface = RecordingSurface::default();
        field.advance_and_render(&mut surface).unwrap();

        assert_eq!(surface.circles.len(), 1);
        let (x, y, radius, color) = surface.circles[0];
        assert_eq!((x, y), (10.25, 9.75));
        assert!((radius - 4.9).abs() < 1e-12);
        assert_eq!(color, Color::ORANGE);
        assert_eq!(field.particles()[0].pos, [10.25, 9.75]);
    }

    #[test]
    fn size_two_particle_removed_on_frame_149() {
        let mut field = field_of_sizes(&[2.0], RemovalPolicy::Compact);
        let mut surface = RecordingSurface::default();
        for _ in 0..148 {
            field.advance_and_render(&mut surface).unwrap();
        }
        assert_eq!(field.len(), 1);
        field.advance_and_render(&mut surface).unwrap();
        assert!(field.is_empty());
        // Still drawn on the frame it is removed
        assert_eq!(surface.circles.len(), 1);
    }

    #[test]
    fn live_particles_stay_above_threshold_and_drain() {
        for &policy in &[RemovalPolicy::Compact, RemovalPolicy::SpliceInPlace] {
            let mut field = seeded(FieldConfig::default().with_removal_policy(policy));
            let mut surface = RecordingSurface::default();
            field.spawn(50.0, 50.0);
            field.spawn(60.0, 60.0);
            let mut frames = 0;
            while !field.is_empty() {
                field.advance_and_render(&mut surface).unwrap();
                frames += 1;
                assert!(field.particles().iter().all(|p| p.size > 0.1));
                assert!(frames < 1000, "{:?} never drained", policy);
            }
        }
    }

    #[test]
    fn compact_visits_every_particle() {
        // Sizes that cross the threshold this frame sit next to each other
        let mut field = field_of_sizes(&[0.102, 0.102, 5.0, 0.102, 5.0], RemovalPolicy::Compact);
        let mut surface = RecordingSurface::default();
        field.advance_and_render(&mut surface).unwrap();
        assert_eq!(surface.circles.len(), 5);
        assert_eq!(field.len(), 2);
        assert!(field.particles().iter().all(|p| (p.size - 4.9).abs() < 1e-12));
    }

    #[test]
    fn splice_in_place_skips_the_successor_of_a_removal() {
        let mut field =
            field_of_sizes(&[0.102, 0.102, 5.0, 0.102, 5.0], RemovalPolicy::SpliceInPlace);
        let mut surface = RecordingSurface::default();
        field.advance_and_render(&mut surface).unwrap();

        // Index 0 removed, the second 0.102 slides into 0 and is skipped.
        // Index 1 is now the 5.0, index 2 the third 0.102 (removed), after
        // which the last 5.0 slides into 2 and the pass runs out.
        assert_eq!(surface.circles.len(), 3);
        let sizes: Vec<f64> = field.particles().iter().map(|p| p.size).collect();
        assert_eq!(sizes.len(), 3);
        assert_eq!(sizes[0], 0.102);
        assert!((sizes[1] - 4.9).abs() < 1e-12);
        assert_eq!(sizes[2], 5.0);
    }

    #[test]
    fn failed_draw_keeps_unvisited_particles() {
        let mut field = field_of_sizes(&[0.102, 5.0, 5.0, 5.0], RemovalPolicy::Compact);
        let mut surface = RecordingSurface {
            fail_after: Some(2),
            ..RecordingSurface::default()
        };
        assert!(field.advance_and_render(&mut surface).is_err());
        // First removed, second advanced, third and fourth untouched
        let sizes: Vec<f64> = field.particles().iter().map(|p| p.size).collect();
        assert_eq!(sizes.len(), 3);
        assert!((sizes[0] - 4.9).abs() < 1e-12);
        assert_eq!(&sizes[1..], &[5.0, 5.0]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut field = seeded(FieldConfig::default());
        field.spawn(0.0, 0.0);
        field.clear();
        assert!(field.is_empty());
    }
}
