// Tunables for the particle field. Defaults reproduce the landing page effect.

use crate::color::{Color, DEFAULT_PALETTE};
use crate::error::{OverlayError, Result};

/// How a frame's removal pass treats the particle that slides into a
/// vacated slot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RemovalPolicy {
    /// Every live particle is advanced and drawn exactly once per frame.
    Compact,
    /// Single forward pass removing in place. The particle that shifts into
    /// a removed slot, and anything past the shrunken end, sits the frame out.
    SpliceInPlace,
}

impl Default for RemovalPolicy {
    fn default() -> Self {
        RemovalPolicy::Compact
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct FieldConfig {
    pub spawn_count: u32,
    /// Initial size, sampled uniformly from `[min, max)`
    pub size_range: [f64; 2],
    /// Each velocity axis, sampled uniformly from `[min, max)`
    pub velocity_range: [f64; 2],
    pub decay: f64,
    pub removal_threshold: f64,
    pub palette: Vec<Color>,
    /// Cap on live particles. `None` leaves growth bounded only by decay.
    pub max_live: Option<usize>,
    pub removal_policy: RemovalPolicy,
}

impl FieldConfig {
    pub const SPAWN_COUNT: u32 = 100;
    pub const DECAY: f64 = 0.98;
    pub const REMOVAL_THRESHOLD: f64 = 0.1;

    pub fn with_spawn_count(mut self, spawn_count: u32) -> Self {
        self.spawn_count = spawn_count;
        self
    }

    pub fn with_size_range(mut self, min: f64, max: f64) -> Self {
        self.size_range = [min, max];
        self
    }

    pub fn with_velocity_range(mut self, min: f64, max: f64) -> Self {
        self.velocity_range = [min, max];
        self
    }

    pub fn with_decay(mut self, decay: f64) -> Self {
        self.decay = decay;
        self
    }

    pub fn with_removal_threshold(mut self, threshold: f64) -> Self {
        self.removal_threshold = threshold;
        self
    }

    pub fn with_palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    pub fn with_max_live(mut self, max_live: Option<usize>) -> Self {
        self.max_live = max_live;
        self
    }

    pub fn with_removal_policy(mut self, policy: RemovalPolicy) -> Self {
        self.removal_policy = policy;
        self
    }

    // Rejects settings under which particles would never shrink past the
    // threshold, or could not be sampled at all
    pub fn validate(&self) -> Result<()> {
        let [min_size, max_size] = self.size_range;
        let [min_vel, max_vel] = self.velocity_range;
        if self.palette.is_empty() {
            return Err(OverlayError::Config("palette is empty"));
        }
        if !(self.decay > 0.0 && self.decay < 1.0) {
            return Err(OverlayError::Config("decay must lie in (0, 1)"));
        }
        if !(min_size < max_size) {
            return Err(OverlayError::Config("size range is empty"));
        }
        if !(min_vel < max_vel) {
            return Err(OverlayError::Config("velocity range is empty"));
        }
        if !(self.removal_threshold > 0.0 && self.removal_threshold < min_size) {
            return Err(OverlayError::Config(
                "removal threshold must lie between 0 and the minimum size",
            ));
        }
        Ok(())
    }
}

impl Default for FieldConfig {
    fn default() -> Self {
        FieldConfig {
            spawn_count: FieldConfig::SPAWN_COUNT,
            size_range: [2.0, 12.0],
            velocity_range: [-0.25, 0.45],
            decay: FieldConfig::DECAY,
            removal_threshold: FieldConfig::REMOVAL_THRESHOLD,
            palette: DEFAULT_PALETTE.to_vec(),
            max_live: None,
            removal_policy: RemovalPolicy::default(),
        }
    }
}
