// Simple particle struct to keep track of individual position, velocity, size and color

use crate::color::Color;
use vecmath::Vector2;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub size: f64,
    pub color: Color,
}

impl Particle {
    pub fn new(
        pos_x: f64,
        pos_y: f64,
        vel_x: f64,
        vel_y: f64,
        size: f64,
        color: Color,
    ) -> Particle {
        Particle {
            pos: [pos_x, pos_y],
            vel: [vel_x, vel_y],
            size,
            color,
        }
    }

    // One frame of motion: drift by the fixed velocity, then shrink
    pub fn update(&mut self, decay: f64) {
        self.pos = vecmath::vec2_add(self.pos, self.vel);
        self.size *= decay;
    }

    pub fn is_spent(&self, threshold: f64) -> bool {
        self.size <= threshold
    }
}
