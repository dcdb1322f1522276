// Simple particle struct to keep track of individual position, velocity,
// radius and opacity within the network

use rand::Rng;
use vecmath::{vec2_add, Vector2};

use crate::color::Color;
use crate::config::NetworkConfig;
use crate::surface::{Bounds, DrawingSurface, Paint};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Particle {
    pub pos: Vector2<f64>,
    pub vel: Vector2<f64>,
    pub radius: f64,
    pub opacity: f64,
}

impl Particle {
    pub fn new(
        pos_x: f64,
        pos_y: f64,
        vel_x: f64,
        vel_y: f64,
        radius: f64,
        opacity: f64,
    ) -> Particle {
        Particle {
            pos: [pos_x, pos_y],
            vel: [vel_x, vel_y],
            radius,
            opacity,
        }
    }

    pub fn random<R: Rng>(rng: &mut R, bounds: Bounds, config: &NetworkConfig) -> Particle {
        let mut particle = Particle::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
        particle.reset(rng, bounds, config);
        particle
    }

    /// Re-randomizes every attribute: position anywhere inside `bounds`,
    /// velocity components in [-max_speed, max_speed), radius and opacity from
    /// their configured ranges.
    pub fn reset<R: Rng>(&mut self, rng: &mut R, bounds: Bounds, config: &NetworkConfig) {
        self.pos = [
            rng.gen::<f64>() * bounds.width,
            rng.gen::<f64>() * bounds.height,
        ];
        self.vel = [
            (rng.gen::<f64>() - 0.5) * 2.0 * config.max_speed,
            (rng.gen::<f64>() - 0.5) * 2.0 * config.max_speed,
        ];
        self.radius = config.radius.lerp(rng.gen::<f64>());
        self.opacity = config.opacity.lerp(rng.gen::<f64>());
    }

    /// Moves one fixed step. A component of velocity is negated when the moved
    /// position lies outside the bounds on that axis; the position itself is
    /// not corrected, so a particle can overshoot by one step before turning.
    pub fn update(&mut self, bounds: Bounds) {
        self.pos = vec2_add(self.pos, self.vel);
        if self.pos[0] < 0.0 || self.pos[0] > bounds.width {
            self.vel[0] *= -1.0;
        }
        if self.pos[1] < 0.0 || self.pos[1] > bounds.height {
            self.vel[1] *= -1.0;
        }
    }

    pub fn draw<S: DrawingSurface + ?Sized>(&self, surface: &mut S, color: Color) {
        surface.fill_circle(self.pos, self.radius, &Paint::solid(color, self.opacity));
    }
}
