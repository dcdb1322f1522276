// The particle network simulation. Owns the particles and the bounds they
// bounce inside; the frame driver calls `step` once per display refresh.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::NetworkConfig;
use crate::connections;
use crate::frame_loop::Effect;
use crate::particle::Particle;
use crate::surface::{Bounds, DrawingSurface};

pub const PARTICLE_COUNT: usize = 80;

pub struct ParticleNetwork {
    config: NetworkConfig,
    bounds: Bounds,
    particles: Vec<Particle>,
    rng: StdRng,
}

impl ParticleNetwork {
    pub fn new(config: NetworkConfig, bounds: Bounds) -> ParticleNetwork {
        ParticleNetwork::with_rng(config, bounds, StdRng::from_entropy())
    }

    /// Deterministic network, mainly for tests.
    pub fn with_seed(config: NetworkConfig, bounds: Bounds, seed: u64) -> ParticleNetwork {
        ParticleNetwork::with_rng(config, bounds, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: NetworkConfig, bounds: Bounds, mut rng: StdRng) -> ParticleNetwork {
        let particles = (0..config.particle_count)
            .map(|_| Particle::random(&mut rng, bounds, &config))
            .collect();
        log::info!(
            "particle network: {} particles on {}x{}",
            config.particle_count,
            bounds.width,
            bounds.height
        );

        ParticleNetwork {
            config,
            bounds,
            particles,
            rng,
        }
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access for hosts that place particles themselves.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// Re-randomizes one particle within the current bounds.
    pub fn reset_particle(&mut self, index: usize) {
        let bounds = self.bounds;
        if let Some(particle) = self.particles.get_mut(index) {
            particle.reset(&mut self.rng, bounds, &self.config);
        }
    }

    /// Records new surface dimensions. Particles are left where they are
    /// unless `clamp_on_resize` is set.
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        log::debug!(
            "particle network resized {}x{} -> {}x{}",
            self.bounds.width,
            self.bounds.height,
            bounds.width,
            bounds.height
        );
        self.bounds = bounds;
        if self.config.clamp_on_resize {
            for particle in &mut self.particles {
                particle.pos = bounds.clamp(particle.pos);
            }
        }
    }

    /// Advances every particle one step without drawing.
    pub fn advance(&mut self) {
        let bounds = self.bounds;
        for particle in &mut self.particles {
            particle.update(bounds);
        }
    }

    /// One frame: pick up the surface size, clear it, update and draw each
    /// particle in turn, then draw the connections between the moved particles.
    /// Returns the number of connection lines drawn.
    pub fn step<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) -> usize {
        self.resize(surface.bounds());
        surface.clear();
        let bounds = self.bounds;
        let color = self.config.particle_color;
        for particle in &mut self.particles {
            particle.update(bounds);
            particle.draw(surface, color);
        }
        let lines = connections::draw_connections(&self.particles, surface, &self.config);
        log::trace!("frame: {} particles, {} connections", self.particles.len(), lines);
        lines
    }
}

/// A network paired with the surface it paints on.
pub struct NetworkEffect<S> {
    pub network: ParticleNetwork,
    pub surface: S,
}

impl<S: DrawingSurface> NetworkEffect<S> {
    pub fn new(network: ParticleNetwork, surface: S) -> NetworkEffect<S> {
        NetworkEffect { network, surface }
    }
}

impl<S: DrawingSurface> Effect for NetworkEffect<S> {
    fn frame(&mut self) {
        self.network.step(&mut self.surface);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::recording::{DrawCommand, RecordingSurface};
    use crate::surface::PixelSurface;

    fn network(width: f64, height: f64) -> ParticleNetwork {
        ParticleNetwork::with_seed(NetworkConfig::default(), Bounds::new(width, height), 7)
    }

    #[test]
    fn default_network_has_eighty_particles() {
        let net = network(800.0, 600.0);
        assert_eq!(net.len(), PARTICLE_COUNT);
        assert!(net.particles().iter().all(|p| net.bounds().contains(p.pos)));
    }

    #[test]
    fn same_seed_same_particles() {
        assert_eq!(network(800.0, 600.0).particles(), network(800.0, 600.0).particles());
    }

    #[test]
    fn count_survives_many_frames() {
        let mut net = network(400.0, 300.0);
        let mut surface = PixelSurface::new(400, 300);
        for _ in 0..200 {
            net.step(&mut surface);
        }
        assert_eq!(net.len(), PARTICLE_COUNT);
    }

    #[test]
    fn particles_stay_within_one_step_of_bounds() {
        let mut net = network(120.0, 90.0);
        let mut surface = RecordingSurface::new(120.0, 90.0);
        for _ in 0..2000 {
            net.step(&mut surface);
            surface.commands.clear();
            for p in net.particles() {
                assert!(p.pos[0] >= -0.2 - 1e-9 && p.pos[0] <= 120.2 + 1e-9);
                assert!(p.pos[1] >= -0.2 - 1e-9 && p.pos[1] <= 90.2 + 1e-9);
            }
        }
    }

    #[test]
    fn frame_clears_then_draws_particles_then_lines() {
        let mut net = network(200.0, 200.0);
        let mut surface = RecordingSurface::new(200.0, 200.0);
        let lines = net.step(&mut surface);

        assert_eq!(surface.commands[0], DrawCommand::Clear);
        assert_eq!(surface.circles(), PARTICLE_COUNT);
        assert_eq!(surface.lines().len(), lines);
        let first_line = surface
            .commands
            .iter()
            .position(|cmd| matches!(cmd, DrawCommand::Line { .. }))
            .unwrap_or(surface.commands.len());
        assert!(surface.commands[first_line..]
            .iter()
            .all(|cmd| matches!(cmd, DrawCommand::Line { .. })));
    }

    #[test]
    fn lines_use_post_update_positions() {
        let mut net = ParticleNetwork::with_seed(
            NetworkConfig {
                particle_count: 2,
                ..NetworkConfig::default()
            },
            Bounds::new(300.0, 300.0),
            1,
        );
        net.particles_mut()[0] = Particle::new(0.0, 0.0, 0.0, 0.0, 1.0, 0.5);
        net.particles_mut()[1] = Particle::new(100.5, 0.0, -0.5, 0.0, 1.0, 0.5);
        let mut surface = RecordingSurface::new(300.0, 300.0);
        assert_eq!(net.step(&mut surface), 1);
        match surface.lines()[0] {
            DrawCommand::Line { to, .. } => assert_eq!(*to, [100.0, 0.0]),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn shrinking_surface_leaves_particles_outside() {
        let mut net = network(800.0, 600.0);
        net.particles_mut()[0] = Particle::new(700.0, 500.0, 0.0, 0.0, 1.0, 0.5);
        let mut surface = RecordingSurface::new(100.0, 100.0);
        net.step(&mut surface);
        assert_eq!(net.bounds(), Bounds::new(100.0, 100.0));
        assert_eq!(net.particles()[0].pos, [700.0, 500.0]);
    }

    #[test]
    fn stranded_particle_jitters_in_place() {
        let mut net = network(800.0, 600.0);
        net.particles_mut()[0] = Particle::new(700.0, 500.0, 0.1, -0.1, 1.0, 0.5);
        net.resize(Bounds::new(100.0, 100.0));
        for _ in 0..1000 {
            net.advance();
            let p = net.particles()[0];
            // Out of bounds on both axes, so every step flips the velocity and
            // the particle swings between two points.
            assert!((p.pos[0] - 700.0).abs() <= 0.1 + 1e-9);
            assert!((p.pos[1] - 500.0).abs() <= 0.1 + 1e-9);
            assert!(!net.bounds().contains(p.pos));
        }
        assert_eq!(net.particles()[0].vel, [0.1, -0.1]);
    }

    #[test]
    fn clamp_on_resize_pulls_particles_in() {
        let config = NetworkConfig {
            clamp_on_resize: true,
            ..NetworkConfig::default()
        };
        let mut net = ParticleNetwork::with_seed(config, Bounds::new(800.0, 600.0), 3);
        net.particles_mut()[0] = Particle::new(700.0, 500.0, 0.1, -0.1, 1.0, 0.5);
        net.resize(Bounds::new(100.0, 100.0));
        assert_eq!(net.particles()[0].pos, [100.0, 100.0]);
        assert_eq!(net.particles()[0].vel, [0.1, -0.1]);
        assert!(net.particles().iter().all(|p| net.bounds().contains(p.pos)));
    }

    #[test]
    fn reset_particle_keeps_count() {
        let mut net = network(300.0, 300.0);
        let before = net.particles()[3];
        net.reset_particle(3);
        net.reset_particle(999);
        assert_eq!(net.len(), PARTICLE_COUNT);
        assert_ne!(net.particles()[3], before);
    }

    #[test]
    fn advance_matches_step_motion() {
        let mut a = network(300.0, 300.0);
        let mut b = network(300.0, 300.0);
        a.advance();
        b.step(&mut RecordingSurface::new(300.0, 300.0));
        assert_eq!(a.particles(), b.particles());
    }
}
