// Proximity lines between particles. Every unordered pair is checked each
// frame; at 80 particles that is 3160 distance tests.

use vecmath::{vec2_len, vec2_sub};

use crate::config::NetworkConfig;
use crate::particle::Particle;
use crate::surface::{DrawingSurface, Paint};

pub const MAX_DIST: f64 = 150.0;
pub const MAX_LINE_ALPHA: f64 = 0.12;

/// A line to draw between particles `from` and `to` (indices, `from < to`).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Connection {
    pub from: usize,
    pub to: usize,
    pub dist: f64,
    pub alpha: f64,
}

/// Stroke alpha for a pair `dist` apart, fading linearly from `max_alpha` at
/// zero to nothing at `max_dist`. Pairs at `max_dist` or further get `None`.
pub fn connection_alpha(dist: f64, max_dist: f64, max_alpha: f64) -> Option<f64> {
    if dist < max_dist {
        Some(max_alpha * (1.0 - dist / max_dist))
    } else {
        None
    }
}

/// Calls `f` for every unordered pair closer than `max_dist`, in (i, j) order.
pub fn for_each_connection<F>(particles: &[Particle], max_dist: f64, max_alpha: f64, mut f: F)
where
    F: FnMut(Connection),
{
    for i in 0..particles.len() {
        for j in i + 1..particles.len() {
            let dist = vec2_len(vec2_sub(particles[i].pos, particles[j].pos));
            if let Some(alpha) = connection_alpha(dist, max_dist, max_alpha) {
                f(Connection {
                    from: i,
                    to: j,
                    dist,
                    alpha,
                });
            }
        }
    }
}

pub fn connections(particles: &[Particle], max_dist: f64, max_alpha: f64) -> Vec<Connection> {
    let mut found = Vec::new();
    for_each_connection(particles, max_dist, max_alpha, |c| found.push(c));
    found
}

/// Strokes every connection; returns how many lines were drawn.
pub fn draw_connections<S: DrawingSurface + ?Sized>(
    particles: &[Particle],
    surface: &mut S,
    config: &NetworkConfig,
) -> usize {
    let mut drawn = 0;
    for_each_connection(particles, config.max_dist, config.line_alpha, |c| {
        surface.stroke_line(
            particles[c.from].pos,
            particles[c.to].pos,
            config.line_width,
            &Paint::solid(config.line_color, c.alpha),
        );
        drawn += 1;
    });
    drawn
}
