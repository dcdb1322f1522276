// Circular voice waveform: concentric rings whose radius wobbles with three
// layered sine waves, plus a soft glow and a dot in the middle.

extern crate nalgebra_glm as glm;

use std::f64::consts::PI;

use vecmath::Vector2;

use crate::config::WaveformConfig;
use crate::frame_loop::Effect;
use crate::surface::{Bounds, DrawingSurface, Paint};

/// Per-ring constants derived from the config.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RingStyle {
    pub base_radius: f64,
    pub amplitude: f64,
    pub speed: f64,
    pub opacity: f64,
}

impl RingStyle {
    pub fn for_ring(config: &WaveformConfig, ring: usize) -> RingStyle {
        let k = ring as f64;
        RingStyle {
            base_radius: config.base_radius + k * config.ring_spacing,
            amplitude: config.amplitude - k * config.amplitude_step,
            speed: config.speed + k * config.speed_step,
            opacity: (config.opacity - k * config.opacity_step).max(0.0),
        }
    }

    /// Radial offset at `angle` and animation time `time`.
    pub fn wave(&self, angle: f64, time: f64) -> f64 {
        let phase = time * self.speed;
        (angle * 6.0 + phase * 60.0).sin() * self.amplitude * 0.5
            + (angle * 4.0 - phase * 40.0).sin() * self.amplitude * 0.3
            + (angle * 8.0 + phase * 80.0).sin() * self.amplitude * 0.2
    }
}

pub struct Waveform {
    config: WaveformConfig,
    time: f64,
}

impl Waveform {
    pub fn new(config: WaveformConfig) -> Waveform {
        Waveform { config, time: 0.0 }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn config(&self) -> &WaveformConfig {
        &self.config
    }

    /// Outline of one ring: `segments + 1` points, the last back at angle 2π.
    pub fn ring_points(&self, ring: usize, center: Vector2<f64>) -> Vec<Vector2<f64>> {
        let style = RingStyle::for_ring(&self.config, ring);
        let segments = self.config.segments;
        let c = glm::vec2(center[0], center[1]);
        (0..=segments)
            .map(|i| {
                let angle = i as f64 / segments as f64 * PI * 2.0;
                let r = style.base_radius + style.wave(angle, self.time);
                let point = c + glm::vec2(angle.cos(), angle.sin()) * r;
                [point.x, point.y]
            })
            .collect()
    }

    /// Draws every ring, the glow and the dot, then advances time by one step.
    pub fn draw<S: DrawingSurface + ?Sized>(&mut self, surface: &mut S) {
        let bounds = surface.bounds();
        let center = bounds.center();
        surface.clear();

        for ring in 0..self.config.rings {
            let style = RingStyle::for_ring(&self.config, ring);
            let points = self.ring_points(ring, center);
            let paint = self.ring_paint(bounds, style.opacity);
            surface.stroke_path(&points, true, self.config.line_width, &paint);
        }

        let glow = Paint::Radial {
            center,
            radius: self.config.glow_radius,
            from: (self.config.gradient_start, self.config.glow_alpha),
            to: (self.config.gradient_start, 0.0),
        };
        surface.fill_circle(center, self.config.glow_radius, &glow);
        let dot = Paint::solid(self.config.dot_color, 1.0);
        surface.fill_circle(center, self.config.dot_radius, &dot);

        self.time += self.config.time_step;
    }

    fn ring_paint(&self, bounds: Bounds, opacity: f64) -> Paint {
        Paint::Linear {
            start: [0.0, 0.0],
            end: [bounds.width, bounds.height],
            from: (self.config.gradient_start, opacity),
            to: (self.config.gradient_end, opacity),
        }
    }
}

/// Square side for the waveform canvas: 70% of the container's smaller side.
pub fn canvas_side(container_width: f64, container_height: f64) -> f64 {
    container_width.min(container_height) * 0.7
}

pub struct WaveformEffect<S> {
    pub waveform: Waveform,
    pub surface: S,
}

impl<S: DrawingSurface> WaveformEffect<S> {
    pub fn new(waveform: Waveform, surface: S) -> WaveformEffect<S> {
        WaveformEffect { waveform, surface }
    }
}

impl<S: DrawingSurface> Effect for WaveformEffect<S> {
    fn frame(&mut self) {
        self.waveform.draw(&mut self.surface);
    }
}
