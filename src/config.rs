use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::connections::{MAX_DIST, MAX_LINE_ALPHA};
use crate::error::{EffectsError, Result};
use crate::network::PARTICLE_COUNT;

/// Configuration for every effect on the page. Missing fields take defaults,
/// so `{}` is a valid document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EffectsConfig {
    pub network: NetworkConfig,
    pub waveform: WaveformConfig,
    pub equalizer: EqualizerConfig,
    pub counter: CounterConfig,
}

impl EffectsConfig {
    pub fn from_json(json: &str) -> Result<EffectsConfig> {
        let config: EffectsConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.network.validate()?;
        self.waveform.validate()?;
        self.equalizer.validate()?;
        self.counter.validate()
    }
}

/// Half-open `[min, max)` sampling range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub const fn new(min: f64, max: f64) -> Range {
        Range { min, max }
    }

    /// Maps a unit sample in [0, 1) onto the range.
    pub fn lerp(&self, unit: f64) -> f64 {
        self.min + unit * (self.max - self.min)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
            return Err(EffectsError::invalid_config(format!(
                "{} range [{}, {}) is empty or inverted",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    pub particle_count: usize,
    /// Connection threshold; pairs at or beyond this distance are not joined.
    pub max_dist: f64,
    /// Velocity components are drawn from [-max_speed, max_speed).
    pub max_speed: f64,
    pub radius: Range,
    pub opacity: Range,
    pub particle_color: Color,
    pub line_color: Color,
    /// Alpha of a connection between coincident particles.
    pub line_alpha: f64,
    pub line_width: f64,
    /// Pull particles back inside the surface when it shrinks.
    pub clamp_on_resize: bool,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            max_dist: MAX_DIST,
            max_speed: 0.2,
            radius: Range::new(0.5, 2.5),
            opacity: Range::new(0.2, 0.7),
            particle_color: Color::rgb(96, 165, 250),
            line_color: Color::rgb(37, 99, 235),
            line_alpha: MAX_LINE_ALPHA,
            line_width: 0.5,
            clamp_on_resize: false,
        }
    }
}

impl NetworkConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.max_dist > 0.0) {
            return Err(EffectsError::invalid_config("max_dist must be positive"));
        }
        if !(self.max_speed >= 0.0) {
            return Err(EffectsError::invalid_config("max_speed must not be negative"));
        }
        if !(self.line_width > 0.0) {
            return Err(EffectsError::invalid_config("line_width must be positive"));
        }
        check_alpha("line_alpha", self.line_alpha)?;
        self.radius.validate("radius")?;
        self.opacity.validate("opacity")?;
        if self.radius.min < 0.0 {
            return Err(EffectsError::invalid_config("radius must not be negative"));
        }
        check_alpha("opacity.min", self.opacity.min)?;
        check_alpha("opacity.max", self.opacity.max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveformConfig {
    pub rings: usize,
    pub segments: usize,
    pub base_radius: f64,
    pub ring_spacing: f64,
    pub amplitude: f64,
    pub amplitude_step: f64,
    pub speed: f64,
    pub speed_step: f64,
    pub opacity: f64,
    pub opacity_step: f64,
    pub line_width: f64,
    /// Simulated seconds added after each frame.
    pub time_step: f64,
    pub gradient_start: Color,
    pub gradient_end: Color,
    pub glow_radius: f64,
    pub glow_alpha: f64,
    pub dot_radius: f64,
    pub dot_color: Color,
}

impl Default for WaveformConfig {
    fn default() -> Self {
        Self {
            rings: 3,
            segments: 128,
            base_radius: 60.0,
            ring_spacing: 35.0,
            amplitude: 12.0,
            amplitude_step: 3.0,
            speed: 0.02,
            speed_step: 0.005,
            opacity: 0.6,
            opacity_step: 0.15,
            line_width: 1.5,
            time_step: 0.016,
            gradient_start: Color::rgb(37, 99, 235),
            gradient_end: Color::rgb(6, 182, 212),
            glow_radius: 40.0,
            glow_alpha: 0.15,
            dot_radius: 3.0,
            dot_color: Color::rgb(0x22, 0xd3, 0xee),
        }
    }
}

impl WaveformConfig {
    pub fn validate(&self) -> Result<()> {
        if self.segments == 0 {
            return Err(EffectsError::invalid_config("waveform needs at least one segment"));
        }
        if !(self.line_width > 0.0) {
            return Err(EffectsError::invalid_config("waveform line_width must be positive"));
        }
        check_alpha("glow_alpha", self.glow_alpha)?;
        check_alpha("waveform opacity", self.opacity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EqualizerConfig {
    pub bar_count: usize,
    /// Pixels.
    pub min_height: Range,
    /// Pixels.
    pub max_height: Range,
    /// Seconds.
    pub duration: Range,
    /// Seconds.
    pub delay: Range,
}

impl Default for EqualizerConfig {
    fn default() -> Self {
        Self {
            bar_count: 24,
            min_height: Range::new(20.0, 50.0),
            max_height: Range::new(80.0, 180.0),
            duration: Range::new(0.5, 1.5),
            delay: Range::new(0.0, 1.0),
        }
    }
}

impl EqualizerConfig {
    pub fn validate(&self) -> Result<()> {
        self.min_height.validate("min_height")?;
        self.max_height.validate("max_height")?;
        self.duration.validate("duration")?;
        self.delay.validate("delay")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CounterConfig {
    pub duration_ms: f64,
}

impl Default for CounterConfig {
    fn default() -> Self {
        Self {
            duration_ms: 2000.0,
        }
    }
}

impl CounterConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.duration_ms > 0.0) {
            return Err(EffectsError::invalid_config("counter duration must be positive"));
        }
        Ok(())
    }
}

fn check_alpha(name: &str, alpha: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&alpha) {
        return Err(EffectsError::invalid_config(format!(
            "{} must be within [0, 1], got {}",
            name, alpha
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = EffectsConfig::from_json("{}").unwrap();
        assert_eq!(config, EffectsConfig::default());
        assert_eq!(config.network.particle_count, 80);
        assert_eq!(config.network.max_dist, 150.0);
        assert!(!config.network.clamp_on_resize);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = EffectsConfig::from_json(
            r#"{ "network": { "particle_count": 12, "clamp_on_resize": true } }"#,
        )
        .unwrap();
        assert_eq!(config.network.particle_count, 12);
        assert!(config.network.clamp_on_resize);
        assert_eq!(config.network.line_alpha, 0.12);
        assert_eq!(config.waveform.segments, 128);
    }

    #[test]
    fn rejects_non_positive_max_dist() {
        let err = EffectsConfig::from_json(r#"{ "network": { "max_dist": 0 } }"#).unwrap_err();
        assert!(matches!(err, EffectsError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_inverted_range() {
        let mut config = NetworkConfig::default();
        config.radius = Range::new(3.0, 1.0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_opacity_above_one() {
        let mut config = NetworkConfig::default();
        config.opacity = Range::new(0.5, 1.5);
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_zero_segments() {
        let mut config = EffectsConfig::default();
        config.waveform.segments = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = EffectsConfig::from_json("{ network: ").unwrap_err();
        assert!(matches!(err, EffectsError::Json(_)));
    }

    #[test]
    fn range_lerp_and_contains() {
        let range = Range::new(0.5, 2.5);
        assert_eq!(range.lerp(0.0), 0.5);
        assert_eq!(range.lerp(0.5), 1.5);
        assert!(range.contains(0.5));
        assert!(!range.contains(2.5));
    }
}
