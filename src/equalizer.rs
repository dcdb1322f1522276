// Randomized parameters for the equalizer bars. The page turns each bar into
// an element animated by CSS; only the numbers come from here.

use rand::Rng;

use crate::config::EqualizerConfig;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Bar {
    /// Pixels.
    pub min_height: f64,
    /// Pixels.
    pub max_height: f64,
    /// Seconds per animation cycle.
    pub duration: f64,
    /// Seconds before the animation starts.
    pub delay: f64,
}

impl Bar {
    pub fn random<R: Rng>(rng: &mut R, config: &EqualizerConfig) -> Bar {
        Bar {
            min_height: config.min_height.lerp(rng.gen::<f64>()),
            max_height: config.max_height.lerp(rng.gen::<f64>()),
            duration: config.duration.lerp(rng.gen::<f64>()),
            delay: config.delay.lerp(rng.gen::<f64>()),
        }
    }

    /// Custom properties the bar stylesheet reads.
    pub fn css_vars(&self) -> [(&'static str, String); 3] {
        [
            ("--min-h", format!("{}px", self.min_height)),
            ("--max-h", format!("{}px", self.max_height)),
            ("--duration", format!("{}s", self.duration)),
        ]
    }

    pub fn animation_delay(&self) -> String {
        format!("{}s", self.delay)
    }
}

pub fn generate_bars<R: Rng>(rng: &mut R, config: &EqualizerConfig) -> Vec<Bar> {
    (0..config.bar_count)
        .map(|_| Bar::random(rng, config))
        .collect()
}

/// `[min_height, max_height, duration, delay]` per bar, for handing across
/// the wasm boundary.
pub fn flatten(bars: &[Bar]) -> Vec<f64> {
    let mut flat = Vec::with_capacity(bars.len() * 4);
    for bar in bars {
        flat.extend_from_slice(&[bar.min_height, bar.max_height, bar.duration, bar.delay]);
    }
    flat
}
