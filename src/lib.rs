mod utils;

pub mod color;
pub mod config;
pub mod connections;
pub mod counter;
pub mod equalizer;
pub mod error;
pub mod frame_loop;
pub mod logging;
pub mod network;
pub mod particle;
pub mod surface;
pub mod waveform;

use log::{Level, LevelFilter};
use wasm_bindgen::prelude::*;
use web_sys::{console, CanvasRenderingContext2d, HtmlCanvasElement};

pub use color::Color;
pub use config::{CounterConfig, EffectsConfig, EqualizerConfig, NetworkConfig, WaveformConfig};
pub use error::{EffectsError, Result};
pub use frame_loop::{AnimationLoop, Effect, LoopState, ManualDriver};
pub use network::{NetworkEffect, ParticleNetwork, PARTICLE_COUNT};
pub use particle::Particle;
pub use surface::{Bounds, CanvasSurface, DrawingSurface, Paint, PixelSurface};
pub use waveform::{Waveform, WaveformEffect};

// When the `wee_alloc` feature is enabled, use `wee_alloc` as the global
// allocator.
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen]
pub fn initialize() {
    utils::set_panic_hook();
    // Leaves an already installed logger at its level, so calling this after
    // `enable_verbose_logging` keeps trace output on.
    logging::install(LevelFilter::Info);
}

/// Raises console logging to `trace` (per-frame messages and frame timings).
#[wasm_bindgen]
pub fn enable_verbose_logging() {
    logging::set_level(LevelFilter::Trace);
}

pub struct Timer<'a> {
    name: &'a str,
}

impl<'a> Timer<'a> {
    pub fn new(name: &'a str) -> Timer<'a> {
        console::time_with_label(name);
        Timer { name }
    }

    /// Only times when trace logging is on.
    pub fn traced(name: &'a str) -> Option<Timer<'a>> {
        if log::log_enabled!(Level::Trace) {
            Some(Timer::new(name))
        } else {
            None
        }
    }
}

impl<'a> Drop for Timer<'a> {
    fn drop(&mut self) {
        console::time_end_with_label(self.name);
    }
}

fn interleave_positions(particles: &[Particle]) -> Vec<f64> {
    particles.iter().flat_map(|p| p.pos.iter().copied()).collect()
}

fn parse_config(config_json: Option<String>) -> Result<EffectsConfig> {
    match config_json {
        Some(json) => EffectsConfig::from_json(&json),
        None => Ok(EffectsConfig::default()),
    }
}

/// Particle network bound to a `<canvas>`. The page either calls `frame` from
/// its own loop or hands the whole thing to `start_particle_network`.
#[wasm_bindgen(js_name = ParticleNetwork)]
pub struct JsParticleNetwork {
    effect: NetworkEffect<CanvasSurface>,
    pixels: PixelSurface,
}

#[wasm_bindgen(js_class = ParticleNetwork)]
impl JsParticleNetwork {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        config_json: Option<String>,
    ) -> std::result::Result<JsParticleNetwork, JsValue> {
        let config = parse_config(config_json)?;
        let surface = CanvasSurface::new(canvas)?;
        let network = ParticleNetwork::new(config.network, surface.bounds());
        Ok(JsParticleNetwork {
            effect: NetworkEffect::new(network, surface),
            pixels: PixelSurface::new(0, 0),
        })
    }

    pub fn frame(&mut self) {
        let _timer = Timer::traced("ParticleNetwork::frame");
        self.effect.frame();
    }

    /// Steps the network into the software raster instead of the canvas
    /// context, then copies the raster onto `ctx` with put_image_data.
    pub fn render_pixels(
        &mut self,
        ctx: &CanvasRenderingContext2d,
    ) -> std::result::Result<(), JsValue> {
        let _timer = Timer::traced("ParticleNetwork::render_pixels");
        let bounds = self.effect.surface.bounds();
        if self.pixels.bounds() != bounds {
            self.pixels.resize(bounds.width as u32, bounds.height as u32);
        }
        self.effect.network.step(&mut self.pixels);
        self.pixels.present(ctx)
    }

    /// Resize notification from the page; takes effect on the next frame.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.effect.surface.set_size(width, height);
    }

    pub fn particle_count(&self) -> usize {
        self.effect.network.len()
    }

    /// `[x, y]` per particle.
    pub fn positions(&self) -> Vec<f64> {
        interleave_positions(self.effect.network.particles())
    }
}

#[wasm_bindgen(js_name = VoiceWaveform)]
pub struct JsVoiceWaveform {
    effect: WaveformEffect<CanvasSurface>,
}

#[wasm_bindgen(js_class = VoiceWaveform)]
impl JsVoiceWaveform {
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        config_json: Option<String>,
    ) -> std::result::Result<JsVoiceWaveform, JsValue> {
        let config = parse_config(config_json)?;
        let surface = CanvasSurface::new(canvas)?;
        Ok(JsVoiceWaveform {
            effect: WaveformEffect::new(Waveform::new(config.waveform), surface),
        })
    }

    pub fn frame(&mut self) {
        let _timer = Timer::traced("VoiceWaveform::frame");
        self.effect.frame();
    }

    /// Sizes the canvas to a square fitting the given container.
    pub fn fit_container(&mut self, container_width: f64, container_height: f64) {
        let side = waveform::canvas_side(container_width, container_height) as u32;
        self.effect.surface.set_size(side, side);
    }

    pub fn time(&self) -> f64 {
        self.effect.waveform.time()
    }
}

/// Finds the canvas by id and runs the particle network on every display refresh.
#[wasm_bindgen]
pub fn start_particle_network(
    canvas_id: &str,
    config_json: Option<String>,
) -> std::result::Result<(), JsValue> {
    let config = parse_config(config_json)?;
    let surface = CanvasSurface::from_element_id(canvas_id)?;
    let network = ParticleNetwork::new(config.network, surface.bounds());
    AnimationLoop::new(NetworkEffect::new(network, surface)).start()?;
    Ok(())
}

#[wasm_bindgen]
pub fn start_voice_waveform(
    canvas_id: &str,
    config_json: Option<String>,
) -> std::result::Result<(), JsValue> {
    let config = parse_config(config_json)?;
    let surface = CanvasSurface::from_element_id(canvas_id)?;
    let waveform = Waveform::new(config.waveform);
    AnimationLoop::new(WaveformEffect::new(waveform, surface)).start()?;
    Ok(())
}

/// Random equalizer bars as `[min_height, max_height, duration, delay]` per bar.
#[wasm_bindgen]
pub fn equalizer_bars(config_json: Option<String>) -> std::result::Result<Vec<f64>, JsValue> {
    let config = parse_config(config_json)?;
    let mut rng = rand::thread_rng();
    let bars = equalizer::generate_bars(&mut rng, &config.equalizer);
    Ok(equalizer::flatten(&bars))
}

/// Random equalizer bars as style entries: per bar an array of
/// `[property, value]` pairs (`--min-h`, `--max-h`, `--duration`,
/// `animation-delay`) ready for `style.setProperty`.
#[wasm_bindgen]
pub fn equalizer_bar_styles(
    config_json: Option<String>,
) -> std::result::Result<js_sys::Array, JsValue> {
    let config = parse_config(config_json)?;
    let mut rng = rand::thread_rng();
    let styles = js_sys::Array::new();
    for bar in equalizer::generate_bars(&mut rng, &config.equalizer) {
        let entry = js_sys::Array::new();
        for (name, value) in bar.css_vars().iter() {
            entry.push(&js_sys::Array::of2(
                &JsValue::from_str(name),
                &JsValue::from_str(value),
            ));
        }
        entry.push(&js_sys::Array::of2(
            &JsValue::from_str("animation-delay"),
            &JsValue::from_str(&bar.animation_delay()),
        ));
        styles.push(&entry);
    }
    Ok(styles)
}

/// Displayed counter value `elapsed_ms` into an animation towards `target`.
#[wasm_bindgen]
pub fn counter_value(target: f64, elapsed_ms: f64, duration_ms: f64) -> f64 {
    counter::CounterAnimation {
        target,
        duration_ms,
        start_ms: 0.0,
    }
    .value_at(elapsed_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn traced_timer_is_off_without_trace_logging() {
        // No logger is installed natively, so the max level stays `Off` and no
        // console call is made.
        assert!(!log::log_enabled!(Level::Trace));
        assert!(Timer::traced("AnimationLoop::frame").is_none());
    }

    #[test]
    fn positions_interleave_coordinates() {
        let network = ParticleNetwork::with_seed(
            NetworkConfig {
                particle_count: 3,
                ..NetworkConfig::default()
            },
            Bounds::new(200.0, 100.0),
            4,
        );
        let flat = interleave_positions(network.particles());
        assert_eq!(flat.len(), 6);
        assert_eq!(flat[2], network.particles()[1].pos[0]);
        assert_eq!(flat[5], network.particles()[2].pos[1]);
    }
}
