// Frame scheduling. Effects only know how to draw one frame; a driver decides
// when the next one happens. In the browser that is requestAnimationFrame,
// in tests it is a loop counter.

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::error::{EffectsError, Result};

/// Something that renders once per display refresh.
pub trait Effect {
    fn frame(&mut self);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LoopState {
    NotStarted,
    /// There is no stopped state; a running loop lives as long as the page.
    Running,
}

/// Steps an effect on demand.
pub struct ManualDriver<E> {
    effect: E,
    state: LoopState,
    frames: u64,
}

impl<E: Effect> ManualDriver<E> {
    pub fn new(effect: E) -> ManualDriver<E> {
        ManualDriver {
            effect,
            state: LoopState::NotStarted,
            frames: 0,
        }
    }

    pub fn tick(&mut self) {
        self.state = LoopState::Running;
        self.effect.frame();
        self.frames += 1;
    }

    pub fn run(&mut self, frames: u64) {
        for _ in 0..frames {
            self.tick();
        }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }
}

fn request_animation_frame(callback: &Closure<dyn FnMut()>) -> Result<i32> {
    let window = web_sys::window().ok_or_else(|| EffectsError::Js("no global window".into()))?;
    Ok(window.request_animation_frame(callback.as_ref().unchecked_ref())?)
}

/// Drives an effect from requestAnimationFrame. The callback re-arms itself
/// every frame, so once started the loop runs until the page goes away.
pub struct AnimationLoop<E> {
    effect: Rc<RefCell<E>>,
    state: LoopState,
}

impl<E: Effect + 'static> AnimationLoop<E> {
    pub fn new(effect: E) -> AnimationLoop<E> {
        AnimationLoop {
            effect: Rc::new(RefCell::new(effect)),
            state: LoopState::NotStarted,
        }
    }

    /// Shared handle so the host can still reach the effect (e.g. to change
    /// its surface size) while the loop owns it.
    pub fn effect(&self) -> Rc<RefCell<E>> {
        Rc::clone(&self.effect)
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    /// Schedules the first frame. Calling it again on a running loop does nothing.
    pub fn start(&mut self) -> Result<()> {
        if self.state == LoopState::Running {
            return Ok(());
        }

        // The closure holds an Rc to its own slot so it can re-arm itself;
        // that cycle is what keeps the loop alive without an owner.
        let slot: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
        let next = Rc::clone(&slot);
        let effect = Rc::clone(&self.effect);
        let frame = Closure::wrap(Box::new(move || {
            let _timer = crate::Timer::traced("AnimationLoop::frame");
            effect.borrow_mut().frame();
            if let Some(callback) = next.borrow().as_ref() {
                if let Err(err) = request_animation_frame(callback) {
                    log::error!("animation loop halted: {}", err);
                }
            }
        }) as Box<dyn FnMut()>);

        request_animation_frame(&frame)?;
        *slot.borrow_mut() = Some(frame);
        self.state = LoopState::Running;
        log::debug!("animation loop started");
        Ok(())
    }
}
