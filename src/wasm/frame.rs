use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::window;

use crate::error::{DeckError, Result};

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>>;

/// `requestAnimationFrame` loop that can be paused and resumed.
///
/// Every frame checks the liveness flag before drawing, so a `stop` issued
/// between frames takes effect on the very next callback. `draw` returns
/// `false` to end the loop on its own.
pub struct AnimationLoop {
    running: Rc<Cell<bool>>,
    frame_id: Rc<Cell<Option<i32>>>,
    callback: FrameCallback,
}

impl AnimationLoop {
    pub fn new(mut draw: impl FnMut(f64) -> bool + 'static) -> Self {
        let running = Rc::new(Cell::new(false));
        let frame_id = Rc::new(Cell::new(None));
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        // The closure reschedules itself through a weak reference so that
        // dropping the loop frees it.
        let live = running.clone();
        let id = frame_id.clone();
        let this = Rc::downgrade(&callback);
        *callback.borrow_mut() = Some(Closure::wrap(Box::new(move |now: f64| {
            id.set(None);
            if !live.get() {
                return;
            }
            if !draw(now) {
                live.set(false);
                return;
            }
            if let Some(callback) = this.upgrade() {
                match schedule(&callback) {
                    Ok(next) => id.set(Some(next)),
                    Err(e) => {
                        tracing::warn!("animation frame not scheduled: {e}");
                        live.set(false);
                    }
                }
            }
        }) as Box<dyn FnMut(f64)>));

        Self { running, frame_id, callback }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }

    pub fn start(&self) -> Result<()> {
        if self.running.get() {
            return Ok(());
        }
        if self.frame_id.get().is_none() {
            self.frame_id.set(Some(schedule(&self.callback)?));
        }
        self.running.set(true);
        Ok(())
    }

    pub fn stop(&self) {
        self.running.set(false);
        if let Some(id) = self.frame_id.take() {
            if let Some(window) = window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    /// Stop and release the frame closure.
    pub fn dispose(&self) {
        self.stop();
        self.callback.borrow_mut().take();
    }
}

impl Drop for AnimationLoop {
    fn drop(&mut self) {
        self.stop();
    }
}

fn schedule(callback: &FrameCallback) -> Result<i32> {
    let window = window().ok_or_else(|| DeckError::missing("window"))?;
    let callback = callback.borrow();
    let callback = callback
        .as_ref()
        .ok_or_else(|| DeckError::unavailable("animation loop disposed"))?;
    Ok(window.request_animation_frame(callback.as_ref().unchecked_ref())?)
}

/// Milliseconds on the same clock `requestAnimationFrame` reports.
pub fn now() -> f64 {
    window()
        .and_then(|w| w.performance())
        .map_or_else(js_sys::Date::now, |p| p.now())
}
