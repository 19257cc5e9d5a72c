use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{CanvasRenderingContext2d, Document, Element, HtmlCanvasElement, HtmlInputElement};

use super::dom;
use super::frame::{self, AnimationLoop};
use crate::effect::Effect;
use crate::error::{DeckError, Result};
use crate::timelapse::{texture, Playback, FRAMES};

/// Paints one NDVI frame and mirrors it into the caption and timeline.
struct Painter {
    ctx: CanvasRenderingContext2d,
    canvas: HtmlCanvasElement,
    document: Document,
    slider: Option<HtmlInputElement>,
    seed: u64,
}

impl Painter {
    fn paint(&self, index: usize) {
        let Some(frame) = FRAMES.get(index) else { return };
        let ratio = dom::fit_canvas(&self.canvas);
        let (w, h) = (f64::from(self.canvas.width()), f64::from(self.canvas.height()));

        self.ctx.clear_rect(0.0, 0.0, w, h);
        self.ctx.set_fill_style_str(&frame.color.css());
        self.ctx.fill_rect(0.0, 0.0, w, h);
        // same seed per frame, so scrubbing back shows the same picture
        for blot in texture(frame, w, h, self.seed.wrapping_add(index as u64)) {
            self.ctx.set_fill_style_str(&blot.color.css());
            self.ctx.begin_path();
            let _ = self.ctx.arc(blot.x, blot.y, blot.radius * ratio, 0.0, std::f64::consts::TAU);
            self.ctx.fill();
        }

        dom::set_text(&self.document, "frameDate", frame.date);
        dom::set_text(&self.document, "frameNDVI", &frame.label());
        if let Some(slider) = &self.slider {
            slider.set_value(&index.to_string());
        }
    }
}

/// Satellite time-lapse. Plays through the season while its slide is shown
/// and pauses on the current frame when the slide is left.
pub struct Timelapse {
    canvas: HtmlCanvasElement,
    painter: Rc<Painter>,
    playback: Rc<RefCell<Playback>>,
    scrub: Option<Closure<dyn FnMut()>>,
    anim: AnimationLoop,
}

impl Timelapse {
    pub fn mount(container: &Element, seed: u64) -> Result<Self> {
        let canvas = dom::overlay_canvas(container, "timelapse-canvas")?;
        Self::build(canvas.clone(), seed).inspect_err(|_| canvas.remove())
    }

    fn build(canvas: HtmlCanvasElement, seed: u64) -> Result<Self> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| DeckError::unavailable("2d canvas context"))?
            .dyn_into()
            .map_err(|_| DeckError::unavailable("2d context has unexpected type"))?;
        let document = canvas
            .owner_document()
            .ok_or_else(|| DeckError::missing("owner document"))?;
        let slider = document
            .get_element_by_id("timelineSlider")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok());
        if let Some(slider) = &slider {
            slider.set_min("0");
            slider.set_max(&(FRAMES.len() - 1).to_string());
        }

        let painter = Rc::new(Painter { ctx, canvas: canvas.clone(), document, slider, seed });
        let playback = Rc::new(RefCell::new(Playback::new()));

        let scrub = match painter.slider.clone() {
            Some(slider) => {
                let painter = painter.clone();
                let playback = playback.clone();
                let target = slider.clone();
                let closure = Closure::wrap(Box::new(move || {
                    let Ok(index) = target.value().parse::<usize>() else { return };
                    let mut playback = playback.borrow_mut();
                    playback.seek(index);
                    painter.paint(playback.frame());
                }) as Box<dyn FnMut()>);
                slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
                Some(closure)
            }
            None => None,
        };

        let anim = {
            let painter = painter.clone();
            let playback = playback.clone();
            AnimationLoop::new(move |now| {
                let mut playback = playback.borrow_mut();
                if playback.tick(now) {
                    painter.paint(playback.frame());
                }
                playback.is_playing()
            })
        };

        painter.paint(0);
        Ok(Self { canvas, painter, playback, scrub, anim })
    }
}

impl Effect for Timelapse {
    fn start(&mut self) -> Result<()> {
        let frame = {
            let mut playback = self.playback.borrow_mut();
            playback.play(frame::now());
            playback.frame()
        };
        self.painter.paint(frame);
        self.anim.start()
    }

    fn stop(&mut self) -> Result<()> {
        self.playback.borrow_mut().pause();
        self.anim.stop();
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        self.anim.dispose();
        self.canvas.remove();
        if let (Some(slider), Some(scrub)) = (&self.painter.slider, self.scrub.take()) {
            slider.remove_event_listener_with_callback("input", scrub.as_ref().unchecked_ref())?;
        }
        Ok(())
    }
}
