use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{CanvasRenderingContext2d, Element, HtmlCanvasElement, MouseEvent};

use super::dom;
use super::frame::AnimationLoop;
use crate::config::ParticleVariant;
use crate::effect::Effect;
use crate::error::{DeckError, Result};
use crate::particles::ParticleField;

/// Linked particle background drawn on a 2D canvas.
pub struct Particles {
    canvas: HtmlCanvasElement,
    container: Element,
    hover: Option<Closure<dyn FnMut(MouseEvent)>>,
    anim: AnimationLoop,
}

impl Particles {
    pub fn mount(container: &Element, variant: ParticleVariant, seed: u64) -> Result<Self> {
        let canvas = dom::overlay_canvas(container, "particles-canvas")?;
        Self::build(container, canvas.clone(), variant, seed).inspect_err(|_| canvas.remove())
    }

    fn build(
        container: &Element,
        canvas: HtmlCanvasElement,
        variant: ParticleVariant,
        seed: u64,
    ) -> Result<Self> {
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| DeckError::unavailable("2d canvas context"))?
            .dyn_into()
            .map_err(|_| DeckError::unavailable("2d context has unexpected type"))?;

        let ratio = dom::fit_canvas(&canvas);
        let field = Rc::new(RefCell::new(ParticleField::new(
            variant.params(),
            f64::from(canvas.width()),
            f64::from(canvas.height()),
            seed,
        )));

        let hover = if variant.params().interactive {
            let field = field.clone();
            let canvas = canvas.clone();
            let closure = Closure::wrap(Box::new(move |e: MouseEvent| {
                let rect = canvas.get_bounding_client_rect();
                let (x, y) = (f64::from(e.client_x()) - rect.left(), f64::from(e.client_y()) - rect.top());
                let inside = x >= 0.0 && y >= 0.0 && x <= rect.width() && y <= rect.height();
                field
                    .borrow_mut()
                    .set_pointer(inside.then_some((x * ratio, y * ratio)));
            }) as Box<dyn FnMut(MouseEvent)>);
            container.add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref())?;
            Some(closure)
        } else {
            None
        };

        let anim = {
            let canvas = canvas.clone();
            AnimationLoop::new(move |_now| {
                dom::fit_canvas(&canvas);
                let (w, h) = (f64::from(canvas.width()), f64::from(canvas.height()));
                let mut field = field.borrow_mut();
                if field.width != w || field.height != h {
                    field.resize(w, h);
                }
                field.step();
                draw(&ctx, &field, w, h);
                true
            })
        };

        Ok(Self { canvas, container: container.clone(), hover, anim })
    }
}

fn draw(ctx: &CanvasRenderingContext2d, field: &ParticleField, w: f64, h: f64) {
    ctx.clear_rect(0.0, 0.0, w, h);
    let particles = field.particles();

    ctx.set_stroke_style_str("#00bfa6");
    ctx.set_line_width(field.params.link_width);
    for (i, j, alpha) in field.links() {
        let (a, b) = (particles[i], particles[j]);
        ctx.set_global_alpha(alpha);
        ctx.begin_path();
        ctx.move_to(a.x, a.y);
        ctx.line_to(b.x, b.y);
        ctx.stroke();
    }

    for p in particles {
        ctx.set_global_alpha(p.alpha);
        ctx.set_fill_style_str(p.color);
        ctx.begin_path();
        let _ = ctx.arc(p.x, p.y, p.radius, 0.0, std::f64::consts::TAU);
        ctx.fill();
    }
    ctx.set_global_alpha(1.0);
}

impl Effect for Particles {
    fn start(&mut self) -> Result<()> {
        self.anim.start()
    }

    fn stop(&mut self) -> Result<()> {
        self.anim.stop();
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        self.anim.dispose();
        self.canvas.remove();
        if let Some(hover) = self.hover.take() {
            self.container
                .remove_event_listener_with_callback("mousemove", hover.as_ref().unchecked_ref())?;
        }
        Ok(())
    }
}
