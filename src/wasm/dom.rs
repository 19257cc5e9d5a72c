use wasm_bindgen::JsCast;
use web_sys::{window, Document, Element, HtmlCanvasElement, HtmlElement};

use crate::config::DeckConfig;
use crate::error::{DeckError, Result};
use crate::navigator::SlideView;

/// `.slide` sections driven by the navigator, plus their nav dots and the
/// optional `.slide-counter`.
pub struct DomView {
    slides: Vec<HtmlElement>,
    dots: Vec<Element>,
    counter: Option<Element>,
}

impl DomView {
    pub fn new(document: &Document, transition_ms: f64) -> Result<Self> {
        let slides: Vec<HtmlElement> = query_all(document, ".slide")?
            .into_iter()
            .filter_map(|el| el.dyn_into::<HtmlElement>().ok())
            .collect();
        let dots = query_all(document, ".nav-dot")?;
        let counter = document.query_selector(".slide-counter")?;

        let transition = format!(
            "opacity {s}s ease-in-out, visibility {s}s ease-in-out",
            s = transition_ms / 1000.0
        );
        for slide in &slides {
            let style = slide.style();
            style.set_property("position", "fixed")?;
            style.set_property("inset", "0")?;
            style.set_property("width", "100vw")?;
            style.set_property("height", "100vh")?;
            style.set_property("transition", &transition)?;
        }
        Ok(Self { slides, dots, counter })
    }

    pub fn slide(&self, index: usize) -> Option<&HtmlElement> {
        self.slides.get(index)
    }

    pub fn dots(&self) -> &[Element] {
        &self.dots
    }

    fn style(&self, index: usize, opacity: &str, visibility: &str, z_index: &str, active: bool) {
        let Some(slide) = self.slides.get(index) else { return };
        let style = slide.style();
        let applied = style
            .set_property("opacity", opacity)
            .and_then(|_| style.set_property("visibility", visibility))
            .and_then(|_| style.set_property("z-index", z_index))
            .and_then(|_| toggle_class(slide, "active", active));
        if let Err(e) = applied {
            tracing::warn!(slide = index, "slide style not applied: {:?}", e);
        }
    }
}

impl SlideView for DomView {
    fn slide_count(&self) -> usize {
        self.slides.len()
    }

    fn show(&self, index: usize) {
        self.style(index, "1", "visible", "10", true);
    }

    fn hide(&self, index: usize) {
        self.style(index, "0", "hidden", "1", false);
    }

    fn set_dot_active(&self, index: usize, active: bool) {
        if let Some(dot) = self.dots.get(index) {
            let _ = toggle_class(dot, "active", active);
        }
    }

    fn set_counter(&self, current: usize, total: usize) {
        if let Some(counter) = &self.counter {
            counter.set_text_content(Some(&format!("{}/{}", current + 1, total)));
        }
    }
}

fn toggle_class(el: &Element, class: &str, on: bool) -> std::result::Result<(), wasm_bindgen::JsValue> {
    if on {
        el.class_list().add_1(class)
    } else {
        el.class_list().remove_1(class)
    }
}

pub fn query_all(root: &Document, selector: &str) -> Result<Vec<Element>> {
    let list = root.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect())
}

/// Deck configuration from `<script type="application/json" id="deck-config">`.
/// Missing or malformed documents fall back to the defaults.
pub fn load_config(document: &Document) -> DeckConfig {
    let Some(text) = document
        .get_element_by_id("deck-config")
        .and_then(|el| el.text_content())
    else {
        return DeckConfig::default();
    };
    DeckConfig::from_json(&text).unwrap_or_else(|e| {
        tracing::warn!("{e}, using defaults");
        DeckConfig::default()
    })
}

/// Full-size canvas layered behind the container's content.
pub fn overlay_canvas(container: &Element, class: &str) -> Result<HtmlCanvasElement> {
    let document = container
        .owner_document()
        .ok_or_else(|| DeckError::missing("owner document"))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| DeckError::unavailable("canvas element"))?;
    canvas.set_class_name(class);
    let style = canvas.style();
    style.set_property("position", "absolute")?;
    style.set_property("inset", "0")?;
    style.set_property("width", "100%")?;
    style.set_property("height", "100%")?;
    style.set_property("z-index", "0")?;
    style.set_property("pointer-events", "none")?;
    container.prepend_with_node_1(&canvas)?;
    Ok(canvas)
}

/// Match the canvas backing store to its CSS size. Returns the device pixel
/// ratio used.
pub fn fit_canvas(canvas: &HtmlCanvasElement) -> f64 {
    let ratio = window().map_or(1.0, |w| w.device_pixel_ratio());
    let w = (f64::from(canvas.client_width()) * ratio) as u32;
    let h = (f64::from(canvas.client_height()) * ratio) as u32;
    if w > 0 && h > 0 && (canvas.width() != w || canvas.height() != h) {
        canvas.set_width(w);
        canvas.set_height(h);
    }
    ratio
}

pub fn set_text(document: &Document, id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}
