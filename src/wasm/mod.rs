use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::{Document, Element};

use crate::config::{DeckConfig, EffectKind};
use crate::dispatcher::VisibilityDispatcher;
use crate::effect::Effect;
use crate::error::{DeckError, Result};
use crate::input::Thresholds;
use crate::navigator::{SlideNavigator, SlideView};
use crate::registry::{EffectRegistry, Factory};

pub mod counter;
pub mod dom;
pub mod events;
pub mod feeds;
pub mod frame;
pub mod globe;
pub mod impact;
pub mod lifecycle;
pub mod particles;
pub mod timelapse;

use dom::DomView;
use feeds::FeedRuntime;
use lifecycle::PageLifecycle;

#[wasm_bindgen(start)]
pub fn main() -> std::result::Result<(), JsValue> {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();

    let window = web_sys::window().ok_or_else(|| DeckError::missing("window"))?;
    let document = window.document().ok_or_else(|| DeckError::missing("document"))?;

    let config = dom::load_config(&document);
    let view = DomView::new(&document, config.transition_ms)?;
    let seed = js_sys::Date::now() as u64;
    let registry = build_registry(&document, &view, &config, seed);

    let mut nav = SlideNavigator::new(
        view,
        VisibilityDispatcher::new(registry),
        Thresholds { wheel: config.wheel_threshold, swipe: config.swipe_threshold },
        config.transition_ms,
    );
    nav.init();
    let deck: events::Deck = Rc::new(RefCell::new(nav));
    events::install(&document, &deck, config.wheel_exclusion_id.clone())?;

    let feeds = match FeedRuntime::start(&document, &config.feeds, seed) {
        Ok(feeds) => Some(feeds),
        Err(e) => {
            tracing::warn!("demo feeds disabled: {e}");
            None
        }
    };
    if let Err(e) = impact::install(&document) {
        tracing::warn!("impact calculator disabled: {e}");
    }
    PageLifecycle::new(deck, feeds).install(&window)?;
    Ok(())
}

/// One factory per slide, chosen by the configured effect table.
fn build_registry(
    document: &Document,
    view: &DomView,
    config: &DeckConfig,
    seed: u64,
) -> EffectRegistry<Element> {
    let mut registry = EffectRegistry::new();
    for index in 0..view.slide_count() {
        let Some(slide) = view.slide(index) else { continue };
        let container: Element = slide.clone().into();
        let factory: Option<Factory<Element>> = match config.effect_for(index) {
            EffectKind::None => None,
            EffectKind::Particles { variant } => {
                let seed = seed.wrapping_add(index as u64);
                Some(Box::new(move |slide: &Element| -> Result<Box<dyn Effect>> {
                    let host = slide
                        .query_selector(".particles-container, [id^=\"particles-js\"]")?
                        .unwrap_or_else(|| slide.clone());
                    Ok(Box::new(particles::Particles::mount(&host, variant, seed)?) as Box<dyn Effect>)
                }))
            }
            EffectKind::Globe => {
                let document = document.clone();
                let region = config.wheel_exclusion_id.clone();
                Some(Box::new(move |slide: &Element| -> Result<Box<dyn Effect>> {
                    let host = region
                        .as_deref()
                        .and_then(|id| document.get_element_by_id(id))
                        .unwrap_or_else(|| slide.clone());
                    Ok(Box::new(globe::Globe::mount(&host)?) as Box<dyn Effect>)
                }))
            }
            EffectKind::Stats => Some(Box::new(|slide: &Element| -> Result<Box<dyn Effect>> {
                Ok(Box::new(counter::StatCounters::mount(slide)?) as Box<dyn Effect>)
            })),
            EffectKind::Timelapse => {
                let seed = seed.wrapping_add(index as u64);
                Some(Box::new(move |slide: &Element| -> Result<Box<dyn Effect>> {
                    let host = slide
                        .query_selector(".timelapse-container")?
                        .unwrap_or_else(|| slide.clone());
                    Ok(Box::new(timelapse::Timelapse::mount(&host, seed)?) as Box<dyn Effect>)
                }))
            }
        };
        registry.register(container, factory);
    }
    registry
}
