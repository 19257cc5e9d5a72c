use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{
    AddEventListenerOptions, Document, Element, KeyboardEvent, Node, TouchEvent, WheelEvent,
};

use super::dom::DomView;
use super::frame;
use crate::error::{DeckError, Result};
use crate::input::{is_text_entry, key_command, NavInput};
use crate::navigator::SlideNavigator;

pub type Deck = Rc<RefCell<SlideNavigator<DomView, Element>>>;

/// Feed one gesture to the navigator and warn when the transition took
/// longer than the lock protecting it.
pub fn navigate(deck: &Deck, input: NavInput) {
    let started = frame::now();
    let Ok(mut nav) = deck.try_borrow_mut() else {
        // re-entrant event while a transition is being applied
        return;
    };
    if nav.handle(&input, started).is_none() {
        return;
    }
    let elapsed = frame::now() - started;
    if elapsed > nav.transition_ms() {
        tracing::warn!(
            elapsed_ms = elapsed,
            lock_ms = nav.transition_ms(),
            "slide transition outlasted its lock"
        );
    }
}

/// Wire wheel, touch, keyboard, dot and URL fragment input to the deck.
/// Listeners live for the rest of the page.
pub fn install(document: &Document, deck: &Deck, wheel_exclusion: Option<String>) -> Result<()> {
    install_wheel(document, deck, wheel_exclusion)?;
    install_touch(document, deck)?;
    install_keys(document, deck)?;
    install_dots(deck)?;
    install_fragment(deck)?;
    Ok(())
}

fn install_wheel(document: &Document, deck: &Deck, exclusion: Option<String>) -> Result<()> {
    let deck = deck.clone();
    let doc = document.clone();
    let on_wheel = Closure::wrap(Box::new(move |e: WheelEvent| {
        let excluded = match (&exclusion, e.target().and_then(|t| t.dyn_into::<Node>().ok())) {
            (Some(id), Some(target)) => doc
                .get_element_by_id(id)
                .is_some_and(|region| region.contains(Some(&target))),
            _ => false,
        };
        if !excluded {
            e.prevent_default();
        }
        navigate(&deck, NavInput::Wheel { delta_y: e.delta_y(), excluded });
    }) as Box<dyn FnMut(WheelEvent)>);

    let options = AddEventListenerOptions::new();
    options.set_passive(false);
    document.add_event_listener_with_callback_and_add_event_listener_options(
        "wheel",
        on_wheel.as_ref().unchecked_ref(),
        &options,
    )?;
    on_wheel.forget();
    Ok(())
}

fn install_touch(document: &Document, deck: &Deck) -> Result<()> {
    let start_y = Rc::new(Cell::new(0.0_f64));

    let on_start = {
        let start_y = start_y.clone();
        Closure::wrap(Box::new(move |e: TouchEvent| {
            if let Some(touch) = e.touches().item(0) {
                start_y.set(f64::from(touch.client_y()));
            }
        }) as Box<dyn FnMut(TouchEvent)>)
    };
    let on_end = {
        let deck = deck.clone();
        Closure::wrap(Box::new(move |e: TouchEvent| {
            if let Some(touch) = e.changed_touches().item(0) {
                let delta_y = start_y.get() - f64::from(touch.client_y());
                navigate(&deck, NavInput::Swipe { delta_y });
            }
        }) as Box<dyn FnMut(TouchEvent)>)
    };

    let options = AddEventListenerOptions::new();
    options.set_passive(true);
    document.add_event_listener_with_callback_and_add_event_listener_options(
        "touchstart",
        on_start.as_ref().unchecked_ref(),
        &options,
    )?;
    document.add_event_listener_with_callback_and_add_event_listener_options(
        "touchend",
        on_end.as_ref().unchecked_ref(),
        &options,
    )?;
    on_start.forget();
    on_end.forget();
    Ok(())
}

fn install_keys(document: &Document, deck: &Deck) -> Result<()> {
    let deck = deck.clone();
    let on_key = Closure::wrap(Box::new(move |e: KeyboardEvent| {
        let typing = e
            .target()
            .and_then(|t| t.dyn_into::<Element>().ok())
            .is_some_and(|el| is_text_entry(&el.tag_name()));
        if typing {
            return;
        }
        let key = e.key();
        if key_command(&key).is_some() {
            e.prevent_default();
            navigate(&deck, NavInput::Key(key));
        }
    }) as Box<dyn FnMut(KeyboardEvent)>);
    document.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref())?;
    on_key.forget();
    Ok(())
}

fn install_dots(deck: &Deck) -> Result<()> {
    let dots = deck.borrow().view().dots().to_vec();
    for (index, dot) in dots.iter().enumerate() {
        let deck = deck.clone();
        let on_click = Closure::wrap(Box::new(move || {
            navigate(&deck, NavInput::DotClick(index));
        }) as Box<dyn FnMut()>);
        dot.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())?;
        on_click.forget();
    }
    Ok(())
}

/// `#slide-N` deep links: honoured once at load and on every `hashchange`.
fn install_fragment(deck: &Deck) -> Result<()> {
    let window = web_sys::window().ok_or_else(|| DeckError::missing("window"))?;
    let hash = window.location().hash()?;
    if !hash.is_empty() {
        navigate(deck, NavInput::Fragment(hash));
    }

    let deck = deck.clone();
    let on_hash = Closure::wrap(Box::new(move || {
        if let Some(hash) = web_sys::window().and_then(|w| w.location().hash().ok()) {
            navigate(&deck, NavInput::Fragment(hash));
        }
    }) as Box<dyn FnMut()>);
    window.add_event_listener_with_callback("hashchange", on_hash.as_ref().unchecked_ref())?;
    on_hash.forget();
    Ok(())
}
