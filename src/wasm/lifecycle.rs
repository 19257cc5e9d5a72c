use std::cell::RefCell;

use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{PageTransitionEvent, Window};

use super::events::Deck;
use super::feeds::FeedRuntime;
use crate::error::Result;

/// Owns what has to be released when the page goes away for good.
pub struct PageLifecycle {
    deck: Deck,
    feeds: RefCell<Option<FeedRuntime>>,
}

impl PageLifecycle {
    pub fn new(deck: Deck, feeds: Option<FeedRuntime>) -> Self {
        Self { deck, feeds: RefCell::new(feeds) }
    }

    pub fn has_feeds(&self) -> bool {
        self.feeds.borrow().is_some()
    }

    /// `pagehide` handler. A page entering the back/forward cache keeps its
    /// effects and feeds, since it is shown again as-is on `pageshow`.
    /// Returns `true` when everything was released.
    pub fn on_pagehide(&self, persisted: bool) -> bool {
        if persisted {
            tracing::debug!("page cached, effects kept");
            return false;
        }
        if let Some(feeds) = self.feeds.borrow_mut().take() {
            tracing::debug!(timers = feeds.timer_count(), "stopping demo feeds");
        }
        match self.deck.try_borrow() {
            Ok(nav) => {
                nav.teardown();
                true
            }
            Err(_) => {
                tracing::error!("deck busy during teardown, effects not released");
                false
            }
        }
    }

    /// Listen for `pagehide` on `window` for the rest of the page.
    pub fn install(self, window: &Window) -> Result<()> {
        let on_hide = Closure::wrap(Box::new(move |e: PageTransitionEvent| {
            self.on_pagehide(e.persisted());
        }) as Box<dyn FnMut(PageTransitionEvent)>);
        window.add_event_listener_with_callback("pagehide", on_hide.as_ref().unchecked_ref())?;
        on_hide.forget();
        Ok(())
    }
}
