//! Lazily built, cached effect handles keyed by slide index.

use std::rc::Rc;

use crate::effect::{Effect, EffectHandle, EffectState, NoopEffect};
use crate::error::Result;

/// Builds the effect for one slide from that slide's container.
pub type Factory<C> = Box<dyn Fn(&C) -> Result<Box<dyn Effect>>>;

struct Slot<C> {
    container: C,
    factory: Option<Factory<C>>,
    handle: Option<Rc<EffectHandle>>,
}

/// Holds at most one live handle per slide.
///
/// `C` is whatever the factories need to build into; the browser shell uses
/// the slide's `Element`.
pub struct EffectRegistry<C> {
    slots: Vec<Slot<C>>,
}

impl<C> Default for EffectRegistry<C> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<C> EffectRegistry<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next slide. A slide without a factory gets a
    /// [`NoopEffect`]. Returns the slide's index.
    pub fn register(&mut self, container: C, factory: Option<Factory<C>>) -> usize {
        self.slots.push(Slot { container, factory, handle: None });
        self.slots.len() - 1
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Existing handle for `index`, without building one.
    pub fn get(&self, index: usize) -> Option<Rc<EffectHandle>> {
        self.slots.get(index)?.handle.clone()
    }

    /// Lifecycle state of the slide's effect.
    pub fn state(&self, index: usize) -> EffectState {
        self.get(index)
            .map_or(EffectState::Uninitialized, |handle| handle.state())
    }

    /// Cached handle for `index`, building it on first use.
    ///
    /// A handle that was disposed by teardown is rebuilt; one whose factory
    /// failed is returned as-is so the factory is not retried on every
    /// visit. Factory errors never reach the caller.
    pub fn get_or_create(&mut self, index: usize) -> Option<Rc<EffectHandle>> {
        let slot = self.slots.get_mut(index)?;
        if let Some(handle) = &slot.handle {
            if handle.state() != EffectState::Disposed || handle.failure().is_some() {
                return Some(handle.clone());
            }
        }

        let built = match &slot.factory {
            Some(factory) => factory(&slot.container),
            None => Ok(Box::new(NoopEffect) as Box<dyn Effect>),
        };
        let handle = match built {
            Ok(effect) => {
                tracing::debug!(slide = index, "effect created");
                EffectHandle::new(index, effect)
            }
            Err(e) => {
                tracing::error!(slide = index, "effect unavailable, slide continues without it: {e}");
                EffectHandle::failed(index, e)
            }
        };
        let handle = Rc::new(handle);
        slot.handle = Some(handle.clone());
        Some(handle)
    }

    /// Every handle built so far, in slide order.
    pub fn handles(&self) -> impl Iterator<Item = &Rc<EffectHandle>> + '_ {
        self.slots.iter().filter_map(|slot| slot.handle.as_ref())
    }

    /// Dispose every handle. Each disposal is independent, a failing one
    /// is logged by the handle and the rest still run.
    pub fn dispose_all(&self) {
        for handle in self.handles() {
            handle.dispose();
        }
    }
}
