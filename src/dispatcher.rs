use std::rc::Rc;

use crate::effect::{EffectHandle, EffectState};
use crate::registry::EffectRegistry;

/// Keeps only the visible slide's effect running.
pub struct VisibilityDispatcher<C> {
    registry: EffectRegistry<C>,
}

impl<C> VisibilityDispatcher<C> {
    pub fn new(registry: EffectRegistry<C>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &EffectRegistry<C> {
        &self.registry
    }

    pub fn state(&self, index: usize) -> EffectState {
        self.registry.state(index)
    }

    /// Start the effect of the first slide shown.
    pub fn activate(&mut self, index: usize) -> Option<Rc<EffectHandle>> {
        let handle = self.registry.get_or_create(index)?;
        handle.start();
        Some(handle)
    }

    /// Start `target` first, then pause `previous`, so effects sharing a
    /// canvas never show an empty frame in between.
    pub fn on_transition(&mut self, previous: usize, target: usize) {
        self.activate(target);
        if previous == target {
            return;
        }
        if let Some(handle) = self.registry.get(previous) {
            handle.stop();
        }
    }

    /// Page teardown: dispose every effect that was ever built.
    pub fn dispose_all(&self) {
        tracing::debug!(handles = self.registry.handles().count(), "disposing effects");
        self.registry.dispose_all();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::effect::testing::{EventLog, Recorder};
    use crate::effect::Effect;
    use crate::registry::Factory;

    fn dispatcher(slides: usize, built: &Rc<Vec<Cell<usize>>>) -> VisibilityDispatcher<usize> {
        let mut registry = EffectRegistry::new();
        for i in 0..slides {
            let built = built.clone();
            let factory: Factory<usize> = Box::new(move |&slide| {
                built[slide].set(built[slide].get() + 1);
                Ok(Box::new(Recorder::new().0) as Box<dyn Effect>)
            });
            registry.register(i, Some(factory));
        }
        VisibilityDispatcher::new(registry)
    }

    #[test]
    fn transition_runs_target_and_pauses_source() {
        let built = Rc::new((0..3).map(|_| Cell::new(0)).collect::<Vec<_>>());
        let mut d = dispatcher(3, &built);
        d.activate(0);
        d.on_transition(0, 1);
        assert_eq!(d.state(1), EffectState::Running);
        assert_eq!(d.state(0), EffectState::Paused);

        d.on_transition(1, 0);
        assert_eq!(d.state(0), EffectState::Running);
        assert_eq!(d.state(1), EffectState::Paused);
        assert_eq!(built[0].get(), 1);
        assert_eq!(built[1].get(), 1);
    }

    #[test]
    fn unvisited_slides_stay_uninitialized() {
        let built = Rc::new((0..4).map(|_| Cell::new(0)).collect::<Vec<_>>());
        let mut d = dispatcher(4, &built);
        d.activate(0);
        d.on_transition(0, 3);
        assert_eq!(d.state(1), EffectState::Uninitialized);
        assert_eq!(d.state(2), EffectState::Uninitialized);
        assert_eq!(built[2].get(), 0);
    }

    #[test]
    fn same_slide_transition_keeps_running() {
        let built = Rc::new(vec![Cell::new(0)]);
        let mut d = dispatcher(1, &built);
        d.on_transition(0, 0);
        assert_eq!(d.state(0), EffectState::Running);
    }

    #[test]
    fn dispose_all_after_visits() {
        let built = Rc::new((0..3).map(|_| Cell::new(0)).collect::<Vec<_>>());
        let mut d = dispatcher(3, &built);
        d.activate(0);
        d.on_transition(0, 2);
        d.dispose_all();
        assert_eq!(d.state(0), EffectState::Disposed);
        assert_eq!(d.state(2), EffectState::Disposed);
        assert_eq!(d.state(1), EffectState::Uninitialized);
    }

    fn logged_dispatcher(slides: usize, log: &EventLog) -> VisibilityDispatcher<usize> {
        let mut registry = EffectRegistry::new();
        for i in 0..slides {
            let log = log.clone();
            let factory: Factory<usize> =
                Box::new(move |&slide| Ok(Box::new(Recorder::logged(slide, &log)) as Box<dyn Effect>));
            registry.register(i, Some(factory));
        }
        VisibilityDispatcher::new(registry)
    }

    #[test]
    fn target_starts_before_source_stops() {
        let log = EventLog::default();
        let mut d = logged_dispatcher(3, &log);
        d.activate(0);
        log.borrow_mut().clear();

        d.on_transition(0, 1);
        assert_eq!(*log.borrow(), vec![(1, "start"), (0, "stop")]);

        log.borrow_mut().clear();
        d.on_transition(1, 2);
        d.on_transition(2, 1);
        assert_eq!(
            *log.borrow(),
            vec![(2, "start"), (1, "stop"), (1, "start"), (2, "stop")]
        );
    }
}
