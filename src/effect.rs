//! The uniform lifecycle every decorative slide effect is driven through.

use std::cell::{Cell, RefCell};

use crate::error::{DeckError, Result};

/// A decorative animation bound to one slide.
///
/// `stop` must halt per-frame work without releasing GPU or engine
/// resources; the instance is reused when the slide comes back. `dispose`
/// releases everything, including DOM nodes the effect injected.
pub trait Effect {
    fn start(&mut self) -> Result<()>;
    fn stop(&mut self) -> Result<()>;
    fn dispose(&mut self) -> Result<()>;
}

/// Effect for slides that have nothing to animate.
#[derive(Debug, Default)]
pub struct NoopEffect;

impl Effect for NoopEffect {
    fn start(&mut self) -> Result<()> {
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        Ok(())
    }

    fn dispose(&mut self) -> Result<()> {
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectState {
    /// No handle has been created for the slide yet.
    Uninitialized,
    Running,
    Paused,
    /// Terminal. Also the state of a handle whose factory failed.
    Disposed,
}

/// Owns one effect instance and enforces its state machine:
/// `Paused -> Running -> Paused -> ... -> Disposed`.
///
/// Every transition is idempotent and nothing an effect returns is
/// propagated: failures are logged and the handle degrades to doing nothing.
pub struct EffectHandle {
    slide: usize,
    state: Cell<EffectState>,
    effect: RefCell<Option<Box<dyn Effect>>>,
    failure: Option<DeckError>,
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("slide", &self.slide)
            .field("state", &self.state.get())
            .field("failure", &self.failure)
            .finish()
    }
}

impl EffectHandle {
    /// Wrap a freshly built effect. It starts out paused.
    pub fn new(slide: usize, effect: Box<dyn Effect>) -> Self {
        Self {
            slide,
            state: Cell::new(EffectState::Paused),
            effect: RefCell::new(Some(effect)),
            failure: None,
        }
    }

    /// Permanently inert handle standing in for an effect that could not be
    /// built.
    pub fn failed(slide: usize, error: DeckError) -> Self {
        Self {
            slide,
            state: Cell::new(EffectState::Disposed),
            effect: RefCell::new(None),
            failure: Some(error),
        }
    }

    pub fn slide(&self) -> usize {
        self.slide
    }

    pub fn state(&self) -> EffectState {
        self.state.get()
    }

    pub fn failure(&self) -> Option<&DeckError> {
        self.failure.as_ref()
    }

    pub fn is_running(&self) -> bool {
        self.state.get() == EffectState::Running
    }

    pub fn start(&self) {
        if self.state.get() != EffectState::Paused {
            return;
        }
        let mut slot = self.effect.borrow_mut();
        let Some(effect) = slot.as_mut() else { return };
        match effect.start() {
            Ok(()) => self.state.set(EffectState::Running),
            Err(e) => tracing::warn!(slide = self.slide, "effect failed to start: {e}"),
        }
    }

    pub fn stop(&self) {
        if self.state.get() != EffectState::Running {
            return;
        }
        if let Some(effect) = self.effect.borrow_mut().as_mut() {
            if let Err(e) = effect.stop() {
                tracing::warn!(slide = self.slide, "effect failed to stop cleanly: {e}");
            }
        }
        self.state.set(EffectState::Paused);
    }

    /// Release the effect. Runs the effect's own `dispose` at most once.
    pub fn dispose(&self) {
        if self.state.get() == EffectState::Disposed {
            return;
        }
        self.state.set(EffectState::Disposed);
        if let Some(mut effect) = self.effect.borrow_mut().take() {
            if let Err(e) = effect.dispose() {
                tracing::error!(slide = self.slide, "effect dispose failed: {e}");
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::Effect;
    use crate::error::{DeckError, Result};

    /// Call log shared between a recorder and the test that owns it.
    #[derive(Debug, Default)]
    pub struct Calls {
        pub start: usize,
        pub stop: usize,
        pub dispose: usize,
    }

    /// Ordered `(slide, call)` entries shared by every recorder in a test.
    pub type EventLog = Rc<RefCell<Vec<(usize, &'static str)>>>;

    /// Effect that records every call and can be told to fail.
    pub struct Recorder {
        pub calls: Rc<RefCell<Calls>>,
        pub fail_start: bool,
        pub fail_dispose: bool,
        log: Option<(usize, EventLog)>,
    }

    impl Recorder {
        pub fn new() -> (Self, Rc<RefCell<Calls>>) {
            let calls = Rc::new(RefCell::new(Calls::default()));
            (
                Self { calls: calls.clone(), fail_start: false, fail_dispose: false, log: None },
                calls,
            )
        }

        /// Recorder that also appends to `log`, tagged with `slide`.
        pub fn logged(slide: usize, log: &EventLog) -> Self {
            let (mut recorder, _) = Self::new();
            recorder.log = Some((slide, log.clone()));
            recorder
        }

        fn record(&self, call: &'static str) {
            if let Some((slide, log)) = &self.log {
                log.borrow_mut().push((*slide, call));
            }
        }
    }

    impl Effect for Recorder {
        fn start(&mut self) -> Result<()> {
            self.calls.borrow_mut().start += 1;
            self.record("start");
            if self.fail_start {
                return Err(DeckError::unavailable("recorder start"));
            }
            Ok(())
        }

        fn stop(&mut self) -> Result<()> {
            self.calls.borrow_mut().stop += 1;
            self.record("stop");
            Ok(())
        }

        fn dispose(&mut self) -> Result<()> {
            self.calls.borrow_mut().dispose += 1;
            self.record("dispose");
            if self.fail_dispose {
                return Err(DeckError::Js("context lost".into()));
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::Recorder;
    use super::*;

    #[test]
    fn start_and_stop_are_idempotent() {
        let (recorder, calls) = Recorder::new();
        let handle = EffectHandle::new(0, Box::new(recorder));
        assert_eq!(handle.state(), EffectState::Paused);

        handle.start();
        handle.start();
        assert_eq!(handle.state(), EffectState::Running);
        assert_eq!(calls.borrow().start, 1);

        handle.stop();
        handle.stop();
        assert_eq!(handle.state(), EffectState::Paused);
        assert_eq!(calls.borrow().stop, 1);
    }

    #[test]
    fn dispose_runs_once_and_is_terminal() {
        let (recorder, calls) = Recorder::new();
        let handle = EffectHandle::new(3, Box::new(recorder));
        handle.start();
        handle.dispose();
        handle.dispose();
        handle.start();
        handle.stop();
        assert_eq!(handle.state(), EffectState::Disposed);
        let calls = calls.borrow();
        assert_eq!(calls.dispose, 1);
        assert_eq!(calls.start, 1);
        assert_eq!(calls.stop, 0);
    }

    #[test]
    fn failed_start_leaves_handle_paused() {
        let (mut recorder, calls) = Recorder::new();
        recorder.fail_start = true;
        let handle = EffectHandle::new(1, Box::new(recorder));
        handle.start();
        assert_eq!(handle.state(), EffectState::Paused);
        assert_eq!(calls.borrow().start, 1);
    }

    #[test]
    fn failed_handle_is_inert() {
        let handle = EffectHandle::failed(2, DeckError::unavailable("webgl2"));
        handle.start();
        handle.stop();
        handle.dispose();
        assert_eq!(handle.state(), EffectState::Disposed);
        assert_eq!(handle.failure(), Some(&DeckError::unavailable("webgl2")));
    }

    #[test]
    fn dispose_error_is_swallowed() {
        let (mut recorder, calls) = Recorder::new();
        recorder.fail_dispose = true;
        let handle = EffectHandle::new(0, Box::new(recorder));
        handle.dispose();
        assert_eq!(handle.state(), EffectState::Disposed);
        assert_eq!(calls.borrow().dispose, 1);
    }
}
