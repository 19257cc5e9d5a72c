//! Which slide is on screen, and how input moves it.

use crate::dispatcher::VisibilityDispatcher;
use crate::effect::EffectState;
use crate::input::{NavCommand, NavInput, Thresholds};
use crate::lock::TransitionLock;

/// The presentation surface the navigator drives.
pub trait SlideView {
    fn slide_count(&self) -> usize;
    /// Bring a slide to the front and fade it in.
    fn show(&self, index: usize);
    /// Fade a slide out and send it to the back.
    fn hide(&self, index: usize);
    fn set_dot_active(&self, index: usize, active: bool);
    /// Update the `current/total` indicator, `current` is 0-based.
    fn set_counter(&self, current: usize, total: usize);
}

/// A completed slide change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: usize,
    pub to: usize,
}

pub struct SlideNavigator<V, C> {
    view: V,
    dispatcher: VisibilityDispatcher<C>,
    thresholds: Thresholds,
    lock: TransitionLock,
    current: usize,
}

impl<V: SlideView, C> SlideNavigator<V, C> {
    pub fn new(
        view: V,
        dispatcher: VisibilityDispatcher<C>,
        thresholds: Thresholds,
        transition_ms: f64,
    ) -> Self {
        Self {
            view,
            dispatcher,
            thresholds,
            lock: TransitionLock::new(transition_ms),
            current: 0,
        }
    }

    /// Put the deck in its initial state: slide 0 visible with its effect
    /// running, everything else hidden.
    pub fn init(&mut self) {
        let total = self.view.slide_count();
        if total == 0 {
            return;
        }
        for index in 1..total {
            self.view.hide(index);
            self.view.set_dot_active(index, false);
        }
        self.view.show(0);
        self.view.set_dot_active(0, true);
        self.view.set_counter(0, total);
        self.current = 0;
        self.dispatcher.activate(0);
        tracing::info!(slides = total, "slide deck ready");
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn slide_count(&self) -> usize {
        self.view.slide_count()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn dispatcher(&self) -> &VisibilityDispatcher<C> {
        &self.dispatcher
    }

    pub fn effect_state(&self, index: usize) -> EffectState {
        self.dispatcher.state(index)
    }

    pub fn is_locked(&self, now: f64) -> bool {
        self.lock.is_held(now)
    }

    pub fn transition_ms(&self) -> f64 {
        self.lock.duration_ms()
    }

    /// Move to `index`. Out of range, same slide and held lock are all
    /// silent no-ops.
    pub fn go_to(&mut self, index: usize, now: f64) -> Option<Transition> {
        let total = self.view.slide_count();
        if index >= total || index == self.current {
            return None;
        }
        if !self.lock.try_acquire(now) {
            tracing::trace!(slide = index, "transition in progress, input dropped");
            return None;
        }

        let from = self.current;
        tracing::debug!("slide {} -> {}", from + 1, index + 1);

        self.view.hide(from);
        self.view.show(index);
        self.view.set_dot_active(from, false);
        self.view.set_dot_active(index, true);
        self.current = index;
        self.view.set_counter(index, total);

        self.dispatcher.on_transition(from, index);
        Some(Transition { from, to: index })
    }

    /// Like [`go_to`](Self::go_to) but the lock is released as soon as the
    /// swap is done. Deep links land here, so a link followed mid-transition
    /// does not swallow the next gesture.
    pub fn jump_to(&mut self, index: usize, now: f64) -> Option<Transition> {
        let transition = self.go_to(index, now)?;
        self.lock.release();
        Some(transition)
    }

    pub fn next(&mut self, now: f64) -> Option<Transition> {
        if self.current + 1 >= self.view.slide_count() {
            return None;
        }
        self.go_to(self.current + 1, now)
    }

    pub fn prev(&mut self, now: f64) -> Option<Transition> {
        let index = self.current.checked_sub(1)?;
        self.go_to(index, now)
    }

    pub fn execute(&mut self, command: NavCommand, now: f64) -> Option<Transition> {
        match command {
            NavCommand::Next => self.next(now),
            NavCommand::Prev => self.prev(now),
            NavCommand::First => self.go_to(0, now),
            NavCommand::Last => {
                let last = self.view.slide_count().checked_sub(1)?;
                self.go_to(last, now)
            }
            NavCommand::GoTo(index) => self.go_to(index, now),
            NavCommand::JumpTo(index) => self.jump_to(index, now),
        }
    }

    /// Normalise a raw gesture and act on it.
    pub fn handle(&mut self, input: &NavInput, now: f64) -> Option<Transition> {
        let command = input.normalize(self.thresholds)?;
        self.execute(command, now)
    }

    /// Release every effect, for page teardown.
    pub fn teardown(&self) {
        self.dispatcher.dispose_all();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::*;
    use crate::effect::{testing::Recorder, Effect};
    use crate::registry::{EffectRegistry, Factory};

    const LOCK: f64 = 800.0;

    #[derive(Default)]
    struct FakeView {
        visible: RefCell<Vec<bool>>,
        dots: RefCell<Vec<bool>>,
        counter: RefCell<String>,
    }

    impl FakeView {
        fn new(slides: usize) -> Self {
            Self {
                visible: RefCell::new(vec![false; slides]),
                dots: RefCell::new(vec![false; slides]),
                counter: RefCell::default(),
            }
        }

        fn visible(&self) -> Vec<usize> {
            let visible = self.visible.borrow();
            (0..visible.len()).filter(|&i| visible[i]).collect()
        }
    }

    impl SlideView for FakeView {
        fn slide_count(&self) -> usize {
            self.visible.borrow().len()
        }

        fn show(&self, index: usize) {
            self.visible.borrow_mut()[index] = true;
        }

        fn hide(&self, index: usize) {
            self.visible.borrow_mut()[index] = false;
        }

        fn set_dot_active(&self, index: usize, active: bool) {
            self.dots.borrow_mut()[index] = active;
        }

        fn set_counter(&self, current: usize, total: usize) {
            *self.counter.borrow_mut() = format!("{}/{}", current + 1, total);
        }
    }

    struct Deck {
        nav: SlideNavigator<FakeView, usize>,
        built: Rc<Vec<Cell<usize>>>,
    }

    fn deck(slides: usize) -> Deck {
        let built = Rc::new((0..slides).map(|_| Cell::new(0)).collect::<Vec<_>>());
        let mut registry = EffectRegistry::new();
        for i in 0..slides {
            let built = built.clone();
            let factory: Factory<usize> = Box::new(move |&slide| {
                built[slide].set(built[slide].get() + 1);
                Ok(Box::new(Recorder::new().0) as Box<dyn Effect>)
            });
            registry.register(i, Some(factory));
        }
        let mut nav = SlideNavigator::new(
            FakeView::new(slides),
            VisibilityDispatcher::new(registry),
            Thresholds::default(),
            LOCK,
        );
        nav.init();
        Deck { nav, built }
    }

    #[test]
    fn init_shows_first_slide_only() {
        let d = deck(5);
        assert_eq!(d.nav.view().visible(), vec![0]);
        assert_eq!(*d.nav.view().counter.borrow(), "1/5");
        assert_eq!(d.nav.effect_state(0), EffectState::Running);
        assert_eq!(d.nav.effect_state(1), EffectState::Uninitialized);
    }

    #[test]
    fn go_to_every_valid_index() {
        let mut d = deck(6);
        let mut now = 0.0;
        for index in [3, 5, 0, 1, 4, 2] {
            now += LOCK;
            assert!(d.nav.go_to(index, now).is_some());
            assert_eq!(d.nav.current(), index);
            assert_eq!(d.nav.view().visible(), vec![index]);
            assert_eq!(d.nav.view().dots.borrow().iter().filter(|on| **on).count(), 1);
        }
    }

    #[test]
    fn out_of_range_is_ignored() {
        let mut d = deck(4);
        assert_eq!(d.nav.go_to(4, 0.0), None);
        assert_eq!(d.nav.go_to(usize::MAX, 0.0), None);
        assert_eq!(d.nav.current(), 0);
        // ignored requests do not take the lock
        assert!(!d.nav.is_locked(0.0));
    }

    #[test]
    fn same_slide_is_ignored() {
        let mut d = deck(4);
        assert_eq!(d.nav.go_to(0, 0.0), None);
        assert!(!d.nav.is_locked(0.0));
    }

    #[test]
    fn no_wraparound() {
        let mut d = deck(3);
        let mut now = 0.0;
        for _ in 0..5 {
            d.nav.next(now);
            now += LOCK;
        }
        assert_eq!(d.nav.current(), 2);
        for _ in 0..5 {
            d.nav.prev(now);
            now += LOCK;
        }
        assert_eq!(d.nav.current(), 0);
    }

    #[test]
    fn input_during_lock_is_dropped() {
        let mut d = deck(11);
        assert!(d.nav.go_to(4, 1_000.0).is_some());
        assert_eq!(d.nav.go_to(7, 1_500.0), None);
        assert_eq!(d.nav.next(1_799.0), None);
        assert_eq!(d.nav.current(), 4);
        assert_eq!(d.built[7].get(), 0);

        assert!(d.nav.go_to(7, 1_800.0).is_some());
        assert_eq!(d.nav.current(), 7);
    }

    #[test]
    fn burst_of_wheel_events_moves_one_slide() {
        let mut d = deck(11);
        let wheel = NavInput::Wheel { delta_y: 120.0, excluded: false };
        for t in 0..20 {
            d.nav.handle(&wheel, f64::from(t) * 16.0);
        }
        assert_eq!(d.nav.current(), 1);
    }

    #[test]
    fn jump_releases_lock_immediately() {
        let mut d = deck(5);
        assert!(d.nav.jump_to(3, 0.0).is_some());
        assert!(!d.nav.is_locked(1.0));
        assert!(d.nav.go_to(1, 1.0).is_some());
    }

    #[test]
    fn fragment_jumps_without_holding_lock() {
        let mut d = deck(11);
        let hop = d.nav.handle(&NavInput::Fragment("#slide-7".into()), 0.0);
        assert_eq!(hop, Some(Transition { from: 0, to: 6 }));
        assert_eq!(d.nav.view().visible(), vec![6]);
        assert_eq!(d.nav.effect_state(6), EffectState::Running);
        assert_eq!(d.nav.effect_state(0), EffectState::Paused);
        assert!(!d.nav.is_locked(1.0));
        assert!(d.nav.handle(&NavInput::Key("ArrowDown".into()), 1.0).is_some());
        assert_eq!(d.nav.current(), 7);

        assert_eq!(d.nav.handle(&NavInput::Fragment("#slide-40".into()), LOCK * 2.0), None);
        assert_eq!(d.nav.handle(&NavInput::Fragment("#pricing".into()), LOCK * 2.0), None);
    }

    #[test]
    fn home_and_end() {
        let mut d = deck(11);
        d.nav.handle(&NavInput::Key("End".into()), 0.0);
        assert_eq!(d.nav.current(), 10);
        d.nav.handle(&NavInput::Key("Home".into()), LOCK);
        assert_eq!(d.nav.current(), 0);
    }

    #[test]
    fn excluded_wheel_never_navigates() {
        let mut d = deck(4);
        let wheel = NavInput::Wheel { delta_y: 300.0, excluded: true };
        assert_eq!(d.nav.handle(&wheel, 0.0), None);
        assert!(!d.nav.is_locked(0.0));
    }

    #[test]
    fn effects_follow_the_visible_slide() {
        let mut d = deck(11);
        d.nav.go_to(1, 0.0);
        d.nav.go_to(0, LOCK);
        assert_eq!(d.nav.effect_state(0), EffectState::Running);
        assert_eq!(d.nav.effect_state(1), EffectState::Paused);
        assert_eq!(d.built[0].get(), 1);
        assert_eq!(d.built[1].get(), 1);
    }

    #[test]
    fn scripted_visit_of_eleven_slides() {
        let mut d = deck(11);
        let mut now = 0.0;
        for command in [NavCommand::Next, NavCommand::Next, NavCommand::Next, NavCommand::Prev] {
            assert!(d.nav.execute(command, now).is_some());
            now += LOCK;
        }

        assert_eq!(d.nav.current(), 2);
        assert_eq!(*d.nav.view().counter.borrow(), "3/11");
        for i in 0..=3 {
            assert_eq!(d.built[i].get(), 1, "slide {i}");
        }
        let running: Vec<usize> = (0..11)
            .filter(|&i| d.nav.effect_state(i) == EffectState::Running)
            .collect();
        assert_eq!(running, vec![2]);
    }

    #[test]
    fn teardown_disposes_everything_built() {
        let mut d = deck(4);
        d.nav.go_to(2, 0.0);
        d.nav.teardown();
        d.nav.teardown();
        assert_eq!(d.nav.effect_state(0), EffectState::Disposed);
        assert_eq!(d.nav.effect_state(2), EffectState::Disposed);
        assert_eq!(d.nav.effect_state(1), EffectState::Uninitialized);
    }

    #[test]
    fn empty_deck_is_inert() {
        let mut d = deck(0);
        assert_eq!(d.nav.next(0.0), None);
        assert_eq!(d.nav.execute(NavCommand::Last, 0.0), None);
    }
}
