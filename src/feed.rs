//! Push-style feeds for the simulated data panels.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Callback<T> = Box<dyn FnMut(&T)>;

struct Subscribers<T> {
    next_id: u64,
    active: Vec<(u64, Callback<T>)>,
    /// Nesting depth of `publish` calls currently on the stack.
    depth: usize,
    /// Ids cancelled while any `publish` was running.
    removed: Vec<u64>,
}

/// A value stream panels subscribe to. Single-threaded; callbacks run in
/// subscription order on every [`publish`](Feed::publish).
pub struct Feed<T> {
    subscribers: Rc<RefCell<Subscribers<T>>>,
}

impl<T> Default for Feed<T> {
    fn default() -> Self {
        Self {
            subscribers: Rc::new(RefCell::new(Subscribers {
                next_id: 0,
                active: Vec::new(),
                depth: 0,
                removed: Vec::new(),
            })),
        }
    }
}

impl<T: 'static> Feed<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: impl FnMut(&T) + 'static) -> Subscription {
        let mut subs = self.subscribers.borrow_mut();
        let id = subs.next_id;
        subs.next_id += 1;
        subs.active.push((id, Box::new(callback)));

        let weak: Weak<RefCell<Subscribers<T>>> = Rc::downgrade(&self.subscribers);
        Subscription {
            cancel: Some(Box::new(move || {
                if let Some(subs) = weak.upgrade() {
                    let mut subs = subs.borrow_mut();
                    subs.active.retain(|(other, _)| *other != id);
                    if subs.depth > 0 {
                        subs.removed.push(id);
                    }
                }
            })),
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().active.len()
    }

    /// Hand `value` to every subscriber. Callbacks may subscribe, unsubscribe
    /// or publish again while this runs; a nested publish only reaches the
    /// subscribers not already running further up the stack.
    pub fn publish(&self, value: &T) {
        let mut running = {
            let mut subs = self.subscribers.borrow_mut();
            subs.depth += 1;
            std::mem::take(&mut subs.active)
        };
        for (id, callback) in running.iter_mut() {
            if self.subscribers.borrow().removed.contains(id) {
                continue;
            }
            callback(value);
        }

        let mut subs = self.subscribers.borrow_mut();
        subs.depth -= 1;
        running.retain(|(id, _)| !subs.removed.contains(id));
        running.append(&mut subs.active);
        subs.active = running;
        if subs.depth == 0 {
            subs.removed.clear();
        }
    }
}

/// Keeps a feed callback alive. Dropping it unsubscribes.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.cancel();
    }

    fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn subscribers_receive_values_in_order() {
        let feed = Feed::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a = seen.clone();
        let b = seen.clone();
        let _s1 = feed.subscribe(move |v: &u32| a.borrow_mut().push(("a", *v)));
        let _s2 = feed.subscribe(move |v: &u32| b.borrow_mut().push(("b", *v)));

        feed.publish(&7);
        assert_eq!(*seen.borrow(), vec![("a", 7), ("b", 7)]);
    }

    #[test]
    fn unsubscribe_stops_delivery() {
        let feed = Feed::new();
        let hits = Rc::new(Cell::new(0));
        let h = hits.clone();
        let sub = feed.subscribe(move |_: &()| h.set(h.get() + 1));
        feed.publish(&());
        sub.unsubscribe();
        feed.publish(&());
        assert_eq!(hits.get(), 1);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn drop_unsubscribes() {
        let feed: Feed<i32> = Feed::new();
        {
            let _sub = feed.subscribe(|_| {});
            assert_eq!(feed.subscriber_count(), 1);
        }
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_from_inside_callback() {
        let feed: Rc<Feed<i32>> = Rc::new(Feed::new());
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let hits = Rc::new(Cell::new(0));

        let inner_slot = slot.clone();
        let h = hits.clone();
        let sub = feed.subscribe(move |_| {
            h.set(h.get() + 1);
            inner_slot.borrow_mut().take();
        });
        *slot.borrow_mut() = Some(sub);

        feed.publish(&1);
        feed.publish(&2);
        assert_eq!(hits.get(), 1);
        assert_eq!(feed.subscriber_count(), 0);
    }

    #[test]
    fn subscription_outliving_feed_is_harmless() {
        let feed: Feed<i32> = Feed::new();
        let sub = feed.subscribe(|_| {});
        drop(feed);
        sub.unsubscribe();
    }

    #[test]
    fn cancel_after_nested_publish_sticks() {
        let feed: Rc<Feed<i32>> = Rc::new(Feed::new());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let a_slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let a_seen = seen.clone();
        *a_slot.borrow_mut() = Some(feed.subscribe(move |v| a_seen.borrow_mut().push(("a", *v))));

        let inner_feed = Rc::downgrade(&feed);
        let inner_slot = a_slot.clone();
        let b_seen = seen.clone();
        let _b = feed.subscribe(move |v| {
            b_seen.borrow_mut().push(("b", *v));
            if *v == 1 {
                if let Some(feed) = inner_feed.upgrade() {
                    feed.publish(&2);
                }
                inner_slot.borrow_mut().take();
            }
        });

        feed.publish(&1);
        feed.publish(&3);
        assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1), ("b", 3)]);
        assert_eq!(feed.subscriber_count(), 1);
    }

    #[test]
    fn nested_publish_skips_running_subscribers() {
        let feed: Rc<Feed<i32>> = Rc::new(Feed::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let inner_feed = Rc::downgrade(&feed);
        let a_seen = seen.clone();
        let _a = feed.subscribe(move |v| {
            a_seen.borrow_mut().push(("a", *v));
            if *v == 1 {
                if let Some(feed) = inner_feed.upgrade() {
                    feed.publish(&2);
                }
            }
        });
        let b_seen = seen.clone();
        let late = Rc::new(RefCell::new(None));
        let late_slot = late.clone();
        let late_feed = Rc::downgrade(&feed);
        let _b = feed.subscribe(move |v| {
            b_seen.borrow_mut().push(("b", *v));
            if late_slot.borrow().is_none() {
                if let Some(feed) = late_feed.upgrade() {
                    let sub = feed.subscribe(|_| {});
                    *late_slot.borrow_mut() = Some(sub);
                }
            }
        });

        feed.publish(&1);
        assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1)]);
        assert_eq!(feed.subscriber_count(), 3);
    }
}
