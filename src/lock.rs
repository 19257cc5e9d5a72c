/// Cooperative debounce flag that keeps slide transitions from overlapping.
///
/// The lock expires on its own once `duration_ms` has passed since it was
/// taken, measured on whatever millisecond clock the caller passes in
/// (`performance.now()` in the browser).
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionLock {
    duration_ms: f64,
    held_since: Option<f64>,
}

impl TransitionLock {
    pub fn new(duration_ms: f64) -> Self {
        Self { duration_ms: duration_ms.max(0.0), held_since: None }
    }

    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Timestamp the lock was taken at, if it is still held at `now`.
    pub fn held_since(&self, now: f64) -> Option<f64> {
        self.held_since.filter(|since| now - since < self.duration_ms)
    }

    pub fn is_held(&self, now: f64) -> bool {
        self.held_since(now).is_some()
    }

    /// Take the lock. Returns `false` without touching it when still held.
    pub fn try_acquire(&mut self, now: f64) -> bool {
        if self.is_held(now) {
            return false;
        }
        self.held_since = Some(now);
        true
    }

    /// Drop the lock immediately, for instant jumps.
    pub fn release(&mut self) {
        self.held_since = None;
    }
}
