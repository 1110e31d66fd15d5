//! Injectable time source.
//!
//! The controller never reads `Instant::now()` directly; it asks its
//! [`Clock`]. Production code injects [`WallClock`]; tests inject a
//! [`ManualClock`] and advance it explicitly, so every debounce transition is
//! exercised without real timers or sleeps.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// Abstraction over monotonic time.
pub trait Clock {
    /// Current instant (monotonic).
    fn now(&self) -> Instant;
}

/// Production clock backed by `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct WallClock;

impl Clock for WallClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Virtual clock that only moves when [`advance`](ManualClock::advance) is
/// called.
///
/// Cloning yields a handle onto the same underlying time, so a test can hand
/// one clone to the controller and keep another to drive it:
///
/// ```
/// use std::time::Duration;
/// use typeahead::ManualClock;
///
/// let clock = ManualClock::new();
/// let handle = clock.clone();
/// handle.advance(Duration::from_millis(250));
/// assert_eq!(clock.elapsed(), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    /// Fixed anchor captured at creation.
    anchor: Instant,
    /// Virtual elapsed time, shared across clones.
    elapsed: Rc<Cell<Duration>>,
}

impl ManualClock {
    /// Create a clock frozen at its anchor instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            anchor: Instant::now(),
            elapsed: Rc::new(Cell::new(Duration::ZERO)),
        }
    }

    /// Advance virtual time by `delta`.
    pub fn advance(&self, delta: Duration) {
        self.elapsed.set(self.elapsed.get() + delta);
    }

    /// Total virtual time elapsed since creation.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.elapsed.get()
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.anchor + self.elapsed.get()
    }
}
