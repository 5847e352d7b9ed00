use std::time::Duration;

/// Converts elapsed time into gravity ticks.
///
/// The timer accumulates elapsed time while armed; every full interval yields
/// one tick. A cancelled timer ignores elapsed time and forgets any partial
/// interval, so re-arming always starts a fresh interval.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use planet_tetris_engine::GravityTimer;
///
/// let mut timer = GravityTimer::new();
/// timer.arm(Duration::from_millis(100));
/// timer.add_elapsed(Duration::from_millis(250));
///
/// assert!(timer.take_tick());
/// assert!(timer.take_tick());
/// assert!(!timer.take_tick());
///
/// timer.cancel();
/// timer.add_elapsed(Duration::from_secs(1));
/// assert!(!timer.take_tick());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GravityTimer {
    interval: Option<Duration>,
    accumulated: Duration,
}

impl GravityTimer {
    /// Creates a cancelled timer.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            interval: None,
            accumulated: Duration::ZERO,
        }
    }

    #[must_use]
    pub const fn interval(&self) -> Option<Duration> {
        self.interval
    }

    #[must_use]
    pub const fn is_armed(&self) -> bool {
        self.interval.is_some()
    }

    /// Starts a fresh interval.
    pub fn arm(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.accumulated = Duration::ZERO;
    }

    /// Changes the interval without discarding time already accumulated.
    pub fn set_interval(&mut self, interval: Duration) {
        if self.interval.is_some() {
            self.interval = Some(interval);
        }
    }

    pub fn cancel(&mut self) {
        self.interval = None;
        self.accumulated = Duration::ZERO;
    }

    pub fn add_elapsed(&mut self, elapsed: Duration) {
        if self.interval.is_some() {
            self.accumulated = self.accumulated.saturating_add(elapsed);
        }
    }

    /// Consumes one interval of accumulated time, returning whether a tick is due.
    pub fn take_tick(&mut self) -> bool {
        let Some(interval) = self.interval.filter(|interval| !interval.is_zero()) else {
            return false;
        };
        if self.accumulated < interval {
            return false;
        }
        self.accumulated -= interval;
        true
    }

    /// Returns the time left until the next tick.
    #[must_use]
    pub fn remaining(&self) -> Option<Duration> {
        self.interval
            .map(|interval| interval.saturating_sub(self.accumulated))
    }
}
