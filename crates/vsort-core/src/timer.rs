#![forbid(unsafe_code)]

//! Run timer: start/end markers bracketing one sort run.
//!
//! The displayed value is always `end - start`. While a run is in progress
//! `end == start`, so the display reads zero until the next reset stops the
//! timer.

use std::time::Duration;

use web_time::Instant;

use crate::clock::Clock;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTimer {
    start: Instant,
    end: Instant,
}

impl RunTimer {
    /// Create a timer with both markers at `now`.
    #[must_use]
    pub fn new(now: Instant) -> Self {
        Self {
            start: now,
            end: now,
        }
    }

    /// Start a fresh run: `start = now`, `end = start`.
    pub fn begin(&mut self, clock: &impl Clock) {
        self.start = clock.now();
        self.end = self.start;
    }

    /// Record `end = now` without starting a new run.
    pub fn mark_idle(&mut self, clock: &impl Clock) {
        self.end = clock.now();
    }

    #[must_use]
    pub fn start(&self) -> Instant {
        self.start
    }

    #[must_use]
    pub fn end(&self) -> Instant {
        self.end
    }

    /// `end - start`, saturating at zero.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.end.saturating_duration_since(self.start)
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    #[test]
    fn begin_resets_end_to_start() {
        let clock = ManualClock::new();
        let mut timer = RunTimer::new(clock.now());
        clock.advance(Duration::from_secs(5));
        timer.mark_idle(&clock);
        assert_eq!(timer.elapsed(), Duration::from_secs(5));

        timer.begin(&clock);
        assert_eq!(timer.start(), timer.end());
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }

    #[test]
    fn elapsed_is_reported_in_seconds() {
        let clock = ManualClock::new();
        let mut timer = RunTimer::new(clock.now());
        timer.begin(&clock);
        clock.advance(Duration::from_millis(1500));
        timer.mark_idle(&clock);
        assert!((timer.elapsed_secs() - 1.5).abs() < 1e-9);
    }

    #[test]
    fn elapsed_never_negative() {
        let clock = ManualClock::new();
        let later = {
            let c = clock.clone();
            c.advance(Duration::from_secs(1));
            c.now()
        };
        // end before start is impossible through the API; construct it directly.
        let timer = RunTimer {
            start: later,
            end: later - Duration::from_secs(1),
        };
        assert_eq!(timer.elapsed(), Duration::ZERO);
    }
}
