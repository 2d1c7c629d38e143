#![forbid(unsafe_code)]

//! Time sources and pacing.
//!
//! The cycle never calls `Instant::now` or `thread::sleep` directly. It reads
//! time through a [`Clock`] and pauses through a [`Pacer`], so tests can
//! drive a full cycle with a [`ManualClock`] and no real delay.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use web_time::Instant;

use crate::error::PaceError;

/// Monotonic time source.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`web_time::Instant`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same offset, so a [`ClockPacer`] and the cycle can hold
/// the same clock.
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualClock {
    #[must_use]
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let nanos = by.as_nanos().min(u64::MAX as u128) as u64;
        self.offset_nanos.fetch_add(nanos, Ordering::SeqCst);
    }

    /// Total time advanced since creation.
    #[must_use]
    pub fn offset(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.offset()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Suspends the cycle between runs.
pub trait Pacer {
    /// Pause for `duration`.
    ///
    /// # Errors
    ///
    /// Returns [`PaceError`] when the pause could not be honored. The reset
    /// protocol logs and ignores it.
    fn pause(&mut self, duration: Duration) -> Result<(), PaceError>;
}

/// Blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadPacer;

impl Pacer for ThreadPacer {
    fn pause(&mut self, duration: Duration) -> Result<(), PaceError> {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
        Ok(())
    }
}

/// Advances a [`ManualClock`] instead of sleeping, and records each pause.
#[derive(Debug, Clone)]
pub struct ClockPacer {
    clock: ManualClock,
    pauses: Vec<Duration>,
}

impl ClockPacer {
    #[must_use]
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            pauses: Vec::new(),
        }
    }

    /// Every pause requested so far, in order.
    #[must_use]
    pub fn pauses(&self) -> &[Duration] {
        &self.pauses
    }
}

impl Pacer for ClockPacer {
    fn pause(&mut self, duration: Duration) -> Result<(), PaceError> {
        self.clock.advance(duration);
        self.pauses.push(duration);
        Ok(())
    }
}

impl<P: Pacer + ?Sized> Pacer for &mut P {
    fn pause(&mut self, duration: Duration) -> Result<(), PaceError> {
        (**self).pause(duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_only_moves_on_advance() {
        let clock = ManualClock::new();
        let t0 = clock.now();
        assert_eq!(clock.now(), t0);
        clock.advance(Duration::from_millis(250));
        assert_eq!(clock.now() - t0, Duration::from_millis(250));
    }

    #[test]
    fn manual_clock_clones_share_offset() {
        let clock = ManualClock::new();
        let other = clock.clone();
        other.advance(Duration::from_secs(3));
        assert_eq!(clock.offset(), Duration::from_secs(3));
    }

    #[test]
    fn clock_pacer_advances_shared_clock() {
        let clock = ManualClock::new();
        let mut pacer = ClockPacer::new(clock.clone());
        pacer.pause(Duration::from_secs(2)).unwrap();
        pacer.pause(Duration::ZERO).unwrap();
        assert_eq!(clock.offset(), Duration::from_secs(2));
        assert_eq!(pacer.pauses(), [Duration::from_secs(2), Duration::ZERO]);
    }

    #[test]
    fn thread_pacer_zero_returns_immediately() {
        let mut pacer = ThreadPacer;
        assert!(pacer.pause(Duration::ZERO).is_ok());
    }
}
