#![forbid(unsafe_code)]

//! [`SnapshotSink`] that feeds the render thread.
//!
//! Snapshots arrive far faster than a terminal can draw: a bubble-sort pass
//! over the primary buffer takes microseconds, an insertion-sort swap
//! nanoseconds. The sink therefore samples a [`BarFrame`] for a
//! [`Phase::Step`] snapshot only when the frame interval has elapsed, and
//! hands it over with a non-blocking send that drops the frame if the render
//! queue is full. [`Phase::Completed`] snapshots are always sampled and sent
//! with a blocking send, so every finished run is shown with its final time.

use std::sync::mpsc::TrySendError;
use std::time::Duration;

use tracing::debug;
use vsort_core::{Clock, Phase, SinkError, Snapshot, SnapshotSink, SystemClock};
use web_time::Instant;

use crate::layout::{BarFrame, BarLayout};
use crate::render_thread::{OutMsg, RenderThread};

/// Upper bound on snapshots skipped between clock reads.
pub const MAX_CHECK_STRIDE: u32 = 256;

/// Decides which step snapshots become frames.
///
/// Reading the clock on every snapshot costs more than an insertion-sort
/// swap, so the gate reads it every `stride` snapshots. The stride doubles
/// (up to [`MAX_CHECK_STRIDE`]) while checks come too early and halves when
/// a check finds the interval elapsed, so slow algorithms are checked on
/// every snapshot and fast ones rarely.
#[derive(Debug, Clone)]
pub struct FrameGate {
    interval: Duration,
    last: Option<Instant>,
    stride: u32,
    countdown: u32,
}

impl FrameGate {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
            stride: 1,
            countdown: 0,
        }
    }

    /// Whether the current step snapshot should become a frame.
    pub fn admit(&mut self, clock: &impl Clock) -> bool {
        if self.countdown > 1 {
            self.countdown -= 1;
            return false;
        }

        let now = clock.now();
        let due = self
            .last
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.last = Some(now);
            self.stride = (self.stride / 2).max(1);
        } else {
            self.stride = (self.stride * 2).min(MAX_CHECK_STRIDE);
        }
        self.countdown = self.stride;
        due
    }

    /// Record a frame sent outside the gate.
    pub fn mark(&mut self, now: Instant) {
        self.last = Some(now);
    }

    #[must_use]
    pub fn stride(&self) -> u32 {
        self.stride
    }
}

#[derive(Debug)]
pub struct TerminalSink<C: Clock = SystemClock> {
    render: RenderThread,
    layout: BarLayout,
    gate: FrameGate,
    clock: C,
    frames_sent: u64,
    frames_dropped: u64,
}

impl TerminalSink<SystemClock> {
    #[must_use]
    pub fn new(render: RenderThread, layout: BarLayout, frame_interval: Duration) -> Self {
        Self::with_clock(render, layout, frame_interval, SystemClock)
    }
}

impl<C: Clock> TerminalSink<C> {
    #[must_use]
    pub fn with_clock(
        render: RenderThread,
        layout: BarLayout,
        frame_interval: Duration,
        clock: C,
    ) -> Self {
        Self {
            render,
            layout,
            gate: FrameGate::new(frame_interval),
            clock,
            frames_sent: 0,
            frames_dropped: 0,
        }
    }

    /// Frames handed to the render thread.
    #[must_use]
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }

    /// Frames dropped because the render queue was full.
    #[must_use]
    pub fn frames_dropped(&self) -> u64 {
        self.frames_dropped
    }

    /// Stop the render thread after it presents the last queued frame.
    pub fn shutdown(self) {
        self.render.shutdown();
    }
}

impl<C: Clock> SnapshotSink for TerminalSink<C> {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), SinkError> {
        if let Some(err) = self.render.check_error() {
            return Err(SinkError::Io(err));
        }

        match snapshot.phase {
            Phase::Step => {
                if !self.gate.admit(&self.clock) {
                    return Ok(());
                }
                let frame = BarFrame::from_snapshot(snapshot, &self.layout);
                match self.render.try_send(OutMsg::Frame(frame)) {
                    Ok(()) => self.frames_sent += 1,
                    Err(TrySendError::Full(_)) => self.frames_dropped += 1,
                    Err(TrySendError::Disconnected(_)) => return Err(SinkError::Closed),
                }
            }
            Phase::Completed => {
                self.gate.mark(self.clock.now());
                let frame = BarFrame::from_snapshot(snapshot, &self.layout);
                self.render
                    .send(OutMsg::Frame(frame))
                    .map_err(|_| SinkError::Closed)?;
                self.frames_sent += 1;
                debug!(
                    sequence = snapshot.sequence,
                    sent = self.frames_sent,
                    dropped = self.frames_dropped,
                    "completed frame sent"
                );
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vsort_core::ManualClock;

    #[test]
    fn first_check_is_always_due() {
        let clock = ManualClock::new();
        let mut gate = FrameGate::new(Duration::from_millis(16));
        assert!(gate.admit(&clock));
    }

    #[test]
    fn stride_grows_while_checks_are_early() {
        let clock = ManualClock::new();
        let mut gate = FrameGate::new(Duration::from_millis(16));
        assert!(gate.admit(&clock));
        let admitted = (0..10_000).filter(|_| gate.admit(&clock)).count();
        assert_eq!(admitted, 0);
        assert_eq!(gate.stride(), MAX_CHECK_STRIDE);
    }

    #[test]
    fn slow_snapshots_are_checked_every_time() {
        let clock = ManualClock::new();
        let mut gate = FrameGate::new(Duration::from_millis(16));
        for _ in 0..20 {
            clock.advance(Duration::from_millis(20));
            assert!(gate.admit(&clock));
            assert_eq!(gate.stride(), 1);
        }
    }

    #[test]
    fn stride_recovers_after_fast_phase() {
        let clock = ManualClock::new();
        let mut gate = FrameGate::new(Duration::from_millis(16));
        for _ in 0..5_000 {
            gate.admit(&clock);
        }
        assert_eq!(gate.stride(), MAX_CHECK_STRIDE);
        clock.advance(Duration::from_secs(1));
        // The next check happens within one full stride and halves it.
        let waited = (1..=MAX_CHECK_STRIDE).find(|_| gate.admit(&clock));
        assert!(waited.is_some());
        assert_eq!(gate.stride(), MAX_CHECK_STRIDE / 2);
    }

    #[test]
    fn mark_delays_next_step_frame() {
        let clock = ManualClock::new();
        let mut gate = FrameGate::new(Duration::from_millis(16));
        gate.mark(clock.now());
        assert!(!gate.admit(&clock));
    }
}
