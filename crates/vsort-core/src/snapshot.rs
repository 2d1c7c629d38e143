#![forbid(unsafe_code)]

//! Snapshot contract between the engine and the renderer.
//!
//! A [`Snapshot`] borrows the active buffer for the duration of a single
//! [`SnapshotSink::present`] call. Sinks that need the data later must copy
//! what they need (the terminal sink keeps only the sampled bars).

use std::time::Duration;

use crate::algorithms::SortAlgorithm;
use crate::buffer::BufferKind;
use crate::error::SinkError;

/// Where in a run a snapshot was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Intermediate state after a mutation. Renderers may skip these.
    Step,
    /// Final state of a run, with its elapsed time. Renderers must show it.
    Completed,
}

/// Render-ready view of the active buffer plus run metadata.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    /// Current contents of the active buffer.
    pub values: &'a [i32],
    /// Which buffer `values` belongs to.
    pub buffer: BufferKind,
    /// Algorithm of the current run; `None` before the first run.
    pub algorithm: Option<SortAlgorithm>,
    /// `end - start` of the run timer.
    pub elapsed: Duration,
    /// Monotonic sequence number across the whole cycle.
    pub sequence: u64,
    pub phase: Phase,
}

impl Snapshot<'_> {
    /// Display name of the algorithm, empty before the first run.
    #[must_use]
    pub fn algorithm_name(&self) -> &'static str {
        self.algorithm.map_or("", SortAlgorithm::display_name)
    }

    #[must_use]
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }

    #[must_use]
    pub fn to_owned_snapshot(&self) -> OwnedSnapshot {
        OwnedSnapshot {
            values: self.values.to_vec(),
            buffer: self.buffer,
            algorithm: self.algorithm,
            elapsed: self.elapsed,
            sequence: self.sequence,
            phase: self.phase,
        }
    }
}

/// Owned copy of a [`Snapshot`].
#[derive(Debug, Clone, PartialEq)]
pub struct OwnedSnapshot {
    pub values: Vec<i32>,
    pub buffer: BufferKind,
    pub algorithm: Option<SortAlgorithm>,
    pub elapsed: Duration,
    pub sequence: u64,
    pub phase: Phase,
}

/// Consumer of snapshots, called synchronously at every mutation point.
pub trait SnapshotSink {
    /// Present one snapshot.
    ///
    /// # Errors
    ///
    /// Any error halts the sort cycle.
    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), SinkError>;
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for &mut S {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), SinkError> {
        (**self).present(snapshot)
    }
}

impl<S: SnapshotSink + ?Sized> SnapshotSink for Box<S> {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), SinkError> {
        (**self).present(snapshot)
    }
}

/// Sink that keeps every snapshot it sees.
#[derive(Debug)]
pub struct RecordingSink {
    snapshots: Vec<OwnedSnapshot>,
    keep_values: bool,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSink {
    /// Record snapshots including a copy of the buffer values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            snapshots: Vec::new(),
            keep_values: true,
        }
    }

    /// Record metadata only; `values` stays empty. Use for large buffers.
    #[must_use]
    pub fn metadata_only() -> Self {
        Self {
            snapshots: Vec::new(),
            keep_values: false,
        }
    }

    #[must_use]
    pub fn snapshots(&self) -> &[OwnedSnapshot] {
        &self.snapshots
    }

    /// Snapshots with [`Phase::Completed`], in order.
    pub fn completed(&self) -> impl Iterator<Item = &OwnedSnapshot> {
        self.snapshots
            .iter()
            .filter(|s| s.phase == Phase::Completed)
    }

    #[must_use]
    pub fn into_snapshots(self) -> Vec<OwnedSnapshot> {
        self.snapshots
    }
}

impl SnapshotSink for RecordingSink {
    fn present(&mut self, snapshot: &Snapshot<'_>) -> Result<(), SinkError> {
        let owned = if self.keep_values {
            snapshot.to_owned_snapshot()
        } else {
            Snapshot {
                values: &[],
                ..*snapshot
            }
            .to_owned_snapshot()
        };
        self.snapshots.push(owned);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(values: &[i32], phase: Phase) -> Snapshot<'_> {
        Snapshot {
            values,
            buffer: BufferKind::Mini,
            algorithm: Some(SortAlgorithm::Bubble),
            elapsed: Duration::from_millis(1200),
            sequence: 9,
            phase,
        }
    }

    #[test]
    fn algorithm_name_is_empty_before_first_run() {
        let s = Snapshot {
            algorithm: None,
            ..snapshot(&[1], Phase::Step)
        };
        assert_eq!(s.algorithm_name(), "");
        assert_eq!(snapshot(&[1], Phase::Step).algorithm_name(), "Bubble Sort");
    }

    #[test]
    fn recording_sink_keeps_values_and_order() {
        let mut sink = RecordingSink::new();
        sink.present(&snapshot(&[2, 1], Phase::Step)).unwrap();
        sink.present(&snapshot(&[1, 2], Phase::Completed)).unwrap();

        assert_eq!(sink.snapshots().len(), 2);
        assert_eq!(sink.snapshots()[0].values, [2, 1]);
        assert_eq!(sink.completed().count(), 1);
        assert!((sink.snapshots()[1].elapsed.as_secs_f64() - 1.2).abs() < 1e-9);
    }

    #[test]
    fn metadata_only_sink_drops_values() {
        let mut sink = RecordingSink::metadata_only();
        sink.present(&snapshot(&[3, 2, 1], Phase::Step)).unwrap();
        let recorded = &sink.snapshots()[0];
        assert!(recorded.values.is_empty());
        assert_eq!(recorded.sequence, 9);
        assert_eq!(recorded.buffer, BufferKind::Mini);
    }

    #[test]
    fn sink_works_through_mutable_reference() {
        fn feed(mut sink: impl SnapshotSink) {
            sink.present(&snapshot(&[1], Phase::Step)).unwrap();
        }
        let mut sink = RecordingSink::new();
        feed(&mut sink);
        assert_eq!(sink.snapshots().len(), 1);
    }
}
