#![forbid(unsafe_code)]

//! Steppable sorting algorithms.
//!
//! Each algorithm is a [`Sorter`]: a small state machine that mutates the
//! buffer in place and stops at every point where the animation should
//! repaint. The driver emits one snapshot per [`Progress::Snapshot`] and
//! stops on [`Progress::Done`], at which point the buffer is sorted.
//!
//! # Snapshot points
//!
//! | algorithm | snapshot after |
//! |-----------|----------------|
//! | selection | each outer position |
//! | merge     | each completed merge |
//! | bubble    | each full pass |
//! | counting  | each swap (which also restarts the scan at 0) |
//! | insertion | each adjacent swap |
//!
//! A sorter must be advanced with the same buffer for its whole life.

mod bubble;
mod counting;
mod insertion;
mod merge;
mod selection;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use bubble::BubbleSorter;
pub use counting::CountingSorter;
pub use insertion::InsertionSorter;
pub use merge::MergeSorter;
pub use selection::SelectionSorter;

/// Outcome of one [`Sorter::advance`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// The buffer changed (or a position completed); emit a snapshot.
    Snapshot,
    /// The buffer is sorted. Further calls keep returning `Done`.
    Done,
}

/// Per-run operation counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortStats {
    /// Element comparisons.
    pub comparisons: u64,
    /// Swaps; for merge sort, element writes during merges.
    pub swaps: u64,
    /// Snapshots requested (`Progress::Snapshot` results).
    pub snapshots: u64,
    /// Outer-scan restarts (counting-sort variant only).
    pub restarts: u64,
}

/// A resumable in-place sort.
pub trait Sorter: Send {
    fn algorithm(&self) -> SortAlgorithm;

    /// Run until the next snapshot point, or report that the buffer is sorted.
    fn advance(&mut self, data: &mut [i32]) -> Progress;

    fn stats(&self) -> SortStats;
}

/// The five algorithms of the cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortAlgorithm {
    Selection,
    Merge,
    Bubble,
    Counting,
    Insertion,
}

impl SortAlgorithm {
    pub const ALL: [Self; 5] = [
        Self::Selection,
        Self::Merge,
        Self::Bubble,
        Self::Counting,
        Self::Insertion,
    ];

    /// Name shown on screen.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Selection => "Selection Sort",
            Self::Merge => "Merge Sort",
            Self::Bubble => "Bubble Sort",
            Self::Counting => "Counting Sort",
            Self::Insertion => "Insertion Sort",
        }
    }

    /// Lowercase identifier used in config files and logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Selection => "selection",
            Self::Merge => "merge",
            Self::Bubble => "bubble",
            Self::Counting => "counting",
            Self::Insertion => "insertion",
        }
    }

    /// Fresh sorter for a buffer of `len` elements.
    #[must_use]
    pub fn sorter(self, len: usize) -> Box<dyn Sorter> {
        match self {
            Self::Selection => Box::new(SelectionSorter::new()),
            Self::Merge => Box::new(MergeSorter::new(len)),
            Self::Bubble => Box::new(BubbleSorter::new()),
            Self::Counting => Box::new(CountingSorter::new()),
            Self::Insertion => Box::new(InsertionSorter::new()),
        }
    }
}

impl fmt::Display for SortAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for SortAlgorithm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let key = key.strip_suffix(" sort").unwrap_or(&key);
        Self::ALL
            .into_iter()
            .find(|a| a.as_str() == key)
            .ok_or_else(|| format!("unknown sort algorithm: {s}"))
    }
}

/// Sort `data` to completion, calling `on_snapshot` at every snapshot point.
///
/// No reset, shuffle or timing happens here; this is the bare algorithm.
pub fn sort_with<F>(algorithm: SortAlgorithm, data: &mut [i32], mut on_snapshot: F) -> SortStats
where
    F: FnMut(&[i32]),
{
    let mut sorter = algorithm.sorter(data.len());
    while sorter.advance(data) == Progress::Snapshot {
        on_snapshot(data);
    }
    sorter.stats()
}
