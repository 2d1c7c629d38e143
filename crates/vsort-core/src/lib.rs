#![forbid(unsafe_code)]

//! Core: the sort-and-animate engine.
//!
//! # Role in visualsort
//! `vsort-core` owns everything with algorithmic content: the two integer
//! buffers, the run timer, the five steppable sorting algorithms and the
//! infinite sort cycle that drives them. It knows nothing about terminals;
//! rendering happens behind the [`SnapshotSink`] trait.
//!
//! # Primary responsibilities
//! - **ArrayState**: primary + miniature buffers, fill and (biased) shuffle.
//! - **RunTimer**: start/end markers bracketing one sort run.
//! - **Sorter**: resumable steppers that stop at every snapshot point.
//! - **SortCycle**: the reset protocol and the never-ending schedule.
//!
//! # Example
//!
//! ```
//! use vsort_core::{sort_with, SortAlgorithm};
//!
//! let mut data = vec![5, 3, 4, 1, 2];
//! let mut frames = 0;
//! let stats = sort_with(SortAlgorithm::Insertion, &mut data, |_| frames += 1);
//! assert_eq!(data, [1, 2, 3, 4, 5]);
//! assert_eq!(stats.swaps, frames);
//! ```

pub mod algorithms;
pub mod buffer;
pub mod clock;
pub mod config;
pub mod cycle;
pub mod error;
pub mod snapshot;
pub mod timer;

pub use algorithms::{Progress, SortAlgorithm, SortStats, Sorter, sort_with};
pub use buffer::{ArrayState, BufferKind, SortBuffer, is_permutation, is_sorted};
pub use clock::{Clock, ClockPacer, ManualClock, Pacer, SystemClock, ThreadPacer};
pub use config::{EngineConfig, ScheduleEntry};
pub use cycle::{RunReport, SortCycle, SortRun};
pub use error::{ConfigError, CycleError, PaceError, SinkError};
pub use snapshot::{OwnedSnapshot, Phase, RecordingSink, Snapshot, SnapshotSink};
pub use timer::RunTimer;
