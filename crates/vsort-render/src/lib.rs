#![forbid(unsafe_code)]

//! Terminal renderer for visualsort.
//!
//! # Role in visualsort
//! `vsort-render` turns engine snapshots into bar charts on a fixed-size
//! terminal surface. The sort cycle calls [`TerminalSink`] synchronously; the
//! sink samples the active buffer into a [`BarFrame`] and hands it to the
//! [`RenderThread`], which composes a [`Grid`], diffs it against the screen
//! and presents only the changed cells.
//!
//! # Primary responsibilities
//! - **BarLayout**: stride sampling and eighth-cell bar heights.
//! - **Grid / Presenter**: cell buffer, run diffing, state-tracked ANSI output.
//! - **TerminalSession**: raw mode, alternate screen and cleanup on every exit
//!   path.
//! - **RenderThread**: frame coalescing and quit-key polling off the sort
//!   thread.

pub mod config;
pub mod grid;
pub mod layout;
pub mod presenter;
pub mod render_thread;
pub mod session;
pub mod sink;

pub use config::RenderConfig;
pub use grid::{Cell, CellFlags, ChangeRun, Grid, Tone};
pub use layout::{BarFrame, BarLayout, EIGHTHS, format_seconds};
pub use presenter::{PresentStats, Presenter};
pub use render_thread::{InputWatch, KeyQuit, OutMsg, QuitSource, RenderThread};
pub use session::{SessionOptions, TerminalSession, best_effort_cleanup_for_exit};
pub use sink::{FrameGate, TerminalSink};
