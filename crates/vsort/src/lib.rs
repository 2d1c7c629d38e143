#![forbid(unsafe_code)]

//! visualsort: an animated sorting-algorithm visualizer.
//!
//! Five algorithms take turns on two shuffled buffers, forever: selection,
//! merge and bubble sort on the primary buffer, then counting and insertion
//! sort on the smaller miniature one. Every mutation is drawn as a bar chart
//! in the terminal, with the list size, the previous run's time and the
//! current algorithm's name on top.
//!
//! The engine lives in `vsort-core` and the renderer in `vsort-render`; this
//! crate wires them together behind a CLI and adds a headless mode.

pub mod cli;
pub mod config;
pub mod error;
pub mod headless;
pub mod logging;
pub mod terminal;

pub use cli::{Cli, run};
pub use config::AppConfig;
pub use error::{AppError, Result};
pub use headless::{HeadlessSink, drive, run_headless};
