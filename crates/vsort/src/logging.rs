#![forbid(unsafe_code)]

//! Subscriber setup for the binary.
//!
//! The filter comes from `VSORT_LOG` (same syntax as `RUST_LOG`) and
//! defaults to `info`. The terminal belongs to the renderer in interactive
//! mode, so logs there go to a file or nowhere.

use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::error::{AppError, Result};

pub const LOG_ENV: &str = "VSORT_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Off,
    Stderr,
    /// Appended to, created if missing.
    File(PathBuf),
}

pub fn env_filter() -> Result<EnvFilter> {
    EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .with_env_var(LOG_ENV)
        .from_env()
        .map_err(|err| AppError::logging(format!("{LOG_ENV}: {err}")))
}

/// Install the global subscriber. `Off` installs nothing.
///
/// # Errors
///
/// Fails if the log file cannot be opened, the filter does not parse, or a
/// global subscriber is already set.
pub fn init_logging(target: &LogTarget) -> Result<()> {
    let writer = match target {
        LogTarget::Off => return Ok(()),
        LogTarget::Stderr => BoxMakeWriter::new(io::stderr),
        LogTarget::File(path) => {
            let file = File::options().create(true).append(true).open(path)?;
            BoxMakeWriter::new(Mutex::new(file))
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(env_filter()?)
        .with_writer(writer)
        .with_ansi(matches!(target, LogTarget::Stderr))
        .try_init()
        .map_err(|err| AppError::logging(err.to_string()))
}
