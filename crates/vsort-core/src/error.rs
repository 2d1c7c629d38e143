use std::path::PathBuf;

use thiserror::Error;

/// Failure delivering a snapshot to the renderer.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("snapshot sink closed")]
    Closed,

    #[error("snapshot sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Failure honoring a pause. Never fatal.
#[derive(Debug, Error)]
pub enum PaceError {
    #[error("pause interrupted: {0}")]
    Interrupted(String),
}

/// Fatal failure of the sort cycle.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("renderer failed: {0}")]
    Sink(#[from] SinkError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid {field}: {value} (must be between 1 and {max})")]
    InvalidSize {
        field: &'static str,
        value: usize,
        max: usize,
    },

    #[error("schedule must contain at least one entry")]
    EmptySchedule,

    #[error("invalid {field}: must be greater than zero")]
    MustBePositive { field: &'static str },
}
