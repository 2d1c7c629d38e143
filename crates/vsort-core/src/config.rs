#![forbid(unsafe_code)]

//! Engine configuration.
//!
//! ```toml
//! primary_size = 100000
//! mini_size = 25000
//! pause_ms = 2000
//! seed = 42
//! max_rounds = 1
//!
//! [[schedule]]
//! algorithm = "merge"
//! target = "primary"
//! ```
//!
//! Every field is optional; `EngineConfig::default()` reproduces the classic
//! cycle (selection, merge and bubble on the primary buffer, then counting
//! and insertion on the miniature one, with a two second pause).

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::algorithms::SortAlgorithm;
use crate::buffer::BufferKind;
use crate::error::ConfigError;

/// Largest buffer length whose values `1..=len` fit in an `i32`.
pub const MAX_BUFFER_LEN: usize = i32::MAX as usize;

/// One step of the cycle: run `algorithm` on the `target` buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub algorithm: SortAlgorithm,
    #[serde(default)]
    pub target: BufferKind,
}

impl ScheduleEntry {
    #[must_use]
    pub const fn new(algorithm: SortAlgorithm, target: BufferKind) -> Self {
        Self { algorithm, target }
    }

    /// The five-step default cycle.
    #[must_use]
    pub fn default_schedule() -> Vec<Self> {
        vec![
            Self::new(SortAlgorithm::Selection, BufferKind::Primary),
            Self::new(SortAlgorithm::Merge, BufferKind::Primary),
            Self::new(SortAlgorithm::Bubble, BufferKind::Primary),
            Self::new(SortAlgorithm::Counting, BufferKind::Mini),
            Self::new(SortAlgorithm::Insertion, BufferKind::Mini),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Length of the primary buffer.
    pub primary_size: usize,
    /// Length of the miniature buffer.
    pub mini_size: usize,
    /// Pause between runs, in milliseconds. Zero disables it.
    pub pause_ms: u64,
    /// Shuffle seed; `None` seeds from the operating system.
    pub seed: Option<u64>,
    pub schedule: Vec<ScheduleEntry>,
    /// Stop after this many passes over the schedule. `None` loops forever.
    pub max_rounds: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            primary_size: 100_000,
            mini_size: 25_000,
            pause_ms: 2_000,
            seed: None,
            schedule: ScheduleEntry::default_schedule(),
            max_rounds: None,
        }
    }
}

impl EngineConfig {
    /// Load from a TOML string. The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text does not parse.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Load from a TOML file on disk. The result is not validated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Toml`] if it does not parse.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Check sizes and schedule.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_size("primary_size", self.primary_size)?;
        check_size("mini_size", self.mini_size)?;
        if self.schedule.is_empty() {
            return Err(ConfigError::EmptySchedule);
        }
        if self.max_rounds == Some(0) {
            return Err(ConfigError::MustBePositive {
                field: "max_rounds",
            });
        }
        Ok(())
    }

    #[must_use]
    pub fn pause(&self) -> Duration {
        Duration::from_millis(self.pause_ms)
    }
}

fn check_size(field: &'static str, value: usize) -> Result<(), ConfigError> {
    if value == 0 || value > MAX_BUFFER_LEN {
        return Err(ConfigError::InvalidSize {
            field,
            value,
            max: MAX_BUFFER_LEN,
        });
    }
    Ok(())
}
