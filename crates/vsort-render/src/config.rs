#![forbid(unsafe_code)]

//! Renderer configuration, the `[render]` table of the config file.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use vsort_core::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Surface width in columns; `None` uses the terminal width at startup.
    pub width: Option<u16>,
    /// Surface height in rows; `None` uses the terminal height at startup.
    pub height: Option<u16>,
    /// Minimum time between intermediate frames.
    pub frame_interval_ms: u64,
    /// Key that exits immediately. Ctrl-C always does.
    pub quit_key: char,
    /// Wrap each frame in synchronized-output markers (DEC 2026).
    pub sync_output: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            frame_interval_ms: 16,
            quit_key: 'q',
            sync_output: true,
        }
    }
}

impl RenderConfig {
    #[must_use]
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }

    /// Fixed surface size, falling back to `terminal` for unset dimensions.
    #[must_use]
    pub fn surface_size(&self, terminal: (u16, u16)) -> (u16, u16) {
        (
            self.width.unwrap_or(terminal.0),
            self.height.unwrap_or(terminal.1),
        )
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSize`] for a zero width or height, or
    /// [`ConfigError::MustBePositive`] for a zero frame interval.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [("render.width", self.width), ("render.height", self.height)] {
            if value == Some(0) {
                return Err(ConfigError::InvalidSize {
                    field,
                    value: 0,
                    max: usize::from(u16::MAX),
                });
            }
        }
        if self.frame_interval_ms == 0 {
            return Err(ConfigError::MustBePositive {
                field: "render.frame_interval_ms",
            });
        }
        Ok(())
    }
}
