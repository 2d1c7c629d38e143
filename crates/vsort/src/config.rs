#![forbid(unsafe_code)]

//! Application config: the engine settings at the top level of the TOML file
//! plus a `[render]` table, with command-line overrides on top.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vsort_core::{ConfigError, EngineConfig};
use vsort_render::RenderConfig;

use crate::cli::Cli;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,
    pub render: RenderConfig,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::Toml`] if the text does not parse.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

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

    /// File (or defaults), then flags, then validation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the file cannot be read or parsed, or the
    /// merged result is invalid.
    pub fn resolve(cli: &Cli) -> Result<Self, ConfigError> {
        let mut config = match &cli.config {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, cli: &Cli) {
        let engine = &mut self.engine;
        if let Some(size) = cli.primary_size {
            engine.primary_size = size;
        }
        if let Some(size) = cli.mini_size {
            engine.mini_size = size;
        }
        if let Some(ms) = cli.pause_ms {
            engine.pause_ms = ms;
        }
        if cli.seed.is_some() {
            engine.seed = cli.seed;
        }
        if cli.rounds.is_some() {
            engine.max_rounds = cli.rounds;
        }

        let render = &mut self.render;
        if cli.width.is_some() {
            render.width = cli.width;
        }
        if cli.height.is_some() {
            render.height = cli.height;
        }
        if let Some(ms) = cli.frame_interval_ms {
            render.frame_interval_ms = ms;
        }
        if let Some(key) = cli.quit_key {
            render.quit_key = key;
        }
    }

    /// Validate the engine settings, then the `[render]` table.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.engine.validate()?;
        self.render.validate()
    }
}
