use thiserror::Error;
use vsort_core::{ConfigError, CycleError};

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("sort cycle failed: {0}")]
    Cycle(#[from] CycleError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("cannot initialize logging: {message}")]
    Logging { message: String },
}

impl AppError {
    /// Process exit status for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Config(_) => 2,
            _ => 1,
        }
    }

    #[must_use]
    pub fn logging(message: impl Into<String>) -> Self {
        Self::Logging {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::AppError;
    use vsort_core::{ConfigError, CycleError, SinkError};

    #[test]
    fn config_errors_exit_with_usage_status() {
        let error = AppError::from(ConfigError::EmptySchedule);
        assert_eq!(error.exit_code(), 2);
        assert_eq!(
            error.to_string(),
            "config error: schedule must contain at least one entry"
        );
    }

    #[test]
    fn runtime_errors_exit_with_one() {
        let error = AppError::from(CycleError::Sink(SinkError::Closed));
        assert_eq!(error.exit_code(), 1);
        assert_eq!(
            error.to_string(),
            "sort cycle failed: renderer failed: snapshot sink closed"
        );
        assert_eq!(AppError::logging("taken").exit_code(), 1);
    }
}
