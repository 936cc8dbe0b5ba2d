//! Error types for configuration loading and the terminal host

use thiserror::Error;

/// Result type for progress bar operations
pub type ProgressResult<T> = Result<T, ProgressError>;

/// Errors surfaced by the library.
///
/// Indicator operations themselves never fail: a missing attachment target is
/// a silent no-op and a detached sweep falls back to shrinking out. Only the
/// configuration layer and the terminal host produce errors.
#[derive(Error, Debug)]
pub enum ProgressError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Terminal error: {message}")]
    Terminal { message: String },
}

impl ProgressError {
    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        ProgressError::ConfigError {
            message: message.into(),
        }
    }

    /// Create a terminal error
    pub fn terminal(message: impl Into<String>) -> Self {
        ProgressError::Terminal {
            message: message.into(),
        }
    }

    /// Whether the error came from invalid configuration values
    pub fn is_config_error(&self) -> bool {
        matches!(self, ProgressError::ConfigError { .. } | ProgressError::Parse(_))
    }
}
