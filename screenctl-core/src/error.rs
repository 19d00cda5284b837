/// Structured error types for screenctl-core.
///
/// Library consumers get composable `thiserror` errors; the `screenctl`
/// binary wraps them in `anyhow` with context.
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for screenctl-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// Layout JSON could not be decoded into component descriptors
    #[error("Invalid layout JSON: {source}")]
    Layout {
        #[source]
        source: serde_json::Error,
    },

    /// Config file exists but cannot be parsed
    #[error("Invalid config file {path:?}: {reason}")]
    Config { path: PathBuf, reason: String },

    /// Unknown value for an enumerated setting
    #[error("Invalid value '{value}' for {setting}")]
    InvalidSetting { setting: &'static str, value: String },
}

/// Result type alias for screenctl-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create a layout decoding error
    pub fn layout(source: serde_json::Error) -> Self {
        Self::Layout { source }
    }

    /// Create a config parse error
    pub fn config(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid setting error
    pub fn invalid_setting(setting: &'static str, value: impl Into<String>) -> Self {
        Self::InvalidSetting {
            setting,
            value: value.into(),
        }
    }
}
