//! Error types for glload

use std::io;
use thiserror::Error;

/// Result type alias for glload operations
pub type Result<T> = std::result::Result<T, GlloadError>;

#[derive(Error, Debug)]
pub enum GlloadError {
    /// A recognized visual config key carried a value that is not a
    /// non-negative integer
    #[error("Invalid value for visual config key '{key}': '{value}'")]
    InvalidConfigValue { key: String, value: String },

    /// The display platform failed while answering a config query
    #[error("Config query failed: {0}")]
    ConfigQuery(String),

    /// The display platform offered no config matching the request
    #[error("No matching configs found")]
    NoMatchingConfigs,

    /// Surface or device creation failed
    #[error("Surface error: {0}")]
    Surface(String),

    #[error("Invalid benchmark list name: '{0}'")]
    InvalidListName(String),

    #[error("Event loop error: {0}")]
    EventLoop(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GlloadError {
    /// True for the failures that end in process termination: no usable
    /// surface config could be selected.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ConfigQuery(_) | Self::NoMatchingConfigs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selection_failures_are_fatal() {
        assert!(GlloadError::NoMatchingConfigs.is_fatal());
        assert!(
            GlloadError::ConfigQuery("eglChooseConfig failed".to_string())
                .is_fatal()
        );
        assert!(!GlloadError::Surface("lost".to_string()).is_fatal());
    }

    #[test]
    fn session_errors_are_not_fatal() {
        let errors = [
            GlloadError::InvalidConfigValue {
                key: "depth".to_string(),
                value: "-1".to_string(),
            },
            GlloadError::InvalidListName("..".to_string()),
            GlloadError::EventLoop("closed".to_string()),
        ];

        for err in errors {
            assert!(!err.is_fatal(), "{} must not escalate", err);
        }
    }

    #[test]
    fn invalid_config_value_names_key_and_value() {
        let err = GlloadError::InvalidConfigValue {
            key: "red".to_string(),
            value: "eight".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid value for visual config key 'red': 'eight'"
        );
    }

    #[test]
    fn io_errors_convert() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file missing");
        let err: GlloadError = io_err.into();
        assert!(err.to_string().contains("file missing"));
        assert!(!err.is_fatal());
    }
}
