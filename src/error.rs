use thiserror::Error;

/// Wizard errors using thiserror for structured error handling.
///
/// `InvalidPosition` is the only recoverable kind: the controller answers it
/// with a single fallback transition to the first step. Everything else is
/// returned to the caller untouched.

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WizardError {
    #[error("Invalid position: {requested} (wizard has {length} steps)")]
    InvalidPosition { requested: String, length: usize },

    #[error("Wizard {dispatcher} has no steps to fall back to")]
    NoSteps { dispatcher: String },

    #[error("Unknown wizard: {0}")]
    UnknownWizard(String),
}

impl WizardError {
    /// Whether this error triggers the fallback to position 0
    pub fn is_invalid_position(&self) -> bool {
        matches!(self, WizardError::InvalidPosition { .. })
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Result alias for wizard operations
pub type WizardResult<T> = Result<T, WizardError>;

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = WizardError::InvalidPosition {
            requested: "7".to_string(),
            length: 3,
        };
        assert_eq!(err.to_string(), "Invalid position: 7 (wizard has 3 steps)");

        let err = WizardError::UnknownWizard("signup".to_string());
        assert_eq!(err.to_string(), "Unknown wizard: signup");
    }

    #[test]
    fn test_only_invalid_position_recovers() {
        let invalid = WizardError::InvalidPosition {
            requested: "pricing".to_string(),
            length: 0,
        };
        assert!(invalid.is_invalid_position());
        assert!(!WizardError::NoSteps {
            dispatcher: "w".to_string()
        }
        .is_invalid_position());
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let config_err = ConfigError::LoadFailed {
            path: "/test/wizard.json".to_string(),
            source: Box::new(io_err),
        };

        assert!(config_err.source().is_some());
        assert_eq!(
            config_err.to_string(),
            "Failed to load configuration from /test/wizard.json"
        );
    }
}
