//! Error types for padel-watch.

use std::fmt;

/// Result type alias for padel-watch operations.
pub type Result<T> = std::result::Result<T, WatchError>;

/// Errors that can occur while configuring or running the watcher.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Configuration could not be read or deserialized.
    #[error("Failed to load configuration: {0}")]
    Config(String),

    /// Configuration was read but is not usable.
    #[error("Configuration validation failed: {0}")]
    Validation(String),

    /// The request for a target could not be completed.
    #[error("Failed to fetch '{target}': {reason}")]
    Fetch {
        /// Name of the target being fetched
        target: String,
        /// Transport-level reason (timeout, connection refused, ...)
        reason: String,
    },

    /// The target answered with a non-success status code.
    #[error("Fetching '{target}' returned HTTP {status}")]
    Status {
        /// Name of the target being fetched
        target: String,
        /// The HTTP status code received
        status: u16,
    },

    /// The messaging API rejected or did not receive a notification.
    #[error("Failed to send notification: {0}")]
    Notify(String),

    /// An HTTP client could not be constructed.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),
}

/// Validation error for startup configuration.
#[derive(Debug)]
pub enum ValidationError {
    /// Custom validation error with a message.
    Custom(String),

    /// A specific variable has an invalid value.
    InvalidField {
        /// The environment variable name
        field: String,
        /// The reason why it's invalid
        reason: String,
    },

    /// Multiple validation errors occurred.
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    /// Create a custom validation error.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create an invalid field error.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Collapse a list of errors into a single error, if there are any.
    pub fn from_list(mut errors: Vec<ValidationError>) -> Option<Self> {
        match errors.len() {
            0 => None,
            1 => errors.pop(),
            _ => Some(Self::Multiple(errors)),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom(msg) => write!(f, "{}", msg),
            Self::InvalidField { field, reason } => {
                write!(f, "{} is invalid: {}", field, reason)
            }
            Self::Multiple(errors) => {
                writeln!(f, "Multiple validation errors:")?;
                for (i, err) in errors.iter().enumerate() {
                    writeln!(f, "  {}. {}", i + 1, err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for WatchError {
    fn from(err: ValidationError) -> Self {
        WatchError::Validation(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_field_display() {
        let err = ValidationError::invalid_field("CHECK_INTERVAL", "must be positive");
        assert_eq!(err.to_string(), "CHECK_INTERVAL is invalid: must be positive");
    }

    #[test]
    fn test_from_list() {
        assert!(ValidationError::from_list(Vec::new()).is_none());

        let single = ValidationError::from_list(vec![ValidationError::custom("one")]).unwrap();
        assert!(matches!(single, ValidationError::Custom(_)));

        let many = ValidationError::from_list(vec![
            ValidationError::custom("one"),
            ValidationError::invalid_field("LOOKAHEAD_DAYS", "must be at least 1"),
        ])
        .unwrap();
        let text = many.to_string();
        assert!(text.contains("1. one"));
        assert!(text.contains("2. LOOKAHEAD_DAYS is invalid"));
    }

    #[test]
    fn test_into_watch_error() {
        let err: WatchError = ValidationError::custom("Missing TELEGRAM_CHAT_ID").into();
        assert!(matches!(err, WatchError::Validation(_)));
        assert!(err.to_string().contains("TELEGRAM_CHAT_ID"));
    }

    #[test]
    fn test_status_display() {
        let err = WatchError::Status {
            target: "agent_info".to_string(),
            status: 503,
        };
        assert_eq!(err.to_string(), "Fetching 'agent_info' returned HTTP 503");
    }
}
