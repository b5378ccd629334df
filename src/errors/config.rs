//! Errors for configuration and command-line values.

/// Configuration was invalid or incomplete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is not set.
    #[error("missing environment variable {0}")]
    MissingEnvVar(&'static str),

    /// A value was present but not acceptable.
    #[error("invalid value for {field}: {reason}")]
    InvalidValue {
        /// Name of the setting
        field: &'static str,
        /// Why it was rejected
        reason: String,
    },
}

impl ConfigError {
    /// Create an `InvalidValue` error.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}
