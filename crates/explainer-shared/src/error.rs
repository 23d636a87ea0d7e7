//! Error types for Context Explainer

use thiserror::Error;

/// Main error type for Context Explainer operations
#[derive(Debug, Error)]
pub enum ExplainerError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid credential: {0}")]
    Credential(#[from] CredentialError),

    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Result type alias for Context Explainer operations
pub type Result<T> = std::result::Result<T, ExplainerError>;

/// Failures of the remote chat-completion call.
///
/// Always recovered by falling back to a synthesized analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("server returned HTTP {0}")]
    Status(u16),

    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Credential format violations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("API key is empty")]
    Empty,

    #[error("API key is the demo-mode sentinel")]
    DemoMode,

    #[error("API key must start with 'sk-'")]
    MissingPrefix,

    #[error("API key is too short: {length} < {min_length} characters")]
    TooShort { length: usize, min_length: usize },
}

/// A directory entry that could not be read during project summarization
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot read {path}: {message}")]
pub struct FilesystemError {
    pub path: String,
    pub message: String,
}

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {message}")]
    InvalidFormat { message: String },

    #[error("Invalid configuration value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("Unsupported configuration path: {key}")]
    UnknownKey { key: String },
}

impl From<ConfigError> for ExplainerError {
    fn from(error: ConfigError) -> Self {
        ExplainerError::Config {
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_error_display() {
        assert_eq!(RemoteError::Status(500).to_string(), "server returned HTTP 500");
        assert_eq!(RemoteError::Timeout.to_string(), "request timed out");
    }

    #[test]
    fn test_config_error_conversion() {
        let error: ExplainerError = ConfigError::UnknownKey {
            key: "remote.nope".to_string(),
        }
        .into();

        assert!(matches!(error, ExplainerError::Config { .. }));
        assert!(error.to_string().contains("remote.nope"));
    }

    #[test]
    fn test_umbrella_variants() {
        let credential: ExplainerError = CredentialError::MissingPrefix.into();
        assert_eq!(
            credential.to_string(),
            "Invalid credential: API key must start with 'sk-'"
        );

        let io: ExplainerError = std::io::Error::other("disk full").into();
        assert!(matches!(io, ExplainerError::Io(_)));

        let internal = ExplainerError::Internal {
            message: "client".to_string(),
        };
        assert_eq!(internal.to_string(), "Internal error: client");
    }
}
