use thiserror::Error;

/// Top-level error type for the Solx assistant.
///
/// Each subsystem crate defines its own error type and implements
/// `From<SubsystemError> for SolxError` so that the `?` operator works
/// across crate boundaries in the binary.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SolxError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Knowledge error: {0}")]
    Knowledge(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<toml::de::Error> for SolxError {
    fn from(err: toml::de::Error) -> Self {
        SolxError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for SolxError {
    fn from(err: toml::ser::Error) -> Self {
        SolxError::Config(err.to_string())
    }
}

impl From<serde_json::Error> for SolxError {
    fn from(err: serde_json::Error) -> Self {
        SolxError::Serialization(err.to_string())
    }
}

/// A specialized `Result` type for Solx operations.
pub type Result<T> = std::result::Result<T, SolxError>;
