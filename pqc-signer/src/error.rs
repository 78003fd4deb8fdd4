/// Error type definitions
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PqcError {
    #[error("Unknown signature scheme: {0}")]
    UnknownScheme(String),

    #[error("Signing failed: {0}")]
    SigningError(String),

    #[error("Key generation failed: {0}")]
    KeyGenerationError(String),

    #[error("Invalid length: {0}")]
    InvalidLength(String),

    /// A context argument was handed to a scheme that has no context parameter.
    /// Raised even for an empty context so the underlying routine never sees one.
    #[error("{0} does not take a context string")]
    ContextNotSupported(&'static str),

    #[error("{0} requires a context string")]
    ContextRequired(&'static str),
}

pub type Result<T> = std::result::Result<T, PqcError>;
