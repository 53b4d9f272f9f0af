/*!
 * Error types for the khaya library.
 *
 * This module contains custom error types for the different layers of the
 * crate, using the thiserror crate for ergonomic error definitions.
 *
 * Per-chunk failures never unwind a translation job: they are converted into
 * a [`ChunkError`] carried by the chunk's result. Only contract violations
 * such as malformed configuration surface as [`TranslationError`].
 */

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when talking to a translation provider
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The call did not complete in time
    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// The service understood the request and refused it (e.g. bad language pair)
    #[error("Translation rejected: {0}")]
    Rejected(String),

    /// Error related to rate limiting
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    /// Error with authentication
    #[error("Authentication error: {0}")]
    AuthenticationError(String),
}

impl ProviderError {
    /// Classify this error for the retry coordinator
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::RequestFailed(_)
            | Self::ConnectionError(_)
            | Self::Timeout(_)
            | Self::RateLimitExceeded(_) => FailureKind::Transient,
            Self::ApiError { status_code, .. } => {
                if *status_code >= 500 || *status_code == 408 || *status_code == 429 {
                    FailureKind::Transient
                } else {
                    FailureKind::Rejected
                }
            }
            Self::ParseError(_) => FailureKind::UnexpectedResponseShape,
            Self::Rejected(_) | Self::AuthenticationError(_) => FailureKind::Rejected,
        }
    }

    /// Whether a failed call is worth repeating
    pub fn is_retryable(&self) -> bool {
        self.kind().is_retryable()
    }
}

/// Classification of a per-chunk failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Network, timeout or server-side trouble
    Transient,
    /// The service reported a semantic error such as an unknown language code
    Rejected,
    /// The service answered with something that is not a translation
    UnexpectedResponseShape,
    /// Every retry wave failed for this chunk
    RetryExhausted,
}

impl FailureKind {
    pub fn is_retryable(self) -> bool {
        matches!(self, Self::Transient | Self::UnexpectedResponseShape)
    }
}

/// Failure recorded against a single chunk
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkError {
    /// Failure classification
    pub kind: FailureKind,
    /// Human readable message
    pub message: String,
}

impl From<&ProviderError> for ChunkError {
    fn from(error: &ProviderError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Errors raised to the caller of the translation core
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Configuration that breaks the core's contract
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error loading or validating configuration
    #[error("Config error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
