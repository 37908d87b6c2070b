//! Shared error type across healwatch crates.

use thiserror::Error;

/// Stable error codes (used in logs and assertions).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Config failed to parse or validate.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Network-level failure (connect, read, write).
    Transport,
    /// Endpoint answered with a non-success status.
    HttpStatus,
    /// Payload could not be decoded.
    Decode,
    /// History arrays are not index-aligned.
    Misaligned,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in log fields.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Transport => "TRANSPORT",
            ErrorCode::HttpStatus => "HTTP_STATUS",
            ErrorCode::Decode => "DECODE",
            ErrorCode::Misaligned => "MISALIGNED",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, HealwatchError>;

/// Unified error type used by core and client.
#[derive(Debug, Error)]
pub enum HealwatchError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("transport: {0}")]
    Transport(String),
    #[error("endpoint returned status {status}")]
    Http { status: u16 },
    #[error("decode: {0}")]
    Decode(String),
    #[error("misaligned history: {0}")]
    Misaligned(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl HealwatchError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            HealwatchError::BadConfig(_) => ErrorCode::BadConfig,
            HealwatchError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            HealwatchError::Transport(_) => ErrorCode::Transport,
            HealwatchError::Http { .. } => ErrorCode::HttpStatus,
            HealwatchError::Decode(_) => ErrorCode::Decode,
            HealwatchError::Misaligned(_) => ErrorCode::Misaligned,
            HealwatchError::Internal(_) => ErrorCode::Internal,
        }
    }
}
