//! Shared error type across statsweb crates.

use thiserror::Error;

/// Stable error codes surfaced in HTTP responses and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Configuration rejected at load/validate time.
    BadConfig,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Image encoding or sink write failed.
    Encode,
    /// Socket or file I/O failed.
    Io,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in response bodies.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadConfig => "BAD_CONFIG",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Encode => "ENCODE",
            ClientCode::Io => "IO",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, StatsWebError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum StatsWebError {
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("encode failed: {0}")]
    Encode(String),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal: {0}")]
    Internal(String),
}

impl StatsWebError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            StatsWebError::BadConfig(_) => ClientCode::BadConfig,
            StatsWebError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            StatsWebError::Encode(_) => ClientCode::Encode,
            StatsWebError::Io(_) => ClientCode::Io,
            StatsWebError::Internal(_) => ClientCode::Internal,
        }
    }
}

impl From<gif::EncodingError> for StatsWebError {
    fn from(e: gif::EncodingError) -> Self {
        StatsWebError::Encode(e.to_string())
    }
}
