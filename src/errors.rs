use crate::types::ResponseCode;
use std::time::Duration;
use thiserror::Error;

/// Lookup error types
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Truncated header: response shorter than 12 bytes")]
    TruncatedHeader,

    #[error("Truncated record: response ends before a declared field")]
    TruncatedRecord,

    #[error("Not a response: QR bit is not set")]
    NotAResponse,

    #[error("Server error: {0}")]
    ServerError(ResponseCode),

    #[error("Timeout: no response within {0:?}")]
    Timeout(Duration),

    #[error("Socket error: {0}")]
    Socket(#[from] std::io::Error),

    #[error("Invalid domain name: {0}")]
    InvalidName(String),

    #[error("Invalid record type: {0}")]
    InvalidRecordType(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl LookupError {
    /// Whether the error came from decoding the response bytes
    pub fn is_decode_error(&self) -> bool {
        matches!(
            self,
            LookupError::TruncatedHeader
                | LookupError::TruncatedRecord
                | LookupError::NotAResponse
                | LookupError::ServerError(_)
        )
    }
}

/// Result type for the crate
pub type Result<T> = std::result::Result<T, LookupError>;
