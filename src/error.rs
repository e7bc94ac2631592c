//! Error types for the drive client.

use thiserror::Error;

/// Everything that can go wrong while talking to the drive service.
#[derive(Error, Debug)]
pub enum DriveError {
    /// Connection, DNS, TLS or body read failure.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-2xx HTTP status.
    #[error("{operation} failed: HTTP {status} - {body}")]
    Http {
        operation: &'static str,
        status: u16,
        body: String,
    },

    /// A 2xx response whose `status` field is not "success".
    #[error("{operation} rejected by service (status: {status:?})")]
    Service {
        operation: &'static str,
        status: String,
    },

    /// The operation needs a logged-in user.
    #[error("{0} requires a successful login first")]
    AuthRequired(&'static str),

    /// Response body was not the JSON we expected.
    #[error("cannot decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Login payload was not valid base64.
    #[error("base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// Local file system error (e.g. missing upload source).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, DriveError>;
