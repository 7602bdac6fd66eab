//! Error types for Status.io API operations.

use thiserror::Error;

/// Errors that can occur during Status.io API operations.
#[derive(Debug, Error)]
pub enum StatusioError {
    /// Configuration is missing or incomplete.
    #[error("Status.io configuration required: {0}")]
    ConfigMissing(String),

    /// Wrong number of positional path identifiers for an operation.
    #[error("{operation} expects {expected} path identifier(s), got {actual}")]
    InvalidArguments {
        operation: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A parameter name that the operation does not accept.
    #[error("{operation} does not accept parameter '{name}'")]
    UnknownParameter {
        operation: &'static str,
        name: String,
    },

    /// A required parameter was not supplied.
    #[error("{operation} requires parameter '{name}'")]
    MissingParameter {
        operation: &'static str,
        name: &'static str,
    },

    /// A parameter value that cannot be sent.
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// The request never completed (DNS, connection, timeout, broken response).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status and a non-JSON body.
    #[error("HTTP {status_code}: {body}")]
    Http { status_code: u16, body: String },

    /// The API answered but reported `status.error` other than `"no"`.
    #[error("Status.io API error: {message}")]
    Api { message: String },

    /// JSON parsing error.
    #[error("Failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),
}

impl StatusioError {
    /// Returns true when the request did not reach the server or no
    /// response could be read back.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Result type alias for Status.io operations.
pub type Result<T> = core::result::Result<T, StatusioError>;
