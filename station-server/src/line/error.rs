//! Push API error types.

use std::fmt;

/// Errors from the LINE push client.
#[derive(Debug)]
pub enum PushError {
    /// HTTP request failed (network error, timeout, body read, etc.)
    Http(reqwest::Error),

    /// Channel access token rejected
    Unauthorized,

    /// Rate limited by the API
    RateLimited,

    /// API returned an error status code
    Api { status: u16, message: String },

    /// Client could not be configured
    Config(String),
}

impl fmt::Display for PushError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PushError::Http(e) => write!(f, "HTTP error: {e}"),
            PushError::Unauthorized => write!(f, "unauthorized (invalid channel access token)"),
            PushError::RateLimited => write!(f, "rate limited by LINE API"),
            PushError::Api { status, message } => write!(f, "API error {status}: {message}"),
            PushError::Config(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for PushError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PushError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        PushError::Http(err)
    }
}
