//! GCP client error types.

/// Errors from the metadata server and Secret Manager clients.
#[derive(Debug, thiserror::Error)]
pub enum GcpError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse a response body
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// Could not obtain an access token
    #[error("access token unavailable: {message}")]
    Token { message: String },

    /// Secret payload was missing or not valid UTF-8 text
    #[error("invalid secret payload: {message}")]
    Secret { message: String },
}
