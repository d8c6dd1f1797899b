//! Station store error types.

use crate::gcp::GcpError;

/// Errors that can occur when querying the station store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Could not authorize the request
    #[error("credentials error: {0}")]
    Credentials(#[from] GcpError),

    /// Authentication failed
    #[error("unauthorized: check the service account's Firestore permissions")]
    Unauthorized,

    /// API returned an error status
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// A record is missing a field or holds the wrong type
    #[error("document {document}: field {field}: {message}")]
    Field {
        document: String,
        field: String,
        message: String,
    },

    /// Fixture file could not be loaded
    #[error("fixture error: {message}")]
    Fixture { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = StoreError::Field {
            document: "stations/abc".into(),
            field: "latitude".into(),
            message: "expected doubleValue".into(),
        };
        assert_eq!(
            err.to_string(),
            "document stations/abc: field latitude: expected doubleValue"
        );

        let err = StoreError::Api {
            status: 503,
            message: "unavailable".into(),
        };
        assert_eq!(err.to_string(), "API error 503: unavailable");
    }
}
