//! Request authorization for Google APIs.

use reqwest::RequestBuilder;

use super::error::GcpError;
use super::metadata::MetadataClient;

/// How outgoing Google API requests are authorized.
#[derive(Clone)]
pub enum Credentials {
    /// Bearer tokens from the instance's service account.
    Metadata(MetadataClient),

    /// No Authorization header (local emulators).
    Anonymous,
}

impl Credentials {
    /// Attach an Authorization header to `request` when credentials exist.
    pub async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder, GcpError> {
        match self {
            Credentials::Metadata(metadata) => {
                let token = metadata.access_token().await?;
                Ok(request.bearer_auth(token.access_token))
            }
            Credentials::Anonymous => Ok(request),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::Metadata(_) => f.write_str("Credentials::Metadata"),
            Credentials::Anonymous => f.write_str("Credentials::Anonymous"),
        }
    }
}
