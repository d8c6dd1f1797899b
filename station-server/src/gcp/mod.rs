//! Google Cloud plumbing.
//!
//! Thin REST clients for the pieces of GCP the server depends on at
//! startup and per request:
//! - the metadata server (project id, region, service-account tokens)
//! - Secret Manager (the LINE channel access token)
//!
//! Access tokens are cached until shortly before they expire, so the
//! metadata server is hit at most once per token lifetime.

mod credentials;
mod error;
mod metadata;
mod secrets;

pub use credentials::Credentials;
pub use error::GcpError;
pub use metadata::{AccessToken, MetadataClient, MetadataConfig};
pub use secrets::{SecretClient, SecretClientConfig};
