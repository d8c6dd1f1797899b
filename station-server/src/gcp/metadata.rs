//! GCP metadata server client.
//!
//! On Cloud Run and GCE the metadata server answers questions about the
//! running instance and hands out OAuth tokens for its service account.
//! Every request must carry `Metadata-Flavor: Google`.

use std::time::{Duration, Instant};

use moka::Expiry;
use moka::future::Cache as MokaCache;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;

use super::error::GcpError;

/// Default metadata server host.
const DEFAULT_HOST: &str = "metadata.google.internal";

/// Cache key for the default service account token.
const TOKEN_KEY: &str = "default";

/// Tokens are dropped from the cache this long before they expire.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Configuration for the metadata client.
#[derive(Debug, Clone)]
pub struct MetadataConfig {
    /// Host (and optional port) of the metadata server
    pub host: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl MetadataConfig {
    /// Create a config pointing at the standard metadata host.
    pub fn new() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            timeout_secs: 5,
        }
    }

    /// Set a custom host (`GCE_METADATA_HOST`, or a local server in tests).
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// OAuth access token issued to the instance's service account.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    /// Remaining lifetime in seconds at the time of issue.
    pub expires_in: u64,
    pub token_type: String,
}

/// Expires cached tokens `EXPIRY_MARGIN` ahead of their real lifetime.
struct TokenExpiry;

impl Expiry<&'static str, AccessToken> for TokenExpiry {
    fn expire_after_create(
        &self,
        _key: &&'static str,
        token: &AccessToken,
        _created_at: Instant,
    ) -> Option<Duration> {
        Some(Duration::from_secs(token.expires_in).saturating_sub(EXPIRY_MARGIN))
    }
}

/// Metadata server client with token caching.
#[derive(Clone)]
pub struct MetadataClient {
    http: reqwest::Client,
    base_url: String,
    tokens: MokaCache<&'static str, AccessToken>,
}

impl MetadataClient {
    /// Create a new metadata client.
    pub fn new(config: MetadataConfig) -> Result<Self, GcpError> {
        let mut headers = HeaderMap::new();
        headers.insert("Metadata-Flavor", HeaderValue::from_static("Google"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let tokens = MokaCache::builder()
            .max_capacity(1)
            .expire_after(TokenExpiry)
            .build();

        Ok(Self {
            http,
            base_url: format!("http://{}/computeMetadata/v1", config.host),
            tokens,
        })
    }

    /// Project id of the running instance.
    pub async fn project_id(&self) -> Result<String, GcpError> {
        self.get_text("project/project-id").await
    }

    /// Region, in the form `projects/PROJECT_NUMBER/regions/REGION`.
    pub async fn region(&self) -> Result<String, GcpError> {
        self.get_text("instance/region").await
    }

    /// Access token for the default service account.
    ///
    /// Served from cache while the previous token is still valid.
    pub async fn access_token(&self) -> Result<AccessToken, GcpError> {
        self.tokens
            .try_get_with(TOKEN_KEY, self.fetch_token())
            .await
            .map_err(|e| GcpError::Token {
                message: e.to_string(),
            })
    }

    async fn fetch_token(&self) -> Result<AccessToken, GcpError> {
        let body = self
            .get_text("instance/service-accounts/default/token")
            .await?;

        let token: AccessToken = serde_json::from_str(&body).map_err(|e| GcpError::Json {
            message: e.to_string(),
        })?;

        tracing::debug!(
            expires_in = token.expires_in,
            "fetched service account token"
        );
        Ok(token)
    }

    async fn get_text(&self, path: &str) -> Result<String, GcpError> {
        let url = format!("{}/{}", self.base_url, path);

        let response = self.http.get(&url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GcpError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        Ok(response.text().await?.trim().to_string())
    }
}
