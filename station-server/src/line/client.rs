//! LINE push API client.
//!
//! Sends message bodies to `POST /v2/bot/message/push` with the channel
//! access token as a bearer token. Failed pushes are not retried.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use super::Messenger;
use super::error::PushError;
use super::messages::PushRequest;

/// Default push endpoint.
pub const DEFAULT_PUSH_ENDPOINT: &str = "https://api.line.me/v2/bot/message/push";

/// Configuration for the push client.
#[derive(Clone)]
pub struct LineConfig {
    /// Channel access token
    pub access_token: String,
    /// Push endpoint URL
    pub endpoint: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl LineConfig {
    /// Create a new config with the given channel access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            endpoint: DEFAULT_PUSH_ENDPOINT.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set a custom endpoint (`LINE_API_ENDPOINT`, or a local server in tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

impl std::fmt::Debug for LineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineConfig")
            .field("access_token", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// LINE Messaging API push client.
#[derive(Debug, Clone)]
pub struct LineClient {
    http: reqwest::Client,
    endpoint: String,
}

impl LineClient {
    /// Create a new push client with the given configuration.
    pub fn new(config: LineConfig) -> Result<Self, PushError> {
        if config.access_token.is_empty() {
            return Err(PushError::Config(
                "channel access token is empty".to_string(),
            ));
        }

        let mut headers = HeaderMap::new();
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.access_token))
            .map_err(|_| PushError::Config("invalid channel access token format".to_string()))?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }
}

#[async_trait]
impl Messenger for LineClient {
    async fn push(&self, request: &PushRequest) -> Result<Vec<u8>, PushError> {
        let response = self.http.post(&self.endpoint).json(request).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(PushError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(PushError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PushError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.bytes().await?;
        Ok(body.to_vec())
    }
}
