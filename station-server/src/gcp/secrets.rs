//! Secret Manager client.

use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use super::credentials::Credentials;
use super::error::GcpError;

/// Default base URL for the Secret Manager REST API.
const DEFAULT_BASE_URL: &str = "https://secretmanager.googleapis.com/v1";

/// Response of `versions/*:access`.
#[derive(Debug, Deserialize)]
struct AccessSecretVersionResponse {
    payload: Option<SecretPayload>,
}

#[derive(Debug, Deserialize)]
struct SecretPayload {
    /// Base64-encoded secret bytes.
    data: String,
}

/// Configuration for the Secret Manager client.
#[derive(Debug, Clone)]
pub struct SecretClientConfig {
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl SecretClientConfig {
    /// Create a config for the production endpoint.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

impl Default for SecretClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reads secret versions from Secret Manager.
#[derive(Debug, Clone)]
pub struct SecretClient {
    http: reqwest::Client,
    base_url: String,
    credentials: Credentials,
}

impl SecretClient {
    /// Create a new Secret Manager client.
    pub fn new(config: SecretClientConfig, credentials: Credentials) -> Result<Self, GcpError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            credentials,
        })
    }

    /// Read the latest version of `secret_name` as text.
    ///
    /// Surrounding whitespace is stripped; secrets pasted into the console
    /// often end with a newline.
    pub async fn access_latest(
        &self,
        project_id: &str,
        secret_name: &str,
    ) -> Result<String, GcpError> {
        let url = format!(
            "{}/projects/{}/secrets/{}/versions/latest:access",
            self.base_url, project_id, secret_name
        );

        let request = self.credentials.authorize(self.http.get(&url)).await?;
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GcpError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let parsed: AccessSecretVersionResponse =
            serde_json::from_str(&body).map_err(|e| GcpError::Json {
                message: e.to_string(),
            })?;

        let payload = parsed.payload.ok_or_else(|| GcpError::Secret {
            message: format!("secret {secret_name} has no payload"),
        })?;

        let bytes = STANDARD
            .decode(payload.data.as_bytes())
            .map_err(|e| GcpError::Secret {
                message: e.to_string(),
            })?;

        let text = String::from_utf8(bytes).map_err(|e| GcpError::Secret {
            message: e.to_string(),
        })?;

        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::extract::Path;
    use axum::http::{HeaderMap, StatusCode};
    use axum::routing::get;

    use super::*;
    use crate::test_support::spawn_server;

    async fn secret_server() -> String {
        let router = Router::new().route(
            "/v1/projects/:project/secrets/*rest",
            get(
                |Path((project, rest)): Path<(String, String)>, headers: HeaderMap| async move {
                    assert_eq!(project, "sogorro");
                    assert!(headers.get("authorization").is_none());
                    assert!(rest.ends_with("/versions/latest:access"));
                    let name = rest.trim_start_matches('/').split('/').next().unwrap_or_default();
                    match name {
                        "linebot-access-token" => (
                            StatusCode::OK,
                            // "channel-token\n"
                            r#"{"name":"projects/1/secrets/linebot-access-token/versions/3","payload":{"data":"Y2hhbm5lbC10b2tlbgo=","dataCrc32c":"1"}}"#.to_string(),
                        ),
                        "empty" => (StatusCode::OK, r#"{"name":"x"}"#.to_string()),
                        "garbled" => (StatusCode::OK, r#"{"payload":{"data":"%%%"}}"#.to_string()),
                        _ => (StatusCode::NOT_FOUND, "secret not found".to_string()),
                    }
                },
            ),
        );

        let addr = spawn_server(router).await;
        format!("http://{addr}/v1")
    }

    async fn client() -> SecretClient {
        let config = SecretClientConfig::new().with_base_url(secret_server().await);
        SecretClient::new(config, Credentials::Anonymous).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = SecretClientConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout_secs, 10);
    }

    #[tokio::test]
    async fn decodes_payload() {
        let secret = client()
            .await
            .access_latest("sogorro", "linebot-access-token")
            .await
            .unwrap();
        assert_eq!(secret, "channel-token");
    }

    #[tokio::test]
    async fn missing_payload_is_error() {
        let err = client()
            .await
            .access_latest("sogorro", "empty")
            .await
            .unwrap_err();
        assert!(matches!(err, GcpError::Secret { .. }));
    }

    #[tokio::test]
    async fn bad_base64_is_error() {
        let err = client()
            .await
            .access_latest("sogorro", "garbled")
            .await
            .unwrap_err();
        assert!(matches!(err, GcpError::Secret { .. }));
    }

    #[tokio::test]
    async fn unknown_secret_is_api_error() {
        let err = client()
            .await
            .access_latest("sogorro", "nope")
            .await
            .unwrap_err();
        assert!(matches!(err, GcpError::Api { status: 404, .. }));
    }
}
