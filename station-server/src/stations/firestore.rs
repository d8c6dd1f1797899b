//! Firestore station store.
//!
//! Uses the REST `documents:runQuery` endpoint so the four bounding-box
//! inequalities and the status equality are evaluated server-side.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::{BoundingBox, Station};
use crate::gcp::Credentials;

use super::StationStore;
use super::error::StoreError;
use super::types::{RunQueryRequest, RunQueryResponseItem, StatusFilter};

/// Default base URL for the Firestore REST API.
const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Default collection holding station documents.
pub const DEFAULT_COLLECTION: &str = "stations";

/// Configuration for the Firestore store.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// GCP project owning the database
    pub project_id: String,
    /// Collection holding station documents
    pub collection: String,
    /// Operational-status filter
    pub status: StatusFilter,
    /// Base URL for the API
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl FirestoreConfig {
    /// Create a new config for the given project.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            status: StatusFilter::default(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }

    /// Set the collection id.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Set the status filter.
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.status = status;
        self
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Point at a local emulator (`FIRESTORE_EMULATOR_HOST`).
    pub fn with_emulator_host(self, host: &str) -> Self {
        self.with_base_url(format!("http://{host}/v1"))
    }

    fn run_query_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/(default)/documents:runQuery",
            self.base_url, self.project_id
        )
    }
}

/// Station store backed by a Firestore collection.
#[derive(Debug, Clone)]
pub struct FirestoreStationStore {
    http: reqwest::Client,
    url: String,
    collection: String,
    status: StatusFilter,
    credentials: Credentials,
}

impl FirestoreStationStore {
    /// Create a new Firestore store.
    pub fn new(config: FirestoreConfig, credentials: Credentials) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            url: config.run_query_url(),
            collection: config.collection,
            status: config.status,
            credentials,
        })
    }
}

#[async_trait]
impl StationStore for FirestoreStationStore {
    async fn stations_within(&self, bounds: &BoundingBox) -> Result<Vec<Station>, StoreError> {
        let body = RunQueryRequest::stations_within(&self.collection, bounds, &self.status);

        let request = self
            .credentials
            .authorize(self.http.post(&self.url).json(&body))
            .await?;
        let response = request.send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(StoreError::Unauthorized);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        let items: Vec<RunQueryResponseItem> =
            serde_json::from_str(&body).map_err(|e| StoreError::Json {
                message: e.to_string(),
            })?;

        let stations = items
            .into_iter()
            .filter_map(|item| item.document)
            .map(|document| document.into_station())
            .collect::<Result<Vec<_>, _>>()?;

        tracing::debug!(
            collection = %self.collection,
            count = stations.len(),
            "firestore query returned stations"
        );
        Ok(stations)
    }
}
