//! In-memory station store.
//!
//! Serves a fixed station list, either built in code (tests) or loaded
//! from a JSON fixture file for running the server without Firestore.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::{BoundingBox, Station};

use super::StationStore;
use super::error::StoreError;
use super::types::StatusFilter;

/// Station store holding operational stations in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStationStore {
    stations: Arc<Vec<Station>>,
}

impl MemoryStationStore {
    /// Create a store serving `stations`, all treated as operational.
    pub fn new(stations: Vec<Station>) -> Self {
        Self {
            stations: Arc::new(stations),
        }
    }

    /// Load a fixture file.
    ///
    /// The file is a JSON array of station objects using the store's field
    /// names (`address`, `city`, `district`, `location`, `latitude`,
    /// `longitude`, `vmType`). Entries whose status field differs from
    /// `status.value`, or lacks it, are dropped just as the Firestore
    /// query would drop them.
    pub fn from_file(path: impl AsRef<Path>, status: &StatusFilter) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| StoreError::Fixture {
            message: format!("failed to read {}: {}", path.display(), e),
        })?;

        let entries: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&json)
            .map_err(|e| StoreError::Fixture {
                message: format!("failed to parse {}: {}", path.display(), e),
            })?;

        let mut stations = Vec::with_capacity(entries.len());
        for (index, entry) in entries.into_iter().enumerate() {
            let operational = entry
                .get(&status.field)
                .and_then(serde_json::Value::as_i64)
                .is_some_and(|v| v == status.value);
            if !operational {
                continue;
            }

            let station: Station = serde_json::from_value(serde_json::Value::Object(entry))
                .map_err(|e| StoreError::Fixture {
                    message: format!("entry {index} in {}: {}", path.display(), e),
                })?;
            stations.push(station);
        }

        Ok(Self::new(stations))
    }

    /// Number of stations held.
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    /// Whether the store holds no stations.
    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

#[async_trait]
impl StationStore for MemoryStationStore {
    async fn stations_within(&self, bounds: &BoundingBox) -> Result<Vec<Station>, StoreError> {
        Ok(self
            .stations
            .iter()
            .filter(|s| bounds.contains(&s.coordinate))
            .cloned()
            .collect())
    }
}
