//! Station store adapters.
//!
//! The matcher only needs "every operational station inside this box".
//! [`StationStore`] is that contract; Firestore serves it in production
//! and [`MemoryStationStore`] serves fixture files and tests.
//!
//! Records are decoded into typed [`Station`] values at this boundary.
//! A missing or mistyped field fails the whole query.

mod error;
mod firestore;
mod memory;
mod types;

use async_trait::async_trait;

use crate::domain::{BoundingBox, Station};

pub use error::StoreError;
pub use firestore::{DEFAULT_COLLECTION, FirestoreConfig, FirestoreStationStore};
pub use memory::MemoryStationStore;
pub use types::StatusFilter;

/// Source of candidate stations for a query box.
#[async_trait]
pub trait StationStore: Send + Sync {
    /// Operational stations whose coordinates fall inside `bounds`.
    ///
    /// Order is whatever the backend produces; callers re-rank.
    async fn stations_within(&self, bounds: &BoundingBox) -> Result<Vec<Station>, StoreError>;
}
