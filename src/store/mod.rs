//! Store - visit count storage backends.
//!
//! A [`VisitStore`] can save a new visit to a country, retrieve every country
//! visited, and report how many distinct countries have been visited.
//! [`MemoryStore`] keeps counts in process memory; [`DynamoStore`] (behind the
//! `dynamodb` feature) persists them in a managed table.

mod error;
mod memory;

#[cfg(feature = "dynamodb")]
mod dynamo;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;

#[cfg(feature = "dynamodb")]
pub use dynamo::DynamoStore;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// =============================================================================
// Visit Record
// =============================================================================

/// A visited country and its running visit count.
///
/// Serialized field names (`Country`, `Visit`) are the wire contract the map
/// front end reads; do not rename them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VisitRecord {
    /// Country name, the unique record key. Ex: Turkey.
    #[serde(rename = "Country")]
    pub country: String,
    /// Total number of visits.
    #[serde(rename = "Visit")]
    pub visits: u64,
}

// =============================================================================
// VisitStore Trait
// =============================================================================

/// Storage backend for visit counts.
///
/// Implementations are shared across request handlers behind an `Arc`, so
/// every operation takes `&self`.
#[async_trait]
pub trait VisitStore: Send + Sync {
    /// Record one more visit to `country`, creating the record at count 1 if
    /// it does not exist yet. Returns the post-increment count.
    async fn save(&self, country: &str) -> StoreResult<u64>;

    /// Every known visit record, in no particular order. An empty store
    /// yields an empty vec.
    async fn results(&self) -> StoreResult<Vec<VisitRecord>>;

    /// Number of distinct countries with a positive visit count.
    async fn unique_total(&self) -> StoreResult<u64>;
}
