//! MemoryStore - ephemeral in-process storage.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{StoreResult, VisitRecord, VisitStore};

/// In-memory visit store. If the process goes down, all counts are lost.
///
/// Counts live in a map behind a `tokio` RwLock so handlers can share the
/// store concurrently; saves serialize on the write lock.
#[derive(Debug, Default)]
pub struct MemoryStore {
    counts: RwLock<HashMap<String, u64>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VisitStore for MemoryStore {
    async fn save(&self, country: &str) -> StoreResult<u64> {
        let mut counts = self.counts.write().await;
        let count = counts.entry(country.to_string()).or_insert(0);
        *count += 1;
        Ok(*count)
    }

    async fn results(&self) -> StoreResult<Vec<VisitRecord>> {
        let counts = self.counts.read().await;
        Ok(counts
            .iter()
            .map(|(country, &visits)| VisitRecord {
                country: country.clone(),
                visits,
            })
            .collect())
    }

    async fn unique_total(&self) -> StoreResult<u64> {
        let counts = self.counts.read().await;
        Ok(counts.values().filter(|&&visits| visits > 0).count() as u64)
    }
}
