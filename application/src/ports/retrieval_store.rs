//! Port for persisting retrieval results between runs.
//!
//! The [`RetrievalCache`](crate::cache::RetrievalCache) keeps live entries
//! in memory. A [`RetrievalStore`] lets a later process pick them up again
//! until they expire.

use roundtable_domain::{Reference, RoleId, Topic};
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RetrievalStoreError {
    #[error("Retrieval store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored retrieval entry is unreadable: {0}")]
    Corrupt(String),
}

/// References fetched for one role on one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredRetrieval {
    pub role: String,
    pub topic: String,
    pub max_results: usize,
    /// Unix seconds at fetch time
    pub fetched_at: u64,
    pub references: Vec<Reference>,
}

impl StoredRetrieval {
    pub fn new(
        role: &RoleId,
        topic: &Topic,
        max_results: usize,
        references: Vec<Reference>,
    ) -> Self {
        Self {
            role: role.to_string(),
            topic: topic.to_string(),
            max_results,
            fetched_at: unix_now(),
            references,
        }
    }

    /// Time since the fetch. A timestamp in the future counts as fresh.
    pub fn age(&self) -> Duration {
        Duration::from_secs(unix_now().saturating_sub(self.fetched_at))
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Persistent backing for the retrieval cache
pub trait RetrievalStore: Send + Sync {
    fn load(
        &self,
        role: &RoleId,
        topic: &Topic,
    ) -> Result<Option<StoredRetrieval>, RetrievalStoreError>;

    fn save(&self, entry: &StoredRetrieval) -> Result<(), RetrievalStoreError>;

    fn remove(&self, role: &RoleId, topic: &Topic) -> Result<(), RetrievalStoreError>;

    /// Drop every entry. Returns how many were removed.
    fn clear(&self) -> Result<usize, RetrievalStoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entry_is_fresh() {
        let topic = Topic::new("Should cities ban cars?").unwrap();
        let entry = StoredRetrieval::new(&RoleId::from("ethicist"), &topic, 3, Vec::new());
        assert_eq!(entry.role, "ethicist");
        assert_eq!(entry.topic, "Should cities ban cars?");
        assert!(entry.age() < Duration::from_secs(5));
    }

    #[test]
    fn test_age_counts_from_fetch_time() {
        let topic = Topic::new("Should cities ban cars?").unwrap();
        let mut entry = StoredRetrieval::new(&RoleId::from("ethicist"), &topic, 3, Vec::new());
        entry.fetched_at -= 3600;
        assert!(entry.age() >= Duration::from_secs(3600));

        entry.fetched_at = u64::MAX;
        assert_eq!(entry.age(), Duration::ZERO);
    }
}
