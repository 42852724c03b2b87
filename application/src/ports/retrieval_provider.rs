//! Retrieval provider port
//!
//! Fetches supporting references for a role's position on a topic.

use async_trait::async_trait;
use roundtable_domain::{Reference, Role, Topic};
use thiserror::Error;

/// Errors from a reference fetch. Never fatal: the cache degrades to
/// "no supporting material".
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetrievalError {
    #[error("Search request failed: {0}")]
    RequestFailed(String),

    #[error("Could not parse search results: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Retrieval unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RetrievalProvider: Send + Sync {
    /// Fetch at most `max_results` references supporting `role`'s view of `topic`
    async fn fetch(
        &self,
        role: &Role,
        topic: &Topic,
        max_results: usize,
    ) -> Result<Vec<Reference>, RetrievalError>;
}
