//! Role-scoped retrieval cache

pub mod retrieval_cache;

pub use retrieval_cache::{CacheLookup, FallbackReason, RetrievalCache, SessionRetrievalCache};
