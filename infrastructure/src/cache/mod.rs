//! Persistent storage for retrieval results

pub mod file_store;

pub use file_store::FileRetrievalStore;
