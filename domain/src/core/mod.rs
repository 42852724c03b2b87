//! Core domain concepts shared across all subdomains.
//!
//! - [`topic::Topic`]: a validated debate topic
//! - [`error::ConfigError`]: configuration errors that reject a session

pub mod error;
pub mod topic;
