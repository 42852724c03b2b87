//! Application-level configuration.
//!
//! - [`WorkerParams`]: generation loop control (timeouts, queue bound,
//!   failure threshold)

pub mod worker_params;

pub use worker_params::WorkerParams;
