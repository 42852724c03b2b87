//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod generation_worker;
pub mod run_debate;
