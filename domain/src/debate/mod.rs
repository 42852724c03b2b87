//! Debate domain
//!
//! Sessions, turns, and the round-robin scheduler that decides who
//! speaks next.

pub mod scheduler;
pub mod session;
pub mod settings;
pub mod turn;
