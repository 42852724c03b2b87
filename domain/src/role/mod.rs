//! Debate participants
//!
//! A [`Role`] is a persona with fixed metadata (prompt framing, retrieval
//! focus, voice). Roles are catalogued in an immutable [`RoleRegistry`].

pub mod entities;
pub mod registry;
