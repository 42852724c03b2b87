//! Per-turn prompt context
//!
//! [`assembler::ContextAssembler`] builds the bounded context a role sees
//! when it is asked to speak.

pub mod assembler;
