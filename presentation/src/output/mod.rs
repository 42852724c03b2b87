//! Console output: turn rendering and result formatting

pub mod console;
pub mod sink;
