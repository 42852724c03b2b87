//! Session-level state shared between the worker, the playback controller
//! and the driver.

pub mod handle;
pub mod status;
