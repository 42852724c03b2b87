//! Ordered delivery of generated turns to the presentation side

pub mod playback;
pub mod queue;

pub use playback::{PlaybackController, PlaybackReport, PlaybackState};
pub use queue::{DEFAULT_QUEUE_CAPACITY, DeliveryError, DeliveryQueue};
