//! Topic-based event bus for runtime events.
//!
//! The host publishes lifecycle boundaries and the replication notices it
//! sends to observers; consumers subscribe only to the topics they need.

mod bus;

pub use bus::{Event, EventBus, Topic};
