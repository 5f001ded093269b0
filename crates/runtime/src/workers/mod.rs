//! Background workers used internally by the runtime.

mod host;

pub use host::{Command, HostChannels, HostWorker};
