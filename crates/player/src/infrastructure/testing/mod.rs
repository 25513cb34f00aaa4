//! Test doubles for the outbound ports.

mod fixtures;

pub use fixtures::{ManualScheduler, RecordingTransport};
