//! Notification Delivery
//!
//! Alerts leave the frame loop through `NotificationDispatcher`, which hands
//! them to a background task. Sinks may block (speech playback takes real
//! time) and may fail; neither affects the caller.

mod dispatcher;
mod sink;

pub use dispatcher::NotificationDispatcher;
pub use sink::{DesktopSink, NotificationSink, TracingSink};

use thiserror::Error;

/// Notification error types
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Failed to run {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} exited with {status}")]
    Command { command: String, status: String },

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}
