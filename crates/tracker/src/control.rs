//! Session control surface
//!
//! The shell drives a running session through `SessionControl`; the frame
//! loop observes the same state through a `watch` receiver and applies
//! changes between frames.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use crate::settings::{validate_minutes, SettingsError};

/// Operator-controlled session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    /// Capture and scoring active
    pub running: bool,
    /// Loop should exit
    pub shutdown: bool,
    pub focus_minutes: u32,
    pub break_minutes: u32,
}

/// Handle used by the shell to steer a session
#[derive(Debug, Clone)]
pub struct SessionControl {
    sender: Arc<watch::Sender<ControlState>>,
}

impl SessionControl {
    /// Create a stopped session control and the receiver for the frame loop
    pub fn new(
        focus_minutes: u32,
        break_minutes: u32,
    ) -> Result<(Self, watch::Receiver<ControlState>), SettingsError> {
        validate_minutes("focus_minutes", focus_minutes)?;
        validate_minutes("break_minutes", break_minutes)?;

        let (sender, receiver) = watch::channel(ControlState {
            running: false,
            shutdown: false,
            focus_minutes,
            break_minutes,
        });
        Ok((
            Self {
                sender: Arc::new(sender),
            },
            receiver,
        ))
    }

    /// Begin (or resume) capture
    pub fn start(&self) {
        info!("Session start requested");
        self.sender.send_modify(|state| state.running = true);
    }

    /// Halt capture, keeping all state for a restart
    pub fn stop(&self) {
        info!("Session stop requested");
        self.sender.send_modify(|state| state.running = false);
    }

    /// End the frame loop
    pub fn shutdown(&self) {
        self.sender.send_modify(|state| {
            state.running = false;
            state.shutdown = true;
        });
    }

    pub fn set_focus_minutes(&self, minutes: u32) -> Result<(), SettingsError> {
        validate_minutes("focus_minutes", minutes)?;
        self.sender.send_modify(|state| state.focus_minutes = minutes);
        Ok(())
    }

    pub fn set_break_minutes(&self, minutes: u32) -> Result<(), SettingsError> {
        validate_minutes("break_minutes", minutes)?;
        self.sender.send_modify(|state| state.break_minutes = minutes);
        Ok(())
    }

    /// Snapshot of the current state
    pub fn state(&self) -> ControlState {
        *self.sender.borrow()
    }
}
