//! Notification sinks

use std::process::Command;
use tracing::{debug, info};
use crate::NotifyError;

/// Destination for alert text. Calls may block.
pub trait NotificationSink: Send + Sync {
    /// Sink name for logs
    fn name(&self) -> &str;

    /// Show a visual toast
    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError>;

    /// Say `text` out loud
    fn speak(&self, text: &str) -> Result<(), NotifyError>;
}

/// Writes alerts to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl NotificationSink for TracingSink {
    fn name(&self) -> &str {
        "log"
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        info!(title, "{}", body);
        Ok(())
    }

    fn speak(&self, text: &str) -> Result<(), NotifyError> {
        debug!(text, "Speech requested");
        Ok(())
    }
}

/// Desktop toasts through `notify-send` and speech through a TTS command
#[derive(Debug, Clone)]
pub struct DesktopSink {
    /// Toast command, called as `<cmd> --expire-time <ms> <title> <body>`
    pub notify_command: String,
    /// Speech command, called as `<cmd> <text>`; None disables speech
    pub speech_command: Option<String>,
    /// Toast lifetime
    pub toast_timeout_ms: u32,
}

impl Default for DesktopSink {
    fn default() -> Self {
        Self {
            notify_command: "notify-send".to_string(),
            speech_command: Some("espeak".to_string()),
            toast_timeout_ms: 5000,
        }
    }
}

impl DesktopSink {
    pub fn with_speech(speech_command: Option<String>) -> Self {
        Self {
            speech_command,
            ..Default::default()
        }
    }
}

fn run(command: &str, args: &[&str]) -> Result<(), NotifyError> {
    let status = Command::new(command)
        .args(args)
        .status()
        .map_err(|source| NotifyError::Spawn {
            command: command.to_string(),
            source,
        })?;

    if !status.success() {
        return Err(NotifyError::Command {
            command: command.to_string(),
            status: status.to_string(),
        });
    }
    Ok(())
}

impl NotificationSink for DesktopSink {
    fn name(&self) -> &str {
        "desktop"
    }

    fn notify(&self, title: &str, body: &str) -> Result<(), NotifyError> {
        let timeout = self.toast_timeout_ms.to_string();
        run(&self.notify_command, &["--expire-time", &timeout, title, body])
    }

    fn speak(&self, text: &str) -> Result<(), NotifyError> {
        match &self.speech_command {
            Some(command) => run(command, &[text]),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_command_is_spawn_error() {
        let sink = DesktopSink {
            notify_command: "definitely-not-a-notifier-binary".to_string(),
            ..Default::default()
        };
        let err = sink.notify("Title", "Body").unwrap_err();
        assert!(matches!(err, NotifyError::Spawn { .. }));
    }

    #[test]
    fn test_speech_disabled() {
        let sink = DesktopSink::with_speech(None);
        assert!(sink.speak("hello").is_ok());
    }

    #[test]
    fn test_tracing_sink_never_fails() {
        assert!(TracingSink.notify("Title", "Body").is_ok());
        assert!(TracingSink.speak("hello").is_ok());
    }
}
