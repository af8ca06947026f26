//! Tracker settings
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! settings file, then `FOCUS_*` environment variables
//! (e.g. `FOCUS_BREAK_MINUTES=10`, `FOCUS_CAMERA__WIDTH=1280`).

use camera_capture::CameraConfig;
use config::{Config, ConfigError, Environment, File, Source};
use interval_timer::{DEFAULT_BREAK_MINUTES, DEFAULT_FOCUS_MINUTES, MAX_MINUTES, MIN_MINUTES};
use notifier::{DesktopSink, NotificationSink, TracingSink};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;
use crate::session::MAX_FRAME_RATE_HZ;

/// Settings file looked up in the working directory when no path is given
pub const DEFAULT_SETTINGS_FILE: &str = "focus-tracker";

/// Settings error types
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to load settings: {0}")]
    Load(#[from] ConfigError),

    #[error("Invalid setting: {0}")]
    Invalid(String),
}

/// Camera settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraSettings {
    pub width: u32,
    pub height: u32,
    /// Stop after this many frames
    pub frames: Option<u64>,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let defaults = CameraConfig::default();
        Self {
            width: defaults.width,
            height: defaults.height,
            frames: None,
        }
    }
}

/// Notification settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Desktop toasts and speech (in addition to the log)
    pub desktop: bool,
    /// Speech command, unset to mute
    pub speech_command: Option<String>,
    /// Alerts waiting for delivery before new ones are dropped
    pub queue_capacity: usize,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            desktop: false,
            speech_command: Some("espeak".to_string()),
            queue_capacity: 16,
        }
    }
}

/// Complete tracker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Focus phase length (1-60 minutes)
    pub focus_minutes: u32,
    /// Break phase length (1-60 minutes)
    pub break_minutes: u32,
    /// Frame loop cadence
    pub frame_rate_hz: f64,
    pub log_level: String,
    pub log_json: bool,
    /// Prometheus listener, disabled when unset
    pub metrics_addr: Option<SocketAddr>,
    /// Recorded landmarks to replay
    pub landmark_trace: Option<PathBuf>,
    pub camera: CameraSettings,
    pub notifications: NotificationSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            focus_minutes: DEFAULT_FOCUS_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
            frame_rate_hz: 12.0,
            log_level: "info".to_string(),
            log_json: false,
            metrics_addr: None,
            landmark_trace: None,
            camera: CameraSettings::default(),
            notifications: NotificationSettings::default(),
        }
    }
}

impl Settings {
    /// Load settings from defaults, `path` (or the default file if present)
    /// and the environment
    pub fn load(path: Option<&Path>) -> Result<Self, SettingsError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_SETTINGS_FILE).required(false),
        };
        Self::build(file, Environment::with_prefix("FOCUS"))
    }

    fn build<S>(file: S, env: Environment) -> Result<Self, SettingsError>
    where
        S: Source + Send + Sync + 'static,
    {
        let settings: Settings = Config::builder()
            .add_source(Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(env.prefix_separator("_").separator("__"))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        info!(
            "Settings loaded: focus {}m, break {}m, {} Hz",
            settings.focus_minutes, settings.break_minutes, settings.frame_rate_hz
        );
        Ok(settings)
    }

    /// Check ranges
    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_minutes("focus_minutes", self.focus_minutes)?;
        validate_minutes("break_minutes", self.break_minutes)?;

        if !(self.frame_rate_hz > 0.0 && self.frame_rate_hz <= MAX_FRAME_RATE_HZ) {
            return Err(SettingsError::Invalid(format!(
                "frame_rate_hz must be within (0, {}], got {}",
                MAX_FRAME_RATE_HZ, self.frame_rate_hz
            )));
        }
        if self.notifications.queue_capacity == 0 {
            return Err(SettingsError::Invalid(
                "notifications.queue_capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Capture configuration for the frame source
    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig {
            width: self.camera.width,
            height: self.camera.height,
            fps: self.frame_rate_hz.round().max(1.0) as u32,
            frame_limit: self.camera.frames,
        }
    }

    /// Notification sinks to deliver alerts to
    pub fn sinks(&self) -> Vec<Arc<dyn NotificationSink>> {
        let mut sinks: Vec<Arc<dyn NotificationSink>> = vec![Arc::new(TracingSink)];
        if self.notifications.desktop {
            sinks.push(Arc::new(DesktopSink::with_speech(
                self.notifications.speech_command.clone(),
            )));
        }
        sinks
    }
}

/// Reject phase lengths outside 1-60 minutes
pub fn validate_minutes(name: &str, minutes: u32) -> Result<(), SettingsError> {
    if !(MIN_MINUTES..=MAX_MINUTES).contains(&minutes) {
        return Err(SettingsError::Invalid(format!(
            "{} must be within {}-{}, got {}",
            name, MIN_MINUTES, MAX_MINUTES, minutes
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;
    use std::collections::HashMap;

    fn load_from(toml: &str, env: &[(&str, &str)]) -> Result<Settings, SettingsError> {
        let vars: HashMap<String, String> = env
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::build(
            File::from_str(toml, FileFormat::Toml),
            Environment::with_prefix("FOCUS").source(Some(vars)),
        )
    }

    #[test]
    fn test_defaults() {
        let settings = load_from("", &[]).unwrap();
        assert_eq!(settings.focus_minutes, 25);
        assert_eq!(settings.break_minutes, 5);
        assert_eq!(settings.frame_rate_hz, 12.0);
        assert_eq!(settings.camera.width, 640);
        assert!(settings.metrics_addr.is_none());
        assert_eq!(settings.sinks().len(), 1);
    }

    #[test]
    fn test_file_and_environment_layers() {
        let toml = r#"
            focus_minutes = 50
            landmark_trace = "trace.jsonl"

            [notifications]
            desktop = true
        "#;
        let settings = load_from(
            toml,
            &[("FOCUS_BREAK_MINUTES", "10"), ("FOCUS_CAMERA__WIDTH", "320")],
        )
        .unwrap();

        assert_eq!(settings.focus_minutes, 50);
        assert_eq!(settings.break_minutes, 10);
        assert_eq!(settings.camera.width, 320);
        assert_eq!(settings.landmark_trace, Some(PathBuf::from("trace.jsonl")));
        assert_eq!(settings.sinks().len(), 2);
    }

    #[test]
    fn test_out_of_range_minutes_rejected() {
        let err = load_from("focus_minutes = 61", &[]).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid(_)));
        assert!(validate_minutes("break_minutes", 0).is_err());
        assert!(validate_minutes("break_minutes", 60).is_ok());
    }

    #[test]
    fn test_bad_frame_rate_rejected() {
        assert!(load_from("frame_rate_hz = 0.0", &[]).is_err());
        assert!(load_from("frame_rate_hz = -12.0", &[]).is_err());

        let mut settings = Settings::default();
        settings.frame_rate_hz = 1e12;
        assert!(matches!(settings.validate(), Err(SettingsError::Invalid(_))));
        settings.frame_rate_hz = f64::NAN;
        assert!(settings.validate().is_err());
        settings.frame_rate_hz = MAX_FRAME_RATE_HZ;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_camera_config() {
        let mut settings = Settings::default();
        settings.camera.frames = Some(30);
        let camera = settings.camera_config();
        assert_eq!(camera.fps, 12);
        assert_eq!(camera.frame_limit, Some(30));
    }
}
