//! Focus scoring configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Scoring thresholds and score deltas.
///
/// Not exposed through the tracker settings file; `Default` is the
/// production tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FocusConfig {
    /// Average EAR below which the user counts as drowsy
    pub drowsy_ear: f32,

    /// Average EAR above which the eyes count as attentive
    pub attentive_ear: f32,

    /// Nose x range considered facing the screen
    pub facing_min_x: f32,
    pub facing_max_x: f32,

    /// Mouth aperture above which the user counts as yawning
    pub yawn_aperture: f32,

    /// Nose y above which the head counts as tilted down (y grows downward)
    pub phone_down_y: f32,

    /// Score below which the low-focus alert is raised
    pub low_focus_score: f32,

    /// Per-frame score deltas
    pub no_face_penalty: f32,
    pub drowsy_penalty: f32,
    pub distraction_penalty: f32,
    pub yawn_penalty: f32,
    pub recovery_bonus: f32,

    /// Sustained-condition thresholds (seconds)
    pub no_face_alert_secs: u64,
    pub phone_down_alert_secs: u64,
}

impl Default for FocusConfig {
    fn default() -> Self {
        Self {
            drowsy_ear: 0.25,
            attentive_ear: 0.3,
            facing_min_x: 0.3,
            facing_max_x: 0.7,
            yawn_aperture: 0.05,
            phone_down_y: 0.6,
            low_focus_score: 20.0,
            no_face_penalty: 0.01,
            drowsy_penalty: 0.1,
            distraction_penalty: 0.2,
            yawn_penalty: 0.1,
            recovery_bonus: 0.5,
            no_face_alert_secs: 300,
            phone_down_alert_secs: 300,
        }
    }
}

impl FocusConfig {
    pub fn no_face_alert_after(&self) -> Duration {
        Duration::from_secs(self.no_face_alert_secs)
    }

    pub fn phone_down_alert_after(&self) -> Duration {
        Duration::from_secs(self.phone_down_alert_secs)
    }

    /// Whether the nose x coordinate points at the screen
    pub fn is_facing(&self, nose_x: f32) -> bool {
        (self.facing_min_x..=self.facing_max_x).contains(&nose_x)
    }
}
