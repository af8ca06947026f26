//! Focus state tracking

use alerting::AlertGate;
use serde::{Deserialize, Serialize};
use crate::FocusConfig;

/// Running focus score, always within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct FocusScore(f32);

impl FocusScore {
    pub const MIN: f32 = 0.0;
    pub const MAX: f32 = 100.0;

    /// Create a score, clamping into range
    pub fn new(value: f32) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    /// Add `delta` and clamp. Returns the new value.
    pub fn apply(&mut self, delta: f32) -> f32 {
        self.0 = (self.0 + delta).clamp(Self::MIN, Self::MAX);
        self.0
    }

    pub fn value(&self) -> f32 {
        self.0
    }
}

impl Default for FocusScore {
    fn default() -> Self {
        Self(Self::MAX)
    }
}

/// Focus state (tracked over the session)
#[derive(Debug, Clone)]
pub struct FocusState {
    /// Current score
    pub score: FocusScore,

    /// No face in view
    pub no_face: AlertGate,

    /// Head tilted down
    pub phone_down: AlertGate,

    /// Score under the warning level
    pub low_focus: AlertGate,
}

impl FocusState {
    pub fn new(config: &FocusConfig) -> Self {
        Self {
            score: FocusScore::default(),
            no_face: AlertGate::new(config.no_face_alert_after()),
            phone_down: AlertGate::new(config.phone_down_alert_after()),
            low_focus: AlertGate::immediate(),
        }
    }

    /// Reset state (session restart)
    pub fn reset(&mut self) {
        self.score = FocusScore::default();
        self.no_face.reset();
        self.phone_down.reset();
        self.low_focus.reset();
    }
}
