//! Alert catalogue

use serde::{Deserialize, Serialize};
use std::fmt;

/// Alert kinds raised by the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AlertKind {
    /// No face in view for a sustained period
    NoFace,
    /// Head tilted down (phone use) for a sustained period
    PhoneDown,
    /// Focus score dropped below the warning level
    LowFocus,
    /// Focus phase of the interval timer ended
    FocusPhaseEnd,
    /// Break phase of the interval timer ended
    BreakPhaseEnd,
}

impl AlertKind {
    /// Short machine-friendly name, used as a metrics label
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::NoFace => "no_face",
            AlertKind::PhoneDown => "phone_down",
            AlertKind::LowFocus => "low_focus",
            AlertKind::FocusPhaseEnd => "focus_phase_end",
            AlertKind::BreakPhaseEnd => "break_phase_end",
        }
    }

    /// Toast title
    pub fn title(&self) -> &'static str {
        match self {
            AlertKind::NoFace => "No Face Detected",
            AlertKind::PhoneDown => "Phone Usage Detected",
            AlertKind::LowFocus => "Focus Warning",
            AlertKind::FocusPhaseEnd => "Focus Time Over",
            AlertKind::BreakPhaseEnd => "Break Over",
        }
    }

    /// Toast body
    pub fn body(&self) -> &'static str {
        match self {
            AlertKind::NoFace => "No face detected for 5 minutes.",
            AlertKind::PhoneDown => "You've been looking down for 5 minutes.",
            AlertKind::LowFocus => "Your focus level is low!",
            AlertKind::FocusPhaseEnd => "Time for a break!",
            AlertKind::BreakPhaseEnd => "Back to work!",
        }
    }

    /// Text handed to the speech engine
    pub fn speech(&self) -> &'static str {
        match self {
            AlertKind::FocusPhaseEnd => "Focus time is over. Time for a break!",
            AlertKind::BreakPhaseEnd => "Break is over. Back to work!",
            other => other.body(),
        }
    }

    /// Build the full alert message for this kind
    pub fn alert(self) -> Alert {
        Alert::from(self)
    }
}

impl fmt::Display for AlertKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully rendered alert, ready for a notification sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub title: String,
    pub body: String,
    pub speech: String,
}

impl From<AlertKind> for Alert {
    fn from(kind: AlertKind) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            body: kind.body().to_string(),
            speech: kind.speech().to_string(),
        }
    }
}
