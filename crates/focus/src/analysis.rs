//! Focus analysis results and frame annotations

use alerting::AlertKind;
use serde::{Deserialize, Serialize};
use crate::geometry::{eye_aspect_ratio, mouth_aperture};
use crate::landmarks::{LandmarkSet, Point, LEFT_EYE, MOUTH_BOTTOM, MOUTH_TOP, RIGHT_EYE};

/// Frame-local labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FocusTag {
    /// Eyes closed or nearly closed
    Drowsy,

    /// Head turned away from the screen
    Distracted,

    /// Mouth wide open
    Yawning,

    /// Eyes open and facing the screen
    Focusing,
}

impl FocusTag {
    pub fn label(&self) -> &'static str {
        match self {
            FocusTag::Drowsy => "DROWSINESS DETECTED",
            FocusTag::Distracted => "DISTRACTED",
            FocusTag::Yawning => "YAWNING DETECTED",
            FocusTag::Focusing => "FOCUSING",
        }
    }

    /// Text baseline position in pixels
    pub fn anchor(&self) -> (i32, i32) {
        match self {
            FocusTag::Drowsy => (10, 30),
            FocusTag::Distracted => (10, 60),
            FocusTag::Yawning => (10, 90),
            FocusTag::Focusing => (10, 120),
        }
    }

    /// RGB colour
    pub fn color(&self) -> [u8; 3] {
        match self {
            FocusTag::Drowsy => [255, 0, 0],
            FocusTag::Distracted => [0, 0, 255],
            FocusTag::Yawning => [255, 255, 0],
            FocusTag::Focusing => [0, 255, 0],
        }
    }
}

/// One text drawing instruction for the presentation shell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayText {
    pub text: String,
    pub position: (i32, i32),
    pub color: [u8; 3],
}

impl From<FocusTag> for OverlayText {
    fn from(tag: FocusTag) -> Self {
        Self {
            text: tag.label().to_string(),
            position: tag.anchor(),
            color: tag.color(),
        }
    }
}

/// Everything drawn on top of one frame
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FrameAnnotation {
    /// Labels raised this frame, in rule order
    pub tags: Vec<FocusTag>,

    /// Landmark points of the tracked face
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub landmarks: Vec<Point>,
}

impl FrameAnnotation {
    pub fn push(&mut self, tag: FocusTag) {
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    pub fn has(&self, tag: FocusTag) -> bool {
        self.tags.contains(&tag)
    }

    /// Text instructions for every tag
    pub fn texts(&self) -> Vec<OverlayText> {
        self.tags.iter().copied().map(OverlayText::from).collect()
    }
}

/// Geometry measured on the tracked face
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceMetrics {
    pub left_ear: f32,
    pub right_ear: f32,
    pub avg_ear: f32,
    pub nose: Point,
    pub mouth_aperture: f32,
}

impl FaceMetrics {
    pub fn measure(landmarks: &LandmarkSet) -> Self {
        let left_ear = eye_aspect_ratio(landmarks, &LEFT_EYE);
        let right_ear = eye_aspect_ratio(landmarks, &RIGHT_EYE);
        Self {
            left_ear,
            right_ear,
            avg_ear: (left_ear + right_ear) / 2.0,
            nose: landmarks.nose_tip(),
            mouth_aperture: mouth_aperture(landmarks, MOUTH_TOP, MOUTH_BOTTOM),
        }
    }
}

/// Complete per-frame focus result
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FocusAnalysis {
    /// Whether a face was detected
    pub face_detected: bool,

    /// Face geometry (if detected)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<FaceMetrics>,

    /// Score after this frame
    pub score: f32,

    /// Labels and landmarks to draw
    pub annotation: FrameAnnotation,

    /// Alerts that fired on this frame
    pub alerts: Vec<AlertKind>,

    /// Score is under the warning level
    pub low_focus: bool,
}

impl FocusAnalysis {
    /// Check if any alerts fired
    pub fn has_alerts(&self) -> bool {
        !self.alerts.is_empty()
    }
}
