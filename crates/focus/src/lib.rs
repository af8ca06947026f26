//! Focus Scoring
//!
//! Real-time attentiveness estimation from face landmarks:
//! - Eye aspect ratio (drowsiness)
//! - Nose-tip head pose proxy (distraction, phone-down gaze)
//! - Mouth aperture (yawning)
//! - Face presence
//!
//! Every frame adjusts a bounded focus score and may fire debounced alerts.

pub mod analysis;
pub mod config;
pub mod extractor;
pub mod geometry;
pub mod landmarks;
pub mod overlay;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use analysis::{FaceMetrics, FocusAnalysis, FocusTag, FrameAnnotation, OverlayText};
pub use config::FocusConfig;
pub use extractor::{LandmarkExtractor, NoFaceExtractor, ReplayExtractor};
pub use landmarks::{LandmarkSet, Point};
pub use state::{FocusScore, FocusState};

use alerting::AlertKind;
use camera_capture::VideoFrame;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, warn};

/// Focus error types
#[derive(Error, Debug)]
pub enum FocusError {
    #[error("Landmark set has {found} points, at least {required} required")]
    InsufficientLandmarks { required: usize, found: usize },

    #[error("Invalid landmark trace at line {line}: {reason}")]
    Trace { line: usize, reason: String },

    #[error("Landmark trace unreadable: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing failed: {0}")]
    ImageProcessing(String),
}

/// Focus scoring module
pub struct FocusModule {
    config: FocusConfig,
    state: FocusState,
}

impl FocusModule {
    /// Create a new module with a full score
    pub fn new(config: FocusConfig) -> Self {
        Self {
            state: FocusState::new(&config),
            config,
        }
    }

    /// Extract landmarks from `frame` and score them
    pub fn analyze<E>(
        &mut self,
        frame: &VideoFrame,
        extractor: &mut E,
        now: Instant,
    ) -> Result<FocusAnalysis, FocusError>
    where
        E: LandmarkExtractor + ?Sized,
    {
        let landmarks = extractor.extract(frame)?;
        Ok(self.update(landmarks.as_ref(), now))
    }

    /// Score one frame's worth of landmarks
    pub fn update(&mut self, landmarks: Option<&LandmarkSet>, now: Instant) -> FocusAnalysis {
        let Some(landmarks) = landmarks else {
            return self.update_without_face(now);
        };

        self.state.no_face.evaluate(false, now);

        let metrics = FaceMetrics::measure(landmarks);
        let mut annotation = FrameAnnotation {
            tags: Vec::new(),
            landmarks: landmarks.points().to_vec(),
        };
        let mut alerts = self.update_state(&metrics, &mut annotation, now);

        let score = self.state.score.value();
        let low_focus = score < self.config.low_focus_score;
        if self.state.low_focus.evaluate(low_focus, now) {
            warn!("Focus score {:.1} below {}", score, self.config.low_focus_score);
            alerts.push(AlertKind::LowFocus);
        }

        debug!(
            score,
            avg_ear = metrics.avg_ear,
            nose_x = metrics.nose.x,
            nose_y = metrics.nose.y,
            mouth = metrics.mouth_aperture,
            tags = ?annotation.tags,
            "Frame scored"
        );

        FocusAnalysis {
            face_detected: true,
            metrics: Some(metrics),
            score,
            annotation,
            alerts,
            low_focus,
        }
    }

    fn update_without_face(&mut self, now: Instant) -> FocusAnalysis {
        let mut alerts = Vec::new();
        if self.state.no_face.evaluate(true, now) {
            warn!("No face detected for {}s", self.config.no_face_alert_secs);
            alerts.push(AlertKind::NoFace);
        }

        let score = self.state.score.apply(-self.config.no_face_penalty);
        debug!(score, "Frame scored without face");

        FocusAnalysis {
            face_detected: false,
            score,
            alerts,
            low_focus: score < self.config.low_focus_score,
            ..Default::default()
        }
    }

    fn update_state(
        &mut self,
        metrics: &FaceMetrics,
        annotation: &mut FrameAnnotation,
        now: Instant,
    ) -> Vec<AlertKind> {
        let config = &self.config;
        let score = &mut self.state.score;
        let mut alerts = Vec::new();

        // Drowsiness (eyes closing)
        if metrics.avg_ear < config.drowsy_ear {
            score.apply(-config.drowsy_penalty);
            annotation.push(FocusTag::Drowsy);
        }

        // Distraction (head turned away)
        let facing = config.is_facing(metrics.nose.x);
        if !facing {
            score.apply(-config.distraction_penalty);
            annotation.push(FocusTag::Distracted);
        }

        // Yawning (mouth open)
        if metrics.mouth_aperture > config.yawn_aperture {
            score.apply(-config.yawn_penalty);
            annotation.push(FocusTag::Yawning);
        }

        // Phone use (head tilted down, sustained)
        let head_down = metrics.nose.y > config.phone_down_y;
        if self.state.phone_down.evaluate(head_down, now) {
            warn!(
                "Head down for {}s, likely phone use",
                config.phone_down_alert_secs
            );
            alerts.push(AlertKind::PhoneDown);
        }

        // Recovery
        if metrics.avg_ear > config.attentive_ear && facing {
            score.apply(config.recovery_bonus);
            annotation.push(FocusTag::Focusing);
        }

        alerts
    }

    /// Current score
    pub fn score(&self) -> f32 {
        self.state.score.value()
    }

    pub fn state(&self) -> &FocusState {
        &self.state
    }

    pub fn config(&self) -> &FocusConfig {
        &self.config
    }

    /// Reset score and alert gates (session restart)
    pub fn reset(&mut self) {
        self.state.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alerting::GateState;
    use proptest::prelude::*;
    use std::time::Duration;
    use crate::testing::FaceGeometry;

    /// ~12 Hz frame timestamps
    fn frame_time(t0: Instant, frame: u64) -> Instant {
        t0 + Duration::from_millis(frame * 1000 / 12)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn module_at(score: f32) -> FocusModule {
        let mut module = FocusModule::new(FocusConfig::default());
        module.state.score = FocusScore::new(score);
        module
    }

    #[test]
    fn test_drowsy_frame_costs_exactly_drowsy_penalty() {
        let mut module = module_at(50.0);
        let face = FaceGeometry::default().with_ear(0.20).build();

        let analysis = module.update(Some(&face), Instant::now());

        assert!(approx(analysis.score, 49.9), "score = {}", analysis.score);
        assert_eq!(analysis.annotation.tags, vec![FocusTag::Drowsy]);
    }

    #[test]
    fn test_focusing_frames_stay_capped_at_max() {
        let mut module = FocusModule::new(FocusConfig::default());
        let face = FaceGeometry::default().with_ear(0.35).with_nose(0.5, 0.5).build();
        let t0 = Instant::now();

        for frame in 0..10 {
            let analysis = module.update(Some(&face), frame_time(t0, frame));
            assert_eq!(analysis.score, 100.0);
            assert!(analysis.annotation.has(FocusTag::Focusing));
        }
    }

    #[test]
    fn test_rules_accumulate_within_a_frame() {
        let mut module = module_at(50.0);
        let face = FaceGeometry::default()
            .with_ear(0.2)
            .with_nose(0.8, 0.5)
            .with_mouth(0.08)
            .build();

        let analysis = module.update(Some(&face), Instant::now());

        assert!(approx(analysis.score, 49.6), "score = {}", analysis.score);
        assert_eq!(
            analysis.annotation.tags,
            vec![FocusTag::Drowsy, FocusTag::Distracted, FocusTag::Yawning]
        );
    }

    #[test]
    fn test_recovery_combines_with_penalty() {
        // Yawning while otherwise attentive: -0.1 then +0.5
        let mut module = module_at(50.0);
        let face = FaceGeometry::default().with_mouth(0.08).build();

        let analysis = module.update(Some(&face), Instant::now());

        assert!(approx(analysis.score, 50.4), "score = {}", analysis.score);
        assert!(analysis.annotation.has(FocusTag::Yawning));
        assert!(analysis.annotation.has(FocusTag::Focusing));
    }

    #[test]
    fn test_no_face_decays_slowly() {
        let mut module = module_at(50.0);
        let analysis = module.update(None, Instant::now());
        assert!(!analysis.face_detected);
        assert!(analysis.metrics.is_none());
        assert!(approx(analysis.score, 49.99));
    }

    #[test]
    fn test_no_face_for_300s_fires_once() {
        let mut module = FocusModule::new(FocusConfig::default());
        let t0 = Instant::now();
        let mut fired = Vec::new();

        // 300s at 12 Hz, then ten more seconds
        for frame in 0..=(310 * 12) {
            let analysis = module.update(None, frame_time(t0, frame));
            if analysis.alerts.contains(&AlertKind::NoFace) {
                fired.push(frame);
            }
        }

        assert_eq!(fired, vec![300 * 12]);
    }

    #[test]
    fn test_face_returning_at_299s_prevents_alert() {
        let mut module = FocusModule::new(FocusConfig::default());
        let face = FaceGeometry::default().build();
        let t0 = Instant::now();

        for frame in 0..(299 * 12) {
            let analysis = module.update(None, frame_time(t0, frame));
            assert!(!analysis.has_alerts());
        }
        module.update(Some(&face), frame_time(t0, 299 * 12));
        assert_eq!(module.state().no_face.state(), GateState::Idle);

        // Absence starts over
        let analysis = module.update(None, frame_time(t0, 300 * 12));
        assert!(!analysis.has_alerts());
    }

    #[test]
    fn test_phone_down_fires_at_300s_and_rearms() {
        let mut module = FocusModule::new(FocusConfig::default());
        let down = FaceGeometry::default().with_nose(0.5, 0.7).build();
        let up = FaceGeometry::default().with_nose(0.5, 0.5).build();
        let t0 = Instant::now();
        let at = |s: u64| t0 + Duration::from_secs(s);

        let mut fired = Vec::new();
        for s in 0..=305 {
            if module.update(Some(&down), at(s)).alerts.contains(&AlertKind::PhoneDown) {
                fired.push(s);
            }
        }
        assert_eq!(fired, vec![300]);

        module.update(Some(&up), at(306));
        assert_eq!(module.state().phone_down.state(), GateState::Idle);

        fired.clear();
        for s in 307..=607 {
            if module.update(Some(&down), at(s)).alerts.contains(&AlertKind::PhoneDown) {
                fired.push(s);
            }
        }
        assert_eq!(fired, vec![607]);
    }

    #[test]
    fn test_low_focus_alert_is_debounced() {
        let mut module = module_at(20.5);
        let distracted = FaceGeometry::default().with_ear(0.2).with_nose(0.9, 0.5).build();
        let t0 = Instant::now();

        let mut fired = 0;
        let mut flagged = 0;
        for frame in 0..50 {
            let analysis = module.update(Some(&distracted), frame_time(t0, frame));
            fired += analysis.alerts.iter().filter(|a| **a == AlertKind::LowFocus).count();
            if analysis.low_focus {
                flagged += 1;
            }
        }

        assert_eq!(fired, 1);
        assert!(flagged >= 48);
    }

    #[test]
    fn test_reset_restores_full_score() {
        let mut module = module_at(10.0);
        module.update(None, Instant::now());
        module.reset();
        assert_eq!(module.score(), 100.0);
        assert_eq!(module.state().no_face.state(), GateState::Idle);
    }

    #[test]
    fn test_analyze_uses_extractor() {
        let mut module = module_at(50.0);
        let frame = VideoFrame::blank(4, 4, 0, 0);
        let analysis = module
            .analyze(&frame, &mut NoFaceExtractor, Instant::now())
            .unwrap();
        assert!(!analysis.face_detected);
    }

    fn arb_frame() -> impl Strategy<Value = Option<FaceGeometry>> {
        prop::option::weighted(
            0.8,
            (0.0f32..0.5, 0.0f32..1.0, 0.0f32..1.0, 0.0f32..0.2).prop_map(
                |(ear, x, y, mouth)| {
                    FaceGeometry::default().with_ear(ear).with_nose(x, y).with_mouth(mouth)
                },
            ),
        )
    }

    proptest! {
        #[test]
        fn score_stays_in_bounds(
            start in 0.0f32..=100.0,
            frames in prop::collection::vec(arb_frame(), 1..300),
        ) {
            let mut module = module_at(start);
            let t0 = Instant::now();

            for (i, frame) in frames.iter().enumerate() {
                let face = frame.as_ref().map(FaceGeometry::build);
                let analysis = module.update(face.as_ref(), frame_time(t0, i as u64));
                prop_assert!((0.0..=100.0).contains(&analysis.score));
            }
        }
    }
}
