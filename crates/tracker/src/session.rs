//! Focus tracking session
//!
//! One loop captures, scores and publishes frames strictly in capture order.
//! Alerts are handed to the notification dispatcher and never wait for
//! delivery.

use alerting::AlertKind;
use camera_capture::{CameraError, FrameSource, VideoFrame};
use chrono::{DateTime, Utc};
use focus::{overlay, FocusConfig, FocusError, FocusModule, LandmarkExtractor, OverlayText};
use interval_timer::{IntervalTimer, TimerPhase, TimerReading};
use metrics::{counter, gauge};
use notifier::NotificationDispatcher;
use serde::Serialize;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, error, info, warn};
use uuid::Uuid;
use crate::control::ControlState;

/// Fastest supported frame loop cadence
pub const MAX_FRAME_RATE_HZ: f64 = 1000.0;

/// Fallback cadence for a rate with no usable period
const FALLBACK_FRAME_PERIOD: Duration = Duration::from_secs(1);

/// Session error types
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Frame capture failed: {0}")]
    Capture(#[from] CameraError),

    #[error("Focus analysis failed: {0}")]
    Analysis(#[from] FocusError),
}

/// Everything the shell needs to display one frame
#[derive(Debug, Clone)]
pub struct FrameOutput {
    /// Mirrored frame with the overlay drawn
    pub frame: VideoFrame,
    /// Label text instructions
    pub overlay: Vec<OverlayText>,
    pub face_detected: bool,
    pub score: f32,
    pub timer: TimerReading,
    /// Score under the warning level
    pub low_focus: bool,
    /// Alerts raised on this frame
    pub alerts: Vec<AlertKind>,
}

/// Totals reported when the loop ends
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub frames: u64,
    pub face_absent_frames: u64,
    pub alerts: u64,
    pub final_score: f32,
    pub phase: TimerPhase,
}

/// A focus tracking session over one frame source
pub struct Session<S, E> {
    id: Uuid,
    started_at: DateTime<Utc>,
    source: S,
    extractor: E,
    focus: FocusModule,
    timer: IntervalTimer,
    dispatcher: NotificationDispatcher,
    frame_period: Duration,
    frames: u64,
    face_absent_frames: u64,
    alerts: u64,
    has_started: bool,
}

impl<S, E> Session<S, E>
where
    S: FrameSource,
    E: LandmarkExtractor,
{
    pub fn new(
        source: S,
        extractor: E,
        dispatcher: NotificationDispatcher,
        frame_rate_hz: f64,
    ) -> Self {
        let id = Uuid::new_v4();
        info!(%id, "Creating focus session at {} Hz", frame_rate_hz);
        Self {
            id,
            started_at: Utc::now(),
            source,
            extractor,
            focus: FocusModule::new(FocusConfig::default()),
            timer: IntervalTimer::new(),
            dispatcher,
            frame_period: frame_period(frame_rate_hz),
            frames: 0,
            face_absent_frames: 0,
            alerts: 0,
            has_started: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Run until shutdown, end of stream, a fatal error, or the shell
    /// dropping its output receiver
    pub async fn run(
        mut self,
        control: watch::Receiver<ControlState>,
        output: mpsc::Sender<FrameOutput>,
    ) -> Result<SessionSummary, SessionError> {
        let result = self.drive(control, output).await;
        let summary = self.summary();
        self.dispatcher.shutdown().await;

        match &result {
            Ok(()) => info!(
                id = %summary.id,
                frames = summary.frames,
                score = summary.final_score,
                "Session ended"
            ),
            Err(e) => error!(id = %summary.id, "Session aborted: {}", e),
        }
        result.map(|()| summary)
    }

    async fn drive(
        &mut self,
        mut control: watch::Receiver<ControlState>,
        output: mpsc::Sender<FrameOutput>,
    ) -> Result<(), SessionError> {
        let mut ticker = tokio::time::interval(self.frame_period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut running = false;

        loop {
            let state = *control.borrow_and_update();
            if state.shutdown {
                return Ok(());
            }

            if state.running != running {
                running = state.running;
                let now = Instant::now().into_std();
                if running {
                    self.on_start(now);
                } else {
                    self.on_stop(now);
                }
            }

            if !running {
                if control.changed().await.is_err() {
                    debug!("Control handle dropped while stopped");
                    return Ok(());
                }
                continue;
            }

            tokio::select! {
                _ = ticker.tick() => {
                    let frame = match self.process_frame(&state) {
                        Ok(frame) => frame,
                        Err(SessionError::Capture(CameraError::EndOfStream(frames))) => {
                            info!("Frame source exhausted after {} frames", frames);
                            return Ok(());
                        }
                        Err(e) => return Err(e),
                    };
                    if output.send(frame).await.is_err() {
                        debug!("Frame output receiver dropped");
                        return Ok(());
                    }
                }
                changed = control.changed() => {
                    if changed.is_err() {
                        debug!("Control handle dropped");
                        return Ok(());
                    }
                }
            }
        }
    }

    fn on_start(&mut self, now: std::time::Instant) {
        if self.has_started {
            info!(id = %self.id, "Session restarted, focus score reset");
            self.focus.reset();
        } else {
            info!(id = %self.id, "Session started");
        }
        self.has_started = true;
        self.timer.resume(now);
    }

    fn on_stop(&mut self, now: std::time::Instant) {
        info!(id = %self.id, score = self.focus.score(), "Session stopped");
        self.timer.pause(now);
    }

    /// Capture, score and annotate one frame
    fn process_frame(&mut self, control: &ControlState) -> Result<FrameOutput, SessionError> {
        let frame = self.source.read()?.flip_horizontal();
        let now = Instant::now().into_std();

        let analysis = self.focus.analyze(&frame, &mut self.extractor, now)?;
        let tick = self
            .timer
            .tick(control.focus_minutes, control.break_minutes, now);

        let mut alerts = analysis.alerts.clone();
        alerts.extend(tick.alert);
        for kind in &alerts {
            counter!("focus_alerts_total", "kind" => kind.as_str()).increment(1);
            if !self.dispatcher.dispatch(kind.alert()) {
                warn!("Alert {} not delivered", kind);
            }
        }

        let annotated = overlay::render(&frame, &analysis.annotation)?;

        self.frames += 1;
        if !analysis.face_detected {
            self.face_absent_frames += 1;
        }
        self.alerts += alerts.len() as u64;
        counter!("focus_frames_total").increment(1);
        gauge!("focus_score").set(f64::from(analysis.score));

        Ok(FrameOutput {
            frame: annotated,
            overlay: analysis.annotation.texts(),
            face_detected: analysis.face_detected,
            score: analysis.score,
            timer: tick.reading,
            low_focus: analysis.low_focus,
            alerts,
        })
    }

    fn summary(&self) -> SessionSummary {
        SessionSummary {
            id: self.id,
            started_at: self.started_at,
            ended_at: Utc::now(),
            frames: self.frames,
            face_absent_frames: self.face_absent_frames,
            alerts: self.alerts,
            final_score: self.focus.score(),
            phase: self.timer.phase(),
        }
    }
}

/// Interval between frames, never shorter than one tick at the maximum rate
fn frame_period(frame_rate_hz: f64) -> Duration {
    let min_period = Duration::from_secs_f64(1.0 / MAX_FRAME_RATE_HZ);
    match Duration::try_from_secs_f64(1.0 / frame_rate_hz) {
        Ok(period) if period >= min_period => period,
        Ok(_) => {
            warn!("Frame rate {} Hz capped at {} Hz", frame_rate_hz, MAX_FRAME_RATE_HZ);
            min_period
        }
        Err(_) => {
            warn!(
                "Frame rate {} Hz unusable, falling back to {:?} per frame",
                frame_rate_hz, FALLBACK_FRAME_PERIOD
            );
            FALLBACK_FRAME_PERIOD
        }
    }
}
