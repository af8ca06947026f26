//! Focus Tracker - Main Entry Point
//!
//! Usage: `focus-tracker [settings-file]`

use anyhow::Context;
use camera_capture::TestPatternSource;
use focus::{LandmarkExtractor, NoFaceExtractor, ReplayExtractor};
use notifier::NotificationDispatcher;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracker::{init_logging, install_metrics, FrameOutput, Session, SessionControl, Settings};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings_path = std::env::args().nth(1).map(PathBuf::from);
    let settings = Settings::load(settings_path.as_deref()).context("loading settings")?;
    init_logging(&settings.log_level, settings.log_json);

    info!("=== Focus Tracker v{} ===", env!("CARGO_PKG_VERSION"));

    if let Some(addr) = settings.metrics_addr {
        install_metrics(addr).context("starting metrics exporter")?;
    }

    let extractor: Box<dyn LandmarkExtractor> = match &settings.landmark_trace {
        Some(path) => Box::new(
            ReplayExtractor::from_path(path)
                .with_context(|| format!("loading landmark trace {}", path.display()))?,
        ),
        None => {
            warn!("No landmark trace configured; every frame will read as no face");
            Box::new(NoFaceExtractor)
        }
    };

    let source = TestPatternSource::new(settings.camera_config());
    let dispatcher =
        NotificationDispatcher::spawn(settings.sinks(), settings.notifications.queue_capacity);
    let (control, control_rx) =
        SessionControl::new(settings.focus_minutes, settings.break_minutes)?;
    let (frame_tx, frame_rx) = mpsc::channel(16);

    let session = Session::new(source, extractor, dispatcher, settings.frame_rate_hz);
    let mut session_task = tokio::spawn(session.run(control_rx, frame_tx));
    let shell_task = tokio::spawn(display(frame_rx, settings.frame_rate_hz.round().max(1.0) as u64));

    control.start();

    let result = tokio::select! {
        result = &mut session_task => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Interrupted, shutting down");
            control.shutdown();
            session_task.await
        }
    };
    shell_task.await.context("display task")?;

    match result.context("session task")? {
        Ok(summary) => {
            println!("{}", serde_json::to_string_pretty(&summary)?);
            Ok(())
        }
        Err(e) => {
            error!("Session failed: {}", e);
            Err(e.into())
        }
    }
}

/// Stand-in presentation shell: logs the dashboard once per second
async fn display(mut frames: mpsc::Receiver<FrameOutput>, every: u64) {
    let mut count = 0u64;
    while let Some(output) = frames.recv().await {
        for alert in &output.alerts {
            warn!("ALERT {}: {}", alert.title(), alert.body());
        }
        if output.low_focus && count % every == 0 {
            warn!("Focus score {:.1} is low", output.score);
        }
        if count % every == 0 {
            info!(
                score = f64::from(output.score),
                status = %output.timer.phase,
                focus = %output.timer.focus_display,
                break_ = %output.timer.break_display,
                face = output.face_detected,
                labels = ?output.overlay.iter().map(|t| t.text.as_str()).collect::<Vec<_>>(),
                "Dashboard"
            );
        }
        count += 1;
    }
}
