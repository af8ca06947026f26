//! Focus Tracker Session
//!
//! Wires the frame source, landmark extractor, focus scorer, interval timer
//! and notification dispatcher into one frame loop, and exposes the control
//! surface the presentation shell drives.

mod control;
mod session;
mod settings;

pub use control::{ControlState, SessionControl};
pub use session::{FrameOutput, Session, SessionError, SessionSummary, MAX_FRAME_RATE_HZ};
pub use settings::{CameraSettings, NotificationSettings, Settings, SettingsError};

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Initialize logging
pub fn init_logging(level: &str, json: bool) {
    let level = level.parse::<Level>().unwrap_or_else(|_| {
        eprintln!("Unknown log level {:?}, using info", level);
        Level::INFO
    });

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true);

    let result = if json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    if let Err(e) = result {
        warn!("Tracing subscriber already set: {}", e);
    }
}

/// Serve Prometheus metrics on `addr`. Must be called inside a tokio runtime.
pub fn install_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    info!("Metrics exporter listening on {}", addr);
    Ok(())
}
