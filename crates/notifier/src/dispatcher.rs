//! Background alert dispatch

use alerting::Alert;
use std::sync::Arc;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use crate::NotificationSink;

/// Queues alerts for delivery on a background task.
///
/// `dispatch` never blocks; alerts are delivered one at a time so speech
/// does not overlap.
pub struct NotificationDispatcher {
    sender: mpsc::Sender<Alert>,
    worker: JoinHandle<()>,
}

impl NotificationDispatcher {
    /// Start the delivery task. Must be called inside a tokio runtime.
    pub fn spawn(sinks: Vec<Arc<dyn NotificationSink>>, capacity: usize) -> Self {
        info!(
            "Starting notification dispatcher: {} sink(s), queue {}",
            sinks.len(),
            capacity
        );
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run(receiver, sinks));
        Self { sender, worker }
    }

    /// Queue `alert`. Returns false when it had to be dropped.
    pub fn dispatch(&self, alert: Alert) -> bool {
        match self.sender.try_send(alert) {
            Ok(()) => true,
            Err(TrySendError::Full(alert)) => {
                warn!("Notification queue full, dropping {}", alert.kind);
                false
            }
            Err(TrySendError::Closed(alert)) => {
                warn!("Notification worker gone, dropping {}", alert.kind);
                false
            }
        }
    }

    /// Deliver what is queued, then stop the worker
    pub async fn shutdown(self) {
        drop(self.sender);
        if let Err(e) = self.worker.await {
            warn!("Notification worker ended abnormally: {}", e);
        }
    }
}

async fn run(mut receiver: mpsc::Receiver<Alert>, sinks: Vec<Arc<dyn NotificationSink>>) {
    while let Some(alert) = receiver.recv().await {
        debug!("Delivering {}", alert.kind);
        for sink in &sinks {
            let sink = Arc::clone(sink);
            let alert = alert.clone();
            let delivery = tokio::task::spawn_blocking(move || deliver(sink.as_ref(), &alert));
            if let Err(e) = delivery.await {
                warn!("Notification delivery panicked: {}", e);
            }
        }
    }
    debug!("Notification channel closed");
}

fn deliver(sink: &dyn NotificationSink, alert: &Alert) {
    if let Err(e) = sink.notify(&alert.title, &alert.body) {
        warn!("{} toast failed for {}: {}", sink.name(), alert.kind, e);
    }
    if let Err(e) = sink.speak(&alert.speech) {
        warn!("{} speech failed for {}: {}", sink.name(), alert.kind, e);
    }
}
