//! One tick of the log/progress poller and of the connectivity monitor.

use crate::backend::SyncBackend;
use crate::models::WireLogEntry;

/// What one poll tick managed to fetch. Either half may be missing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PollResult {
    pub logs: Option<Vec<WireLogEntry>>,
    pub progress: Option<f64>,
}

/// Fetch the log snapshot, then the progress.
///
/// Failures are logged and dropped; the half that succeeded is returned.
pub async fn poll_once<B: SyncBackend>(backend: &B) -> PollResult {
    let logs = match backend.logs().await {
        Ok(logs) => Some(logs),
        Err(e) => {
            tracing::debug!("Log poll failed: {}", e);
            None
        }
    };

    let progress = match backend.progress().await {
        Ok(value) if value.is_finite() => Some(value),
        Ok(value) => {
            tracing::debug!("Ignoring non-finite progress {}", value);
            None
        }
        Err(e) => {
            tracing::debug!("Progress poll failed: {}", e);
            None
        }
    };

    PollResult { logs, progress }
}

/// Whether the engine answers at all.
pub async fn probe<B: SyncBackend>(backend: &B) -> bool {
    match backend.ping().await {
        Ok(()) => true,
        Err(e) => {
            tracing::trace!("Connectivity probe failed: {}", e);
            false
        }
    }
}
