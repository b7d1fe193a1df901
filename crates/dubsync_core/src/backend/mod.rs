//! Client side of the sync engine's HTTP API.
//!
//! The engine is an external process. Everything the panel needs from it
//! goes through [`SyncBackend`]:
//!
//! | Operation    | Endpoint            |
//! |--------------|---------------------|
//! | `analyze`    | `POST /analyze`     |
//! | `start_sync` | `POST /start-sync`  |
//! | `logs`       | `GET /logs`         |
//! | `progress`   | `GET /progress`     |
//!
//! `GET /progress` doubles as the liveness probe: any HTTP answer counts
//! as reachable, only a failed request does not.

mod errors;
mod http;
mod wire;

use std::future::Future;

pub use errors::{BackendError, BackendResult};
pub use http::HttpBackend;
pub use wire::{
    working_dir_override, AnalyzeRequest, AnalyzeResponse, AudioProbe, ProgressResponse,
    StartSyncAck, StartSyncRequest,
};

use crate::models::WireLogEntry;

/// Operations the panel performs against the sync engine.
///
/// Implementations are cheap to clone; every periodic task and one-shot
/// request holds its own copy.
pub trait SyncBackend: Clone + Send + Sync + 'static {
    /// Ask the engine to probe a file in its working directory.
    ///
    /// A success carries channel count, codec and duration; an answer
    /// missing any of them is an error.
    fn analyze(
        &self,
        request: AnalyzeRequest,
    ) -> impl Future<Output = BackendResult<AudioProbe>> + Send;

    /// Start the sync job.
    fn start_sync(
        &self,
        request: StartSyncRequest,
    ) -> impl Future<Output = BackendResult<StartSyncAck>> + Send;

    /// Full snapshot of the job log.
    fn logs(&self) -> impl Future<Output = BackendResult<Vec<WireLogEntry>>> + Send;

    /// Current job progress, 0 to 100.
    fn progress(&self) -> impl Future<Output = BackendResult<f64>> + Send;

    /// Liveness check, independent of any job. Fails only on transport errors.
    fn ping(&self) -> impl Future<Output = BackendResult<()>> + Send;
}
