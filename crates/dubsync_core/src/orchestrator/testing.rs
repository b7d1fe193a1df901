//! Scripted in-memory engine for orchestrator tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::backend::{
    AnalyzeRequest, AudioProbe, BackendError, BackendResult, StartSyncAck, StartSyncRequest,
    SyncBackend,
};
use crate::models::WireLogEntry;

#[derive(Default)]
struct Script {
    files: HashMap<String, BackendResult<AudioProbe>>,
    start_results: VecDeque<BackendResult<StartSyncAck>>,
    progress: VecDeque<BackendResult<f64>>,
    last_progress: Option<f64>,
    logs: Vec<String>,
    logs_fail: bool,
    reachable: bool,

    analyze_calls: Vec<AnalyzeRequest>,
    start_calls: Vec<StartSyncRequest>,
    progress_calls: usize,
    log_calls: usize,
    ping_calls: usize,
}

#[derive(Clone, Default)]
pub struct MockBackend {
    script: Arc<Mutex<Script>>,
}

impl MockBackend {
    /// Reachable engine that knows no files.
    pub fn new() -> Self {
        let mock = Self::default();
        mock.script.lock().reachable = true;
        mock
    }

    pub fn with_file(self, name: &str, channels: u32, codec: &str, duration: f64) -> Self {
        self.script.lock().files.insert(
            name.to_string(),
            Ok(AudioProbe {
                channels: Some(channels),
                codec: Some(codec.to_string()),
                duration: Some(duration),
            }),
        );
        self
    }

    pub fn with_analyze_error(self, name: &str, error: BackendError) -> Self {
        self.script.lock().files.insert(name.to_string(), Err(error));
        self
    }

    pub fn push_start_result(&self, result: BackendResult<StartSyncAck>) {
        self.script.lock().start_results.push_back(result);
    }

    /// Queue progress answers; the last one repeats once the queue drains.
    pub fn push_progress(&self, values: &[f64]) {
        let mut script = self.script.lock();
        script.progress.extend(values.iter().copied().map(Ok));
    }

    pub fn push_progress_error(&self, error: BackendError) {
        self.script.lock().progress.push_back(Err(error));
    }

    pub fn set_logs(&self, lines: &[&str]) {
        self.script.lock().logs = lines.iter().map(|l| l.to_string()).collect();
    }

    pub fn set_logs_failing(&self, failing: bool) {
        self.script.lock().logs_fail = failing;
    }

    pub fn set_reachable(&self, reachable: bool) {
        self.script.lock().reachable = reachable;
    }

    pub fn analyze_calls(&self) -> Vec<AnalyzeRequest> {
        self.script.lock().analyze_calls.clone()
    }

    pub fn start_calls(&self) -> Vec<StartSyncRequest> {
        self.script.lock().start_calls.clone()
    }

    pub fn progress_calls(&self) -> usize {
        self.script.lock().progress_calls
    }

    pub fn log_calls(&self) -> usize {
        self.script.lock().log_calls
    }

    pub fn ping_calls(&self) -> usize {
        self.script.lock().ping_calls
    }
}

impl SyncBackend for MockBackend {
    async fn analyze(&self, request: AnalyzeRequest) -> BackendResult<AudioProbe> {
        let mut script = self.script.lock();
        script.analyze_calls.push(request.clone());
        script
            .files
            .get(&request.path)
            .cloned()
            .unwrap_or_else(|| Err(BackendError::status("/analyze", 404, "Not Found")))
    }

    async fn start_sync(&self, request: StartSyncRequest) -> BackendResult<StartSyncAck> {
        let mut script = self.script.lock();
        script.start_calls.push(request);
        script.start_results.pop_front().unwrap_or_else(|| {
            Ok(StartSyncAck {
                status: Some("started".into()),
            })
        })
    }

    async fn logs(&self) -> BackendResult<Vec<WireLogEntry>> {
        let mut script = self.script.lock();
        script.log_calls += 1;
        if script.logs_fail {
            return Err(BackendError::unreachable("/logs", "connection reset"));
        }
        Ok(script.logs.iter().cloned().map(WireLogEntry::Plain).collect())
    }

    async fn progress(&self) -> BackendResult<f64> {
        let mut script = self.script.lock();
        script.progress_calls += 1;
        match script.progress.pop_front() {
            Some(Ok(value)) => {
                script.last_progress = Some(value);
                Ok(value)
            }
            Some(Err(e)) => Err(e),
            None => Ok(script.last_progress.unwrap_or(0.0)),
        }
    }

    async fn ping(&self) -> BackendResult<()> {
        let mut script = self.script.lock();
        script.ping_calls += 1;
        if script.reachable {
            Ok(())
        } else {
            Err(BackendError::unreachable("/progress", "connection refused"))
        }
    }
}
