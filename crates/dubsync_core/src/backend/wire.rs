//! Request and response bodies of the engine's HTTP API.

use serde::{Deserialize, Serialize};

/// `POST /analyze` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzeRequest {
    /// File name, resolved by the engine inside `working_dir`.
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

/// `POST /analyze` response. The engine reports lookup failures in
/// `error` with a success status.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub channels: Option<u32>,
    #[serde(default)]
    pub codec: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub error: Option<String>,
}

/// What the engine learned about a file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AudioProbe {
    pub channels: Option<u32>,
    pub codec: Option<String>,
    pub duration: Option<f64>,
}

/// `POST /start-sync` body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StartSyncRequest {
    pub master_name: String,
    pub dub_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,
}

/// `POST /start-sync` acknowledgment.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct StartSyncAck {
    #[serde(default)]
    pub status: Option<String>,
}

impl StartSyncAck {
    /// The engine was already running a job and ignored this request.
    pub fn already_running(&self) -> bool {
        self.status.as_deref() == Some("already running")
    }
}

/// `GET /progress` response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgressResponse {
    pub progress: f64,
}

/// Treat a blank working directory as unset.
pub fn working_dir_override(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
