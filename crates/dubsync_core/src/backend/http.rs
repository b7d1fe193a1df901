//! HTTP implementation of [`SyncBackend`] on top of reqwest.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::BackendSettings;
use crate::models::WireLogEntry;

use super::errors::{BackendError, BackendResult};
use super::wire::{
    AnalyzeRequest, AnalyzeResponse, AudioProbe, ProgressResponse, StartSyncAck, StartSyncRequest,
};
use super::SyncBackend;

const ANALYZE: &str = "/analyze";
const START_SYNC: &str = "/start-sync";
const LOGS: &str = "/logs";
const PROGRESS: &str = "/progress";

/// Client for the engine's HTTP API.
///
/// Only a connect timeout is applied; a request that connected waits for
/// the engine as long as it takes.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(settings: &BackendSettings) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout())
            .build()
            .map_err(|e| BackendError::Setup(e.to_string()))?;

        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &'static str) -> BackendResult<T> {
        let response = self
            .client
            .get(self.url(endpoint))
            .send()
            .await
            .map_err(|e| BackendError::unreachable(endpoint, e.to_string()))?;
        let body = Self::success_body(endpoint, response).await?;
        serde_json::from_str(&body).map_err(|e| BackendError::decode(endpoint, e.to_string()))
    }

    async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &'static str,
        body: &B,
    ) -> BackendResult<String> {
        let response = self
            .client
            .post(self.url(endpoint))
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::unreachable(endpoint, e.to_string()))?;
        Self::success_body(endpoint, response).await
    }

    /// Read the body, turning a non-success status into an error.
    async fn success_body(
        endpoint: &'static str,
        response: reqwest::Response,
    ) -> BackendResult<String> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::unreachable(endpoint, e.to_string()))?;

        if !status.is_success() {
            return Err(BackendError::status(endpoint, status.as_u16(), body.trim()));
        }
        Ok(body)
    }
}

impl SyncBackend for HttpBackend {
    async fn analyze(&self, request: AnalyzeRequest) -> BackendResult<AudioProbe> {
        let body = self.post_json(ANALYZE, &request).await?;
        let response: AnalyzeResponse =
            serde_json::from_str(&body).map_err(|e| BackendError::decode(ANALYZE, e.to_string()))?;

        if let Some(error) = response.error {
            return Err(BackendError::rejected(ANALYZE, error));
        }

        match (response.channels, response.codec, response.duration) {
            (Some(channels), Some(codec), Some(duration)) => Ok(AudioProbe {
                channels: Some(channels),
                codec: Some(codec),
                duration: Some(duration),
            }),
            (channels, codec, duration) => {
                let missing: Vec<&str> = [
                    ("channels", channels.is_none()),
                    ("codec", codec.is_none()),
                    ("duration", duration.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect();
                Err(BackendError::decode(
                    ANALYZE,
                    format!("response is missing {}", missing.join(", ")),
                ))
            }
        }
    }

    async fn start_sync(&self, request: StartSyncRequest) -> BackendResult<StartSyncAck> {
        let body = self.post_json(START_SYNC, &request).await?;
        if body.trim().is_empty() {
            return Ok(StartSyncAck::default());
        }
        // The acknowledgment body is informational only
        Ok(serde_json::from_str(&body).unwrap_or_else(|e| {
            tracing::debug!("Ignoring unreadable start-sync ack: {}", e);
            StartSyncAck::default()
        }))
    }

    async fn logs(&self) -> BackendResult<Vec<WireLogEntry>> {
        self.get_json(LOGS).await
    }

    async fn progress(&self) -> BackendResult<f64> {
        let response: ProgressResponse = self.get_json(PROGRESS).await?;
        Ok(response.progress)
    }

    async fn ping(&self) -> BackendResult<()> {
        // Any answer at all means the engine is up, whatever its status
        let response = self
            .client
            .get(self.url(PROGRESS))
            .send()
            .await
            .map_err(|e| BackendError::unreachable(PROGRESS, e.to_string()))?;
        tracing::trace!("Engine answered probe with {}", response.status());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve a single canned HTTP response and return the base URL.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            // Read headers plus the declared body before answering
            loop {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request);
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|line| {
                            let (name, value) = line.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        format!("http://{}", addr)
    }

    fn backend(base_url: String) -> HttpBackend {
        HttpBackend::new(&BackendSettings {
            base_url,
            ..BackendSettings::default()
        })
        .unwrap()
    }

    fn analyze_request() -> AnalyzeRequest {
        AnalyzeRequest {
            path: "master.wav".into(),
            working_dir: None,
        }
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = backend("http://127.0.0.1:8000/".into());
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.url(PROGRESS), "http://127.0.0.1:8000/progress");
    }

    #[tokio::test]
    async fn progress_is_decoded() {
        let url = serve_once("200 OK", r#"{"progress": 70}"#).await;
        assert_eq!(backend(url).progress().await.unwrap(), 70.0);
    }

    #[tokio::test]
    async fn plain_string_logs_are_decoded() {
        let url = serve_once("200 OK", r#"["Extracting PCM from master.", "Process completed."]"#).await;
        let logs = backend(url).logs().await.unwrap();
        assert_eq!(logs.len(), 2);
        assert!(matches!(&logs[1], WireLogEntry::Plain(m) if m == "Process completed."));
    }

    #[tokio::test]
    async fn analyze_success() {
        let url = serve_once("200 OK", r#"{"duration": 120.5, "channels": 2, "codec": "flac"}"#).await;
        let probe = backend(url).analyze(analyze_request()).await.unwrap();
        assert_eq!(probe.channels, Some(2));
        assert_eq!(probe.codec.as_deref(), Some("flac"));
        assert_eq!(probe.duration, Some(120.5));
    }

    #[tokio::test]
    async fn analyze_error_body_is_rejected() {
        let url = serve_once("200 OK", r#"{"error": "Failed to get audio info"}"#).await;
        let err = backend(url).analyze(analyze_request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Rejected { endpoint: "/analyze", .. }));
    }

    #[tokio::test]
    async fn analyze_incomplete_body_is_decode_error() {
        let url = serve_once("200 OK", "{}").await;
        let err = backend(url).analyze(analyze_request()).await.unwrap_err();
        match err {
            BackendError::Decode { endpoint, message } => {
                assert_eq!(endpoint, "/analyze");
                assert!(message.contains("channels, codec, duration"), "{message}");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let url = serve_once("200 OK", r#"{"channels": 6, "codec": "eac3"}"#).await;
        let err = backend(url).analyze(analyze_request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Decode { .. }));
        assert!(!err.is_transport());
    }

    #[tokio::test]
    async fn analyze_failure_status() {
        let url = serve_once("404 Not Found", r#"{"detail": "Not Found"}"#).await;
        let err = backend(url).analyze(analyze_request()).await.unwrap_err();
        assert!(matches!(err, BackendError::Status { status: 404, .. }));
    }

    #[tokio::test]
    async fn start_sync_ack() {
        let url = serve_once("200 OK", r#"{"status": "already running"}"#).await;
        let request = StartSyncRequest {
            master_name: "m.wav".into(),
            dub_name: "d.wav".into(),
            working_dir: None,
        };
        let ack = backend(url).start_sync(request).await.unwrap();
        assert!(ack.already_running());
    }

    #[tokio::test]
    async fn server_error_still_counts_as_connected() {
        let url = serve_once("500 Internal Server Error", r#"{"detail": "boom"}"#).await;
        assert!(crate::orchestrator::probe(&backend(url)).await);
    }

    #[tokio::test]
    async fn closed_port_is_unreachable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = backend(format!("http://{}", addr)).ping().await.unwrap_err();
        assert!(err.is_transport(), "unexpected error: {err:?}");
    }
}
