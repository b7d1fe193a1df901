//! User-facing notices raised by the orchestrator.

use thiserror::Error;

use crate::models::Slot;

/// Why a job start was refused before any request was sent.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRejection {
    #[error("no {0} file is registered")]
    MissingDescriptor(Slot),

    #[error("the sync engine is not connected")]
    BackendDisconnected,
}

/// A notice shown to the user. None of these are fatal.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PanelError {
    /// The engine could not open the chosen file.
    #[error(
        "The engine could not find \"{file}\" in {}: {detail}",
        .working_dir.as_deref().unwrap_or("its working directory")
    )]
    FileNotFoundOnBackend {
        slot: Slot,
        file: String,
        working_dir: Option<String>,
        detail: String,
    },

    /// A user-triggered request could not reach the engine.
    #[error("Could not reach the sync engine during {operation}: {detail}")]
    BackendUnreachable {
        operation: &'static str,
        detail: String,
    },

    #[error("Cannot start sync: {0}")]
    JobStartRejected(StartRejection),

    /// The start request failed; the job went back to idle.
    #[error("Failed to start sync: {detail}")]
    StartSyncTransportFailure { detail: String },
}

impl PanelError {
    /// Short heading for the notice banner.
    pub fn title(&self) -> &'static str {
        match self {
            PanelError::FileNotFoundOnBackend { .. } => "File not found",
            PanelError::BackendUnreachable { .. } => "Engine unreachable",
            PanelError::JobStartRejected(_) => "Cannot start",
            PanelError::StartSyncTransportFailure { .. } => "Start failed",
        }
    }
}
