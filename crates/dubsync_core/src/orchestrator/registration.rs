//! File registration: confirm a chosen file with the engine.

use crate::backend::{working_dir_override, AnalyzeRequest, SyncBackend};
use crate::models::{AudioDescriptor, ChosenFile, Slot};

use super::errors::PanelError;

/// Ask the engine to probe `file` and build its descriptor.
///
/// Only the file name is sent; the engine resolves it inside
/// `working_dir`, or its own directory when that is blank.
pub async fn register<B: SyncBackend>(
    backend: &B,
    slot: Slot,
    file: &ChosenFile,
    working_dir: &str,
) -> Result<AudioDescriptor, PanelError> {
    let request = AnalyzeRequest {
        path: file.name.clone(),
        working_dir: working_dir_override(working_dir),
    };
    let working_dir = request.working_dir.clone();

    tracing::debug!("Registering {} file '{}'", slot, file.name);

    match backend.analyze(request).await {
        Ok(probe) => {
            let descriptor =
                AudioDescriptor::from_probe(file, probe.channels, probe.codec, probe.duration);
            tracing::info!(
                "Registered {} file '{}' ({}, {})",
                slot,
                descriptor.name,
                descriptor.codec_label(),
                descriptor.channel_label()
            );
            Ok(descriptor)
        }
        Err(e) if e.is_transport() => {
            tracing::warn!("Engine unreachable while registering '{}': {}", file.name, e);
            Err(PanelError::BackendUnreachable {
                operation: "file registration",
                detail: e.detail(),
            })
        }
        Err(e) => {
            tracing::warn!("Engine could not open '{}': {}", file.name, e);
            Err(PanelError::FileNotFoundOnBackend {
                slot,
                file: file.name.clone(),
                working_dir,
                detail: e.detail(),
            })
        }
    }
}
