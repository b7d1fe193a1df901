//! File browsing handlers.

use std::path::PathBuf;

use iced::Task;

use dubsync_core::models::{ChosenFile, Slot, ACCEPTED_EXTENSIONS};
use dubsync_core::orchestrator::PanelCommand;

use crate::app::{App, Message};

impl App {
    /// Browse for the master or dub file.
    pub fn browse_slot(&self, slot: Slot) -> Task<Message> {
        let title = match slot {
            Slot::Master => "Select Master Audio (EN-US)",
            Slot::Dub => "Select Dub Audio (PT-BR)",
        };

        Task::perform(
            async move {
                let path = rfd::AsyncFileDialog::new()
                    .set_title(title)
                    .add_filter("Audio Files", ACCEPTED_EXTENSIONS)
                    .pick_file()
                    .await
                    .map(|f| f.path().to_path_buf());
                (slot, path)
            },
            |(slot, path)| Message::SlotFileSelected(slot, path),
        )
    }

    /// Handle a file picked for a slot.
    ///
    /// Only the name and size are kept; the engine resolves the name in
    /// its own working directory.
    pub fn handle_slot_file_selected(&mut self, slot: Slot, path: Option<PathBuf>) {
        let Some(path) = path else {
            return;
        };

        let size_bytes = match std::fs::metadata(&path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::debug!("Could not stat {}: {}", path.display(), e);
                0
            }
        };

        match ChosenFile::from_path(&path, size_bytes) {
            Some(file) => {
                tracing::info!("Selected {} file: {}", slot, path.display());
                self.send(PanelCommand::RegisterFile { slot, file });
            }
            None => {
                tracing::warn!("Ignoring path without a usable file name: {}", path.display());
            }
        }
    }
}
