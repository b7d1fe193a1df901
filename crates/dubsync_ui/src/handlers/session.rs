//! Handlers that forward user intent to the orchestration session.

use dubsync_core::config::ConfigSection;
use dubsync_core::orchestrator::{PanelCommand, PanelError, PanelState};

use crate::app::App;

/// State of the panel when start was pressed.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingStart {
    pub generation: u64,
    pub notice: Option<PanelError>,
}

/// What a snapshot says about a pending start request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new job was started.
    Started,
    /// The session refused the start.
    Rejected,
    /// Not decided yet.
    Pending,
}

pub fn start_outcome(pending: &PendingStart, state: &PanelState) -> StartOutcome {
    if state.generation > pending.generation {
        StartOutcome::Started
    } else if matches!(state.notice, Some(PanelError::JobStartRejected(_)))
        && state.notice != pending.notice
    {
        StartOutcome::Rejected
    } else {
        StartOutcome::Pending
    }
}

impl App {
    /// Send a command to the session, if one is running.
    pub fn send(&mut self, command: PanelCommand) {
        let delivered = match &self.session {
            Some(session) => session.send(command),
            None => {
                tracing::debug!("No session yet, dropping {:?}", command);
                return;
            }
        };

        if !delivered {
            tracing::warn!("Session is gone, command dropped");
            self.session = None;
            self.bridge_status = Some("Session stopped".to_string());
        }
    }

    /// Handle working directory edits.
    pub fn handle_working_dir_changed(&mut self, dir: String) {
        self.working_dir = dir.clone();
        self.send(PanelCommand::SetWorkingDir(dir));
    }

    /// Ask for a new sync job.
    ///
    /// The working directory is saved once a snapshot shows the job was
    /// actually started.
    pub fn handle_start_pressed(&mut self) {
        self.pending_start = Some(PendingStart {
            generation: self.state.generation,
            notice: self.state.notice.clone(),
        });
        self.send(PanelCommand::StartSync);
    }

    /// Resolve a pending start against the latest snapshot.
    pub fn check_pending_start(&mut self) {
        let Some(pending) = &self.pending_start else {
            return;
        };

        match start_outcome(pending, &self.state) {
            StartOutcome::Started => {
                self.pending_start = None;
                self.persist_working_dir();
            }
            StartOutcome::Rejected => {
                tracing::debug!("Start rejected, working directory not saved");
                self.pending_start = None;
            }
            StartOutcome::Pending => {}
        }
    }

    fn persist_working_dir(&mut self) {
        let working_dir = self.state.working_dir.clone();
        let Ok(mut cfg) = self.config.lock() else {
            tracing::warn!("Config lock poisoned, working directory not saved");
            return;
        };

        if cfg.settings().backend.working_dir == working_dir {
            return;
        }

        cfg.settings_mut().backend.working_dir = working_dir;
        if let Err(e) = cfg.update_section(ConfigSection::Backend) {
            tracing::warn!("Failed to save working directory: {}", e);
        }
    }
}
