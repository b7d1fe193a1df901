//! Main application module for DubSync Panel.
//!
//! The app only holds display state. Everything about the job lives in
//! the orchestration session; the app sends it commands and renders the
//! snapshots it publishes.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use iced::{Element, Subscription, Task, Theme};

use dubsync_core::config::{ConfigManager, Settings};
use dubsync_core::models::Slot;
use dubsync_core::orchestrator::{PanelCommand, PanelState, SessionHandle};

use crate::bridge::{session_subscription, BridgeEvent};
use crate::handlers::PendingStart;
use crate::pages;

/// All possible messages the application can receive.
#[derive(Debug, Clone)]
pub enum Message {
    // Sidebar
    WorkingDirChanged(String),
    BrowseSlot(Slot),
    SlotFileSelected(Slot, Option<PathBuf>),
    StartPressed,
    NewSyncPressed,

    // Main area
    DismissNotice,

    // Session
    Bridge(BridgeEvent),
}

/// Main application state.
pub struct App {
    pub config: Arc<Mutex<ConfigManager>>,
    /// Settings captured at startup.
    pub settings: Settings,
    pub session: Option<SessionHandle>,
    /// Last snapshot published by the session.
    pub state: PanelState,
    /// Working directory as typed, ahead of the session's copy.
    pub working_dir: String,
    /// Why the session is not running, if it failed or stopped.
    pub bridge_status: Option<String>,
    /// Start pressed, outcome not yet seen in a snapshot.
    pub pending_start: Option<PendingStart>,
}

impl App {
    pub fn new(config: Arc<Mutex<ConfigManager>>) -> (Self, Task<Message>) {
        let settings = match config.lock() {
            Ok(cfg) => cfg.settings().clone(),
            Err(_) => {
                tracing::warn!("Config lock poisoned, using default settings");
                Settings::default()
            }
        };
        let working_dir = settings.backend.working_dir.clone();
        let state = PanelState::new(&settings.timeline, working_dir.clone());

        (
            Self {
                config,
                settings,
                session: None,
                state,
                working_dir,
                bridge_status: Some("Starting session...".to_string()),
                pending_start: None,
            },
            Task::none(),
        )
    }

    pub fn title(&self) -> String {
        format!("DubSync Panel v{}", dubsync_core::version())
    }

    pub fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::WorkingDirChanged(dir) => {
                self.handle_working_dir_changed(dir);
                Task::none()
            }
            Message::BrowseSlot(slot) => self.browse_slot(slot),
            Message::SlotFileSelected(slot, path) => {
                self.handle_slot_file_selected(slot, path);
                Task::none()
            }
            Message::StartPressed => {
                self.handle_start_pressed();
                Task::none()
            }
            Message::NewSyncPressed => {
                self.send(PanelCommand::Reset);
                Task::none()
            }
            Message::DismissNotice => {
                self.send(PanelCommand::DismissNotice);
                Task::none()
            }
            Message::Bridge(event) => {
                self.handle_bridge_event(event);
                Task::none()
            }
        }
    }

    pub fn view(&self) -> Element<'_, Message> {
        pages::main_window::view(self)
    }

    pub fn subscription(&self) -> Subscription<Message> {
        session_subscription().map(Message::Bridge)
    }

    pub fn theme(&self) -> Theme {
        Theme::Dark
    }

    fn handle_bridge_event(&mut self, event: BridgeEvent) {
        match event {
            BridgeEvent::Ready(launch) => {
                if launch.send(self.settings.clone()).is_err() {
                    self.bridge_status = Some("Session bridge closed".to_string());
                }
            }
            BridgeEvent::Attached(handle) => {
                tracing::info!("Session attached");
                self.state = handle.snapshot();
                self.session = Some(handle);
                self.bridge_status = None;
            }
            BridgeEvent::State(state) => {
                self.state = *state;
                self.check_pending_start();
            }
            BridgeEvent::Failed(reason) => {
                self.bridge_status = Some(format!("Session failed to start: {}", reason));
            }
            BridgeEvent::Closed => {
                tracing::warn!("Session stopped");
                self.session = None;
                self.bridge_status = Some("Session stopped".to_string());
            }
        }
    }
}
