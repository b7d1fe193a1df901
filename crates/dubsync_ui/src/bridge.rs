//! Bridge between the iced runtime and the orchestration session.
//!
//! The subscription first hands the app a launch channel. Once the app
//! sends its settings, the bridge spawns the session, hands back its
//! handle, and forwards every published state snapshot.

use futures_util::SinkExt;
use iced::futures::channel::mpsc as iced_mpsc;
use iced::futures::Stream;
use iced::Subscription;
use tokio::sync::mpsc;

use dubsync_core::backend::HttpBackend;
use dubsync_core::config::Settings;
use dubsync_core::orchestrator::{PanelState, Session, SessionHandle};

/// Sender the app uses to launch the session.
pub type LaunchSender = mpsc::UnboundedSender<Settings>;

/// What the bridge reports to the app.
#[derive(Debug, Clone)]
pub enum BridgeEvent {
    /// The bridge is waiting for settings.
    Ready(LaunchSender),
    /// The session is running.
    Attached(SessionHandle),
    /// A new state snapshot.
    State(Box<PanelState>),
    /// The session could not be started.
    Failed(String),
    /// The session ended.
    Closed,
}

/// Subscription driving the bridge for the lifetime of the app.
pub fn session_subscription() -> Subscription<BridgeEvent> {
    Subscription::run(bridge)
}

fn bridge() -> impl Stream<Item = BridgeEvent> {
    iced::stream::channel(64, |mut output: iced_mpsc::Sender<BridgeEvent>| async move {
        let (launch_tx, mut launch_rx) = mpsc::unbounded_channel();
        if output.send(BridgeEvent::Ready(launch_tx)).await.is_err() {
            return;
        }

        let Some(settings) = launch_rx.recv().await else {
            tracing::debug!("Launch channel closed before the session started");
            return;
        };

        let backend = match HttpBackend::new(&settings.backend) {
            Ok(backend) => backend,
            Err(e) => {
                tracing::error!("Failed to create backend client: {}", e);
                let _ = output.send(BridgeEvent::Failed(e.to_string())).await;
                return;
            }
        };

        tracing::info!("Connecting to sync engine at {}", backend.base_url());
        let handle = Session::spawn(backend, &settings);
        let mut state_rx = handle.subscribe();

        if output.send(BridgeEvent::Attached(handle)).await.is_err() {
            return;
        }

        loop {
            let snapshot = state_rx.borrow_and_update().clone();
            if output.send(BridgeEvent::State(Box::new(snapshot))).await.is_err() {
                break;
            }
            if state_rx.changed().await.is_err() {
                let _ = output.send(BridgeEvent::Closed).await;
                break;
            }
        }

        tracing::debug!("Session bridge stopped");
    })
}
