//! Session: the event loop that owns the job controller.
//!
//! One tokio task owns the [`JobController`]. User commands, periodic task
//! ticks and request results all arrive through a single unbounded
//! channel and are applied in order. After every event the session
//! reconciles the periodic tasks against [`JobController::armed_tasks`],
//! cancelling first and arming second, then publishes a [`PanelState`]
//! snapshot on a watch channel.

use std::time::Duration;

use tokio::sync::{mpsc, watch};

use crate::backend::SyncBackend;
use crate::config::{PollingSettings, Settings};
use crate::models::{ChosenFile, Slot};

use super::controller::{clock_label, Effect, Event, JobController, PanelState};
use super::errors::PanelError;
use super::poller::{poll_once, probe};
use super::registration::register;
use super::schedule::{schedule, TaskHandle};

/// What the user can ask of the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelCommand {
    SetWorkingDir(String),
    RegisterFile { slot: Slot, file: ChosenFile },
    StartSync,
    /// Return to idle after a finished job.
    Reset,
    DismissNotice,
    Shutdown,
}

#[derive(Debug)]
enum Input {
    Command(PanelCommand),
    Task(Event),
}

/// Cloneable handle for talking to a running session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    tx: mpsc::UnboundedSender<Input>,
    state: watch::Receiver<PanelState>,
}

impl SessionHandle {
    /// Send a command. Returns false once the session has stopped.
    pub fn send(&self, command: PanelCommand) -> bool {
        self.tx.send(Input::Command(command)).is_ok()
    }

    /// Latest published state.
    pub fn snapshot(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every published state.
    pub fn subscribe(&self) -> watch::Receiver<PanelState> {
        self.state.clone()
    }
}

/// Event loop owning the controller and the periodic tasks.
pub struct Session<B: SyncBackend> {
    controller: JobController,
    backend: B,
    polling: PollingSettings,
    tx: mpsc::UnboundedSender<Input>,
    rx: mpsc::UnboundedReceiver<Input>,
    state_tx: watch::Sender<PanelState>,
    monitor: Option<TaskHandle>,
    /// Poller and the job generation it polls for.
    poller: Option<(u64, TaskHandle)>,
    playhead: Option<TaskHandle>,
}

impl<B: SyncBackend> Session<B> {
    pub fn new(backend: B, settings: &Settings) -> (Self, SessionHandle) {
        Self::with_controller(backend, settings, JobController::new(settings))
    }

    pub fn with_controller(
        backend: B,
        settings: &Settings,
        controller: JobController,
    ) -> (Self, SessionHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(controller.state().clone());

        let handle = SessionHandle {
            tx: tx.clone(),
            state: state_rx,
        };
        let session = Self {
            controller,
            backend,
            polling: settings.polling.clone(),
            tx,
            rx,
            state_tx,
            monitor: None,
            poller: None,
            playhead: None,
        };
        (session, handle)
    }

    /// Create a session and run it on the current tokio runtime.
    pub fn spawn(backend: B, settings: &Settings) -> SessionHandle {
        let (session, handle) = Self::new(backend, settings);
        tokio::spawn(session.run());
        handle
    }

    /// Process inputs until shutdown or until every observer is gone.
    pub async fn run(mut self) {
        tracing::info!("Panel session started");
        self.reconcile();

        while let Some(input) = self.rx.recv().await {
            let event = match input {
                Input::Command(command) => match command_event(command) {
                    Some(event) => event,
                    None => break,
                },
                Input::Task(event) => event,
            };

            let effects = self.controller.apply(event);
            self.reconcile();
            for effect in effects {
                self.execute(effect);
            }

            if self.state_tx.send(self.controller.state().clone()).is_err() {
                tracing::debug!("No observers left");
                break;
            }
        }

        self.cancel_all();
        tracing::info!("Panel session stopped");
    }

    /// Bring the periodic tasks in line with the controller state.
    fn reconcile(&mut self) {
        let armed = self.controller.armed_tasks();

        if !armed.monitor {
            cancel(self.monitor.take());
        }
        if self.poller.as_ref().map(|(generation, _)| *generation) != armed.poller {
            cancel(self.poller.take().map(|(_, handle)| handle));
        }
        if !armed.playhead {
            cancel(self.playhead.take());
        }

        if armed.monitor && self.monitor.is_none() {
            self.monitor = Some(announce(self.arm_monitor()));
        }
        if let (Some(generation), None) = (armed.poller, &self.poller) {
            self.poller = Some((generation, announce(self.arm_poller(generation))));
        }
        if armed.playhead && self.playhead.is_none() {
            self.playhead = Some(announce(self.arm_playhead()));
        }
    }

    fn arm_monitor(&self) -> TaskHandle {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let period = self.polling.connectivity_interval();

        schedule("connectivity", Duration::ZERO, period, move || {
            let backend = backend.clone();
            let tx = tx.clone();
            async move {
                let reachable = probe(&backend).await;
                let _ = tx.send(Input::Task(Event::Probed { reachable }));
            }
        })
    }

    fn arm_poller(&self, generation: u64) -> TaskHandle {
        let backend = self.backend.clone();
        let tx = self.tx.clone();
        let period = self.polling.progress_interval();

        schedule("progress", period, period, move || {
            let backend = backend.clone();
            let tx = tx.clone();
            async move {
                let result = poll_once(&backend).await;
                let _ = tx.send(Input::Task(Event::Polled {
                    generation,
                    logs: result.logs,
                    progress: result.progress,
                    observed_at: clock_label(),
                }));
            }
        })
    }

    fn arm_playhead(&self) -> TaskHandle {
        let tx = self.tx.clone();
        let period = self.polling.playhead_interval();

        schedule("playhead", period, period, move || {
            let tx = tx.clone();
            async move {
                let _ = tx.send(Input::Task(Event::PlayheadTick));
            }
        })
    }

    fn execute(&self, effect: Effect) {
        let backend = self.backend.clone();
        let tx = self.tx.clone();

        match effect {
            Effect::Register {
                slot,
                token,
                file,
                working_dir,
            } => {
                tokio::spawn(async move {
                    let result = register(&backend, slot, &file, &working_dir).await;
                    let _ = tx.send(Input::Task(Event::Registered {
                        slot,
                        token,
                        result,
                    }));
                });
            }
            Effect::StartSync {
                generation,
                request,
            } => {
                tokio::spawn(async move {
                    let event = match backend.start_sync(request).await {
                        Ok(ack) => Event::StartAcknowledged { generation, ack },
                        Err(e) => Event::StartFailed {
                            generation,
                            error: PanelError::StartSyncTransportFailure { detail: e.detail() },
                        },
                    };
                    let _ = tx.send(Input::Task(event));
                });
            }
        }
    }

    fn cancel_all(&mut self) {
        cancel(self.monitor.take());
        cancel(self.poller.take().map(|(_, handle)| handle));
        cancel(self.playhead.take());
    }
}

fn announce(handle: TaskHandle) -> TaskHandle {
    tracing::debug!("Armed periodic task '{}'", handle.name());
    handle
}

fn cancel(handle: Option<TaskHandle>) {
    if let Some(handle) = handle {
        handle.cancel();
    }
}

/// Map a user command to its controller event. `None` means shut down.
fn command_event(command: PanelCommand) -> Option<Event> {
    let event = match command {
        PanelCommand::SetWorkingDir(dir) => Event::WorkingDirChanged(dir),
        PanelCommand::RegisterFile { slot, file } => Event::RegistrationRequested { slot, file },
        PanelCommand::StartSync => Event::StartRequested,
        PanelCommand::Reset => Event::ResetRequested,
        PanelCommand::DismissNotice => Event::NoticeDismissed,
        PanelCommand::Shutdown => return None,
    };
    Some(event)
}

#[cfg(test)]
mod tests {
    use super::*;

    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::time::{self, Instant};

    use crate::backend::BackendError;
    use crate::models::JobState;
    use crate::orchestrator::testing::MockBackend;

    fn spawn(backend: &MockBackend) -> SessionHandle {
        crate::logging::init_test_tracing();
        let settings = Settings::default();
        let controller = JobController::with_rng(&settings, StdRng::seed_from_u64(9));
        let (session, handle) = Session::with_controller(backend.clone(), &settings, controller);
        tokio::spawn(session.run());
        handle
    }

    /// Wait until a published state satisfies `check`.
    async fn wait_for(
        rx: &mut watch::Receiver<PanelState>,
        check: impl Fn(&PanelState) -> bool,
    ) -> PanelState {
        let wait = async {
            loop {
                {
                    let state = rx.borrow_and_update();
                    if check(&*state) {
                        return state.clone();
                    }
                }
                rx.changed().await.expect("session stopped");
            }
        };
        time::timeout(Duration::from_secs(60), wait)
            .await
            .expect("state never reached")
    }

    fn files() -> MockBackend {
        MockBackend::new()
            .with_file("master.wav", 6, "eac3", 100.0)
            .with_file("dub.wav", 6, "eac3", 98.0)
    }

    async fn register_both(handle: &SessionHandle, rx: &mut watch::Receiver<PanelState>) {
        for (slot, name) in [(Slot::Master, "master.wav"), (Slot::Dub, "dub.wav")] {
            handle.send(PanelCommand::RegisterFile {
                slot,
                file: ChosenFile::new(name, 1024),
            });
        }
        wait_for(rx, |s| {
            s.descriptors.master.is_some() && s.descriptors.dub.is_some() && s.connected
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_a_start_issues_one_request() {
        let backend = files();
        let handle = spawn(&backend);
        let mut rx = handle.subscribe();

        register_both(&handle, &mut rx).await;
        assert!(handle.snapshot().can_start());

        handle.send(PanelCommand::StartSync);
        handle.send(PanelCommand::StartSync);
        wait_for(&mut rx, |s| s.job == JobState::Processing).await;

        time::sleep(Duration::from_millis(500)).await;
        let calls = backend.start_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].master_name, "master.wav");
        assert_eq!(calls[0].dub_name, "dub.wav");
        assert_eq!(handle.snapshot().generation, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_b_missing_file_leaves_slot_empty() {
        let backend = files();
        let handle = spawn(&backend);
        let mut rx = handle.subscribe();

        handle.send(PanelCommand::RegisterFile {
            slot: Slot::Dub,
            file: ChosenFile::new("missing.wav", 1),
        });
        let state = wait_for(&mut rx, |s| s.notice.is_some()).await;

        assert!(state.descriptors.dub.is_none());
        assert_eq!(state.job, JobState::Idle);
        assert!(matches!(
            state.notice,
            Some(PanelError::FileNotFoundOnBackend { slot: Slot::Dub, .. })
        ));
        assert!(!state.is_registering(Slot::Dub));
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_c_completes_on_third_poll() {
        let backend = files();
        backend.push_progress(&[40.0, 70.0, 100.0]);
        let handle = spawn(&backend);
        let mut rx = handle.subscribe();

        register_both(&handle, &mut rx).await;
        handle.send(PanelCommand::StartSync);
        wait_for(&mut rx, |s| s.job == JobState::Processing).await;

        let state = wait_for(&mut rx, |s| s.progress == 40.0).await;
        assert_eq!(state.job, JobState::Processing);
        let state = wait_for(&mut rx, |s| s.progress == 70.0).await;
        assert_eq!(state.job, JobState::Processing);

        let state = wait_for(&mut rx, |s| s.job == JobState::Completed).await;
        assert_eq!(state.progress, 100.0);
        assert_eq!(backend.progress_calls(), 3);

        // Poller is disarmed once completed
        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(backend.progress_calls(), 3);
        assert_eq!(backend.log_calls(), 3);

        // Playhead runs
        let state = wait_for(&mut rx, |s| s.current_time > 0.0).await;
        assert_eq!(state.job, JobState::Completed);
    }

    #[tokio::test(start_paused = true)]
    async fn scenario_d_connectivity_follows_probes() {
        let backend = files();
        let handle = spawn(&backend);
        let mut rx = handle.subscribe();

        wait_for(&mut rx, |s| s.connected).await;

        backend.set_reachable(false);
        let lost_at = Instant::now();
        wait_for(&mut rx, |s| !s.connected).await;
        assert!(lost_at.elapsed() <= Duration::from_secs(5));

        backend.set_reachable(true);
        let restored_at = Instant::now();
        wait_for(&mut rx, |s| s.connected).await;
        assert!(restored_at.elapsed() <= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn start_failure_returns_to_idle() {
        let backend = files();
        backend.push_start_result(Err(BackendError::unreachable(
            "/start-sync",
            "connection refused",
        )));
        let handle = spawn(&backend);
        let mut rx = handle.subscribe();

        register_both(&handle, &mut rx).await;
        handle.send(PanelCommand::StartSync);

        let state = wait_for(&mut rx, |s| s.notice.is_some()).await;
        assert_eq!(state.job, JobState::Idle);
        assert!(matches!(
            state.notice,
            Some(PanelError::StartSyncTransportFailure { .. })
        ));

        // No polling for the failed job
        time::sleep(Duration::from_secs(3)).await;
        assert_eq!(backend.progress_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn reset_allows_a_second_job() {
        let backend = files();
        backend.push_progress(&[100.0]);
        let handle = spawn(&backend);
        let mut rx = handle.subscribe();

        register_both(&handle, &mut rx).await;
        handle.send(PanelCommand::StartSync);
        wait_for(&mut rx, |s| s.job == JobState::Completed).await;

        handle.send(PanelCommand::Reset);
        let state = wait_for(&mut rx, |s| s.job == JobState::Idle).await;
        assert!(state.descriptors.master.is_some());

        handle.send(PanelCommand::StartSync);
        let state = wait_for(&mut rx, |s| s.job == JobState::Completed).await;
        assert_eq!(state.generation, 2);
        assert_eq!(backend.start_calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_stops_the_loop() {
        let backend = files();
        let handle = spawn(&backend);
        let mut rx = handle.subscribe();
        wait_for(&mut rx, |s| s.connected).await;

        handle.send(PanelCommand::Shutdown);
        time::sleep(Duration::from_millis(10)).await;
        assert!(!handle.send(PanelCommand::DismissNotice));

        let pings = backend.ping_calls();
        time::sleep(Duration::from_secs(20)).await;
        assert_eq!(backend.ping_calls(), pings);
    }
}
