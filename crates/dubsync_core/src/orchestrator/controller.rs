//! Job controller: the panel's single state container and its reducer.
//!
//! Every change to [`PanelState`] goes through [`JobController::apply`].
//! Periodic tasks and one-shot requests never touch the state; they report
//! back with an [`Event`], and the reducer answers with [`Effect`]s for
//! the session to carry out.
//!
//! ```text
//! Idle ──start──▶ Analyzing ──ack──▶ Processing ──progress ≥ 100──▶ Completed
//!   ▲                 │                                                │
//!   └──── Failed ◀────┘ (start request failed)                        │
//!   └──────────────────────────────── reset ◀──────────────────────────┘
//! ```

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::backend::{working_dir_override, StartSyncAck, StartSyncRequest};
use crate::config::{Settings, TimelineSettings};
use crate::models::{
    stamp_snapshot, AnalysisSeries, AudioDescriptor, ChosenFile, JobState, LogEntry, PerSlot,
    Slot, SyncSegment, WireLogEntry,
};
use crate::timeline::{placeholder, segments_from_logs, timeline_duration, PlayheadClock};

use super::errors::{PanelError, StartRejection};

/// Snapshot of everything the panel shows.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelState {
    pub job: JobState,
    /// Last connectivity probe succeeded.
    pub connected: bool,
    pub descriptors: PerSlot<Option<AudioDescriptor>>,
    /// Token of the registration in flight per slot.
    pub pending: PerSlot<Option<u64>>,
    pub working_dir: String,
    pub logs: Vec<LogEntry>,
    /// Last reported progress, clamped to [0, 100].
    pub progress: f64,
    pub segments: Vec<SyncSegment>,
    pub analysis: AnalysisSeries,
    /// Playhead position in seconds.
    pub current_time: f64,
    /// Length of the timeline in seconds.
    pub timeline_duration: f64,
    pub notice: Option<PanelError>,
    /// Incremented per started job.
    pub generation: u64,
}

impl PanelState {
    /// Idle state before anything was registered.
    pub fn new(timeline: &TimelineSettings, working_dir: String) -> Self {
        Self {
            job: JobState::Idle,
            connected: false,
            descriptors: PerSlot::default(),
            pending: PerSlot::default(),
            working_dir,
            logs: Vec::new(),
            progress: 0.0,
            segments: Vec::new(),
            analysis: AnalysisSeries::default(),
            current_time: 0.0,
            timeline_duration: timeline.nominal_duration_secs,
            notice: None,
            generation: 0,
        }
    }

    /// Check whether a job may start right now.
    pub fn start_guard(&self) -> Result<(), StartRejection> {
        for slot in Slot::ALL {
            if self.descriptors.get(slot).is_none() {
                return Err(StartRejection::MissingDescriptor(slot));
            }
        }
        if !self.connected {
            return Err(StartRejection::BackendDisconnected);
        }
        Ok(())
    }

    /// Whether the start action should be offered.
    pub fn can_start(&self) -> bool {
        self.job == JobState::Idle && self.start_guard().is_ok()
    }

    pub fn is_registering(&self, slot: Slot) -> bool {
        self.pending.get(slot).is_some()
    }
}

/// Everything that can happen to the panel.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    WorkingDirChanged(String),
    RegistrationRequested {
        slot: Slot,
        file: ChosenFile,
    },
    Registered {
        slot: Slot,
        token: u64,
        result: Result<AudioDescriptor, PanelError>,
    },
    StartRequested,
    StartAcknowledged {
        generation: u64,
        ack: StartSyncAck,
    },
    StartFailed {
        generation: u64,
        error: PanelError,
    },
    Polled {
        generation: u64,
        logs: Option<Vec<WireLogEntry>>,
        progress: Option<f64>,
        /// Wall-clock label for log entries seen for the first time.
        observed_at: String,
    },
    Probed {
        reachable: bool,
    },
    PlayheadTick,
    ResetRequested,
    NoticeDismissed,
}

/// Work the session must carry out after an event.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Register {
        slot: Slot,
        token: u64,
        file: ChosenFile,
        working_dir: String,
    },
    StartSync {
        generation: u64,
        request: StartSyncRequest,
    },
}

/// Which periodic tasks should be running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArmedTasks {
    pub monitor: bool,
    /// Armed for this job generation.
    pub poller: Option<u64>,
    pub playhead: bool,
}

/// Owns [`PanelState`] and applies events to it.
pub struct JobController {
    state: PanelState,
    timeline: TimelineSettings,
    playhead: PlayheadClock,
    rng: StdRng,
    next_token: u64,
}

impl JobController {
    pub fn new(settings: &Settings) -> Self {
        Self::with_rng(settings, StdRng::from_os_rng())
    }

    /// Build with a given random source for the placeholder chart.
    pub fn with_rng(settings: &Settings, rng: StdRng) -> Self {
        Self {
            state: PanelState::new(&settings.timeline, settings.backend.working_dir.clone()),
            timeline: settings.timeline.clone(),
            playhead: PlayheadClock::new(settings.polling.playhead_interval(), &settings.timeline),
            rng,
            next_token: 0,
        }
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn start_guard(&self) -> Result<(), StartRejection> {
        self.state.start_guard()
    }

    /// Periodic tasks implied by the current state.
    pub fn armed_tasks(&self) -> ArmedTasks {
        ArmedTasks {
            monitor: true,
            poller: self.state.job.is_active().then_some(self.state.generation),
            playhead: self.state.job == JobState::Completed,
        }
    }

    /// Apply one event and return the work it triggers.
    pub fn apply(&mut self, event: Event) -> Vec<Effect> {
        match event {
            Event::WorkingDirChanged(dir) => {
                self.state.working_dir = dir;
                Vec::new()
            }
            Event::RegistrationRequested { slot, file } => self.request_registration(slot, file),
            Event::Registered {
                slot,
                token,
                result,
            } => {
                self.finish_registration(slot, token, result);
                Vec::new()
            }
            Event::StartRequested => self.start(),
            Event::StartAcknowledged { generation, ack } => {
                self.acknowledge(generation, &ack);
                Vec::new()
            }
            Event::StartFailed { generation, error } => {
                self.fail_start(generation, error);
                Vec::new()
            }
            Event::Polled {
                generation,
                logs,
                progress,
                observed_at,
            } => {
                self.apply_poll(generation, logs, progress, &observed_at);
                Vec::new()
            }
            Event::Probed { reachable } => {
                self.set_connected(reachable);
                Vec::new()
            }
            Event::PlayheadTick => {
                if self.state.job == JobState::Completed {
                    self.state.current_time = self.playhead.advance(self.state.timeline_duration);
                }
                Vec::new()
            }
            Event::ResetRequested => {
                self.reset();
                Vec::new()
            }
            Event::NoticeDismissed => {
                self.state.notice = None;
                Vec::new()
            }
        }
    }

    fn request_registration(&mut self, slot: Slot, file: ChosenFile) -> Vec<Effect> {
        self.next_token += 1;
        let token = self.next_token;
        *self.state.pending.get_mut(slot) = Some(token);

        vec![Effect::Register {
            slot,
            token,
            file,
            working_dir: self.state.working_dir.clone(),
        }]
    }

    fn finish_registration(
        &mut self,
        slot: Slot,
        token: u64,
        result: Result<AudioDescriptor, PanelError>,
    ) {
        if *self.state.pending.get(slot) != Some(token) {
            tracing::debug!("Discarding superseded {} registration #{}", slot, token);
            return;
        }
        *self.state.pending.get_mut(slot) = None;

        match result {
            Ok(descriptor) => {
                *self.state.descriptors.get_mut(slot) = Some(descriptor);
                if slot == Slot::Master && self.state.job == JobState::Idle {
                    self.refresh_duration();
                }
            }
            Err(error) => self.state.notice = Some(error),
        }
    }

    fn start(&mut self) -> Vec<Effect> {
        if self.state.job != JobState::Idle {
            tracing::debug!("Start ignored while {}", self.state.job);
            return Vec::new();
        }

        if let Err(rejection) = self.start_guard() {
            tracing::info!("Start rejected: {}", rejection);
            self.state.notice = Some(PanelError::JobStartRejected(rejection));
            return Vec::new();
        }

        let (Some(master), Some(dub)) = (&self.state.descriptors.master, &self.state.descriptors.dub)
        else {
            return Vec::new();
        };
        let request = StartSyncRequest {
            master_name: master.name.clone(),
            dub_name: dub.name.clone(),
            working_dir: working_dir_override(&self.state.working_dir),
        };

        self.state.generation += 1;
        self.state.job = JobState::Analyzing;
        self.state.notice = None;
        self.clear_job_artifacts();
        self.state.analysis = placeholder::generate(self.timeline.placeholder_points, &mut self.rng);
        self.refresh_duration();

        tracing::info!(
            "Starting sync job #{}: master '{}', dub '{}'",
            self.state.generation,
            request.master_name,
            request.dub_name
        );

        vec![Effect::StartSync {
            generation: self.state.generation,
            request,
        }]
    }

    fn acknowledge(&mut self, generation: u64, ack: &StartSyncAck) {
        if generation != self.state.generation || self.state.job != JobState::Analyzing {
            tracing::debug!("Ignoring stale start acknowledgment for job #{}", generation);
            return;
        }
        if ack.already_running() {
            tracing::warn!("Engine reports a job already running; following its progress");
        }
        self.transition(JobState::Processing);
    }

    fn fail_start(&mut self, generation: u64, error: PanelError) {
        if generation != self.state.generation || !self.state.job.is_active() {
            tracing::debug!("Ignoring stale start failure for job #{}", generation);
            return;
        }
        tracing::warn!("{}", error);
        self.transition(JobState::Failed);
        self.transition(JobState::Idle);
        self.state.notice = Some(error);
    }

    fn apply_poll(
        &mut self,
        generation: u64,
        logs: Option<Vec<WireLogEntry>>,
        progress: Option<f64>,
        observed_at: &str,
    ) {
        if generation != self.state.generation || !self.state.job.is_active() {
            tracing::debug!("Ignoring poll result for job #{}", generation);
            return;
        }

        if let Some(wire) = logs {
            let mut entries = WireLogEntry::into_entries(wire);
            stamp_snapshot(&self.state.logs, &mut entries, observed_at);
            self.state.logs = entries;
        }

        let Some(progress) = progress.filter(|p| p.is_finite()) else {
            return;
        };
        self.state.progress = progress.clamp(0.0, 100.0);
        tracing::debug!("Job #{} progress {:.0}%", generation, self.state.progress);

        if progress >= 100.0 {
            if self.state.job == JobState::Processing {
                self.complete();
            } else {
                tracing::debug!("Progress {} before acknowledgment, not completing", progress);
            }
        }
    }

    fn complete(&mut self) {
        self.transition(JobState::Completed);
        self.state.segments = segments_from_logs(&self.state.logs);
        self.playhead.reset();
        self.state.current_time = 0.0;
        let patched: f64 = self
            .state
            .segments
            .iter()
            .filter(|s| s.is_gap_fill())
            .map(SyncSegment::duration)
            .sum();
        tracing::info!(
            "Sync job #{} completed with {} segments ({:.1}s patched from master)",
            self.state.generation,
            self.state.segments.len(),
            patched
        );
    }

    fn reset(&mut self) {
        if !self.state.job.is_terminal() {
            tracing::debug!("Reset ignored while {}", self.state.job);
            return;
        }
        self.transition(JobState::Idle);
        self.clear_job_artifacts();
        self.state.analysis = AnalysisSeries::default();
        self.refresh_duration();
    }

    fn set_connected(&mut self, reachable: bool) {
        if reachable == self.state.connected {
            return;
        }
        if reachable {
            tracing::info!("Sync engine connection restored");
        } else {
            tracing::warn!("Sync engine connection lost");
        }
        self.state.connected = reachable;
    }

    fn clear_job_artifacts(&mut self) {
        self.state.logs.clear();
        self.state.progress = 0.0;
        self.state.segments.clear();
        self.state.current_time = 0.0;
        self.playhead.reset();
    }

    fn refresh_duration(&mut self) {
        self.state.timeline_duration =
            timeline_duration(self.state.descriptors.master.as_ref(), &self.timeline);
    }

    fn transition(&mut self, to: JobState) {
        tracing::debug!("Job state {} -> {}", self.state.job, to);
        self.state.job = to;
    }
}

/// Wall-clock label used to stamp new log entries.
pub fn clock_label() -> String {
    chrono::Local::now().format("%H:%M:%S").to_string()
}
