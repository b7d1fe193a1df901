//! Core enums used throughout the panel.

use serde::{Deserialize, Serialize};

/// Which source a file was chosen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    /// Reference-language track, ground truth for timing.
    Master,
    /// Localized track being aligned to the master.
    Dub,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Master, Slot::Dub];

    /// Short label shown on the slot badge.
    pub fn badge(&self) -> &'static str {
        match self {
            Slot::Master => "MASTER",
            Slot::Dub => "DUB SLAVE",
        }
    }
}

impl std::fmt::Display for Slot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Slot::Master => write!(f, "master"),
            Slot::Dub => write!(f, "dub"),
        }
    }
}

/// State of the single sync job.
///
/// `Idle → Analyzing → Processing → Completed`, with `Failed` reachable
/// from any non-terminal state when the start request cannot be delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JobState {
    #[default]
    Idle,
    /// Start request sent, waiting for the engine to acknowledge.
    Analyzing,
    /// Engine acknowledged, progress is being polled.
    Processing,
    Completed,
    Failed,
}

impl JobState {
    /// Whether a job is in flight (the log/progress poller runs).
    pub fn is_active(&self) -> bool {
        matches!(self, JobState::Analyzing | JobState::Processing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }

    /// Get the display name for this state.
    pub fn name(&self) -> &'static str {
        match self {
            JobState::Idle => "Idle",
            JobState::Analyzing => "Analyzing",
            JobState::Processing => "Processing",
            JobState::Completed => "Completed",
            JobState::Failed => "Failed",
        }
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Severity of an engine log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    #[default]
    Info,
    Warn,
    Error,
    Success,
}

impl Severity {
    /// Guess the severity of an unstructured engine message.
    pub fn infer(message: &str) -> Self {
        let lower = message.to_lowercase();
        if lower.contains("error") || lower.contains("failed") {
            Severity::Error
        } else if lower.contains("warn") || lower.contains("mismatch") {
            Severity::Warn
        } else if lower.contains("success") || lower.contains("completed") {
            Severity::Success
        } else {
            Severity::Info
        }
    }
}

/// Which track a timeline segment plays from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentSource {
    /// Master audio patched in where the dub is missing.
    #[serde(rename = "MASTER_EN")]
    MasterFill,
    /// The dub's own audio.
    #[serde(rename = "DUB_PT")]
    OriginalDub,
}

impl SegmentSource {
    pub fn label(&self) -> &'static str {
        match self {
            SegmentSource::MasterFill => "Master Fill",
            SegmentSource::OriginalDub => "Original Dub",
        }
    }
}

/// Why a segment was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentReason {
    GapFill,
    OriginalDub,
    CensoredScene,
}

impl std::fmt::Display for SegmentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SegmentReason::GapFill => write!(f, "GAP_FILL"),
            SegmentReason::OriginalDub => write!(f, "ORIGINAL_DUB"),
            SegmentReason::CensoredScene => write!(f, "CENSORED_SCENE"),
        }
    }
}
