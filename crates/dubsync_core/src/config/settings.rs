//! Settings struct with TOML-based sections.
//!
//! Settings are organized into logical sections that map to TOML tables.
//! Each section can be updated independently for atomic section-level updates.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::logging::LogLevel;

/// Root settings structure containing all configuration sections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendSettings,

    /// Cadence of the periodic tasks.
    #[serde(default)]
    pub polling: PollingSettings,

    /// Timeline and chart rendering.
    #[serde(default)]
    pub timeline: TimelineSettings,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Available config sections for section-level updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSection {
    Backend,
    Polling,
    Timeline,
    Logging,
}

impl ConfigSection {
    /// All sections, in file order.
    pub const ALL: [ConfigSection; 4] = [
        ConfigSection::Backend,
        ConfigSection::Polling,
        ConfigSection::Timeline,
        ConfigSection::Logging,
    ];

    /// Get the TOML table name for this section.
    pub fn table_name(&self) -> &'static str {
        match self {
            ConfigSection::Backend => "backend",
            ConfigSection::Polling => "polling",
            ConfigSection::Timeline => "timeline",
            ConfigSection::Logging => "logging",
        }
    }

    /// Comment written above the section in a generated file.
    pub fn comment(&self) -> &'static str {
        match self {
            ConfigSection::Backend => "# Sync engine connection",
            ConfigSection::Polling => "# Periodic task cadence (milliseconds)",
            ConfigSection::Timeline => "# Timeline and RMS chart rendering",
            ConfigSection::Logging => "# Logging configuration",
        }
    }
}

/// Connection settings for the sync engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendSettings {
    /// Base address of the engine's HTTP API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Working directory sent with requests. Empty means the engine's own.
    #[serde(default)]
    pub working_dir: String,

    /// TCP connect timeout for every request.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

fn default_base_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_connect_timeout_ms() -> u64 {
    2000
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            working_dir: String::new(),
            connect_timeout_ms: default_connect_timeout_ms(),
        }
    }
}

impl BackendSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Intervals of the three periodic tasks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollingSettings {
    /// Connectivity probe interval.
    #[serde(default = "default_connectivity_interval_ms")]
    pub connectivity_interval_ms: u64,

    /// Log/progress poll interval while a job is active.
    #[serde(default = "default_progress_interval_ms")]
    pub progress_interval_ms: u64,

    /// Playhead clock interval after completion.
    #[serde(default = "default_playhead_interval_ms")]
    pub playhead_interval_ms: u64,
}

fn default_connectivity_interval_ms() -> u64 {
    5000
}

fn default_progress_interval_ms() -> u64 {
    1000
}

fn default_playhead_interval_ms() -> u64 {
    100
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            connectivity_interval_ms: default_connectivity_interval_ms(),
            progress_interval_ms: default_progress_interval_ms(),
            playhead_interval_ms: default_playhead_interval_ms(),
        }
    }
}

impl PollingSettings {
    pub fn connectivity_interval(&self) -> Duration {
        Duration::from_millis(self.connectivity_interval_ms.max(1))
    }

    pub fn progress_interval(&self) -> Duration {
        Duration::from_millis(self.progress_interval_ms.max(1))
    }

    pub fn playhead_interval(&self) -> Duration {
        Duration::from_millis(self.playhead_interval_ms.max(1))
    }
}

/// Timeline rendering settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineSettings {
    /// Duration used when the master duration is unknown.
    #[serde(default = "default_nominal_duration_secs")]
    pub nominal_duration_secs: f64,

    /// Wall-clock time for one full playhead sweep.
    #[serde(default = "default_playhead_sweep_secs")]
    pub playhead_sweep_secs: f64,

    /// Number of placeholder samples seeded when a job starts.
    #[serde(default = "default_placeholder_points")]
    pub placeholder_points: usize,

    /// Reference line drawn on the RMS chart.
    #[serde(default = "default_silence_threshold_db")]
    pub silence_threshold_db: f64,
}

fn default_nominal_duration_secs() -> f64 {
    100.0
}

fn default_playhead_sweep_secs() -> f64 {
    10.0
}

fn default_placeholder_points() -> usize {
    100
}

fn default_silence_threshold_db() -> f64 {
    -60.0
}

impl Default for TimelineSettings {
    fn default() -> Self {
        Self {
            nominal_duration_secs: default_nominal_duration_secs(),
            playhead_sweep_secs: default_playhead_sweep_secs(),
            placeholder_points: default_placeholder_points(),
            silence_threshold_db: default_silence_threshold_db(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Default level when RUST_LOG is unset.
    #[serde(default)]
    pub level: LogLevel,

    /// Folder for rolling log files.
    #[serde(default = "default_logs_folder")]
    pub logs_folder: String,

    /// Also write logs to a daily rolling file.
    #[serde(default = "default_true")]
    pub log_to_file: bool,
}

fn default_logs_folder() -> String {
    ".logs".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: LogLevel::default(),
            logs_folder: default_logs_folder(),
            log_to_file: default_true(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_cadence() {
        let settings = Settings::default();
        assert_eq!(settings.polling.connectivity_interval(), Duration::from_secs(5));
        assert_eq!(settings.polling.progress_interval(), Duration::from_secs(1));
        assert_eq!(settings.polling.playhead_interval(), Duration::from_millis(100));
        assert_eq!(settings.backend.base_url, "http://127.0.0.1:8000");
    }

    #[test]
    fn missing_fields_use_defaults() {
        let settings: Settings = toml::from_str("[backend]\nworking_dir = \"/media\"\n").unwrap();
        assert_eq!(settings.backend.working_dir, "/media");
        assert_eq!(settings.backend.base_url, "http://127.0.0.1:8000");
        assert_eq!(settings.timeline.placeholder_points, 100);
    }

    #[test]
    fn section_names_are_unique() {
        let mut names: Vec<_> = ConfigSection::ALL.iter().map(|s| s.table_name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), ConfigSection::ALL.len());
    }
}
