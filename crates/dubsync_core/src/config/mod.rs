//! Configuration management for the DubSync panel.
//!
//! This module provides:
//! - TOML-based configuration with logical sections
//! - Atomic file writes (write to temp, then rename)
//! - Section-level updates (only changed section is modified)
//! - Defaults for every missing key
//!
//! # Example
//!
//! ```no_run
//! use dubsync_core::config::{ConfigManager, ConfigSection};
//!
//! let mut config = ConfigManager::new(".config/settings.toml");
//! config.load_or_create().unwrap();
//!
//! println!("Engine: {}", config.settings().backend.base_url);
//!
//! config.settings_mut().backend.working_dir = "/media/movies".to_string();
//! config.update_section(ConfigSection::Backend).unwrap();
//! ```

mod manager;
mod settings;

pub use manager::{ConfigError, ConfigManager, ConfigResult};
pub use settings::{
    BackendSettings, ConfigSection, LoggingSettings, PollingSettings, Settings, TimelineSettings,
};
