//! DubSync Panel - Main entry point
//!
//! Loads configuration, initializes logging and launches the iced
//! application.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use dubsync_core::config::ConfigManager;
use dubsync_core::logging::{init_tracing, init_tracing_with_file};

mod app;
mod bridge;
mod handlers;
mod pages;
mod theme;
mod widgets;

use app::App;

/// Default config path: .config/settings.toml (relative to current working directory)
fn default_config_path() -> PathBuf {
    PathBuf::from(".config").join("settings.toml")
}

fn main() -> iced::Result {
    // Load configuration first (needed for logs directory path)
    let config_path = default_config_path();
    let mut config_manager = ConfigManager::new(&config_path);

    if let Err(e) = config_manager.load_or_create() {
        eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
    }

    // Initialize application-level logging
    let logging = config_manager.settings().logging.clone();
    let _log_guard = if logging.log_to_file {
        init_tracing_with_file(logging.level, &config_manager.logs_folder())
    } else {
        init_tracing(logging.level);
        None
    };

    tracing::info!("DubSync Panel starting");
    tracing::info!("Config: {}", config_path.display());
    tracing::info!("Core version: {}", dubsync_core::version());
    tracing::info!("Engine: {}", config_manager.settings().backend.base_url);

    // Shared with the app so it can persist the working directory
    let config = Arc::new(Mutex::new(config_manager));

    iced::application(move || App::new(config.clone()), App::update, App::view)
        .title(App::title)
        .subscription(App::subscription)
        .theme(App::theme)
        .window_size((1280.0, 860.0))
        .run()
}
