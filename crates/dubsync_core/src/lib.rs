//! DubSync Core - Orchestration logic for the DubSync panel
//!
//! This crate contains all client-side logic with zero UI dependencies:
//! the job state machine, the backend HTTP client, the periodic pollers,
//! and the timeline geometry. It can be driven by the GUI or headlessly.

pub mod backend;
pub mod config;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod timeline;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
