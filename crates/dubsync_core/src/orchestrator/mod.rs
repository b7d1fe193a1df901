//! Job orchestration for the panel.
//!
//! # Architecture
//!
//! ```text
//! Session (one tokio task, one channel)
//!     ├── JobController   state container + reducer
//!     ├── connectivity    every 5 s, always armed
//!     ├── progress        every 1 s, armed while Analyzing/Processing
//!     ├── playhead        every 100 ms, armed while Completed
//!     └── one-shot        file registration, start request
//! ```
//!
//! # Example
//!
//! ```ignore
//! use dubsync_core::backend::HttpBackend;
//! use dubsync_core::orchestrator::{PanelCommand, Session};
//!
//! let backend = HttpBackend::new(&settings.backend)?;
//! let handle = Session::spawn(backend, &settings);
//! handle.send(PanelCommand::StartSync);
//! let state = handle.snapshot();
//! ```

mod controller;
mod errors;
pub mod poller;
mod registration;
mod schedule;
mod session;
#[cfg(test)]
pub(crate) mod testing;

pub use controller::{clock_label, ArmedTasks, Effect, Event, JobController, PanelState};
pub use errors::{PanelError, StartRejection};
pub use poller::{poll_once, probe, PollResult};
pub use registration::register;
pub use schedule::{schedule, TaskHandle};
pub use session::{PanelCommand, Session, SessionHandle};
