//! Message handlers for the App.
//!
//! Each module adds `impl App` methods for one area of the window.

mod browse;
mod session;

pub use session::PendingStart;
