//! Canvas widgets for the main window.

pub mod rms_chart;
pub mod timeline;

pub use rms_chart::RmsChart;
pub use timeline::TimelineCanvas;
