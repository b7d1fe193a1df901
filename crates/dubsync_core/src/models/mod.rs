//! Data models for the DubSync panel.
//!
//! - Enums for slots, job state, log severity and segment kinds
//! - Audio descriptors and locally chosen files
//! - Engine log entries and snapshot decoding
//! - Sync segments and level-analysis samples

mod enums;
mod logs;
mod media;
mod timeline;

// Re-export all public types
pub use enums::{JobState, SegmentReason, SegmentSource, Severity, Slot};
pub use logs::{stamp_snapshot, LogEntry, WireLogEntry};
pub use media::{mime_for_name, AudioDescriptor, ChosenFile, PerSlot, ACCEPTED_EXTENSIONS};
pub use timeline::{AnalysisSample, AnalysisSeries, SyncSegment};
