//! Timeline and analysis chart geometry.
//!
//! Turns segments, level samples and the playhead time into normalized
//! positions the UI can scale to any widget size:
//! - `mapper` - seconds to `[0, 1]` fractions
//! - `view` - segment rectangles, playhead, legend
//! - `chart` - RMS polylines and gap bands
//! - `placeholder` - simulated level data

pub mod chart;
pub mod mapper;
pub mod placeholder;
pub mod view;

pub use chart::{ChartGeometry, ChartPoint};
pub use mapper::{fraction, percent, span, Span};
pub use view::{
    duration_label, segments_from_logs, timeline_duration, Legend, PlayheadClock, SegmentRect,
    TimelineView,
};
