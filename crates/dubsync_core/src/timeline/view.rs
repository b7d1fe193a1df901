//! Timeline composition: segment rectangles, playhead and legend.

use std::time::Duration;

use crate::config::TimelineSettings;
use crate::models::{AudioDescriptor, LogEntry, SegmentReason, SegmentSource, SyncSegment};

use super::mapper::{self, Span};

/// One rendered segment, positioned in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentRect {
    pub span: Span,
    pub source: SegmentSource,
    pub reason: SegmentReason,
}

/// Counts shown under the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Legend {
    pub total_segments: usize,
    /// Segments filled from the master.
    pub patched_gaps: usize,
}

/// Everything needed to draw the timeline strip.
#[derive(Debug, Clone, PartialEq)]
pub struct TimelineView {
    pub rects: Vec<SegmentRect>,
    /// Playhead position in `[0, 1]`.
    pub playhead: f64,
    pub legend: Legend,
    pub duration_label: String,
}

impl TimelineView {
    /// Lay out `segments` over a timeline of `duration` seconds.
    ///
    /// Segments falling entirely outside the timeline are dropped; the
    /// rest are clipped to the visible range.
    pub fn render(segments: &[SyncSegment], duration: f64, current_time: f64) -> Self {
        let rects = segments
            .iter()
            .map(|segment| SegmentRect {
                span: mapper::span(segment.start_seconds, segment.end_seconds, duration).clipped(),
                source: segment.source,
                reason: segment.reason,
            })
            .filter(|rect| rect.span.width > 0.0)
            .collect();

        let legend = Legend {
            total_segments: segments.len(),
            patched_gaps: segments.iter().filter(|s| s.is_gap_fill()).count(),
        };

        Self {
            rects,
            playhead: mapper::fraction(current_time, duration).clamp(0.0, 1.0),
            legend,
            duration_label: duration_label(duration),
        }
    }
}

/// Format a duration as `"<m>m <s>s"`.
pub fn duration_label(duration: f64) -> String {
    let total = if duration.is_finite() && duration > 0.0 {
        duration.floor() as u64
    } else {
        0
    };
    format!("{}m {}s", total / 60, total % 60)
}

/// Timeline length: the master's duration when known, else the nominal one.
pub fn timeline_duration(master: Option<&AudioDescriptor>, settings: &TimelineSettings) -> f64 {
    master
        .and_then(|d| d.duration_seconds)
        .filter(|d| d.is_finite() && *d > 0.0)
        .unwrap_or(settings.nominal_duration_secs)
}

/// Simulated playback position that sweeps the timeline in a fixed time.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayheadClock {
    current_time: f64,
    /// Fraction of the timeline covered per tick.
    step_fraction: f64,
}

impl PlayheadClock {
    pub fn new(tick: Duration, settings: &TimelineSettings) -> Self {
        let sweep = settings.playhead_sweep_secs;
        let step_fraction = if sweep.is_finite() && sweep > 0.0 {
            tick.as_secs_f64() / sweep
        } else {
            0.0
        };
        Self {
            current_time: 0.0,
            step_fraction,
        }
    }

    pub fn current_time(&self) -> f64 {
        self.current_time
    }

    pub fn reset(&mut self) {
        self.current_time = 0.0;
    }

    /// Advance one tick, wrapping around at `duration`.
    pub fn advance(&mut self, duration: f64) -> f64 {
        if !duration.is_finite() || duration <= 0.0 {
            self.current_time = 0.0;
            return 0.0;
        }
        let next = (self.current_time + duration * self.step_fraction).rem_euclid(duration);
        // Float drift can leave the head a hair short of the end
        self.current_time = if duration - next < duration * 1e-9 { 0.0 } else { next };
        self.current_time
    }
}

const MASTER_PREFIXES: [&str; 2] = ["Added master segment:", "Added final master segment:"];
const DUB_PREFIX: &str = "Added dub segment:";

/// Rebuild the segment list from the engine's "Added ... segment" lines.
pub fn segments_from_logs(logs: &[LogEntry]) -> Vec<SyncSegment> {
    logs.iter()
        .filter_map(|entry| parse_segment_line(entry.message.trim()))
        .collect()
}

fn parse_segment_line(message: &str) -> Option<SyncSegment> {
    let (rest, source, reason) = if let Some(rest) = message.strip_prefix(DUB_PREFIX) {
        (rest, SegmentSource::OriginalDub, SegmentReason::OriginalDub)
    } else {
        let rest = MASTER_PREFIXES
            .iter()
            .find_map(|prefix| message.strip_prefix(prefix))?;
        (rest, SegmentSource::MasterFill, SegmentReason::GapFill)
    };

    let (start, end) = rest.split_once(" to ")?;
    let start: f64 = start.trim().parse().ok()?;
    let end: f64 = end.trim().parse().ok()?;
    SyncSegment::new(start, end, source, reason)
}
