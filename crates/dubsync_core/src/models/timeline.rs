//! Sync result structures: segments and level-analysis samples.

use serde::{Deserialize, Serialize};

use super::enums::{SegmentReason, SegmentSource};

/// A span of the output timeline and where its audio comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSegment {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub source: SegmentSource,
    pub reason: SegmentReason,
}

impl SyncSegment {
    /// Create a segment, rejecting empty, reversed or non-finite spans.
    pub fn new(
        start_seconds: f64,
        end_seconds: f64,
        source: SegmentSource,
        reason: SegmentReason,
    ) -> Option<Self> {
        let valid =
            start_seconds.is_finite() && end_seconds.is_finite() && end_seconds > start_seconds;
        valid.then_some(Self {
            start_seconds,
            end_seconds,
            source,
            reason,
        })
    }

    pub fn duration(&self) -> f64 {
        self.end_seconds - self.start_seconds
    }

    pub fn is_gap_fill(&self) -> bool {
        self.source == SegmentSource::MasterFill
    }
}

/// RMS levels of both tracks at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSample {
    pub time_seconds: f64,
    pub rms_master_db: f64,
    pub rms_dub_db: f64,
    /// Dub is silent here while the master is not.
    pub is_gap: bool,
}

/// Level-analysis samples for the chart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSeries {
    pub samples: Vec<AnalysisSample>,
    /// Placeholder data, not measured by the engine.
    pub simulated: bool,
}

impl AnalysisSeries {
    pub fn measured(samples: Vec<AnalysisSample>) -> Self {
        Self {
            samples,
            simulated: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Time of the last sample, or 0 for an empty series.
    pub fn span_seconds(&self) -> f64 {
        self.samples
            .last()
            .map(|s| s.time_seconds)
            .filter(|t| t.is_finite() && *t > 0.0)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segment_rejects_bad_spans() {
        let src = SegmentSource::OriginalDub;
        let why = SegmentReason::OriginalDub;
        assert!(SyncSegment::new(0.0, 10.0, src, why).is_some());
        assert!(SyncSegment::new(10.0, 10.0, src, why).is_none());
        assert!(SyncSegment::new(10.0, 5.0, src, why).is_none());
        assert!(SyncSegment::new(f64::NAN, 5.0, src, why).is_none());
    }

    #[test]
    fn series_span() {
        assert_eq!(AnalysisSeries::default().span_seconds(), 0.0);
        let series = AnalysisSeries::measured(vec![
            AnalysisSample {
                time_seconds: 0.0,
                rms_master_db: -12.0,
                rms_dub_db: -14.0,
                is_gap: false,
            },
            AnalysisSample {
                time_seconds: 4.0,
                rms_master_db: -11.0,
                rms_dub_db: -90.0,
                is_gap: true,
            },
        ]);
        assert_eq!(series.span_seconds(), 4.0);
        assert!(!series.simulated);
    }
}
