//! RMS chart geometry.
//!
//! Levels are mapped onto a fixed [-100, 0] dB domain: 0.0 is the bottom
//! of the chart (-100 dB), 1.0 the top (0 dB).

use crate::models::AnalysisSeries;

use super::mapper::{self, Span};

pub const DB_FLOOR: f64 = -100.0;
pub const DB_CEILING: f64 = 0.0;

/// A point in chart space, both coordinates in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub level: f64,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChartGeometry {
    pub master: Vec<ChartPoint>,
    pub dub: Vec<ChartPoint>,
    /// Horizontal bands where the dub is missing.
    pub gap_bands: Vec<Span>,
    /// Height of the silence threshold line.
    pub threshold_level: f64,
    pub simulated: bool,
}

impl ChartGeometry {
    pub fn is_empty(&self) -> bool {
        self.master.is_empty()
    }
}

/// Normalize a dB value into `[0, 1]`.
pub fn level_fraction(db: f64) -> f64 {
    if !db.is_finite() {
        return 0.0;
    }
    ((db - DB_FLOOR) / (DB_CEILING - DB_FLOOR)).clamp(0.0, 1.0)
}

/// Build the chart polylines, gap bands and threshold for `series`.
pub fn build(series: &AnalysisSeries, silence_threshold_db: f64) -> ChartGeometry {
    let span = series.span_seconds();
    let samples = &series.samples;

    let point = |time: f64, db: f64| ChartPoint {
        x: mapper::fraction(time, span).clamp(0.0, 1.0),
        level: level_fraction(db),
    };

    let master = samples
        .iter()
        .map(|s| point(s.time_seconds, s.rms_master_db))
        .collect();
    let dub = samples
        .iter()
        .map(|s| point(s.time_seconds, s.rms_dub_db))
        .collect();

    let mut gap_bands = Vec::new();
    let mut run_start: Option<usize> = None;
    for (index, sample) in samples.iter().enumerate() {
        match (sample.is_gap, run_start) {
            (true, None) => run_start = Some(index),
            (false, Some(start)) => {
                gap_bands.push(band(series, start, index, span));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        gap_bands.push(band(series, start, samples.len() - 1, span));
    }

    ChartGeometry {
        master,
        dub,
        gap_bands: gap_bands.into_iter().filter(|b| b.width > 0.0).collect(),
        threshold_level: level_fraction(silence_threshold_db),
        simulated: series.simulated,
    }
}

// Band from the first gap sample up to the sample that ended the run.
fn band(series: &AnalysisSeries, first: usize, end: usize, span: f64) -> Span {
    let start = series.samples[first].time_seconds;
    let end = series.samples[end].time_seconds;
    mapper::span(start, end, span).clipped()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AnalysisSample;

    fn sample(t: f64, gap: bool) -> AnalysisSample {
        AnalysisSample {
            time_seconds: t,
            rms_master_db: -12.0,
            rms_dub_db: if gap { -90.0 } else { -14.0 },
            is_gap: gap,
        }
    }

    #[test]
    fn levels_normalize_to_domain() {
        assert_eq!(level_fraction(0.0), 1.0);
        assert_eq!(level_fraction(-100.0), 0.0);
        assert_eq!(level_fraction(-60.0), 0.4);
        assert_eq!(level_fraction(-140.0), 0.0);
        assert_eq!(level_fraction(6.0), 1.0);
        assert_eq!(level_fraction(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn gap_runs_become_bands() {
        let samples: Vec<_> = (0..=10)
            .map(|i| sample(i as f64, (3..5).contains(&i) || i >= 9))
            .collect();
        let geometry = build(&AnalysisSeries::measured(samples), -60.0);

        assert_eq!(geometry.master.len(), 11);
        assert_eq!(geometry.gap_bands.len(), 2);
        assert!((geometry.gap_bands[0].left - 0.3).abs() < 1e-12);
        assert!((geometry.gap_bands[0].width - 0.2).abs() < 1e-12);
        assert!((geometry.gap_bands[1].right() - 1.0).abs() < 1e-12);
        assert!((geometry.threshold_level - 0.4).abs() < 1e-12);
        assert!(!geometry.simulated);
    }

    #[test]
    fn empty_series_builds_empty_chart() {
        let geometry = build(&AnalysisSeries::default(), -60.0);
        assert!(geometry.is_empty());
        assert!(geometry.gap_bands.is_empty());
    }
}
