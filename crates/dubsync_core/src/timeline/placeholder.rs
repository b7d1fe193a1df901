//! Placeholder level data shown while a job runs.
//!
//! The engine does not report RMS levels yet, so the chart is seeded with
//! a synthetic series. It is always flagged as simulated.

use rand::Rng;

use crate::models::{AnalysisSample, AnalysisSeries};

/// Gap windows, as percentages of the series length (exclusive bounds).
const GAP_WINDOWS: [(f64, f64); 2] = [(30.0, 45.0), (70.0, 75.0)];

const DUB_SILENCE_DB: f64 = -90.0;
const BASE_DB: f64 = -12.0;

fn in_gap(index: usize, points: usize) -> bool {
    let pct = index as f64 * 100.0 / points as f64;
    GAP_WINDOWS
        .iter()
        .any(|(start, end)| pct > *start && pct < *end)
}

/// Generate `points` one-second samples with two dub dropouts.
pub fn generate<R: Rng + ?Sized>(points: usize, rng: &mut R) -> AnalysisSeries {
    let samples = (0..points)
        .map(|i| {
            let is_gap = in_gap(i, points);
            let master = BASE_DB + rng.random::<f64>() * 2.0;
            let dub = if is_gap {
                DUB_SILENCE_DB
            } else {
                BASE_DB + rng.random::<f64>() * 4.0
            };
            AnalysisSample {
                time_seconds: i as f64,
                rms_master_db: master,
                rms_dub_db: dub,
                is_gap,
            }
        })
        .collect();

    AnalysisSeries {
        samples,
        simulated: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn series_is_flagged_simulated() {
        let mut rng = StdRng::seed_from_u64(7);
        let series = generate(100, &mut rng);
        assert!(series.simulated);
        assert_eq!(series.samples.len(), 100);
    }

    #[test]
    fn gap_windows_match_layout() {
        let mut rng = StdRng::seed_from_u64(1);
        let series = generate(100, &mut rng);
        let gaps: Vec<usize> = series
            .samples
            .iter()
            .enumerate()
            .filter(|(_, s)| s.is_gap)
            .map(|(i, _)| i)
            .collect();

        let expected: Vec<usize> = (31..45).chain(71..75).collect();
        assert_eq!(gaps, expected);

        for sample in &series.samples {
            assert!((-12.0..=-10.0).contains(&sample.rms_master_db));
            if sample.is_gap {
                assert_eq!(sample.rms_dub_db, -90.0);
            } else {
                assert!((-12.0..=-8.0).contains(&sample.rms_dub_db));
            }
        }
    }

    #[test]
    fn same_seed_same_series() {
        let a = generate(20, &mut StdRng::seed_from_u64(42));
        let b = generate(20, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn zero_points() {
        let series = generate(0, &mut StdRng::seed_from_u64(0));
        assert!(series.is_empty());
    }
}
