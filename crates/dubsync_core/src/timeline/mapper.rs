//! Coordinate mapping from seconds to normalized timeline positions.
//!
//! All functions are pure. A non-positive or non-finite duration, or a
//! non-finite time, maps every position to 0 instead of producing NaN.

/// Horizontal placement of a span, as fractions of the timeline width.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Span {
    pub left: f64,
    pub width: f64,
}

impl Span {
    /// Right edge (`left + width`).
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    /// Restrict the span to `[0, 1]`, keeping `left + width <= 1`.
    pub fn clipped(&self) -> Span {
        let left = self.left.clamp(0.0, 1.0);
        let right = self.right().clamp(0.0, 1.0);
        Span {
            left,
            width: (right - left).max(0.0),
        }
    }
}

fn usable(duration: f64) -> bool {
    duration.is_finite() && duration > 0.0
}

/// Position of `t` as a fraction of `duration`.
pub fn fraction(t: f64, duration: f64) -> f64 {
    if !usable(duration) || !t.is_finite() {
        return 0.0;
    }
    t / duration
}

/// Left offset and width of `[start, end]` as fractions of `duration`.
pub fn span(start: f64, end: f64, duration: f64) -> Span {
    if !usable(duration) || !start.is_finite() || !end.is_finite() {
        return Span::default();
    }
    Span {
        left: start / duration,
        width: (end - start) / duration,
    }
}

/// Position of `t` as a percentage of `duration`.
pub fn percent(t: f64, duration: f64) -> f64 {
    100.0 * fraction(t, duration)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_basics() {
        assert_eq!(fraction(25.0, 100.0), 0.25);
        assert_eq!(fraction(0.0, 100.0), 0.0);
        assert_eq!(fraction(100.0, 100.0), 1.0);
        assert_eq!(percent(30.0, 120.0), 25.0);
    }

    #[test]
    fn zero_duration_maps_to_zero() {
        assert_eq!(fraction(10.0, 0.0), 0.0);
        assert_eq!(percent(10.0, 0.0), 0.0);
        assert_eq!(span(0.0, 30.0, 0.0), Span::default());
        assert_eq!(fraction(10.0, -5.0), 0.0);
    }

    #[test]
    fn non_finite_inputs_map_to_zero() {
        assert_eq!(fraction(f64::NAN, 100.0), 0.0);
        assert_eq!(fraction(10.0, f64::INFINITY), 0.0);
        assert_eq!(span(f64::NAN, 10.0, 100.0), Span::default());
        assert!(!percent(f64::INFINITY, 100.0).is_nan());
    }

    #[test]
    fn spans_stay_in_unit_range() {
        // Sweep a grid of valid (start, end) pairs over a few durations
        for duration in [1.0, 7.5, 100.0, 5400.0] {
            for i in 0..=20 {
                for j in i..=20 {
                    let start = duration * i as f64 / 20.0;
                    let end = duration * j as f64 / 20.0;
                    let s = span(start, end, duration);
                    assert!((0.0..=1.0).contains(&s.left), "left {} out of range", s.left);
                    assert!((0.0..=1.0).contains(&s.width), "width {} out of range", s.width);
                    assert!(s.right() <= 1.0 + 1e-12);
                }
            }
        }
    }

    #[test]
    fn clipping() {
        let s = Span {
            left: -0.1,
            width: 0.3,
        }
        .clipped();
        assert_eq!(s.left, 0.0);
        assert!((s.width - 0.2).abs() < 1e-12);

        let s = Span {
            left: 0.9,
            width: 0.5,
        }
        .clipped();
        assert_eq!(s.right(), 1.0);

        let s = Span {
            left: 1.5,
            width: 0.5,
        }
        .clipped();
        assert_eq!(s.width, 0.0);
    }
}
