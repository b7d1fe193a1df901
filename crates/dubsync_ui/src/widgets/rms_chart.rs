//! RMS analyzer canvas.
//!
//! Plots master and dub levels from [`ChartGeometry`], shades the gap
//! bands and draws the dashed silence threshold.

use iced::widget::canvas::{Frame, Geometry, LineDash, Path, Program, Stroke};
use iced::{mouse, Color, Point, Rectangle, Size, Theme};

use dubsync_core::timeline::{ChartGeometry, ChartPoint};

use crate::theme::colors;

/// Canvas program for one chart.
#[derive(Debug, Clone)]
pub struct RmsChart {
    geometry: ChartGeometry,
}

impl RmsChart {
    pub fn new(geometry: ChartGeometry) -> Self {
        Self { geometry }
    }
}

impl<Message> Program<Message> for RmsChart {
    type State = ();

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &iced::Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: mouse::Cursor,
    ) -> Vec<Geometry> {
        let mut frame = Frame::new(renderer, bounds.size());
        let size = bounds.size();

        frame.fill_rectangle(Point::ORIGIN, size, colors::CARD);

        if self.geometry.is_empty() {
            return vec![frame.into_geometry()];
        }

        for band in &self.geometry.gap_bands {
            let x = band.left as f32 * size.width;
            let w = band.width as f32 * size.width;
            frame.fill_rectangle(Point::new(x, 0.0), Size::new(w, size.height), colors::GAP_BAND);
        }

        draw_area(&mut frame, &self.geometry.master, size, colors::MASTER);
        draw_area(&mut frame, &self.geometry.dub, size, colors::DUB);

        let y = level_to_y(self.geometry.threshold_level, size.height);
        frame.stroke(
            &Path::line(Point::new(0.0, y), Point::new(size.width, y)),
            Stroke {
                line_dash: LineDash {
                    segments: &[3.0, 3.0],
                    offset: 0,
                },
                ..Stroke::default().with_color(colors::PLAYHEAD).with_width(1.0)
            },
        );

        vec![frame.into_geometry()]
    }
}

// Filled area under a level polyline, with the line on top.
fn draw_area(frame: &mut Frame, points: &[ChartPoint], size: Size, color: Color) {
    let Some(first) = points.first() else {
        return;
    };
    let last = points.last().unwrap_or(first);

    let to_point =
        |p: &ChartPoint| Point::new(p.x as f32 * size.width, level_to_y(p.level, size.height));

    let line = Path::new(|builder| {
        builder.move_to(to_point(first));
        for point in &points[1..] {
            builder.line_to(to_point(point));
        }
    });

    let area = Path::new(|builder| {
        builder.move_to(Point::new(first.x as f32 * size.width, size.height));
        for point in points {
            builder.line_to(to_point(point));
        }
        builder.line_to(Point::new(last.x as f32 * size.width, size.height));
        builder.close();
    });

    frame.fill(&area, Color { a: 0.15, ..color });
    frame.stroke(&line, Stroke::default().with_color(color).with_width(2.0));
}

/// Chart level (0 bottom, 1 top) to canvas y.
fn level_to_y(level: f64, height: f32) -> f32 {
    (1.0 - level.clamp(0.0, 1.0) as f32) * height
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn levels_map_top_down() {
        assert_eq!(level_to_y(1.0, 200.0), 0.0);
        assert_eq!(level_to_y(0.0, 200.0), 200.0);
        assert!((level_to_y(0.4, 100.0) - 60.0).abs() < 1e-3);
    }

    #[test]
    fn out_of_range_levels_are_clamped() {
        assert_eq!(level_to_y(1.5, 100.0), 0.0);
        assert_eq!(level_to_y(-0.5, 100.0), 100.0);
    }
}
