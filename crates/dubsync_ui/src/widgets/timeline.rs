//! Timeline composition canvas.
//!
//! Draws the segment layout produced by [`TimelineView`]: a 12-column
//! grid, one rectangle per segment colored by source, and the playhead.
//! Labels and the legend are regular widgets around the canvas.

use iced::widget::canvas::{Frame, Geometry, Path, Program, Stroke};
use iced::{mouse, Color, Point, Rectangle, Size, Theme};

use dubsync_core::models::SegmentSource;
use dubsync_core::timeline::TimelineView;

use crate::theme::{self, colors};

const GRID_COLUMNS: usize = 12;
const STRIPE_SPACING: f32 = 10.0;

/// Canvas program for one rendered timeline.
#[derive(Debug, Clone)]
pub struct TimelineCanvas {
    view: TimelineView,
}

impl TimelineCanvas {
    pub fn new(view: TimelineView) -> Self {
        Self { view }
    }
}

impl<Message> Program<Message> for TimelineCanvas {
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
        let width = bounds.width;
        let height = bounds.height;

        frame.fill_rectangle(Point::ORIGIN, bounds.size(), colors::CARD);

        for column in 1..GRID_COLUMNS {
            let x = width * column as f32 / GRID_COLUMNS as f32;
            frame.stroke(
                &Path::line(Point::new(x, 0.0), Point::new(x, height)),
                Stroke::default().with_color(colors::GRID).with_width(1.0),
            );
        }

        for rect in &self.view.rects {
            let (x, w) = to_pixels(rect.span.left, rect.span.width, width);
            let fill = Color {
                a: 0.8,
                ..theme::for_source(rect.source)
            };
            frame.fill_rectangle(Point::new(x, 0.0), Size::new(w, height), fill);

            // Patched gaps get a light stripe pattern
            if rect.source == SegmentSource::MasterFill {
                let stripe = Color::from_rgba(1.0, 1.0, 1.0, 0.15);
                let mut sx = x + STRIPE_SPACING / 2.0;
                while sx < x + w {
                    frame.stroke(
                        &Path::line(Point::new(sx, 0.0), Point::new(sx, height)),
                        Stroke::default().with_color(stripe).with_width(2.0),
                    );
                    sx += STRIPE_SPACING;
                }
            }
        }

        let (playhead_x, _) = to_pixels(self.view.playhead, 0.0, width);
        frame.stroke(
            &Path::line(Point::new(playhead_x, 0.0), Point::new(playhead_x, height)),
            Stroke::default().with_color(colors::PLAYHEAD).with_width(2.0),
        );

        vec![frame.into_geometry()]
    }
}

/// Convert a normalized span to pixel x and width.
fn to_pixels(left: f64, width: f64, total: f32) -> (f32, f32) {
    let x = (left.clamp(0.0, 1.0) as f32) * total;
    let w = (width.max(0.0) as f32) * total;
    (x, w.min(total - x))
}
