//! Theme configuration for DubSync Panel.
//!
//! This module provides theming for iced and custom colors.

use iced::Color;

use dubsync_core::models::{SegmentSource, Severity};

/// Application theme colors (dark studio palette).
pub mod colors {
    use super::Color;

    /// Background color
    pub const BACKGROUND: Color = Color::from_rgb(0.05, 0.06, 0.08);

    /// Sidebar background
    pub const SIDEBAR: Color = Color::from_rgb(0.08, 0.09, 0.11);

    /// Card/panel background
    pub const CARD: Color = Color::from_rgb(0.11, 0.12, 0.15);

    /// Terminal background
    pub const TERMINAL: Color = Color::from_rgb(0.02, 0.03, 0.04);

    /// Master track (blue)
    pub const MASTER: Color = Color::from_rgb(0.23, 0.51, 0.96);

    /// Dub track (emerald)
    pub const DUB: Color = Color::from_rgb(0.06, 0.73, 0.51);

    /// Playhead and silence threshold
    pub const PLAYHEAD: Color = Color::from_rgb(0.94, 0.27, 0.27);

    /// Gap band overlay on the RMS chart
    pub const GAP_BAND: Color = Color::from_rgba(0.94, 0.27, 0.27, 0.12);

    /// Connected banner
    pub const SUCCESS: Color = Color::from_rgb(0.13, 0.77, 0.37);

    /// Warning text
    pub const WARNING: Color = Color::from_rgb(0.92, 0.70, 0.03);

    /// Error text and disconnected banner
    pub const ERROR: Color = Color::from_rgb(0.94, 0.27, 0.27);

    /// Notice banner background
    pub const ERROR_BG: Color = Color::from_rgb(0.27, 0.08, 0.08);

    /// Text primary
    pub const TEXT_PRIMARY: Color = Color::from_rgb(0.93, 0.93, 0.93);

    /// Text secondary
    pub const TEXT_SECONDARY: Color = Color::from_rgb(0.58, 0.62, 0.68);

    /// Text muted
    pub const TEXT_MUTED: Color = Color::from_rgb(0.38, 0.41, 0.46);

    /// Grid lines
    pub const GRID: Color = Color::from_rgba(1.0, 1.0, 1.0, 0.05);

    /// Badge background
    pub const BADGE_BG: Color = Color::from_rgb(0.17, 0.19, 0.23);
}

/// Color for an engine log line.
pub fn for_severity(level: Severity) -> Color {
    match level {
        Severity::Info => colors::TEXT_SECONDARY,
        Severity::Warn => colors::WARNING,
        Severity::Error => colors::ERROR,
        Severity::Success => colors::SUCCESS,
    }
}

/// Fill color for a timeline segment.
pub fn for_source(source: SegmentSource) -> Color {
    match source {
        SegmentSource::MasterFill => colors::MASTER,
        SegmentSource::OriginalDub => colors::DUB,
    }
}

/// Spacing constants.
pub mod spacing {
    /// Extra small spacing (4px)
    pub const XS: f32 = 4.0;
    /// Small spacing (8px)
    pub const SM: f32 = 8.0;
    /// Medium spacing (12px)
    pub const MD: f32 = 12.0;
    /// Large spacing (16px)
    pub const LG: f32 = 16.0;
    /// Extra large spacing (24px)
    pub const XL: f32 = 24.0;
}

/// Font sizes.
pub mod font {
    /// Small font size
    pub const SM: f32 = 11.0;
    /// Normal font size
    pub const NORMAL: f32 = 13.0;
    /// Medium font size
    pub const MD: f32 = 14.0;
    /// Large font size
    pub const LG: f32 = 16.0;
    /// Header font size
    pub const HEADER: f32 = 18.0;
}
