//! Main window view.
//!
//! Sidebar with connection status, working directory, source slots and
//! the start button; main area with the RMS chart, the timeline and the
//! engine log.

use iced::alignment::{Horizontal, Vertical};
use iced::widget::{button, canvas, column, container, row, scrollable, text, text_input};
use iced::{Background, Border, Color, Element, Font, Length, Theme};

use dubsync_core::models::{JobState, LogEntry, SegmentSource, Slot};
use dubsync_core::timeline::{chart, percent, TimelineView};

use crate::app::{App, Message};
use crate::theme::{self, colors, font, spacing};
use crate::widgets::{RmsChart, TimelineCanvas};

const SIDEBAR_WIDTH: f32 = 320.0;
const CHART_HEIGHT: f32 = 220.0;
const TIMELINE_HEIGHT: f32 = 48.0;

/// Build the main window view.
pub fn view(app: &App) -> Element<'_, Message> {
    let body = row![sidebar(app), main_area(app)].height(Length::Fill);

    container(body)
        .width(Length::Fill)
        .height(Length::Fill)
        .style(panel(colors::BACKGROUND))
        .into()
}

fn panel(background: Color) -> impl Fn(&Theme) -> container::Style {
    move |_theme| container::Style {
        background: Some(Background::Color(background)),
        border: Border {
            color: colors::BADGE_BG,
            width: 1.0,
            radius: 6.0.into(),
        },
        ..Default::default()
    }
}

fn section_label(label: &str) -> Element<'_, Message> {
    text(label.to_uppercase())
        .size(font::SM)
        .color(colors::TEXT_SECONDARY)
        .into()
}

fn badge(label: String, background: Color) -> Element<'static, Message> {
    container(text(label).size(font::SM).color(colors::TEXT_PRIMARY))
        .padding([2, 6])
        .style(panel(background))
        .into()
}

// ---------------------------------------------------------------------------
// Sidebar
// ---------------------------------------------------------------------------

fn sidebar(app: &App) -> Element<'_, Message> {
    let title = column![
        text("DubSync Studio").size(font::HEADER).color(colors::TEXT_PRIMARY),
        text(format!("Local Engine v{}", dubsync_core::version()))
            .size(font::SM)
            .font(Font::MONOSPACE)
            .color(colors::TEXT_MUTED),
    ]
    .spacing(spacing::XS);

    let content = column![
        title,
        connection_banner(app),
        working_dir_section(app),
        column![
            section_label("Source Files"),
            slot_card(app, Slot::Master),
            slot_card(app, Slot::Dub),
        ]
        .spacing(spacing::SM),
        configuration_section(app),
        action_button(app),
    ]
    .spacing(spacing::LG)
    .padding(spacing::XL);

    container(scrollable(content))
        .width(Length::Fixed(SIDEBAR_WIDTH))
        .height(Length::Fill)
        .style(panel(colors::SIDEBAR))
        .into()
}

fn connection_banner(app: &App) -> Element<'_, Message> {
    if let Some(status) = &app.bridge_status {
        return container(text(status.as_str()).size(font::SM).color(colors::WARNING))
            .padding(spacing::SM)
            .width(Length::Fill)
            .style(panel(colors::CARD))
            .into();
    }

    if app.state.connected {
        return container(
            text(format!("Engine connected at {}", app.settings.backend.base_url))
                .size(font::SM)
                .color(colors::SUCCESS),
        )
        .padding(spacing::SM)
        .width(Length::Fill)
        .style(panel(colors::CARD))
        .into();
    }

    container(
        column![
            text("BACKEND DISCONNECTED").size(font::SM).color(colors::ERROR),
            text("Run the sync engine in the folder that holds your audio files.")
                .size(font::SM)
                .color(colors::TEXT_PRIMARY),
        ]
        .spacing(spacing::XS),
    )
    .padding(spacing::SM)
    .width(Length::Fill)
    .style(panel(colors::ERROR_BG))
    .into()
}

fn working_dir_section(app: &App) -> Element<'_, Message> {
    column![
        section_label("Working Directory"),
        text_input("Leave empty to use the engine's folder", &app.working_dir)
            .on_input(Message::WorkingDirChanged)
            .size(font::SM)
            .font(Font::MONOSPACE)
            .padding(spacing::SM),
    ]
    .spacing(spacing::XS)
    .into()
}

fn slot_card(app: &App, slot: Slot) -> Element<'_, Message> {
    let (accent, language) = match slot {
        Slot::Master => (colors::MASTER, "EN-US"),
        Slot::Dub => (colors::DUB, "PT-BR"),
    };

    let body: Element<'_, Message> = if app.state.is_registering(slot) {
        text("Checking with engine...")
            .size(font::NORMAL)
            .color(colors::TEXT_SECONDARY)
            .into()
    } else if let Some(descriptor) = app.state.descriptors.get(slot) {
        column![
            badge(slot.badge().to_string(), accent),
            text(descriptor.name.as_str())
                .size(font::MD)
                .color(colors::TEXT_PRIMARY),
            row![
                badge(descriptor.codec_label().to_string(), colors::BADGE_BG),
                badge(descriptor.channel_label().to_string(), colors::BADGE_BG),
            ]
            .spacing(spacing::XS),
        ]
        .spacing(spacing::XS)
        .into()
    } else {
        row![
            text("Click to select").size(font::NORMAL).color(colors::TEXT_MUTED),
            text(language).size(font::NORMAL).color(accent),
        ]
        .spacing(spacing::XS)
        .into()
    };

    let selectable = app.session.is_some() && !app.state.job.is_active();

    button(container(body).padding(spacing::MD).width(Length::Fill))
        .on_press_maybe(selectable.then_some(Message::BrowseSlot(slot)))
        .width(Length::Fill)
        .style(button::secondary)
        .into()
}

fn configuration_section(app: &App) -> Element<'_, Message> {
    let threshold = row![
        text("Silence Threshold")
            .size(font::NORMAL)
            .color(colors::TEXT_SECONDARY)
            .width(Length::Fill),
        text(format!("{}dB", app.settings.timeline.silence_threshold_db))
            .size(font::NORMAL)
            .font(Font::MONOSPACE)
            .color(colors::DUB),
    ]
    .align_y(Vertical::Center);

    column![
        section_label("Configuration"),
        container(threshold)
            .padding(spacing::MD)
            .width(Length::Fill)
            .style(panel(colors::CARD)),
    ]
    .spacing(spacing::XS)
    .into()
}

/// Label and action of the main button for the current job state.
fn action_for(app: &App) -> (String, Option<Message>) {
    let state = &app.state;
    match state.job {
        JobState::Idle => (
            "Initialize Sync".to_string(),
            state.can_start().then_some(Message::StartPressed),
        ),
        JobState::Analyzing | JobState::Processing => (
            format!("Processing {}%", state.progress.clamp(0.0, 100.0).floor()),
            None,
        ),
        JobState::Completed | JobState::Failed => {
            ("New Sync".to_string(), Some(Message::NewSyncPressed))
        }
    }
}

fn action_button(app: &App) -> Element<'_, Message> {
    let (label, action) = action_for(app);
    let style: fn(&Theme, button::Status) -> button::Style = if action.is_some() {
        button::success
    } else {
        button::secondary
    };

    button(
        text(label)
            .size(font::MD)
            .width(Length::Fill)
            .align_x(Horizontal::Center),
    )
    .on_press_maybe(action)
    .width(Length::Fill)
    .padding(spacing::MD)
    .style(style)
    .into()
}

// ---------------------------------------------------------------------------
// Main area
// ---------------------------------------------------------------------------

fn main_area(app: &App) -> Element<'_, Message> {
    let mut content = column![header_row(app)].spacing(spacing::LG);

    if let Some(notice) = notice_banner(app) {
        content = content.push(notice);
    }

    content = content
        .push(chart_section(app))
        .push(timeline_section(app))
        .push(log_terminal(&app.state.logs));

    container(content)
        .width(Length::Fill)
        .height(Length::Fill)
        .padding(spacing::XL)
        .into()
}

fn header_row(app: &App) -> Element<'_, Message> {
    let estimated = app
        .state
        .descriptors
        .master
        .as_ref()
        .and_then(|d| d.duration_seconds)
        .map(|d| format!("{:.2}s", d))
        .unwrap_or_else(|| "--s".to_string());

    let stat = |label: &'static str, value: String, color: Color| {
        column![
            text(label).size(font::SM).color(colors::TEXT_MUTED),
            text(value).size(font::MD).font(Font::MONOSPACE).color(color),
        ]
        .align_x(Horizontal::Right)
    };

    row![
        column![
            text("Project Timeline").size(font::HEADER).color(colors::TEXT_PRIMARY),
            text("Reference: EN-US (Master) \u{2022} Strategy: Fill Gaps")
                .size(font::NORMAL)
                .color(colors::TEXT_SECONDARY),
        ]
        .spacing(spacing::XS)
        .width(Length::Fill),
        stat("OUTPUT FORMAT", "E-AC3 5.1 / 640kbps".to_string(), colors::DUB),
        stat("EST. DURATION", estimated, colors::MASTER),
    ]
    .spacing(spacing::LG)
    .align_y(Vertical::Center)
    .into()
}

fn notice_banner(app: &App) -> Option<Element<'_, Message>> {
    let notice = app.state.notice.as_ref()?;

    let banner = row![
        column![
            text(notice.title()).size(font::MD).color(colors::ERROR),
            text(notice.to_string())
                .size(font::NORMAL)
                .color(colors::TEXT_PRIMARY),
        ]
        .spacing(spacing::XS)
        .width(Length::Fill),
        button(text("Dismiss").size(font::NORMAL))
            .on_press(Message::DismissNotice)
            .style(button::secondary),
    ]
    .spacing(spacing::MD)
    .align_y(Vertical::Center);

    Some(
        container(banner)
            .padding(spacing::MD)
            .width(Length::Fill)
            .style(panel(colors::ERROR_BG))
            .into(),
    )
}

fn chart_section(app: &App) -> Element<'_, Message> {
    let geometry = chart::build(&app.state.analysis, app.settings.timeline.silence_threshold_db);

    let mut header = row![text("RMS Analyzer & Gap Detection")
        .size(font::MD)
        .color(colors::TEXT_PRIMARY)
        .width(Length::Fill)]
    .spacing(spacing::SM)
    .align_y(Vertical::Center);

    if geometry.simulated {
        header = header.push(badge("SIMULATED".to_string(), colors::BADGE_BG));
    }
    if app.state.job != JobState::Idle {
        header = header.push(
            text("LIVE MONITORING")
                .size(font::SM)
                .font(Font::MONOSPACE)
                .color(colors::TEXT_MUTED),
        );
    }

    let plot: Element<'_, Message> = if geometry.is_empty() {
        container(
            text("WAITING FOR ANALYSIS DATA")
                .size(font::NORMAL)
                .font(Font::MONOSPACE)
                .color(colors::TEXT_MUTED),
        )
        .width(Length::Fill)
        .height(Length::Fixed(CHART_HEIGHT))
        .align_x(Horizontal::Center)
        .align_y(Vertical::Center)
        .style(panel(colors::CARD))
        .into()
    } else {
        canvas(RmsChart::new(geometry))
            .width(Length::Fill)
            .height(Length::Fixed(CHART_HEIGHT))
            .into()
    };

    container(column![header, plot].spacing(spacing::MD))
        .padding(spacing::LG)
        .width(Length::Fill)
        .style(panel(colors::SIDEBAR))
        .into()
}

fn timeline_section(app: &App) -> Element<'_, Message> {
    let state = &app.state;
    let view = TimelineView::render(&state.segments, state.timeline_duration, state.current_time);
    let legend = view.legend;

    let header = row![
        text("TIMELINE COMPOSITION")
            .size(font::SM)
            .font(Font::MONOSPACE)
            .color(colors::TEXT_MUTED)
            .width(Length::Fill),
        text(format!(
            "{:.0}% of {}",
            percent(state.current_time, state.timeline_duration),
            view.duration_label
        ))
        .size(font::SM)
        .font(Font::MONOSPACE)
        .color(colors::TEXT_MUTED),
    ];

    let swatch = |color: Color, label: &'static str| {
        row![
            container(text(" ").size(font::SM))
                .width(Length::Fixed(12.0))
                .style(panel(color)),
            text(label).size(font::SM).color(colors::TEXT_SECONDARY),
        ]
        .spacing(spacing::XS)
        .align_y(Vertical::Center)
    };

    let legend_row = row![
        swatch(theme::for_source(SegmentSource::OriginalDub), "PT-BR (Original Dub)"),
        swatch(theme::for_source(SegmentSource::MasterFill), "EN-US (Master Fill)"),
        text(format!(
            "Total Segments: {}  |  Patched Gaps: {}",
            legend.total_segments, legend.patched_gaps
        ))
        .size(font::SM)
        .color(colors::TEXT_MUTED)
        .width(Length::Fill)
        .align_x(Horizontal::Right),
    ]
    .spacing(spacing::LG)
    .align_y(Vertical::Center);

    let strip = canvas(TimelineCanvas::new(view))
        .width(Length::Fill)
        .height(Length::Fixed(TIMELINE_HEIGHT));

    container(column![header, strip, legend_row].spacing(spacing::SM))
        .padding(spacing::LG)
        .width(Length::Fill)
        .style(panel(colors::SIDEBAR))
        .into()
}

fn log_terminal(logs: &[LogEntry]) -> Element<'_, Message> {
    let header = text("PROCESS LOG / FFMPEG OUTPUT")
        .size(font::SM)
        .font(Font::MONOSPACE)
        .color(colors::TEXT_SECONDARY);

    let lines: Element<'_, Message> = if logs.is_empty() {
        text("Waiting for process to start...")
            .size(font::SM)
            .font(Font::MONOSPACE)
            .color(colors::TEXT_MUTED)
            .into()
    } else {
        column(logs.iter().map(log_line))
            .spacing(spacing::XS)
            .into()
    };

    container(
        column![
            header,
            scrollable(lines)
                .anchor_bottom()
                .width(Length::Fill)
                .height(Length::Fill),
        ]
        .spacing(spacing::SM),
    )
    .padding(spacing::MD)
    .width(Length::Fill)
    .height(Length::Fill)
    .style(panel(colors::TERMINAL))
    .into()
}

fn log_line(entry: &LogEntry) -> Element<'_, Message> {
    let color = theme::for_severity(entry.level);
    row![
        text(format!("[{}]", entry.timestamp))
            .size(font::SM)
            .font(Font::MONOSPACE)
            .color(colors::TEXT_MUTED),
        text(format!("{:?}", entry.level).to_uppercase())
            .size(font::SM)
            .font(Font::MONOSPACE)
            .color(color)
            .width(Length::Fixed(64.0)),
        text(entry.message.as_str())
            .size(font::SM)
            .font(Font::MONOSPACE)
            .color(color),
    ]
    .spacing(spacing::MD)
    .into()
}
