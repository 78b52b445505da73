use crate::app::App;
use crate::theme::Theme;
use chrono::Utc;
use journey_api_client::ClientFactory;
use journey_core::stats::{current_streak, daily_counts};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

const WEEK: usize = 7;

/// Writing habit: current streak and the last seven days.
pub fn render<F: ClientFactory>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let entries = app.controller.entries();
    let today = Utc::now().date_naive();
    let streak = current_streak(entries, today);
    let week = daily_counts(entries, WEEK, today);
    let written_today = week.last().map(|(_, n)| *n).unwrap_or(0);
    let active_days = week.iter().filter(|(_, n)| *n > 0).count();

    let streak_color = if streak > 0 {
        Theme::ACCENT_GREEN
    } else {
        Theme::TEXT_MUTED
    };
    let mut lines = vec![
        Line::from(vec![
            Span::styled("Current streak  ", Style::new().fg(Theme::TEXT_SECONDARY)),
            Span::styled(
                format!("{streak} day{}", if streak == 1 { "" } else { "s" }),
                Style::new().fg(streak_color).bold(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Written today   ", Style::new().fg(Theme::TEXT_SECONDARY)),
            Span::styled(
                written_today.to_string(),
                Style::new().fg(Theme::TEXT_PRIMARY).bold(),
            ),
        ]),
        Line::from(vec![
            Span::styled("Active days     ", Style::new().fg(Theme::TEXT_SECONDARY)),
            Span::styled(
                format!("{active_days} of the last {WEEK}"),
                Style::new().fg(Theme::TEXT_PRIMARY),
            ),
        ]),
        Line::raw(""),
    ];

    for (day, count) in week.iter().rev() {
        let (mark, color) = if *count > 0 {
            ("\u{25A0}".repeat((*count).min(20)), Theme::ACCENT_TEAL)
        } else {
            ("\u{00B7}".to_string(), Theme::BAR_DIM)
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("{:<14}", day.format("%a %b %d")),
                Style::new().fg(Theme::TEXT_SECONDARY),
            ),
            Span::styled(mark, Style::new().fg(color)),
            Span::styled(
                if *count > 0 {
                    format!(" {count}")
                } else {
                    String::new()
                },
                Style::new().fg(Theme::TEXT_MUTED),
            ),
        ]));
    }

    frame.render_widget(
        Paragraph::new(lines).block(
            Theme::block()
                .title(" Personal Tracking ")
                .padding(Theme::PADDING_CARD),
        ),
        area,
    );
}
