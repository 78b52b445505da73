use crate::app::App;
use crate::theme::Theme;
use chrono::Utc;
use journey_api_client::ClientFactory;
use journey_core::format::local_timestamp;
use journey_core::stats::{daily_counts, entry_stats};
use ratatui::prelude::*;
use ratatui::widgets::{BarChart, Paragraph};

const CHART_DAYS: usize = 14;

/// Totals over the loaded entries plus a two-week activity chart.
pub fn render<F: ClientFactory>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let [summary_area, chart_area] =
        Layout::vertical([Constraint::Length(9), Constraint::Fill(1)]).areas(area);

    let entries = app.controller.entries();
    let stats = entry_stats(entries);
    let label = Style::new().fg(Theme::TEXT_SECONDARY);
    let value = Style::new().fg(Theme::TEXT_PRIMARY).bold();
    let when = |at: Option<chrono::DateTime<Utc>>| {
        at.map(|t| local_timestamp(&t, &app.date_format))
            .unwrap_or_else(|| "-".to_string())
    };

    let rows = [
        ("Entries", stats.entry_count.to_string()),
        ("Words", stats.word_count.to_string()),
        ("Avg words / entry", format!("{:.1}", stats.average_words)),
        ("Longest entry", format!("{} chars", stats.longest_chars)),
        ("First entry", when(stats.first_entry_at)),
        ("Latest entry", when(stats.last_entry_at)),
    ];
    let lines: Vec<Line> = rows
        .into_iter()
        .map(|(name, v)| {
            Line::from(vec![
                Span::styled(format!("{name:<20}"), label),
                Span::styled(v, value),
            ])
        })
        .collect();
    frame.render_widget(
        Paragraph::new(lines).block(
            Theme::block()
                .title(" Analytics ")
                .padding(Theme::PADDING_COMPACT),
        ),
        summary_area,
    );

    let today = Utc::now().date_naive();
    let counts = daily_counts(entries, CHART_DAYS, today);
    let labels: Vec<String> = counts.iter().map(|(d, _)| d.format("%d").to_string()).collect();
    let data: Vec<(&str, u64)> = labels
        .iter()
        .zip(&counts)
        .map(|(l, (_, n))| (l.as_str(), *n as u64))
        .collect();

    let chart = BarChart::default()
        .block(Theme::block().title(format!(" Entries per day (last {CHART_DAYS} days) ")))
        .data(data.as_slice())
        .bar_width(3)
        .bar_gap(1)
        .bar_style(Style::new().fg(Theme::BAR))
        .value_style(Style::new().fg(Color::Black).bg(Theme::BAR))
        .label_style(Style::new().fg(Theme::TEXT_MUTED));
    frame.render_widget(chart, chart_area);
}
