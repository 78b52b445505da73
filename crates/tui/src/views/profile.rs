use crate::app::App;
use crate::theme::Theme;
use journey_api_client::ClientFactory;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

pub fn render<F: ClientFactory>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let state = app.controller.state();
    let greeting = match state.name() {
        Some(name) => format!("Welcome, {name}. This is your profile page."),
        None => "This is your profile page.".to_string(),
    };
    let key = state
        .key()
        .map(|k| k.as_str().to_string())
        .unwrap_or_default();

    let lines = vec![
        Line::from(Span::styled(
            greeting,
            Style::new().fg(Theme::TEXT_PRIMARY).bold(),
        )),
        Line::from(Span::styled(
            "You are signed in anonymously.",
            Style::new().fg(Theme::TEXT_SECONDARY),
        )),
        Line::raw(""),
        Line::from(Span::styled(
            "Access key",
            Style::new().fg(Theme::TEXT_SECONDARY),
        )),
        Line::from(Span::styled(key, Style::new().fg(Theme::ACCENT_GREEN))),
        Line::raw(""),
        Line::from(Span::styled(
            "Keep this key somewhere safe. Anyone holding it can read and edit this journal, and it cannot be recovered.",
            Style::new().fg(Theme::ACCENT_YELLOW),
        )),
        Line::raw(""),
        Line::from(vec![
            Span::styled("Press ", Style::new().fg(Theme::TEXT_MUTED)),
            Span::styled("S", Style::new().fg(Theme::TEXT_KEY).bold()),
            Span::styled(" to sign out.", Style::new().fg(Theme::TEXT_MUTED)),
        ]),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Theme::block().title(" Profile ").padding(Theme::PADDING_CARD)),
        area,
    );
}
