use crate::app::{App, Focus};
use crate::theme::{Theme, input_line};
use journey_api_client::ClientFactory;
use ratatui::prelude::*;
use ratatui::widgets::{Padding, Paragraph, Wrap};

pub fn render<F: ClientFactory>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let [title_area, new_area, key_area, rest] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    render_title(frame, title_area, "Your private research journal.");

    // ── New journal ──────────────────────────────────────────────────
    let new_block = Theme::block().title(" New here? ").padding(Theme::PADDING_COMPACT);
    let new_text = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("Press ", Style::new().fg(Theme::TEXT_SECONDARY)),
            Span::styled("g", Style::new().fg(Theme::ACCENT_YELLOW).bold()),
            Span::styled(
                " to create an anonymous access key.",
                Style::new().fg(Theme::TEXT_SECONDARY),
            ),
        ]),
        Line::from(Span::styled(
            "No email, no password: the key is your identity.",
            Style::new().fg(Theme::TEXT_MUTED),
        )),
    ])
    .block(new_block);
    frame.render_widget(new_text, new_area);

    // ── Existing key ─────────────────────────────────────────────────
    let focused = app.focus == Some(Focus::KeyInput);
    let key_input = Paragraph::new(input_line(
        app.input(Focus::KeyInput),
        "press i to enter your key",
        focused,
    ))
    .block(Theme::input_block("Sign in with your key", focused));
    frame.render_widget(key_input, key_area);

    if let Some(err) = app.controller.error() {
        let [_, err_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(2)]).areas(rest);
        frame.render_widget(
            Paragraph::new(Span::styled(
                format!(" {err}"),
                Style::new().fg(Theme::ACCENT_RED),
            ))
            .wrap(Wrap { trim: true }),
            err_area,
        );
    }
}

/// Title card shared by the welcome and onboarding screens.
pub fn render_title(frame: &mut Frame, area: Rect, subtitle: &str) {
    let title = Paragraph::new(vec![
        Line::from(Span::styled(
            "journey",
            Style::new().fg(Theme::ACCENT_ORANGE).bold(),
        )),
        Line::from(Span::styled(
            subtitle.to_string(),
            Style::new().fg(Theme::TEXT_SECONDARY),
        )),
    ])
    .block(Theme::block().padding(Padding::new(2, 2, 0, 0)));
    frame.render_widget(title, area);
}
