use crate::app::{App, Focus};
use crate::theme::{Theme, input_line};
use crate::views::welcome::render_title;
use journey_api_client::ClientFactory;
use ratatui::prelude::*;
use ratatui::widgets::{Paragraph, Wrap};

/// Key shown once, name requested.
pub fn render<F: ClientFactory>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let [title_area, key_area, name_area, rest] = Layout::vertical([
        Constraint::Length(5),
        Constraint::Length(7),
        Constraint::Length(3),
        Constraint::Fill(1),
    ])
    .areas(area);

    render_title(frame, title_area, "One more step: pick a name.");

    let key = app
        .controller
        .state()
        .key()
        .map(|k| k.as_str().to_string())
        .unwrap_or_default();
    let key_card = Paragraph::new(vec![
        Line::from(Span::styled(
            "Your access key:",
            Style::new().fg(Theme::TEXT_SECONDARY),
        )),
        Line::from(Span::styled(key, Style::new().fg(Theme::ACCENT_GREEN).bold())),
        Line::raw(""),
        Line::from(Span::styled(
            "Save this key. It is the only way to sign back in.",
            Style::new().fg(Theme::ACCENT_YELLOW),
        )),
    ])
    .block(Theme::block_accent().title(" Save this ").padding(Theme::PADDING_COMPACT))
    .wrap(Wrap { trim: false });
    frame.render_widget(key_card, key_area);

    let focused = app.focus == Some(Focus::NameInput);
    let name_input = Paragraph::new(input_line(
        app.input(Focus::NameInput),
        "press i to enter your name",
        focused,
    ))
    .block(Theme::input_block("Your name", focused));
    frame.render_widget(name_input, name_area);

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
