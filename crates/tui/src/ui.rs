use crate::app::{App, FlashLevel, Focus};
use crate::theme::{Theme, hint_line};
use crate::views::{
    analytics, journal, modal, onboarding, profile, tab_bar, tracking, welcome,
};
use journey_api_client::ClientFactory;
use journey_client::{Page, Screen};
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render<F: ClientFactory>(frame: &mut Frame, app: &App<F>) {
    match app.screen() {
        Screen::Welcome | Screen::Onboarding => render_identity(frame, app),
        Screen::Journal(page) => render_journal(frame, app, page),
    }

    if let Some(ref m) = app.modal {
        modal::render(frame, m);
    }
}

/// Welcome and onboarding are full-screen, no tab bar.
fn render_identity<F: ClientFactory>(frame: &mut Frame, app: &App<F>) {
    let [body_area, status_area, footer_area] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    match app.screen() {
        Screen::Onboarding => onboarding::render(frame, app, body_area),
        _ => welcome::render(frame, app, body_area),
    }
    render_status(frame, app, status_area, false);
    render_footer(frame, app, footer_area);
}

fn render_journal<F: ClientFactory>(frame: &mut Frame, app: &App<F>, page: Page) {
    let [tab_area, header_area, body_area, status_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    tab_bar::render(frame, page, tab_area);
    render_header(frame, app, header_area);

    match page {
        Page::Main => journal::render(frame, app, body_area),
        Page::Analytics => analytics::render(frame, app, body_area),
        Page::Tracking => tracking::render(frame, app, body_area),
        Page::Profile => profile::render(frame, app, body_area),
    }

    render_status(frame, app, status_area, true);
    render_footer(frame, app, footer_area);
}

fn render_header<F: ClientFactory>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let block = Theme::block();
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let state = app.controller.state();
    let mut spans = vec![
        Span::styled(" journey ", Style::new().fg(Theme::ACCENT_ORANGE).bold()),
        Span::styled(" ", Style::new()),
        Span::styled(
            state.name().unwrap_or_default().to_string(),
            Style::new().fg(Theme::TEXT_PRIMARY),
        ),
        Span::styled(
            format!("  key {}", state.key().map(|k| k.short()).unwrap_or_default()),
            Style::new().fg(Theme::TEXT_MUTED),
        ),
    ];
    if app.busy() {
        spans.push(Span::styled(
            "  Working...",
            Style::new().fg(Theme::ACCENT_YELLOW).italic(),
        ));
    } else {
        spans.push(Span::styled(
            format!("  {} entries", app.controller.entries().len()),
            Style::new().fg(Theme::TEXT_SECONDARY),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// One status line: a flash message, else the controller's error.
/// Identity screens render their own error next to the input.
fn render_status<F: ClientFactory>(frame: &mut Frame, app: &App<F>, area: Rect, show_error: bool) {
    let line = if let Some((msg, level)) = &app.flash_message {
        let color = match level {
            FlashLevel::Success => Theme::ACCENT_GREEN,
            FlashLevel::Info => Theme::ACCENT_BLUE,
        };
        Line::from(Span::styled(format!(" {msg}"), Style::new().fg(color)))
    } else if let (true, Some(err)) = (show_error, app.controller.error()) {
        Line::from(Span::styled(
            format!(" {err}"),
            Style::new().fg(Theme::ACCENT_RED),
        ))
    } else if app.busy() {
        Line::from(Span::styled(
            " Working...",
            Style::new().fg(Theme::ACCENT_YELLOW).italic(),
        ))
    } else {
        Line::raw("")
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn render_footer<F: ClientFactory>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let hints: &[(&str, &str)] = match (app.focus, app.screen()) {
        (Some(Focus::KeyInput), _) => &[("Enter", "sign in"), ("Esc", "cancel")],
        (Some(Focus::NameInput), _) => &[("Enter", "save name"), ("Esc", "cancel")],
        (Some(Focus::Draft), _) => &[("Enter", "save entry"), ("Esc", "stop editing")],
        (None, Screen::Welcome) => &[("g", "new key"), ("i", "enter key"), ("q", "quit")],
        (None, Screen::Onboarding) => &[("i", "enter name"), ("S", "sign out"), ("q", "quit")],
        (None, Screen::Journal(Page::Main)) => &[
            ("i", "write"),
            ("j/k", "navigate"),
            ("d", "delete"),
            ("r", "reload"),
            ("1-4/Tab", "pages"),
            ("S", "sign out"),
            ("q", "quit"),
        ],
        (None, Screen::Journal(_)) => &[
            ("1-4/Tab", "pages"),
            ("r", "reload"),
            ("S", "sign out"),
            ("q", "quit"),
        ],
    };
    frame.render_widget(Paragraph::new(hint_line(hints)), area);
}
