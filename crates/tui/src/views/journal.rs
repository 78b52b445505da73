use crate::app::{App, Focus};
use crate::theme::{Theme, input_line};
use journey_api_client::ClientFactory;
use journey_core::format::preview;
use ratatui::prelude::*;
use ratatui::widgets::{List, ListItem, ListState, Paragraph, Wrap};

/// Main page: draft input on top, entries newest first below.
pub fn render<F: ClientFactory>(frame: &mut Frame, app: &App<F>, area: Rect) {
    let [input_area, list_area] =
        Layout::vertical([Constraint::Length(5), Constraint::Fill(1)]).areas(area);

    let focused = app.focus == Some(Focus::Draft);
    let draft = Paragraph::new(input_line(
        app.input(Focus::Draft),
        "press i to write an entry",
        focused,
    ))
    .wrap(Wrap { trim: false })
    .block(Theme::input_block("New entry", focused));
    frame.render_widget(draft, input_area);

    let entries = app.controller.entries();
    let block = Theme::block().title(format!(" Entries ({}) ", entries.len()));

    if entries.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "No entries yet. Press i to write the first one.",
            Style::new().fg(Theme::TEXT_MUTED),
        )))
        .block(block.padding(Theme::PADDING_COMPACT));
        frame.render_widget(empty, list_area);
        return;
    }

    let text_width = list_area.width.saturating_sub(24) as usize;
    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!(" {}  ", app.format_time(entry)),
                    Style::new().fg(Theme::TEXT_SECONDARY),
                ),
                Span::styled(
                    preview(&entry.text, text_width.max(8)),
                    Style::new().fg(Theme::TEXT_CONTENT),
                ),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().bg(Theme::SELECTION_BG).fg(Theme::TEXT_PRIMARY))
        .highlight_symbol("> ");
    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, list_area, &mut state);
}
