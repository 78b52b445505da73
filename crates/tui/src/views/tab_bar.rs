use crate::theme::Theme;
use journey_client::Page;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

pub fn render(frame: &mut Frame, active: Page, area: Rect) {
    let mut spans = vec![Span::styled(" ", Style::new())];

    for (idx, page) in Page::ALL.iter().enumerate() {
        let style = if *page == active {
            Style::new()
                .fg(Color::Black)
                .bg(Theme::ACCENT_BLUE)
                .bold()
                .add_modifier(Modifier::UNDERLINED)
        } else {
            Style::new().fg(Theme::TAB_INACTIVE)
        };

        spans.push(Span::styled(
            format!(" {}:{} ", idx + 1, page.title()),
            style,
        ));
        spans.push(Span::styled(" ", Style::new()));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
