use crate::theme::Theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};

/// Kinds of modal overlay.
#[derive(Debug, Clone)]
pub enum Modal {
    /// Confirmation dialog.
    Confirm {
        title: String,
        message: String,
        action: ConfirmAction,
    },
}

/// What happens when a Confirm modal is accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteEntry { entry_id: String },
    /// Clear the stored key. Server rows are kept.
    SignOut,
}

/// Render the current modal overlay on top of everything.
pub fn render(frame: &mut Frame, modal: &Modal) {
    let area = frame.area();
    let popup_width = 54u16.min(area.width.saturating_sub(4));
    let popup_height = 9u16.min(area.height.saturating_sub(4));
    let x = (area.width.saturating_sub(popup_width)) / 2;
    let y = (area.height.saturating_sub(popup_height)) / 2;
    let popup_area = Rect::new(x, y, popup_width, popup_height);

    frame.render_widget(Clear, popup_area);

    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);

    let Modal::Confirm {
        title,
        message,
        action,
    } = modal;

    let accent = match action {
        ConfirmAction::DeleteEntry { .. } => Theme::ACCENT_RED,
        ConfirmAction::SignOut => Theme::ACCENT_YELLOW,
    };
    let block = Block::bordered()
        .border_type(ratatui::widgets::BorderType::Rounded)
        .title(format!(" {} ", title))
        .border_style(Style::new().fg(accent));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![
        Line::raw(""),
        Line::from(Span::styled(
            format!("  {}", message),
            Style::new().fg(Theme::TEXT_PRIMARY),
        )),
    ];
    if matches!(action, ConfirmAction::SignOut) {
        lines.push(Line::from(Span::styled(
            "  Your key is the only way back in.",
            Style::new().fg(Theme::TEXT_SECONDARY),
        )));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(vec![
        Span::styled("  y/Enter ", key_style),
        Span::styled("confirm  ", desc_style),
        Span::styled("n/Esc ", key_style),
        Span::styled("cancel", desc_style),
    ]));
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
