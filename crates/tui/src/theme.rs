use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Padding};

pub struct Theme;

impl Theme {
    // ── Border ───────────────────────────────────────────────────────
    pub const BORDER_DIM: Color = Color::DarkGray;
    pub const BORDER_NORMAL: Color = Color::Rgb(60, 65, 80);
    pub const BORDER_ACCENT: Color = Color::Rgb(100, 180, 240);

    // ── Text hierarchy ───────────────────────────────────────────────
    pub const TEXT_PRIMARY: Color = Color::White;
    pub const TEXT_SECONDARY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_MUTED: Color = Color::Rgb(80, 85, 100);
    pub const TEXT_HINT: Color = Color::Rgb(60, 65, 80);
    pub const TEXT_CONTENT: Color = Color::Rgb(170, 175, 190);

    // ── Key style (for footer hints) ─────────────────────────────────
    pub const TEXT_KEY: Color = Color::Rgb(140, 145, 160);
    pub const TEXT_KEY_DESC: Color = Color::DarkGray;

    // ── Accent ───────────────────────────────────────────────────────
    pub const ACCENT_BLUE: Color = Color::Rgb(100, 180, 240);
    pub const ACCENT_GREEN: Color = Color::Rgb(80, 200, 120);
    pub const ACCENT_RED: Color = Color::Rgb(220, 80, 80);
    pub const ACCENT_YELLOW: Color = Color::Rgb(220, 180, 60);
    pub const ACCENT_ORANGE: Color = Color::Rgb(217, 119, 80);
    pub const ACCENT_TEAL: Color = Color::Rgb(80, 180, 160);

    // ── Lists / charts ───────────────────────────────────────────────
    pub const SELECTION_BG: Color = Color::Rgb(40, 48, 68);
    pub const BAR: Color = Color::Rgb(80, 180, 160);
    pub const BAR_DIM: Color = Color::Rgb(70, 75, 90);

    // ── Tab style ────────────────────────────────────────────────────
    pub const TAB_INACTIVE: Color = Color::Rgb(120, 125, 140);

    // ── Padding ──────────────────────────────────────────────────────
    pub const PADDING_CARD: Padding = Padding::new(2, 2, 1, 1);
    pub const PADDING_COMPACT: Padding = Padding::new(1, 1, 0, 0);

    // ── Block helpers ────────────────────────────────────────────────

    pub fn block() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_NORMAL))
    }

    pub fn block_dim() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_DIM))
    }

    pub fn block_accent() -> Block<'static> {
        Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::new().fg(Self::BORDER_ACCENT))
    }

    /// Bordered input box, accented while it has focus.
    pub fn input_block(title: &str, focused: bool) -> Block<'static> {
        let block = if focused {
            Self::block_accent()
        } else {
            Self::block_dim()
        };
        block
            .title(format!(" {title} "))
            .padding(Self::PADDING_COMPACT)
    }
}

/// Text of an input line, with a cursor mark while focused.
pub fn input_line(value: &str, placeholder: &str, focused: bool) -> Line<'static> {
    if value.is_empty() && !focused {
        return Line::from(Span::styled(
            placeholder.to_string(),
            Style::new().fg(Theme::TEXT_HINT).italic(),
        ));
    }
    let mut spans = vec![Span::styled(
        value.to_string(),
        Style::new().fg(Theme::TEXT_PRIMARY),
    )];
    if focused {
        spans.push(Span::styled("_", Style::new().fg(Theme::ACCENT_YELLOW)));
    }
    Line::from(spans)
}

/// Footer hint spans: `[(key, description), ...]`.
pub fn hint_line(hints: &[(&str, &str)]) -> Line<'static> {
    let key_style = Style::new().fg(Theme::TEXT_KEY);
    let desc_style = Style::new().fg(Theme::TEXT_KEY_DESC);
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, desc) in hints {
        spans.push(Span::styled(format!(" {key} "), key_style));
        spans.push(Span::styled(format!("{desc} "), desc_style));
    }
    Line::from(spans)
}
