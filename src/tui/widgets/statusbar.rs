use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::models::Language;
use crate::tui::theme;

pub fn render(frame: &mut Frame, area: Rect, language: Language) {
    let lang_hint = format!(" lang:{}  ", language.code());
    let hints = vec![
        ("[c]", " calendar  "),
        ("[↑↓]", " scroll  "),
        ("[l]", lang_hint.as_str()),
        ("[r]", " refresh  "),
        ("[Esc]", " quit"),
    ];

    let mut spans = Vec::new();
    for (key, label) in &hints {
        spans.push(Span::styled(*key, theme::accent()));
        spans.push(Span::styled(*label, theme::muted()));
    }

    let line = Line::from(spans);
    let paragraph = Paragraph::new(line).alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
