use chrono::NaiveDate;
use ratatui::{
    layout::{Alignment, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

use crate::models::Language;
use crate::prayer_times::calendar::weekday_index;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    location: &str,
    today: NaiveDate,
    hijri: Option<&str>,
    language: Language,
) {
    let weekday = language.weekday_labels()[weekday_index(today) as usize];
    let gregorian_str = format!("{}, {}", weekday, today.format("%d-%m-%Y"));

    let title_line = Line::from(vec![
        Span::styled("  مِيقَات  ", theme::accent().add_modifier(Modifier::BOLD)),
        Span::styled(location, theme::accent()),
    ]);

    let mut date_spans = Vec::new();
    if let Some(hijri) = hijri {
        date_spans.push(Span::styled(hijri, theme::countdown()));
        date_spans.push(Span::styled("  ·  ", theme::muted()));
    }
    date_spans.push(Span::styled(gregorian_str, theme::muted()));

    let text = vec![title_line, Line::from(""), Line::from(date_spans)];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::accent().add_modifier(Modifier::BOLD))
        .style(theme::screen());

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
