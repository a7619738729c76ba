use ratatui::{
    layout::Rect,
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::models::{DailyTimings, Language, PrayerName};
use crate::prayer_times::codec::{to_minutes, to_text};
use crate::tui::app::LoadStatus;
use crate::tui::theme;
use crate::utils::format::pad_cells;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    timings: Option<&DailyTimings>,
    next: Option<PrayerName>,
    now_minutes: f64,
    status: &LoadStatus,
    language: Language,
) {
    let block = Block::default()
        .title(Span::styled(" Today ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::panel_border())
        .style(theme::panel());

    let Some(timings) = timings else {
        let message = match status {
            LoadStatus::Loading => Span::styled("  Loading prayer times…", theme::muted()),
            LoadStatus::Unavailable(_) | LoadStatus::Ready => {
                Span::styled("  Prayer times unavailable", theme::warning())
            }
        };
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message)]).block(block);
        frame.render_widget(paragraph, area);
        return;
    };

    let items: Vec<ListItem> = timings
        .iter()
        .map(|(prayer, time)| {
            let is_next = next == Some(prayer);
            let minutes = to_minutes(time).ok();
            let is_past = minutes.is_some_and(|m| m as f64 <= now_minutes);
            let shown = minutes.map_or_else(|| time.trim().to_string(), to_text);

            let (marker, name_style, time_style) = if is_next {
                (
                    "▸ ",
                    theme::accent().add_modifier(Modifier::BOLD),
                    theme::countdown().add_modifier(Modifier::BOLD),
                )
            } else if is_past {
                ("  ", theme::muted(), theme::muted())
            } else {
                ("  ", theme::emphasis(), theme::emphasis())
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("  {}", marker), theme::accent()),
                Span::styled(pad_cells(prayer.label(language), 10), name_style),
                Span::styled(shown, time_style),
            ]))
        })
        .collect();

    let list = List::new(items).block(block);
    frame.render_widget(list, area);
}
