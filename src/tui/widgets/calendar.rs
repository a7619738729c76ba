use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::models::{CalendarCell, CalendarRow, Language, PrayerName};
use crate::tui::app::LoadStatus;
use crate::tui::theme;

#[allow(clippy::too_many_arguments)]
pub fn render(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    rows: &[CalendarRow],
    today: &str,
    scroll: usize,
    status: &LoadStatus,
    language: Language,
) {
    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::panel_border())
        .style(theme::panel());

    if rows.is_empty() {
        let message = match status {
            LoadStatus::Loading => Span::styled("  Loading monthly calendar…", theme::muted()),
            _ => Span::styled("  Monthly calendar unavailable", theme::warning()),
        };
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(message)]).block(block);
        frame.render_widget(paragraph, area);
        return;
    }

    let mut header_cells = vec![Cell::from(""), Cell::from("Date"), Cell::from("Hijri")];
    header_cells.extend(PrayerName::all().map(|p| Cell::from(p.label(language))));
    let header = Row::new(header_cells).style(theme::emphasis());

    let body = rows.iter().skip(scroll).map(|row| {
        let mut cells = vec![
            Cell::from(row.weekday_label.as_str()),
            Cell::from(row.gregorian.as_str()),
            Cell::from(row.hijri.as_str()),
        ];
        cells.extend(PrayerName::all().map(|p| match row.get(p) {
            CalendarCell::Time(t) => Cell::from(t.as_str()),
            CalendarCell::Malformed(_) => Cell::from("--:--").style(theme::warning()),
        }));

        let row_widget = Row::new(cells);
        if row.gregorian == today {
            row_widget.style(theme::today_row())
        } else {
            row_widget
        }
    });

    let mut widths = vec![Constraint::Length(10), Constraint::Length(11), Constraint::Length(11)];
    widths.extend([Constraint::Length(8); 6]);

    let table = Table::new(body, widths)
        .header(header)
        .column_spacing(1)
        .block(block);
    frame.render_widget(table, area);
}
