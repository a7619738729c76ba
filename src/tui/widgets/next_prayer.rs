use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};
use tui_big_text::{BigText, PixelSize};

use crate::models::Language;
use crate::prayer_times::CountdownState;
use crate::tui::app::LoadStatus;
use crate::tui::theme;

pub fn render(
    frame: &mut Frame,
    area: Rect,
    state: Option<&CountdownState>,
    status: &LoadStatus,
    language: Language,
) {
    let block = Block::default()
        .title(Span::styled(" Next Prayer ", theme::accent()))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::panel_border())
        .style(theme::panel());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(state) = state else {
        let message = match status {
            LoadStatus::Loading => Span::styled("  Waiting for today's timings…", theme::muted()),
            _ => Span::styled("  No countdown available", theme::warning()),
        };
        frame.render_widget(Paragraph::new(vec![Line::from(""), Line::from(message)]), inner);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(4), Constraint::Length(1)])
        .split(inner);

    let title = Line::from(vec![
        Span::styled(
            format!("  {}", state.next.name.label(language).to_uppercase()),
            theme::accent().add_modifier(Modifier::BOLD),
        ),
        Span::styled(format!("  at {}", state.next.time), theme::muted()),
    ]);
    frame.render_widget(Paragraph::new(title), chunks[0]);

    let digits = BigText::builder()
        .pixel_size(PixelSize::Quadrant)
        .style(theme::countdown())
        .lines(vec![Line::from(state.remaining.to_string())])
        .build();
    frame.render_widget(digits, chunks[1]);

    let stamp = Line::from(Span::styled(
        format!("  as of {}", state.computed_at.format("%H:%M:%S")),
        theme::muted(),
    ));
    let stale = match status {
        LoadStatus::Unavailable(reason) => {
            Line::from(Span::styled(format!("  stale: {}", reason), theme::warning()))
        }
        _ => stamp,
    };
    frame.render_widget(Paragraph::new(stale), chunks[2]);
}
