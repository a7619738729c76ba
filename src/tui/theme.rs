use ratatui::style::{Color, Modifier, Style};

// Dusk palette
pub const NIGHT: Color = Color::Rgb(16, 18, 30);
pub const PANEL: Color = Color::Rgb(24, 27, 44);
pub const PANEL_EDGE: Color = Color::Rgb(58, 62, 92);
pub const SAND: Color = Color::Rgb(228, 214, 188);
pub const SAND_FADED: Color = Color::Rgb(124, 120, 140);
pub const LAMP: Color = Color::Rgb(222, 178, 84);
pub const EMBER: Color = Color::Rgb(236, 128, 72);
pub const ALERT: Color = Color::Rgb(198, 78, 78);
pub const TODAY_BAND: Color = Color::Rgb(44, 46, 70);

pub fn screen() -> Style {
    Style::default().fg(SAND).bg(NIGHT)
}

pub fn panel() -> Style {
    Style::default().fg(SAND).bg(PANEL)
}

pub fn panel_border() -> Style {
    Style::default().fg(PANEL_EDGE)
}

pub fn muted() -> Style {
    Style::default().fg(SAND_FADED)
}

pub fn accent() -> Style {
    Style::default().fg(LAMP)
}

pub fn countdown() -> Style {
    Style::default().fg(EMBER)
}

pub fn warning() -> Style {
    Style::default().fg(ALERT)
}

pub fn emphasis() -> Style {
    Style::default().fg(SAND).add_modifier(Modifier::BOLD)
}

pub fn today_row() -> Style {
    Style::default().fg(LAMP).bg(TODAY_BAND)
}
