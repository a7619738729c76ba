use unicode_width::UnicodeWidthStr;

use crate::models::RemainingDuration;

/// Format a countdown as "Xh Ym Zs", dropping leading zero units.
pub fn format_remaining(d: &RemainingDuration) -> String {
    if d.is_zero() {
        return "now".to_string();
    }
    if d.hours > 0 {
        format!("{}h {}m {}s", d.hours, d.minutes, d.seconds)
    } else if d.minutes > 0 {
        format!("{}m {}s", d.minutes, d.seconds)
    } else {
        format!("{}s", d.seconds)
    }
}

/// Left-align `text` in a column of `width` terminal cells.
pub fn pad_cells(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}
