use crate::models::PrayerName;

/// One provider calendar entry before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCalendarDay {
    /// `DD-MM-YYYY`
    pub gregorian: String,
    pub hijri: String,
    /// Raw values in `PrayerName` order, e.g. `"06:12 (CET)"`.
    pub timings: [String; 6],
}

impl RawCalendarDay {
    pub fn get(&self, prayer: PrayerName) -> &str {
        &self.timings[prayer.index()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarCell {
    Time(String),
    /// The raw value did not reduce to `HH:MM`.
    Malformed(String),
}

impl CalendarCell {
    pub fn display(&self) -> &str {
        match self {
            CalendarCell::Time(t) => t,
            CalendarCell::Malformed(_) => "--:--",
        }
    }
}

/// A display-ready calendar row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarRow {
    /// 0 = Sunday .. 6 = Saturday; `None` when the Gregorian date is malformed.
    pub weekday: Option<u8>,
    pub weekday_label: String,
    pub gregorian: String,
    pub hijri: String,
    pub times: [CalendarCell; 6],
}

impl CalendarRow {
    pub fn get(&self, prayer: PrayerName) -> &CalendarCell {
        &self.times[prayer.index()]
    }
}
