pub mod calendar;
pub mod language;
pub mod prayer;

pub use calendar::{CalendarCell, CalendarRow, RawCalendarDay};
pub use language::Language;
pub use prayer::{DailyTimings, NextPrayer, PrayerName, RemainingDuration};
