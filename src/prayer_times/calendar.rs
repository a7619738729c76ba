use chrono::{Datelike, NaiveDate};
use thiserror::Error;

use crate::models::{CalendarCell, CalendarRow, Language, PrayerName, RawCalendarDay};
use crate::prayer_times::codec::to_minutes;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed date '{text}': expected DD-MM-YYYY")]
pub struct DateFormatError {
    pub text: String,
}

/// Parse the provider's `DD-MM-YYYY` Gregorian date.
pub fn parse_gregorian(text: &str) -> Result<NaiveDate, DateFormatError> {
    let malformed = || DateFormatError {
        text: text.to_string(),
    };

    let mut parts = text.trim().split('-');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(malformed());
    };

    let day: u32 = day.parse().map_err(|_| malformed())?;
    let month: u32 = month.parse().map_err(|_| malformed())?;
    let year: i32 = year.parse().map_err(|_| malformed())?;
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(malformed)
}

/// 0 = Sunday .. 6 = Saturday.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Drop everything from the first space after the value: `"06:12 (CET)"` -> `"06:12"`.
pub fn strip_annotation(raw: &str) -> &str {
    let raw = raw.trim_start();
    raw.split_once(' ').map_or(raw, |(head, _)| head)
}

pub fn normalize_day(raw: &RawCalendarDay, language: Language) -> CalendarRow {
    let weekday = match parse_gregorian(&raw.gregorian) {
        Ok(date) => Some(weekday_index(date)),
        Err(e) => {
            log::warn!("Calendar row without weekday: {}", e);
            None
        }
    };
    let weekday_label = weekday
        .map(|i| language.weekday_labels()[i as usize].to_string())
        .unwrap_or_else(|| "?".to_string());

    let times = PrayerName::all().map(|prayer| {
        let value = strip_annotation(raw.get(prayer));
        match to_minutes(value) {
            Ok(_) => CalendarCell::Time(value.to_string()),
            Err(e) => {
                log::warn!("{} on {}: {}", prayer, raw.gregorian, e);
                CalendarCell::Malformed(raw.get(prayer).to_string())
            }
        }
    });

    CalendarRow {
        weekday,
        weekday_label,
        gregorian: raw.gregorian.clone(),
        hijri: raw.hijri.clone(),
        times,
    }
}

/// One row per input day, in input order.
pub fn normalize_month(days: &[RawCalendarDay], language: Language) -> Vec<CalendarRow> {
    days.iter().map(|day| normalize_day(day, language)).collect()
}
