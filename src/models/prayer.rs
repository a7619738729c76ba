use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::Language;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PrayerName {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl PrayerName {
    /// Declared order. Selection ties resolve to the earliest entry here.
    pub fn all() -> [PrayerName; 6] {
        [
            PrayerName::Fajr,
            PrayerName::Sunrise,
            PrayerName::Dhuhr,
            PrayerName::Asr,
            PrayerName::Maghrib,
            PrayerName::Isha,
        ]
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Key used by the provider payloads, e.g. `"Dhuhr"`.
    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerName::Fajr => "Fajr",
            PrayerName::Sunrise => "Sunrise",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
        }
    }

    pub fn label(&self, language: Language) -> &'static str {
        language.prayer_label(*self)
    }
}

impl std::fmt::Display for PrayerName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// The six `HH:MM` times of one calendar day, as supplied by the provider.
///
/// Never mutated after construction; a new day's values replace the whole
/// struct.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTimings {
    pub date: NaiveDate,
    /// Hijri date as rendered by the provider, when it sent one.
    pub hijri: Option<String>,
    times: [String; 6],
}

impl DailyTimings {
    pub fn new(date: NaiveDate, times: [String; 6]) -> Self {
        Self {
            date,
            hijri: None,
            times,
        }
    }

    pub fn with_hijri(mut self, hijri: impl Into<String>) -> Self {
        self.hijri = Some(hijri.into());
        self
    }

    pub fn get(&self, prayer: PrayerName) -> &str {
        &self.times[prayer.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PrayerName, &str)> {
        PrayerName::all()
            .into_iter()
            .map(move |p| (p, self.times[p.index()].as_str()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NextPrayer {
    pub name: PrayerName,
    /// Original `HH:MM` text from the day's timings.
    pub time: String,
}

/// Span until the next prayer, always in `[0, 24h)` for selector output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemainingDuration {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl RemainingDuration {
    pub fn total_seconds(&self) -> u64 {
        self.hours as u64 * 3600 + self.minutes as u64 * 60 + self.seconds as u64
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}

impl std::fmt::Display for RemainingDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}
