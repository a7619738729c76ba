use serde::{Deserialize, Serialize};

use crate::models::PrayerName;

const WEEKDAYS_EN: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const WEEKDAYS_ES: [&str; 7] = [
    "Domingo",
    "Lunes",
    "Martes",
    "Miércoles",
    "Jueves",
    "Viernes",
    "Sábado",
];

const WEEKDAYS_AR: [&str; 7] = [
    "الأحد",
    "الاثنين",
    "الثلاثاء",
    "الأربعاء",
    "الخميس",
    "الجمعة",
    "السبت",
];

/// Label language for prayer and weekday names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Es,
    Ar,
}

impl Language {
    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Es => "es",
            Language::Ar => "ar",
        }
    }

    /// Cycles en -> es -> ar -> en.
    pub fn next(self) -> Self {
        match self {
            Language::En => Language::Es,
            Language::Es => Language::Ar,
            Language::Ar => Language::En,
        }
    }

    /// Indexed 0 = Sunday .. 6 = Saturday.
    pub fn weekday_labels(&self) -> &'static [&'static str; 7] {
        match self {
            Language::En => &WEEKDAYS_EN,
            Language::Es => &WEEKDAYS_ES,
            Language::Ar => &WEEKDAYS_AR,
        }
    }

    pub fn prayer_label(&self, prayer: PrayerName) -> &'static str {
        match (self, prayer) {
            (Language::En, p) => p.display_name(),
            (Language::Es, PrayerName::Sunrise) => "Amanecer",
            (Language::Es, PrayerName::Maghrib) => "Magreb",
            (Language::Es, p) => p.display_name(),
            (Language::Ar, PrayerName::Fajr) => "الفجر",
            (Language::Ar, PrayerName::Sunrise) => "الشروق",
            (Language::Ar, PrayerName::Dhuhr) => "الظهر",
            (Language::Ar, PrayerName::Asr) => "العصر",
            (Language::Ar, PrayerName::Maghrib) => "المغرب",
            (Language::Ar, PrayerName::Isha) => "العشاء",
        }
    }
}
