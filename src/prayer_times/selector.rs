use chrono::{NaiveTime, Timelike};

use crate::models::{DailyTimings, NextPrayer, PrayerName, RemainingDuration};
use crate::prayer_times::codec::{to_minutes, TimeFormatError, MINUTES_PER_DAY};
use crate::prayer_times::remaining::remaining;

/// A day's timings with every prayer already converted to minutes.
///
/// Built once per [`DailyTimings`] replacement, so ticks only compare
/// integers. Holding one proves the timings parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrayerSchedule {
    timings: DailyTimings,
    minutes: [u32; 6],
}

/// Result of one selection: which prayer is next and how far away it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub next: NextPrayer,
    /// Minutes since today's midnight; past 1440 when the next prayer is tomorrow.
    pub target_minutes: u32,
    pub remaining: RemainingDuration,
}

impl PrayerSchedule {
    pub fn new(timings: DailyTimings) -> Result<Self, TimeFormatError> {
        let mut minutes = [0u32; 6];
        for (prayer, text) in timings.iter() {
            minutes[prayer.index()] = to_minutes(text)?;
        }
        Ok(Self { timings, minutes })
    }

    pub fn timings(&self) -> &DailyTimings {
        &self.timings
    }

    pub fn minutes(&self, prayer: PrayerName) -> u32 {
        self.minutes[prayer.index()]
    }

    /// The prayer with the smallest time strictly after `current_minutes`,
    /// or tomorrow's Fajr once the day's last prayer has passed.
    pub fn select(&self, current_minutes: f64) -> Selection {
        let mut best: Option<(PrayerName, u32)> = None;
        for prayer in PrayerName::all() {
            let minutes = self.minutes(prayer);
            if minutes as f64 <= current_minutes {
                continue;
            }
            match best {
                Some((_, best_minutes)) if best_minutes <= minutes => {}
                _ => best = Some((prayer, minutes)),
            }
        }

        let (name, target_minutes) = best.unwrap_or_else(|| {
            (
                PrayerName::Fajr,
                self.minutes(PrayerName::Fajr) + MINUTES_PER_DAY,
            )
        });

        Selection {
            next: NextPrayer {
                name,
                time: self.timings.get(name).trim().to_string(),
            },
            target_minutes,
            remaining: remaining(current_minutes, target_minutes),
        }
    }

    pub fn select_at(&self, time: NaiveTime) -> Selection {
        self.select(current_minutes(time.hour(), time.minute(), time.second()))
    }
}

/// `hour*60 + minute + second/60`.
pub fn current_minutes(hour: u32, minute: u32, second: u32) -> f64 {
    (hour * 60 + minute) as f64 + second as f64 / 60.0
}
