use anyhow::{anyhow, Result};
use chrono::{NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

/// Source of "now" as wall-clock time in the configured zone.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

impl<C: Clock + ?Sized> Clock for Box<C> {
    fn now(&self) -> NaiveDateTime {
        (**self).now()
    }
}

/// System time resolved into a fixed IANA zone.
#[derive(Debug, Clone, Copy)]
pub struct ZonedClock {
    tz: Tz,
}

impl ZonedClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    pub fn from_name(name: &str) -> Result<Self> {
        let tz = name
            .parse::<Tz>()
            .map_err(|e| anyhow!("Invalid timezone '{}': {}", name, e))?;
        Ok(Self::new(tz))
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }
}

impl Clock for ZonedClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }
}

/// Always reports the same instant. Backs `times --at`.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

/// Test clock whose instant is moved by hand; clones share the same time.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct ManualClock(std::rc::Rc<std::cell::Cell<NaiveDateTime>>);

#[cfg(test)]
impl ManualClock {
    pub fn new(at: NaiveDateTime) -> Self {
        Self(std::rc::Rc::new(std::cell::Cell::new(at)))
    }

    pub fn set(&self, at: NaiveDateTime) {
        self.0.set(at);
    }

    pub fn advance(&self, by: chrono::Duration) {
        self.0.set(self.0.get() + by);
    }
}

#[cfg(test)]
impl Clock for ManualClock {
    fn now(&self) -> NaiveDateTime {
        self.0.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Offset, TimeZone};

    #[test]
    fn rejects_unknown_zone_names() {
        assert!(ZonedClock::from_name("Atlantic/Canary").is_ok());
        assert!(ZonedClock::from_name("Mars/Olympus").is_err());
    }

    #[test]
    fn zoned_clock_matches_zone_offset() {
        let clock = ZonedClock::from_name("Asia/Karachi").unwrap();
        let utc = Utc::now().naive_utc();
        let local = clock.now();
        let offset = clock
            .timezone()
            .offset_from_utc_datetime(&utc)
            .fix()
            .local_minus_utc();
        // Karachi has no DST; allow for the two reads straddling a second.
        let drift = (local - utc).num_seconds() - offset as i64;
        assert!(drift.abs() <= 1, "drift {}", drift);
    }

    #[test]
    fn manual_clock_clones_share_time() {
        let start = NaiveDate::from_ymd_opt(2025, 3, 5)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap();
        let clock = ManualClock::new(start);
        let view = clock.clone();
        clock.advance(Duration::seconds(1));
        assert_eq!(view.today(), NaiveDate::from_ymd_opt(2025, 3, 6).unwrap());
    }
}
