pub mod aladhan;

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::{DailyTimings, RawCalendarDay};

pub use aladhan::AladhanClient;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

/// Where prayer timings come from. The location is fixed at construction.
pub trait PrayerDataProvider: Send + Sync {
    fn fetch_daily_timings(&self, date: NaiveDate) -> Result<DailyTimings, FetchError>;

    /// Days of one month, in the provider's order.
    fn fetch_monthly_calendar(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<RawCalendarDay>, FetchError>;
}

/// Canned responses for tests.
#[cfg(test)]
pub struct StaticProvider {
    pub daily: Result<DailyTimings, FetchError>,
    pub monthly: Result<Vec<RawCalendarDay>, FetchError>,
}

#[cfg(test)]
impl PrayerDataProvider for StaticProvider {
    fn fetch_daily_timings(&self, _date: NaiveDate) -> Result<DailyTimings, FetchError> {
        self.daily.clone()
    }

    fn fetch_monthly_calendar(
        &self,
        _year: i32,
        _month: u32,
    ) -> Result<Vec<RawCalendarDay>, FetchError> {
        self.monthly.clone()
    }
}
