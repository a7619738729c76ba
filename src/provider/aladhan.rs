use anyhow::{Context, Result};
use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use crate::config::{LocationConfig, ProviderConfig};
use crate::models::{DailyTimings, PrayerName, RawCalendarDay};
use crate::prayer_times::calendar::{parse_gregorian, strip_annotation};
use crate::provider::{FetchError, PrayerDataProvider};

// ─── Wire format ────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Envelope {
    code: u16,
    #[serde(default)]
    status: String,
    data: Value,
}

#[derive(Debug, Deserialize)]
struct DayPayload {
    timings: HashMap<String, String>,
    date: DatePayload,
}

#[derive(Debug, Deserialize)]
struct DatePayload {
    gregorian: GregorianPayload,
    hijri: HijriPayload,
}

#[derive(Debug, Deserialize)]
struct GregorianPayload {
    date: String,
}

#[derive(Debug, Deserialize)]
struct HijriPayload {
    date: String,
    day: String,
    month: MonthPayload,
    year: String,
}

#[derive(Debug, Deserialize)]
struct MonthPayload {
    en: String,
}

impl HijriPayload {
    fn formatted(&self) -> String {
        format!("{} {} {}", self.day, self.month.en, self.year)
    }
}

// ─── Client ─────────────────────────────────────────────────────────────────

/// Blocking client for the AlAdhan prayer times API.
pub struct AladhanClient {
    http: Client,
    base_url: String,
    location: LocationConfig,
}

impl AladhanClient {
    pub fn new(provider: &ProviderConfig, location: &LocationConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(provider.timeout_secs))
            .user_agent(concat!("miqat/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Building HTTP client")?;
        Ok(Self {
            http,
            base_url: provider.base_url.trim_end_matches('/').to_string(),
            location: location.clone(),
        })
    }

    fn common_params(&self) -> Vec<(&'static str, String)> {
        vec![
            ("method", self.location.method.to_string()),
            ("timezone", self.location.timezone.clone()),
        ]
    }

    pub fn daily_url(&self, date: NaiveDate) -> Result<Url, FetchError> {
        let base = format!("{}/timingsByCity/{}", self.base_url, date.format("%d-%m-%Y"));
        let mut params = vec![
            ("city", self.location.city.clone()),
            ("country", self.location.country.clone()),
        ];
        params.extend(self.common_params());
        build_url(&base, &params)
    }

    pub fn calendar_url(&self, year: i32, month: u32) -> Result<Url, FetchError> {
        let base = format!("{}/calendar/{}/{}", self.base_url, year, month);
        let mut params = vec![
            ("latitude", self.location.latitude.to_string()),
            ("longitude", self.location.longitude.to_string()),
        ];
        params.extend(self.common_params());
        build_url(&base, &params)
    }

    fn get(&self, url: Url) -> Result<String, FetchError> {
        log::debug!("GET {}", url);
        let response = self
            .http
            .get(url.clone())
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Network(format!(
                "{} answered {}",
                url.path(),
                status
            )));
        }
        response
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))
    }
}

impl PrayerDataProvider for AladhanClient {
    fn fetch_daily_timings(&self, date: NaiveDate) -> Result<DailyTimings, FetchError> {
        let body = self.get(self.daily_url(date)?)?;
        parse_daily(&body)
    }

    fn fetch_monthly_calendar(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<RawCalendarDay>, FetchError> {
        let body = self.get(self.calendar_url(year, month)?)?;
        parse_calendar(&body)
    }
}

fn build_url(base: &str, params: &[(&str, String)]) -> Result<Url, FetchError> {
    Url::parse_with_params(base, params)
        .map_err(|e| FetchError::Network(format!("invalid URL {}: {}", base, e)))
}

// ─── Decoding ───────────────────────────────────────────────────────────────

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, FetchError> {
    let envelope: Envelope = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
    if envelope.code != 200 {
        return Err(FetchError::MalformedResponse(format!(
            "provider answered {} {}: {}",
            envelope.code, envelope.status, envelope.data
        )));
    }
    serde_json::from_value(envelope.data).map_err(|e| FetchError::MalformedResponse(e.to_string()))
}

fn six_timings(map: &HashMap<String, String>) -> Result<[String; 6], FetchError> {
    let mut out: [String; 6] = Default::default();
    for prayer in PrayerName::all() {
        out[prayer.index()] = map
            .get(prayer.display_name())
            .cloned()
            .ok_or_else(|| FetchError::MalformedResponse(format!("missing {}", prayer)))?;
    }
    Ok(out)
}

/// Calendar variant of [`six_timings`]: a missing prayer becomes an empty
/// value, which the normalizer marks malformed for that cell only.
fn six_timings_lenient(map: &HashMap<String, String>, gregorian: &str) -> [String; 6] {
    PrayerName::all().map(|prayer| match map.get(prayer.display_name()) {
        Some(value) => value.clone(),
        None => {
            log::warn!("Calendar day {} has no {}", gregorian, prayer);
            String::new()
        }
    })
}

/// Decode a `timingsByCity` body. Daily values are reduced to `HH:MM`.
pub(crate) fn parse_daily(body: &str) -> Result<DailyTimings, FetchError> {
    let day: DayPayload = decode(body)?;
    let date = parse_gregorian(&day.date.gregorian.date)
        .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;
    let times = six_timings(&day.timings)?.map(|t| strip_annotation(&t).to_string());
    Ok(DailyTimings::new(date, times).with_hijri(day.date.hijri.formatted()))
}

/// Decode a `calendar` body. Values stay raw for the normalizer.
pub(crate) fn parse_calendar(body: &str) -> Result<Vec<RawCalendarDay>, FetchError> {
    let days: Vec<DayPayload> = decode(body)?;
    Ok(days
        .into_iter()
        .map(|day| RawCalendarDay {
            timings: six_timings_lenient(&day.timings, &day.date.gregorian.date),
            gregorian: day.date.gregorian.date,
            hijri: day.date.hijri.date,
        })
        .collect())
}
