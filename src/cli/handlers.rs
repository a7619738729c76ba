use anyhow::{Context, Result};
use chrono::{Datelike, NaiveTime, Timelike};
use std::cell::Cell;
use std::fmt::Write as _;
use std::rc::Rc;
use std::sync::mpsc;
use std::time::Duration;

use crate::config::AppConfig;
use crate::models::{CalendarRow, Language, PrayerName};
use crate::prayer_times::selector::current_minutes;
use crate::prayer_times::countdown::DEFAULT_PERIOD;
use crate::prayer_times::{normalize_month, CountdownScheduler, CountdownState, PrayerSchedule};
use crate::provider::PrayerDataProvider;
use crate::utils::clock::Clock;
use crate::utils::format::{format_remaining, pad_cells};
use crate::utils::ticker::Tick;

// ─── ANSI helpers ────────────────────────────────────────────────────────────

macro_rules! println_colored {
    ($color:expr, $($arg:tt)*) => {{
        print!("{}", $color);
        print!($($arg)*);
        println!("\x1b[0m");
    }};
}

const AMBER: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const GOLD: &str = "\x1b[38;2;196;160;68m";
const RESET: &str = "\x1b[0m";

// ─── Times ───────────────────────────────────────────────────────────────────

pub fn handle_times(
    config: &AppConfig,
    provider: &dyn PrayerDataProvider,
    clock: &dyn Clock,
) -> Result<()> {
    let now = clock.now();
    let timings = match provider.fetch_daily_timings(now.date()) {
        Ok(t) => t,
        Err(e) => {
            log::warn!("Daily timings fetch failed: {}", e);
            println_colored!(RED, "  Prayer times unavailable ({})", e);
            return Ok(());
        }
    };
    let schedule = match PrayerSchedule::new(timings) {
        Ok(s) => s,
        Err(e) => {
            println_colored!(RED, "  Prayer times unavailable ({})", e);
            return Ok(());
        }
    };

    print!("{}", times_report(config, &schedule, now.time()));
    Ok(())
}

fn times_report(config: &AppConfig, schedule: &PrayerSchedule, now: NaiveTime) -> String {
    let language = config.display.language;
    let selection = schedule.select_at(now);
    let timings = schedule.timings();
    let mut out = String::new();

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}  Prayer Times — {} ({}){}",
        GOLD,
        config.location.name,
        timings.date.format("%Y-%m-%d"),
        RESET
    );
    if let Some(hijri) = &timings.hijri {
        let _ = writeln!(out, "{}  {}{}", DIM, hijri, RESET);
    }
    let _ = writeln!(out);

    let current = current_minutes(now.hour(), now.minute(), now.second());
    for (prayer, time) in timings.iter() {
        let label = pad_cells(prayer.label(language), 10);
        let style = if prayer == selection.next.name {
            GOLD
        } else if schedule.minutes(prayer) as f64 <= current {
            DIM
        } else {
            BOLD
        };
        let _ = writeln!(out, "{}  {}  {}{}", style, label, time.trim(), RESET);
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{}  Next: {} at {} in {}{}",
        AMBER,
        selection.next.name.label(language),
        selection.next.time,
        format_remaining(&selection.remaining),
        RESET
    );
    let _ = writeln!(out);
    out
}

// ─── Calendar ────────────────────────────────────────────────────────────────

pub fn handle_calendar(
    config: &AppConfig,
    provider: &dyn PrayerDataProvider,
    clock: &dyn Clock,
    year: Option<i32>,
    month: Option<u32>,
) -> Result<()> {
    let today = clock.today();
    let year = year.unwrap_or(today.year());
    let month = month.unwrap_or(today.month());

    let raw = match provider.fetch_monthly_calendar(year, month) {
        Ok(raw) => raw,
        Err(e) => {
            log::warn!("Monthly calendar fetch failed: {}", e);
            println_colored!(RED, "  Monthly calendar unavailable ({})", e);
            return Ok(());
        }
    };
    let rows = normalize_month(&raw, config.display.language);

    println!();
    println_colored!(
        GOLD,
        "  Prayer Calendar — {} ({:04}-{:02})",
        config.location.name,
        year,
        month
    );
    println!();
    print!("{}", calendar_table(&rows, config.display.language));
    println!();
    Ok(())
}

fn calendar_table(rows: &[CalendarRow], language: Language) -> String {
    let mut out = String::new();
    let mut header = format!("  {}{}{}", pad_cells("", 11), pad_cells("Date", 12), pad_cells("Hijri", 12));
    for prayer in PrayerName::all() {
        header.push_str(&pad_cells(prayer.label(language), 9));
    }
    let _ = writeln!(out, "{}{}{}", BOLD, header.trim_end(), RESET);

    for row in rows {
        let mut line = format!(
            "  {}{}{}",
            pad_cells(&row.weekday_label, 11),
            pad_cells(&row.gregorian, 12),
            pad_cells(&row.hijri, 12)
        );
        for prayer in PrayerName::all() {
            line.push_str(&pad_cells(row.get(prayer).display(), 9));
        }
        let _ = writeln!(out, "{}", line.trim_end());
    }
    out
}

// ─── Countdown ───────────────────────────────────────────────────────────────

pub fn handle_countdown(
    config: &AppConfig,
    provider: &dyn PrayerDataProvider,
    clock: Box<dyn Clock>,
    ticks: Option<u64>,
) -> Result<()> {
    let language = config.display.language;
    run_countdown(provider, clock, DEFAULT_PERIOD, ticks, move |state| {
        println!(
            "{}  {}{}  {} {} in {}{}",
            DIM,
            state.computed_at.format("%H:%M:%S"),
            RESET,
            state.next.name.label(language),
            state.next.time,
            state.remaining,
            RESET
        );
    })?;
    Ok(())
}

/// Drive a scheduler until `limit` states have been published, refetching
/// when the zone's date rolls over. Returns how many were published.
fn run_countdown<C: Clock>(
    provider: &dyn PrayerDataProvider,
    clock: C,
    period: Duration,
    limit: Option<u64>,
    mut emit: impl FnMut(&CountdownState) + 'static,
) -> Result<u64> {
    let today = clock.today();
    let timings = provider
        .fetch_daily_timings(today)
        .context("Fetching today's prayer times")?;

    let published = Rc::new(Cell::new(0u64));
    let counter = Rc::clone(&published);
    let mut scheduler = CountdownScheduler::new(clock).with_period(period);
    scheduler.subscribe(move |state| {
        counter.set(counter.get() + 1);
        emit(state);
    });
    scheduler
        .replace_timings(timings)
        .context("Today's prayer times are malformed")?;

    let (tx, rx) = mpsc::channel::<Tick>();
    scheduler.start(tx);

    let mut loaded_for = today;
    while limit.is_none_or(|limit| published.get() < limit) {
        let tick = rx.recv().context("Countdown ticker stopped")?;

        let today = scheduler.clock().today();
        if today != loaded_for {
            match provider.fetch_daily_timings(today) {
                Ok(timings) => {
                    scheduler
                        .replace_timings(timings)
                        .with_context(|| format!("Prayer times for {} are malformed", today))?;
                    loaded_for = today;
                    continue;
                }
                Err(e) => log::warn!("Could not load timings for {}: {}", today, e),
            }
        }

        scheduler.on_tick(tick);
    }

    scheduler.stop();
    Ok(published.get())
}

// ─── Config ──────────────────────────────────────────────────────────────────

pub fn handle_config(config: &AppConfig, init: bool) -> Result<()> {
    let path = AppConfig::config_path()?;
    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
            return Ok(());
        }
        let written = AppConfig::default().save()?;
        println_colored!(GOLD, "  Wrote {}", written.display());
        return Ok(());
    }

    println_colored!(DIM, "  # {}", path.display());
    print!("{}", config.to_toml()?);
    Ok(())
}
