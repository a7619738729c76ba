use anyhow::Result;
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    widgets::Block,
    Frame,
};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread;

use crate::config::AppConfig;
use crate::models::{CalendarRow, DailyTimings, Language, RawCalendarDay};
use crate::prayer_times::selector::current_minutes;
use crate::prayer_times::{normalize_month, CountdownScheduler};
use crate::provider::{FetchError, PrayerDataProvider};
use crate::tui::events::{Event, EventHandler};
use crate::tui::theme;
use crate::tui::widgets::{calendar, header, next_prayer, prayers, statusbar};
use crate::utils::clock::Clock;

const PAGE: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Unavailable(String),
}

pub struct App<C: Clock> {
    pub config: AppConfig,
    pub language: Language,
    pub should_quit: bool,
    pub show_calendar: bool,
    pub calendar_scroll: usize,

    pub daily_status: LoadStatus,
    pub month_status: LoadStatus,
    pub month_rows: Vec<CalendarRow>,
    month: Option<(i32, u32)>,
    month_raw: Vec<RawCalendarDay>,
    daily_date: Option<NaiveDate>,

    countdown: CountdownScheduler<C>,
    provider: Arc<dyn PrayerDataProvider>,
    events: Sender<Event>,
    daily_in_flight: bool,
    month_in_flight: bool,
    daily_retry_at: Option<NaiveDateTime>,
    month_retry_at: Option<NaiveDateTime>,
}

impl<C: Clock> App<C> {
    pub fn new(
        config: AppConfig,
        clock: C,
        provider: Arc<dyn PrayerDataProvider>,
        events: Sender<Event>,
    ) -> Self {
        App {
            language: config.display.language,
            config,
            should_quit: false,
            show_calendar: false,
            calendar_scroll: 0,
            daily_status: LoadStatus::Loading,
            month_status: LoadStatus::Loading,
            month_rows: Vec::new(),
            month: None,
            month_raw: Vec::new(),
            daily_date: None,
            countdown: CountdownScheduler::new(clock),
            provider,
            events,
            daily_in_flight: false,
            month_in_flight: false,
            daily_retry_at: None,
            month_retry_at: None,
        }
    }

    /// Kick off both fetches and begin observing the countdown.
    pub fn start(&mut self) {
        self.request_daily();
        self.request_month();
        self.countdown.start(self.events.clone());
    }

    pub fn shutdown(&mut self) {
        self.countdown.stop();
    }

    #[cfg(test)]
    pub fn countdown(&self) -> &CountdownScheduler<C> {
        &self.countdown
    }

    fn now(&self) -> NaiveDateTime {
        self.countdown.clock().now()
    }

    fn retry_delay(&self) -> Duration {
        Duration::seconds(self.config.refresh.retry_seconds as i64)
    }

    fn request_daily(&mut self) {
        if self.daily_in_flight {
            return;
        }
        self.daily_in_flight = true;
        self.daily_retry_at = None;

        let date = self.now().date();
        let provider = Arc::clone(&self.provider);
        let tx = self.events.clone();
        log::info!("Fetching prayer times for {}", date);
        thread::spawn(move || {
            let result = provider.fetch_daily_timings(date);
            let _ = tx.send(Event::DailyLoaded { date, result });
        });
    }

    fn request_month(&mut self) {
        if self.month_in_flight {
            return;
        }
        self.month_in_flight = true;
        self.month_retry_at = None;

        let today = self.now().date();
        let (year, month) = (today.year(), today.month());
        self.month = Some((year, month));
        let provider = Arc::clone(&self.provider);
        let tx = self.events.clone();
        log::info!("Fetching prayer calendar for {:04}-{:02}", year, month);
        thread::spawn(move || {
            let result = provider.fetch_monthly_calendar(year, month);
            let _ = tx.send(Event::MonthLoaded {
                year,
                month,
                result,
            });
        });
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Tick(tick) => self.countdown.on_tick(tick),
            Event::Heartbeat => self.housekeeping(),
            Event::DailyLoaded { date, result } => self.apply_daily(date, result),
            Event::MonthLoaded {
                year,
                month,
                result,
            } => self.apply_month(year, month, result),
        }
    }

    fn apply_daily(&mut self, date: NaiveDate, result: Result<DailyTimings, FetchError>) {
        self.daily_in_flight = false;
        let outcome = result.map_err(|e| e.to_string()).and_then(|timings| {
            self.countdown
                .replace_timings(timings)
                .map_err(|e| e.to_string())
        });

        match outcome {
            Ok(()) => {
                self.daily_status = LoadStatus::Ready;
                self.daily_date = Some(date);
            }
            Err(reason) => {
                log::warn!("Prayer times for {} unavailable: {}", date, reason);
                self.daily_status = LoadStatus::Unavailable(reason);
                self.daily_retry_at = Some(self.now() + self.retry_delay());
            }
        }
    }

    fn apply_month(
        &mut self,
        year: i32,
        month: u32,
        result: Result<Vec<RawCalendarDay>, FetchError>,
    ) {
        self.month_in_flight = false;
        match result {
            Ok(raw) => {
                log::info!("Calendar {:04}-{:02}: {} days", year, month, raw.len());
                self.month_rows = normalize_month(&raw, self.language);
                self.month_raw = raw;
                self.month_status = LoadStatus::Ready;
            }
            Err(e) => {
                log::warn!("Calendar {:04}-{:02} unavailable: {}", year, month, e);
                self.month_rows.clear();
                self.month_raw.clear();
                self.month_status = LoadStatus::Unavailable(e.to_string());
                self.month_retry_at = Some(self.now() + self.retry_delay());
            }
        }
    }

    /// Re-fetch on day or month change and retry failed fetches when due.
    fn housekeeping(&mut self) {
        let now = self.now();
        let today = now.date();

        let day_changed = self.daily_date.is_some_and(|d| d != today);
        let daily_due = self.daily_retry_at.is_some_and(|at| now >= at);
        if (day_changed && self.daily_retry_at.is_none()) || daily_due {
            self.request_daily();
        }

        let month_changed = self.month != Some((today.year(), today.month()));
        let month_due = self.month_retry_at.is_some_and(|at| now >= at);
        if (month_changed && self.month_retry_at.is_none()) || month_due {
            self.request_month();
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        // Some terminals also report release and repeat events
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Char('c') => {
                self.show_calendar = !self.show_calendar;
                if self.show_calendar {
                    self.calendar_scroll = self.today_row().unwrap_or(0).saturating_sub(2);
                }
            }
            KeyCode::Char('l') => {
                self.language = self.language.next();
                self.month_rows = normalize_month(&self.month_raw, self.language);
            }
            KeyCode::Char('r') => {
                self.request_daily();
                self.request_month();
            }
            KeyCode::Down => self.scroll_by(1),
            KeyCode::Up => self.scroll_back(1),
            KeyCode::PageDown => self.scroll_by(PAGE),
            KeyCode::PageUp => self.scroll_back(PAGE),
            KeyCode::Home => self.calendar_scroll = 0,
            _ => {}
        }
    }

    fn scroll_by(&mut self, n: usize) {
        let last = self.month_rows.len().saturating_sub(1);
        self.calendar_scroll = (self.calendar_scroll + n).min(last);
    }

    fn scroll_back(&mut self, n: usize) {
        self.calendar_scroll = self.calendar_scroll.saturating_sub(n);
    }

    fn today_key(&self) -> String {
        self.now().date().format("%d-%m-%Y").to_string()
    }

    fn today_row(&self) -> Option<usize> {
        let key = self.today_key();
        self.month_rows.iter().position(|r| r.gregorian == key)
    }

    fn month_title(&self) -> String {
        self.month
            .and_then(|(y, m)| NaiveDate::from_ymd_opt(y, m, 1))
            .map(|d| format!("Prayer Calendar — {}", d.format("%B %Y")))
            .unwrap_or_else(|| "Prayer Calendar".to_string())
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Block::default().style(theme::screen()), area);

        let now = self.now();
        let timings = self.countdown.timings();
        let state = self.countdown.latest();

        let outer_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5), // header
                Constraint::Min(0),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        header::render(
            frame,
            outer_chunks[0],
            &self.config.location.name,
            now.date(),
            timings.and_then(|t| t.hijri.as_deref()),
            self.language,
        );
        statusbar::render(frame, outer_chunks[2], self.language);

        let body_constraints = if self.show_calendar {
            [Constraint::Length(10), Constraint::Min(0)]
        } else {
            [Constraint::Length(10), Constraint::Length(0)]
        };
        let body = Layout::default()
            .direction(Direction::Vertical)
            .constraints(body_constraints)
            .split(outer_chunks[1]);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(body[0]);

        prayers::render(
            frame,
            columns[0],
            timings,
            state.map(|s| s.next.name),
            current_minutes(now.hour(), now.minute(), now.second()),
            &self.daily_status,
            self.language,
        );
        next_prayer::render(frame, columns[1], state, &self.daily_status, self.language);

        if self.show_calendar {
            calendar::render(
                frame,
                body[1],
                &self.month_title(),
                &self.month_rows,
                &self.today_key(),
                self.calendar_scroll,
                &self.month_status,
                self.language,
            );
        }
    }
}

/// Run the TUI event loop.
pub fn run(config: AppConfig, provider: Arc<dyn PrayerDataProvider>) -> Result<()> {
    let clock = config.clock()?;
    let events = EventHandler::new(1000);
    let mut app = App::new(config, clock, provider, events.sender());
    app.start();

    let mut terminal = ratatui::init();
    let result = (|| -> Result<()> {
        loop {
            terminal.draw(|frame| app.draw(frame))?;
            app.handle_event(events.next()?);
            if app.should_quit {
                return Ok(());
            }
        }
    })();

    app.shutdown();
    ratatui::restore();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CalendarCell, PrayerName};
    use crate::provider::StaticProvider;
    use crate::utils::clock::ManualClock;
    use crossterm::event::KeyModifiers;
    use std::sync::mpsc::{self, Receiver};
    use std::time::Duration as StdDuration;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn timings(d: u32) -> DailyTimings {
        let date = NaiveDate::from_ymd_opt(2025, 3, d).unwrap();
        let times = ["06:20", "07:41", "13:37", "16:48", "19:33", "20:46"].map(String::from);
        DailyTimings::new(date, times).with_hijri("5 Ramadan 1446")
    }

    fn month() -> Vec<RawCalendarDay> {
        (1..=31)
            .map(|d| RawCalendarDay {
                gregorian: format!("{:02}-03-2025", d),
                hijri: format!("{:02}-09-1446", d),
                timings: ["06:25 (WET)", "07:41 (WET)", "13:37 (WET)", "16:48 (WET)", "19:33 (WET)", "20:46 (WET)"]
                    .map(String::from),
            })
            .collect()
    }

    fn app_with(
        clock: ManualClock,
        daily: Result<DailyTimings, FetchError>,
        monthly: Result<Vec<RawCalendarDay>, FetchError>,
    ) -> (App<ManualClock>, Receiver<Event>) {
        let (tx, rx) = mpsc::channel();
        let provider = Arc::new(StaticProvider { daily, monthly });
        (App::new(AppConfig::default(), clock, provider, tx), rx)
    }

    /// Feed events into the app until `done` holds.
    fn pump(app: &mut App<ManualClock>, rx: &Receiver<Event>, done: impl Fn(&App<ManualClock>) -> bool) {
        while !done(app) {
            let event = rx
                .recv_timeout(StdDuration::from_secs(5))
                .expect("event before timeout");
            app.handle_event(event);
        }
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn settled(app: &App<ManualClock>) -> bool {
        !app.daily_in_flight && !app.month_in_flight
    }

    #[test]
    fn start_loads_timings_and_calendar() {
        let clock = ManualClock::new(at(5, 12, 0));
        let (mut app, rx) = app_with(clock, Ok(timings(5)), Ok(month()));
        app.start();
        pump(&mut app, &rx, settled);

        assert_eq!(app.daily_status, LoadStatus::Ready);
        assert_eq!(app.month_status, LoadStatus::Ready);
        assert_eq!(app.month_rows.len(), 31);
        assert_eq!(app.month_rows[4].weekday_label, "Wednesday");
        assert_eq!(
            app.month_rows[0].get(PrayerName::Fajr),
            &CalendarCell::Time("06:25".to_string())
        );

        let state = app.countdown().latest().expect("countdown published");
        assert_eq!(state.next.name, PrayerName::Dhuhr);
        assert_eq!(state.remaining.hours, 1);
        assert_eq!(state.remaining.minutes, 37);
        app.shutdown();
    }

    #[test]
    fn failed_fetch_is_flagged_and_retried_when_due() {
        let clock = ManualClock::new(at(5, 12, 0));
        let (mut app, rx) = app_with(
            clock.clone(),
            Err(FetchError::Network("offline".to_string())),
            Err(FetchError::Network("offline".to_string())),
        );
        app.start();
        pump(&mut app, &rx, settled);

        assert!(matches!(app.daily_status, LoadStatus::Unavailable(ref r) if r.contains("offline")));
        assert!(app.countdown().latest().is_none());
        assert!(app.month_rows.is_empty());

        app.handle_event(Event::Heartbeat);
        assert!(!app.daily_in_flight);

        clock.advance(Duration::seconds(300));
        app.handle_event(Event::Heartbeat);
        assert!(app.daily_in_flight);
        assert!(app.month_in_flight);
        pump(&mut app, &rx, settled);
        app.shutdown();
    }

    #[test]
    fn malformed_timings_are_unavailable_not_garbage() {
        let clock = ManualClock::new(at(5, 12, 0));
        let date = NaiveDate::from_ymd_opt(2025, 3, 5).unwrap();
        let bad = DailyTimings::new(
            date,
            ["06:20", "07:41", "noon", "16:48", "19:33", "20:46"].map(String::from),
        );
        let (mut app, rx) = app_with(clock, Ok(bad), Ok(month()));
        app.start();
        pump(&mut app, &rx, settled);

        assert!(matches!(app.daily_status, LoadStatus::Unavailable(ref r) if r.contains("noon")));
        assert!(app.countdown().latest().is_none());
        assert_eq!(app.month_status, LoadStatus::Ready);
        app.shutdown();
    }

    #[test]
    fn new_day_triggers_a_refetch() {
        let clock = ManualClock::new(at(5, 23, 59));
        let (mut app, rx) = app_with(clock.clone(), Ok(timings(5)), Ok(month()));
        app.start();
        pump(&mut app, &rx, settled);

        app.handle_event(Event::Heartbeat);
        assert!(!app.daily_in_flight);

        clock.set(at(6, 0, 0));
        app.handle_event(Event::Heartbeat);
        assert!(app.daily_in_flight);
        assert!(!app.month_in_flight);
        pump(&mut app, &rx, settled);
        app.shutdown();
    }

    #[test]
    fn language_key_relabels_the_calendar() {
        let clock = ManualClock::new(at(5, 12, 0));
        let (mut app, rx) = app_with(clock, Ok(timings(5)), Ok(month()));
        app.start();
        pump(&mut app, &rx, settled);

        app.handle_key(key(KeyCode::Char('l')));
        assert_eq!(app.language, Language::Es);
        assert_eq!(app.month_rows[4].weekday_label, "Miércoles");
        app.shutdown();
    }

    #[test]
    fn calendar_opens_near_today_and_scrolls_within_bounds() {
        let clock = ManualClock::new(at(20, 12, 0));
        let (mut app, rx) = app_with(clock, Ok(timings(20)), Ok(month()));
        app.start();
        pump(&mut app, &rx, settled);

        app.handle_key(key(KeyCode::Char('c')));
        assert!(app.show_calendar);
        assert_eq!(app.calendar_scroll, 17);

        app.handle_key(key(KeyCode::PageDown));
        app.handle_key(key(KeyCode::PageDown));
        assert_eq!(app.calendar_scroll, 30);
        app.handle_key(key(KeyCode::Home));
        app.handle_key(key(KeyCode::Up));
        assert_eq!(app.calendar_scroll, 0);
        app.shutdown();
    }

    #[test]
    fn quit_key_and_shutdown_stop_the_countdown() {
        let clock = ManualClock::new(at(5, 12, 0));
        let (mut app, rx) = app_with(clock, Ok(timings(5)), Ok(month()));
        app.start();
        pump(&mut app, &rx, settled);
        assert!(app.countdown().is_running());

        app.handle_key(key(KeyCode::Esc));
        assert!(app.should_quit);
        app.shutdown();
        assert!(!app.countdown().is_running());
    }
}
