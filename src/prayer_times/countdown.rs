//! Once-per-second countdown to the next prayer.
//!
//! [`CountdownScheduler`] runs on the consumer's thread. The only thing on
//! another thread is its [`Ticker`], which posts [`Tick`]s into the
//! consumer's event channel; the consumer hands each one back through
//! [`CountdownScheduler::on_tick`]. Every ticker gets a fresh generation, so
//! ticks still queued from a stopped or replaced ticker are ignored.

use chrono::NaiveDateTime;
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::time::Duration;

use crate::models::{DailyTimings, NextPrayer, RemainingDuration};
use crate::prayer_times::codec::TimeFormatError;
use crate::prayer_times::selector::PrayerSchedule;
use crate::utils::clock::Clock;
use crate::utils::ticker::{Tick, TickSink, Ticker};

pub const DEFAULT_PERIOD: Duration = Duration::from_secs(1);

/// What the view renders: the next prayer and the time left, stamped with
/// the instant it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountdownState {
    pub next: NextPrayer,
    pub remaining: RemainingDuration,
    pub computed_at: NaiveDateTime,
}

type Observer = Box<dyn FnMut(&CountdownState)>;

pub struct CountdownScheduler<C: Clock> {
    clock: C,
    period: Duration,
    schedule: Option<PrayerSchedule>,
    /// Present while observation is active, even if timings are not.
    sink: Option<TickSink>,
    ticker: Option<Ticker>,
    generation: u64,
    latest: Option<CountdownState>,
    observers: Vec<Observer>,
}

impl<C: Clock> CountdownScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            period: DEFAULT_PERIOD,
            schedule: None,
            sink: None,
            ticker: None,
            generation: 0,
            latest: None,
            observers: Vec::new(),
        }
    }

    pub fn with_period(mut self, period: Duration) -> Self {
        self.period = period;
        self
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&CountdownState) + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Most recent published state. Kept across malformed replacements.
    pub fn latest(&self) -> Option<&CountdownState> {
        self.latest.as_ref()
    }

    pub fn timings(&self) -> Option<&DailyTimings> {
        self.schedule.as_ref().map(|s| s.timings())
    }

    /// True while a ticker is live.
    #[cfg(test)]
    pub fn is_running(&self) -> bool {
        self.ticker.is_some()
    }

    #[cfg(test)]
    pub fn is_observing(&self) -> bool {
        self.sink.is_some()
    }

    /// Swap in a new day's timings.
    ///
    /// While observing, the ticker restarts under a new generation and the
    /// state is recomputed at once. Timings that fail to parse leave the
    /// scheduler idle with its last good state intact.
    pub fn replace_timings(&mut self, timings: DailyTimings) -> Result<(), TimeFormatError> {
        let date = timings.date;
        match PrayerSchedule::new(timings) {
            Ok(schedule) => {
                log::info!("Prayer timings for {} loaded", date);
                self.schedule = Some(schedule);
                if self.sink.is_some() {
                    self.restart();
                }
                Ok(())
            }
            Err(e) => {
                log::warn!("Discarding timings for {}: {}", date, e);
                self.schedule = None;
                self.release_ticker();
                Err(e)
            }
        }
    }

    /// Begin observation. Ticks are posted into `events`; feed each one
    /// back through [`Self::on_tick`]. Publishes immediately when timings
    /// are present, otherwise waits for [`Self::replace_timings`].
    pub fn start<T>(&mut self, events: Sender<T>)
    where
        T: From<Tick> + Send + 'static,
    {
        let sink: TickSink = Arc::new(move |tick| events.send(T::from(tick)).is_ok());
        self.sink = Some(sink);
        self.restart();
    }

    pub fn on_tick(&mut self, tick: Tick) {
        if self.ticker.is_none() || tick.generation != self.generation {
            log::trace!(
                "Ignoring tick {} of generation {} (current {})",
                tick.seq,
                tick.generation,
                self.generation
            );
            return;
        }
        self.refresh();
    }

    /// End observation. No state is published after this returns.
    pub fn stop(&mut self) {
        if self.sink.take().is_some() {
            log::debug!("Countdown stopped");
        }
        self.release_ticker();
    }

    /// Recompute against the clock and publish. No-op unless observing.
    fn refresh(&mut self) {
        if self.sink.is_none() {
            return;
        }
        let Some(schedule) = &self.schedule else {
            return;
        };
        let now = self.clock.now();
        let selection = schedule.select_at(now.time());
        let state = CountdownState {
            next: selection.next,
            remaining: selection.remaining,
            computed_at: now,
        };
        for observer in &mut self.observers {
            observer(&state);
        }
        self.latest = Some(state);
    }

    fn restart(&mut self) {
        self.release_ticker();
        let (Some(sink), Some(_)) = (&self.sink, &self.schedule) else {
            return;
        };
        self.ticker = Some(Ticker::spawn(self.period, self.generation, Arc::clone(sink)));
        log::debug!("Countdown ticker started (generation {})", self.generation);
        self.refresh();
    }

    fn release_ticker(&mut self) {
        // Drop joins the thread before the generation moves on.
        self.ticker = None;
        self.generation += 1;
    }
}

impl<C: Clock> Drop for CountdownScheduler<C> {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PrayerName;
    use crate::utils::clock::ManualClock;
    use chrono::NaiveDate;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::sync::mpsc;

    const FAST: Duration = Duration::from_millis(5);
    const WAIT: Duration = Duration::from_secs(2);

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).unwrap()
    }

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, s).unwrap()
    }

    fn timings(times: [&str; 6]) -> DailyTimings {
        DailyTimings::new(day(), times.map(String::from))
    }

    fn sample() -> DailyTimings {
        timings(["06:00", "07:30", "13:00", "16:00", "19:00", "20:30"])
    }

    fn recording(
        scheduler: &mut CountdownScheduler<ManualClock>,
    ) -> Rc<RefCell<Vec<CountdownState>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        scheduler.subscribe(move |s| sink.borrow_mut().push(s.clone()));
        seen
    }

    #[test]
    fn start_publishes_immediately() {
        let clock = ManualClock::new(at(0, 0, 0));
        let mut scheduler = CountdownScheduler::new(clock).with_period(Duration::from_secs(3600));
        let seen = recording(&mut scheduler);
        scheduler.replace_timings(sample()).unwrap();

        let (tx, _rx) = mpsc::channel::<Tick>();
        scheduler.start(tx);

        assert!(scheduler.is_running());
        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].next.name, PrayerName::Fajr);
        assert_eq!(seen[0].remaining.hours, 6);
        assert_eq!(seen[0].computed_at, at(0, 0, 0));
    }

    #[test]
    fn ticks_recompute_against_the_clock() {
        let clock = ManualClock::new(at(5, 59, 58));
        let mut scheduler = CountdownScheduler::new(clock.clone()).with_period(FAST);
        let seen = recording(&mut scheduler);
        scheduler.replace_timings(sample()).unwrap();

        let (tx, rx) = mpsc::channel::<Tick>();
        scheduler.start(tx);

        for _ in 0..2 {
            let tick = rx.recv_timeout(WAIT).unwrap();
            clock.advance(chrono::Duration::seconds(1));
            scheduler.on_tick(tick);
        }
        scheduler.stop();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[1].remaining.seconds, 1);
        // 06:00:00 is Fajr itself, so the countdown moves on to Sunrise.
        assert_eq!(seen[2].next.name, PrayerName::Sunrise);
        assert_eq!(seen[2].remaining.hours, 1);
        assert_eq!(seen[2].remaining.minutes, 30);
    }

    #[test]
    fn waits_for_timings_before_ticking() {
        let clock = ManualClock::new(at(12, 0, 0));
        let mut scheduler = CountdownScheduler::new(clock).with_period(FAST);
        let seen = recording(&mut scheduler);

        let (tx, _rx) = mpsc::channel::<Tick>();
        scheduler.start(tx);
        assert!(scheduler.is_observing());
        assert!(!scheduler.is_running());
        assert!(seen.borrow().is_empty());

        scheduler.replace_timings(sample()).unwrap();
        assert!(scheduler.is_running());
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(seen.borrow()[0].next.name, PrayerName::Dhuhr);
    }

    #[test]
    fn stopped_scheduler_ignores_queued_ticks() {
        let clock = ManualClock::new(at(12, 0, 0));
        let mut scheduler = CountdownScheduler::new(clock).with_period(FAST);
        let seen = recording(&mut scheduler);
        scheduler.replace_timings(sample()).unwrap();

        let (tx, rx) = mpsc::channel::<Tick>();
        scheduler.start(tx);
        let queued = rx.recv_timeout(WAIT).unwrap();
        scheduler.stop();

        scheduler.on_tick(queued);
        while let Ok(tick) = rx.try_recv() {
            scheduler.on_tick(tick);
        }
        assert!(!scheduler.is_running());
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn stopped_scheduler_does_not_republish_on_refresh() {
        let clock = ManualClock::new(at(12, 0, 0));
        let mut scheduler = CountdownScheduler::new(clock.clone()).with_period(FAST);
        let seen = recording(&mut scheduler);
        scheduler.replace_timings(sample()).unwrap();

        let (tx, _rx) = mpsc::channel::<Tick>();
        scheduler.start(tx);
        scheduler.stop();

        clock.advance(chrono::Duration::minutes(1));
        scheduler.refresh();
        assert_eq!(seen.borrow().len(), 1);
        assert_eq!(scheduler.latest().map(|s| s.computed_at), Some(at(12, 0, 0)));
    }

    #[test]
    fn replacement_restarts_under_a_new_generation() {
        let clock = ManualClock::new(at(12, 0, 0));
        let mut scheduler = CountdownScheduler::new(clock).with_period(FAST);
        let seen = recording(&mut scheduler);
        scheduler.replace_timings(sample()).unwrap();

        let (tx, rx) = mpsc::channel::<Tick>();
        scheduler.start(tx);
        let stale = rx.recv_timeout(WAIT).unwrap();

        scheduler
            .replace_timings(timings(["06:01", "07:31", "12:30", "16:01", "19:01", "20:31"]))
            .unwrap();
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(seen.borrow()[1].next.time, "12:30");

        scheduler.on_tick(stale);
        assert_eq!(seen.borrow().len(), 2);

        let fresh = loop {
            let tick = rx.recv_timeout(WAIT).unwrap();
            if tick.generation != stale.generation {
                break tick;
            }
        };
        scheduler.on_tick(fresh);
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn malformed_replacement_keeps_the_last_good_state() {
        let clock = ManualClock::new(at(12, 0, 0));
        let mut scheduler = CountdownScheduler::new(clock.clone()).with_period(FAST);
        let seen = recording(&mut scheduler);
        scheduler.replace_timings(sample()).unwrap();

        let (tx, rx) = mpsc::channel::<Tick>();
        scheduler.start(tx);
        let before = scheduler.latest().cloned().unwrap();

        let bad = timings(["06:00", "07:30", "13:00", "16:00", "19:00", "late"]);
        assert!(scheduler.replace_timings(bad).is_err());
        assert!(!scheduler.is_running());
        assert!(scheduler.timings().is_none());

        clock.advance(chrono::Duration::minutes(5));
        while let Ok(tick) = rx.recv_timeout(Duration::from_millis(20)) {
            scheduler.on_tick(tick);
        }
        assert_eq!(scheduler.latest(), Some(&before));
        assert_eq!(seen.borrow().len(), 1);
    }

    #[test]
    fn dropping_the_scheduler_releases_the_ticker() {
        let clock = ManualClock::new(at(12, 0, 0));
        let mut scheduler = CountdownScheduler::new(clock).with_period(FAST);
        scheduler.replace_timings(sample()).unwrap();

        let (tx, rx) = mpsc::channel::<Tick>();
        scheduler.start(tx);
        drop(scheduler);

        while rx.try_recv().is_ok() {}
        assert!(matches!(
            rx.recv_timeout(Duration::from_millis(50)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
    }
}
