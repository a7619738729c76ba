use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use crossterm::event::{self, Event as CEvent, KeyEvent};

use crate::models::{DailyTimings, RawCalendarDay};
use crate::provider::FetchError;
use crate::utils::ticker::Tick;

#[derive(Debug)]
pub enum Event {
    Key(KeyEvent),
    /// Countdown cadence, from the scheduler's ticker.
    Tick(Tick),
    /// Housekeeping pulse from the input thread: retries, day change.
    Heartbeat,
    DailyLoaded {
        date: NaiveDate,
        result: Result<DailyTimings, FetchError>,
    },
    MonthLoaded {
        year: i32,
        month: u32,
        result: Result<Vec<RawCalendarDay>, FetchError>,
    },
}

impl From<Tick> for Event {
    fn from(tick: Tick) -> Self {
        Event::Tick(tick)
    }
}

/// Single channel every producer posts into; the UI thread drains it.
pub struct EventHandler {
    tx: mpsc::Sender<Event>,
    rx: mpsc::Receiver<Event>,
}

impl EventHandler {
    pub fn new(heartbeat_ms: u64) -> Self {
        let (tx, rx) = mpsc::channel();
        let heartbeat = Duration::from_millis(heartbeat_ms);
        let input_tx = tx.clone();

        thread::spawn(move || {
            let mut last_beat = Instant::now();
            loop {
                let timeout = heartbeat
                    .checked_sub(last_beat.elapsed())
                    .unwrap_or(Duration::ZERO);

                if event::poll(timeout).unwrap_or(false) {
                    match event::read() {
                        Ok(CEvent::Key(key)) => {
                            if input_tx.send(Event::Key(key)).is_err() {
                                break;
                            }
                        }
                        Ok(_) => {}
                        Err(_) => break,
                    }
                }

                if last_beat.elapsed() >= heartbeat {
                    if input_tx.send(Event::Heartbeat).is_err() {
                        break;
                    }
                    last_beat = Instant::now();
                }
            }
        });

        Self { tx, rx }
    }

    /// Sender for ticks and fetch results.
    pub fn sender(&self) -> mpsc::Sender<Event> {
        self.tx.clone()
    }

    pub fn next(&self) -> Result<Event, mpsc::RecvError> {
        self.rx.recv()
    }
}
