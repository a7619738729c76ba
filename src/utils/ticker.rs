use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// One firing of a [`Ticker`]. `generation` identifies the ticker that sent it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
    pub seq: u64,
}

/// Delivers a tick; returns `false` once the receiving side is gone.
pub type TickSink = Arc<dyn Fn(Tick) -> bool + Send + Sync>;

/// Repeating timer on a background thread.
///
/// Each deadline is the previous one plus `period`, never "now plus
/// period", so a slow consumer does not push later ticks back. Dropping
/// the handle stops and joins the thread.
pub struct Ticker {
    stop: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(period: Duration, generation: u64, sink: TickSink) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let stop_flag = Arc::clone(&stop);

        let handle = thread::spawn(move || {
            let mut deadline = Instant::now();
            let mut seq: u64 = 0;
            loop {
                seq += 1;
                deadline += period;
                loop {
                    if stop_flag.load(Ordering::Acquire) {
                        return;
                    }
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    thread::park_timeout(deadline - now);
                }
                if !sink(Tick { generation, seq }) {
                    log::debug!("Ticker {} receiver gone, exiting", generation);
                    return;
                }
            }
        });

        Self {
            stop,
            handle: Some(handle),
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Release);
        if let Some(handle) = self.handle.take() {
            handle.thread().unpark();
            if handle.join().is_err() {
                log::warn!("Ticker thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    fn channel_sink(tx: mpsc::Sender<Tick>) -> TickSink {
        Arc::new(move |tick| tx.send(tick).is_ok())
    }

    #[test]
    fn ticks_in_sequence_with_generation() {
        let (tx, rx) = mpsc::channel();
        let ticker = Ticker::spawn(Duration::from_millis(5), 7, channel_sink(tx));

        let first = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        let second = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        drop(ticker);

        assert_eq!(first, Tick { generation: 7, seq: 1 });
        assert_eq!(second.seq, 2);
    }

    #[test]
    fn drop_stops_the_thread() {
        let (tx, rx) = mpsc::channel();
        let ticker = Ticker::spawn(Duration::from_millis(5), 1, channel_sink(tx));
        rx.recv_timeout(Duration::from_secs(2)).unwrap();
        drop(ticker);

        // Drain whatever was queued before the join; the sender is gone now.
        while rx.try_recv().is_ok() {}
        assert!(matches!(
            rx.recv_timeout(Duration::from_millis(50)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        ));
    }

    #[test]
    fn panicking_sink_does_not_poison_drop() {
        let sink: TickSink = Arc::new(|_| panic!("sink failed"));
        let ticker = Ticker::spawn(Duration::from_millis(1), 1, sink);
        thread::sleep(Duration::from_millis(20));
        drop(ticker);
    }

    #[test]
    fn drop_does_not_wait_for_a_long_period() {
        let (tx, _rx) = mpsc::channel();
        let ticker = Ticker::spawn(Duration::from_secs(3600), 1, channel_sink(tx));
        let started = Instant::now();
        drop(ticker);
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
