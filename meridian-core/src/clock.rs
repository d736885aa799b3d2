//! Wall-clock source and the minute-aligned refresh ticker.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Timelike, Utc};
use log::debug;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time;

pub const MILLIS_PER_MINUTE: u64 = 60_000;

/// Source of the current instant.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Delay until the next wall-clock minute boundary of `now`.
pub fn millis_until_next_minute(now: DateTime<Utc>) -> u64 {
    // A leap second reports more than 999ms.
    let millis = u64::from(now.nanosecond() / 1_000_000).min(999);
    MILLIS_PER_MINUTE - (u64::from(now.second()) * 1_000 + millis)
}

/// One clock refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub sequence: u64,
}

/// Background task sending a [`Tick`] on each wall-clock minute boundary.
///
/// The delay is re-measured against the clock before every tick, so a late
/// wake-up (a busy runtime, a suspended host) is followed by a tick on the next
/// real boundary. Dropping the ticker aborts the task, so no tick arrives after
/// teardown.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    pub fn start(clock: Arc<dyn Clock>, sender: mpsc::UnboundedSender<Tick>) -> Self {
        let handle = tokio::spawn(async move {
            let mut sequence = 0;
            loop {
                let delay = millis_until_next_minute(clock.now());
                debug!("next tick in {}ms", delay);
                time::sleep(Duration::from_millis(delay)).await;

                sequence += 1;
                if sender.send(Tick { sequence }).is_err() {
                    debug!("tick receiver closed, stopping ticker");
                    break;
                }
            }
        });

        Self { handle }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tokio::time::Instant;

    use super::*;

    /// Wall clock that advances with tokio's (pausable) time.
    struct RuntimeClock {
        base: DateTime<Utc>,
        started: Instant,
    }

    impl RuntimeClock {
        fn at(base: DateTime<Utc>) -> Arc<Self> {
            Arc::new(Self {
                base,
                started: Instant::now(),
            })
        }
    }

    impl Clock for RuntimeClock {
        fn now(&self) -> DateTime<Utc> {
            let elapsed = chrono::Duration::from_std(self.started.elapsed()).unwrap();
            self.base + elapsed
        }
    }

    fn quarter_to() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 45).unwrap()
    }

    #[test]
    fn delay_reaches_next_minute() {
        assert_eq!(millis_until_next_minute(quarter_to()), 15_000);

        let on_boundary = Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap();
        assert_eq!(millis_until_next_minute(on_boundary), MILLIS_PER_MINUTE);

        let with_millis = quarter_to() + chrono::Duration::milliseconds(250);
        assert_eq!(millis_until_next_minute(with_millis), 14_750);
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_on_boundary_then_every_minute() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = Instant::now();
        let _ticker = Ticker::start(RuntimeClock::at(quarter_to()), tx);

        let first = rx.recv().await.unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(started.elapsed(), Duration::from_secs(15));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.sequence, 2);
        assert_eq!(started.elapsed(), Duration::from_secs(75));
    }

    #[tokio::test(start_paused = true)]
    async fn late_wake_up_realigns_to_next_boundary() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let started = Instant::now();
        let _ticker = Ticker::start(RuntimeClock::at(quarter_to()), tx);

        // Let the task schedule its first sleep, then jump past the boundary.
        tokio::task::yield_now().await;
        time::advance(Duration::from_secs(45)).await;

        let first = rx.recv().await.unwrap();
        assert_eq!(first.sequence, 1);
        assert_eq!(started.elapsed(), Duration::from_secs(45));

        let second = rx.recv().await.unwrap();
        assert_eq!(second.sequence, 2);
        assert_eq!(started.elapsed(), Duration::from_secs(75));

        let third = rx.recv().await.unwrap();
        assert_eq!(third.sequence, 3);
        assert_eq!(started.elapsed(), Duration::from_secs(135));
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_ticker_stops_ticks() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let ticker = Ticker::start(Arc::new(FixedClock(quarter_to())), tx);

        drop(ticker);

        assert_eq!(rx.recv().await, None);
    }
}
