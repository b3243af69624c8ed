//! Repeating timer scoped to an active widget state.
//!
//! A [`Ticker`] holds a tokio interval only while acquired. Releasing it (or
//! dropping it) drops the interval, so no further ticks are scheduled on any
//! exit path.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior, interval_at};

#[derive(Debug)]
pub struct Ticker {
    period: Duration,
    interval: Option<Interval>,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Ticker {
            period,
            interval: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.interval.is_some()
    }

    /// Start ticking. The first tick fires one period from now. Acquiring an
    /// active ticker keeps its current schedule.
    pub fn acquire(&mut self) {
        if self.interval.is_some() {
            return;
        }
        let mut interval = interval_at(Instant::now() + self.period, self.period);
        // Late ticks shift the schedule instead of bursting to catch up.
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.interval = Some(interval);
    }

    pub fn release(&mut self) {
        self.interval = None;
    }

    /// Acquire or release to match `active`.
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.acquire();
        } else {
            self.release();
        }
    }

    /// Wait for the next tick. Never completes while released.
    ///
    /// Cancel safe, so it can sit in a `tokio::select!` arm.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
