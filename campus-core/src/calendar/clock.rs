//! Wall clock access, the "today" readiness gate, and the clock-derived
//! readouts shown next to the calendar.

use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

/// Zero-based month the academic year starts in (June).
pub const ACADEMIC_YEAR_START: u32 = 5;

/// Source of the current local date and time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn today(&self) -> NaiveDate {
        self.now().date()
    }
}

/// The host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: Arc<Mutex<NaiveDateTime>>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        FixedClock {
            now: Arc::new(Mutex::new(now)),
        }
    }

    /// Midnight on the given date.
    pub fn at_date(date: NaiveDate) -> Self {
        FixedClock::new(date.and_time(NaiveTime::MIN))
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Holds the last real reading of "today".
///
/// Starts not ready: nothing derived from the wall clock is shown until
/// [`TodayGate::mark_ready`] performs the first read after initial render.
#[derive(Debug, Clone, Default)]
pub struct TodayGate {
    today: Option<NaiveDate>,
}

impl TodayGate {
    pub fn new() -> Self {
        TodayGate { today: None }
    }

    pub fn is_ready(&self) -> bool {
        self.today.is_some()
    }

    /// `None` until ready.
    pub fn today(&self) -> Option<NaiveDate> {
        self.today
    }

    pub fn mark_ready(&mut self, clock: &impl Clock) -> NaiveDate {
        let today = clock.today();
        self.today = Some(today);
        today
    }

    /// Re-read the clock. Returns the new date when the day rolled over.
    /// Does nothing before the gate is ready.
    pub fn refresh(&mut self, clock: &impl Clock) -> Option<NaiveDate> {
        let previous = self.today?;
        let today = clock.today();
        if today == previous {
            return None;
        }
        self.today = Some(today);
        Some(today)
    }
}

/// Hand positions of an analog clock, in degrees clockwise from 12.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockFace {
    pub time: NaiveTime,
    pub hour_hand: f64,
    pub minute_hand: f64,
    pub second_hand: f64,
}

impl ClockFace {
    /// The hour and minute hands sweep continuously; the second hand jumps.
    pub fn at(time: NaiveTime) -> Self {
        let hours = f64::from(time.hour() % 12);
        let minutes = f64::from(time.minute());
        let seconds = f64::from(time.second());

        ClockFace {
            time,
            hour_hand: (hours + minutes / 60.0) * 30.0,
            minute_hand: (minutes + seconds / 60.0) * 6.0,
            second_hand: seconds * 6.0,
        }
    }
}

/// Percent of the academic year elapsed at the start of `month` (zero-based),
/// counted in whole months from June and rounded to the nearest percent.
pub fn academic_year_progress(month: u32) -> u32 {
    let elapsed = (month % 12 + 12 - ACADEMIC_YEAR_START) % 12;
    // elapsed * 100 / 12 never lands on a half, so this rounds to nearest
    (elapsed * 100 + 6) / 12
}
