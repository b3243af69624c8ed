//! Calendar engine: month grids, event days, and month navigation.
//!
//! Months are zero-based (`0` = January) throughout, weekdays count from
//! Sunday (`0`). Everything here is a pure function of its inputs; the
//! wall clock only enters through [`clock`] and [`widget`].

pub mod clock;
pub mod event;
pub mod widget;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub use clock::{Clock, ClockFace, FixedClock, SystemClock, TodayGate, academic_year_progress};
pub use event::{CalendarEvent, CategoryFilter, EventCategory, events_on, filter_events};
pub use widget::{CalendarWidget, ClockSync};

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

pub const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// The month a calendar is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewState {
    /// Zero-based month, always in `0..=11`
    pub month: u32,
    pub year: i32,
}

impl ViewState {
    pub fn new(month: u32, year: i32) -> Self {
        debug_assert!(month < 12, "month {month} out of range");
        ViewState { month, year }
    }

    /// From a one-based month as people write it (1 = January).
    pub fn from_calendar_month(month: u32, year: i32) -> Option<Self> {
        (1..=12).contains(&month).then(|| ViewState::new(month - 1, year))
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        ViewState::new(date.month0(), date.year())
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.month0() == self.month && date.year() == self.year
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[self.month as usize % 12]
    }

    pub fn days_in_month(&self) -> u32 {
        days_in_month(self.month as i32, self.year)
    }

    pub fn first_weekday(&self) -> u32 {
        first_weekday_of_month(self.month as i32, self.year)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// One cell of a rendered month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayCell {
    /// Filler before the first day of the month
    Empty,
    Day {
        day: u32,
        is_today: bool,
        has_event: bool,
    },
}

impl DayCell {
    pub fn day(&self) -> Option<u32> {
        match self {
            DayCell::Empty => None,
            DayCell::Day { day, .. } => Some(*day),
        }
    }

    pub fn is_today(&self) -> bool {
        matches!(self, DayCell::Day { is_today: true, .. })
    }

    pub fn has_event(&self) -> bool {
        matches!(self, DayCell::Day { has_event: true, .. })
    }
}

/// Bring a possibly out-of-range month back into `0..=11`, carrying into the
/// year. The year saturates at the ends of `i32`.
fn normalize(month: i32, year: i32) -> (u32, i32) {
    (month.rem_euclid(12) as u32, year.saturating_add(month.div_euclid(12)))
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Number of days in a Gregorian month. `month` is zero-based and may be
/// out of range, in which case it carries into the year (`12` is January
/// of the following year, `-1` December of the previous one).
pub fn days_in_month(month: i32, year: i32) -> u32 {
    let (month, year) = normalize(month, year);
    match month {
        1 if is_leap_year(year) => 29,
        1 => 28,
        3 | 5 | 8 | 10 => 30,
        _ => 31,
    }
}

/// Weekday of the first of the month, Sunday = 0.
pub fn first_weekday_of_month(month: i32, year: i32) -> u32 {
    let (month, year) = normalize(month, year);
    NaiveDate::from_ymd_opt(year, month + 1, 1)
        .map(|d| d.weekday().num_days_from_sunday())
        .unwrap_or(0)
}

/// Lay out a month: leading empty cells up to the first weekday, then one
/// cell per day.
///
/// `today` is `None` until the clock has been read for real; no cell is
/// marked as today before that.
pub fn build_grid(
    view: ViewState,
    events: &[CalendarEvent],
    today: Option<NaiveDate>,
) -> Vec<DayCell> {
    let leading = view.first_weekday();
    let days = view.days_in_month();
    let today = today.filter(|t| view.contains(*t)).map(|t| t.day());

    let mut cells = Vec::with_capacity((leading + days) as usize);
    cells.extend((0..leading).map(|_| DayCell::Empty));

    for day in 1..=days {
        let has_event = events
            .iter()
            .any(|event| event.date.day() == day && view.contains(event.date));
        cells.push(DayCell::Day {
            day,
            is_today: today == Some(day),
            has_event,
        });
    }

    cells
}

/// Step one month, rolling the year over at either end. The year saturates
/// at the ends of `i32`, so stepping past them wraps within the same year.
pub fn navigate(view: ViewState, direction: Direction) -> ViewState {
    match (direction, view.month) {
        (Direction::Previous, 0) => ViewState::new(11, view.year.saturating_sub(1)),
        (Direction::Previous, m) => ViewState::new(m - 1, view.year),
        (Direction::Next, 11) => ViewState::new(0, view.year.saturating_add(1)),
        (Direction::Next, m) => ViewState::new(m + 1, view.year),
    }
}

/// Jump to the month containing `today`, whatever is showing now.
pub fn go_to_today(_view: ViewState, today: NaiveDate) -> ViewState {
    ViewState::containing(today)
}
