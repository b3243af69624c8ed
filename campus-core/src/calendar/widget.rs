//! A mounted academic calendar.
//!
//! The widget owns its view state for as long as it is mounted. It is built
//! in two phases: [`CalendarWidget::new`] positions the view but does not
//! trust the clock for "today"; [`CalendarWidget::mount`] performs the first
//! real clock read and from then on today-dependent output is live.

use std::future::Future;
use std::time::Duration;

use chrono::{Datelike, NaiveDate, NaiveDateTime};

use super::clock::{Clock, ClockFace, TodayGate, academic_year_progress};
use super::event::{CalendarEvent, CategoryFilter, events_on, filter_events};
use super::{DayCell, Direction, ViewState, build_grid, go_to_today, navigate};
use crate::timer::Ticker;

/// Outcome of a periodic clock check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockSync {
    Unchanged,
    /// The date rolled over but today is still in the shown month.
    DayChanged,
    /// The date rolled over into another month and the view followed it.
    DayChangedAndFollowed,
}

pub struct CalendarWidget<C: Clock> {
    clock: C,
    events: Vec<CalendarEvent>,
    view: ViewState,
    gate: TodayGate,
    filter: CategoryFilter,
}

impl<C: Clock> CalendarWidget<C> {
    pub fn new(clock: C, events: Vec<CalendarEvent>) -> Self {
        let view = ViewState::containing(clock.today());
        CalendarWidget {
            clock,
            events,
            view,
            gate: TodayGate::new(),
            filter: CategoryFilter::All,
        }
    }

    /// Show `view` instead of the current month.
    pub fn with_view(mut self, view: ViewState) -> Self {
        self.view = view;
        self
    }

    pub fn mount(&mut self) {
        let today = self.gate.mark_ready(&self.clock);
        tracing::debug!(%today, "calendar mounted");
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    /// The last real reading of today, once mounted.
    pub fn today(&self) -> Option<NaiveDate> {
        self.gate.today()
    }

    /// The current wall-clock time, once mounted.
    pub fn now(&self) -> Option<NaiveDateTime> {
        self.gate.is_ready().then(|| self.clock.now())
    }

    pub fn clock_face(&self) -> Option<ClockFace> {
        self.now().map(|now| ClockFace::at(now.time()))
    }

    /// Percent of the academic year elapsed; 0 until mounted.
    pub fn academic_year_progress(&self) -> u32 {
        self.gate
            .today()
            .map_or(0, |today| academic_year_progress(today.month0()))
    }

    pub fn events(&self) -> &[CalendarEvent] {
        &self.events
    }

    pub fn filter(&self) -> CategoryFilter {
        self.filter
    }

    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
    }

    pub fn grid(&self) -> Vec<DayCell> {
        build_grid(self.view, &self.events, self.gate.today())
    }

    pub fn next(&mut self) {
        self.navigate(Direction::Next);
    }

    pub fn previous(&mut self) {
        self.navigate(Direction::Previous);
    }

    pub fn navigate(&mut self, direction: Direction) {
        self.view = navigate(self.view, direction);
        tracing::debug!(month = self.view.month, year = self.view.year, "calendar navigated");
    }

    /// Jump back to today's month. Does nothing until mounted.
    pub fn go_to_today(&mut self) -> bool {
        if !self.gate.is_ready() {
            return false;
        }
        self.view = go_to_today(self.view, self.clock.today());
        true
    }

    /// Events matching the current category filter.
    pub fn filtered_events(&self) -> Vec<&CalendarEvent> {
        filter_events(&self.events, self.filter)
    }

    /// Events happening today; empty until mounted.
    pub fn todays_events(&self) -> Vec<&CalendarEvent> {
        match self.gate.today() {
            Some(today) => events_on(&self.events, today),
            None => Vec::new(),
        }
    }

    /// Re-read the clock. On a date change the stored today moves, and if
    /// the new day is in a different month the view follows it.
    pub fn sync_clock(&mut self) -> ClockSync {
        let Some(today) = self.gate.refresh(&self.clock) else {
            return ClockSync::Unchanged;
        };

        if self.view.contains(today) {
            tracing::info!(%today, "date changed");
            return ClockSync::DayChanged;
        }

        self.view = ViewState::containing(today);
        tracing::info!(%today, "date changed, calendar moved to current month");
        ClockSync::DayChangedAndFollowed
    }

    /// Check the clock every `period` until `unmount` resolves.
    ///
    /// `on_change` runs after every check that changed the date. Does
    /// nothing if the widget has not been mounted.
    pub async fn run_clock_sync<F>(
        &mut self,
        period: Duration,
        unmount: impl Future<Output = ()>,
        mut on_change: F,
    ) where
        F: FnMut(&Self, ClockSync),
    {
        if !self.gate.is_ready() {
            return;
        }

        let mut ticker = Ticker::new(period);
        ticker.acquire();
        tokio::pin!(unmount);

        loop {
            tokio::select! {
                _ = &mut unmount => break,
                _ = ticker.tick() => {
                    let outcome = self.sync_clock();
                    if outcome != ClockSync::Unchanged {
                        on_change(&*self, outcome);
                    }
                }
            }
        }

        ticker.release();
    }

    /// Redraw the live clock every `period` until `unmount` resolves.
    ///
    /// Each tick re-reads the wall clock and hands the widget to `on_tick`;
    /// the date itself is only re-checked by [`Self::run_clock_sync`].
    /// Does nothing if the widget has not been mounted.
    pub async fn run_live_clock<F>(
        &self,
        period: Duration,
        unmount: impl Future<Output = ()>,
        mut on_tick: F,
    ) where
        F: FnMut(&Self),
    {
        if !self.gate.is_ready() {
            return;
        }

        let mut ticker = Ticker::new(period);
        ticker.acquire();
        tokio::pin!(unmount);

        loop {
            tokio::select! {
                _ = &mut unmount => break,
                _ = ticker.tick() => on_tick(self),
            }
        }

        ticker.release();
    }
}
