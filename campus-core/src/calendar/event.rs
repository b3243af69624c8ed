//! Academic calendar events.
//!
//! Events are supplied by the content collaborator and never mutated here.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// An entry on the academic calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub date: NaiveDate,
    pub category: EventCategory,
    pub title: String,
    /// Display time, e.g. "9:00 AM"
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl CalendarEvent {
    pub fn new(date: NaiveDate, category: EventCategory, title: impl Into<String>) -> Self {
        CalendarEvent {
            date,
            category,
            title: title.into(),
            time: None,
            location: None,
            description: None,
        }
    }

    pub fn is_on(&self, date: NaiveDate) -> bool {
        self.date == date
    }
}

impl fmt::Display for CalendarEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Academic,
    Exam,
    Holiday,
    Event,
    Sports,
}

impl EventCategory {
    pub const ALL: [EventCategory; 5] = [
        EventCategory::Academic,
        EventCategory::Exam,
        EventCategory::Holiday,
        EventCategory::Event,
        EventCategory::Sports,
    ];

    /// Identifier used in content files and on the command line.
    pub fn id(&self) -> &'static str {
        match self {
            EventCategory::Academic => "academic",
            EventCategory::Exam => "exam",
            EventCategory::Holiday => "holiday",
            EventCategory::Event => "event",
            EventCategory::Sports => "sports",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            EventCategory::Academic => "Academic",
            EventCategory::Exam => "Examinations",
            EventCategory::Holiday => "Holidays",
            EventCategory::Event => "Events",
            EventCategory::Sports => "Sports",
        }
    }
}

impl FromStr for EventCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventCategory::ALL
            .into_iter()
            .find(|c| c.id().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("Unknown event category '{}'", s))
    }
}

/// Which events an event listing shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(EventCategory),
}

impl CategoryFilter {
    pub fn matches(&self, event: &CalendarEvent) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => event.category == *category,
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CategoryFilter::All => "All Events",
            CategoryFilter::Only(category) => category.display_name(),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(CategoryFilter::All);
        }
        s.parse().map(CategoryFilter::Only)
    }
}

/// Events matching `filter`, in their original order.
pub fn filter_events(events: &[CalendarEvent], filter: CategoryFilter) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| filter.matches(e)).collect()
}

/// Events falling on `date`.
pub fn events_on(events: &[CalendarEvent], date: NaiveDate) -> Vec<&CalendarEvent> {
    events.iter().filter(|e| e.is_on(date)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample() -> Vec<CalendarEvent> {
        vec![
            CalendarEvent::new(
                date(2024, 1, 15),
                EventCategory::Event,
                "Republic Day Celebration",
            ),
            CalendarEvent::new(
                date(2024, 1, 20),
                EventCategory::Exam,
                "Pre-Board Examinations Begin",
            ),
            CalendarEvent::new(date(2024, 2, 1), EventCategory::Sports, "Annual Sports Meet"),
            CalendarEvent::new(date(2024, 2, 14), EventCategory::Event, "Special Assembly"),
        ]
    }

    #[test]
    fn test_filter_all_keeps_order() {
        let events = sample();
        let titles: Vec<_> = filter_events(&events, CategoryFilter::All)
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles.len(), 4);
        assert_eq!(titles[0], "Republic Day Celebration");
    }

    #[test]
    fn test_filter_by_category() {
        let events = sample();
        let filtered = filter_events(&events, CategoryFilter::Only(EventCategory::Event));
        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|e| e.category == EventCategory::Event));
    }

    #[test]
    fn test_events_on_date() {
        let events = sample();
        assert_eq!(events_on(&events, date(2024, 2, 1)).len(), 1);
        assert!(events_on(&events, date(2024, 2, 2)).is_empty());
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!("all".parse::<CategoryFilter>(), Ok(CategoryFilter::All));
        assert_eq!(
            "Sports".parse::<CategoryFilter>(),
            Ok(CategoryFilter::Only(EventCategory::Sports))
        );
        assert!("picnic".parse::<CategoryFilter>().is_err());
    }

    #[test]
    fn test_category_deserializes_lowercase() {
        let event: CalendarEvent = toml::from_str(
            r#"
date = "2024-08-15"
category = "holiday"
title = "Independence Day"
"#,
        )
        .unwrap();
        assert_eq!(event.category, EventCategory::Holiday);
        assert_eq!(event.time, None);
    }
}
