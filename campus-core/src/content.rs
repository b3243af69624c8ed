//! Site content: calendar events and stories.
//!
//! Content is plain TOML, read once and never modified. The site's own
//! content ships inside the crate.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarEvent;
use crate::error::{CampusError, CampusResult};
use crate::story::Story;

static BUNDLED_CONTENT: &str = include_str!("../content/default.toml");

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Content {
    #[serde(default)]
    pub events: Vec<CalendarEvent>,
    #[serde(default)]
    pub stories: Vec<Story>,
}

impl Content {
    pub fn parse(toml: &str) -> CampusResult<Self> {
        toml::from_str(toml).map_err(|e| CampusError::Content(e.to_string()))
    }

    pub fn bundled() -> CampusResult<Self> {
        Self::parse(BUNDLED_CONTENT)
    }

    pub fn from_file(path: &Path) -> CampusResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
            .map_err(|e| CampusError::Content(format!("{}: {}", path.display(), e)))
    }

    /// Read `path` when given, otherwise the bundled content.
    pub fn load(path: Option<&Path>) -> CampusResult<Self> {
        match path {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading content");
                Self::from_file(path)
            }
            None => Self::bundled(),
        }
    }

    pub fn story(&self, id: u32) -> CampusResult<&Story> {
        self.stories
            .iter()
            .find(|s| s.id == id)
            .ok_or(CampusError::StoryNotFound(id))
    }

    /// Events sorted by date, earliest first.
    pub fn events_by_date(&self) -> Vec<&CalendarEvent> {
        let mut events: Vec<_> = self.events.iter().collect();
        events.sort_by_key(|e| e.date);
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::EventCategory;
    use crate::story::MediaKind;

    #[test]
    fn test_bundled_content_parses() {
        let content = Content::bundled().unwrap();
        assert!(!content.events.is_empty());
        assert!(!content.stories.is_empty());
        assert!(content.stories.iter().all(|s| !s.slides.is_empty()));
    }

    #[test]
    fn test_story_lookup() {
        let content = Content::bundled().unwrap();
        let story = content.story(1).unwrap();
        assert_eq!(story.title, "Campus Life");
        assert!(matches!(content.story(999), Err(CampusError::StoryNotFound(999))));
    }

    #[test]
    fn test_parse_minimal_content() {
        let content = Content::parse(
            r#"
[[events]]
date = "2024-02-01"
category = "sports"
title = "Annual Sports Meet"
time = "8:00 AM"
location = "Sports Ground"

[[stories]]
id = 3
title = "Labs"

[[stories.slides]]
kind = "video"
media = "/media/lab.mp4"
caption = "Chemistry practicals"
"#,
        )
        .unwrap();

        assert_eq!(content.events[0].category, EventCategory::Sports);
        assert_eq!(content.events[0].location.as_deref(), Some("Sports Ground"));
        assert_eq!(content.stories[0].slides[0].kind, MediaKind::Video);
        assert_eq!(content.stories[0].subtitle, "");
    }

    #[test]
    fn test_bad_content_is_a_content_error() {
        let err = Content::parse("[[events]]\ndate = \"not a date\"\n").unwrap_err();
        assert!(matches!(err, CampusError::Content(_)));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.toml");
        std::fs::write(
            &path,
            "[[events]]\ndate = \"2024-03-01\"\ncategory = \"exam\"\ntitle = \"Finals\"\n",
        )
        .unwrap();

        let content = Content::load(Some(&path)).unwrap();
        assert_eq!(content.events.len(), 1);
        assert!(content.stories.is_empty());

        let missing = Content::load(Some(&dir.path().join("missing.toml")));
        assert!(matches!(missing, Err(CampusError::Io(_))));
    }

    #[test]
    fn test_events_by_date() {
        let content = Content::bundled().unwrap();
        let dates: Vec<_> = content.events_by_date().iter().map(|e| e.date).collect();
        let mut sorted = dates.clone();
        sorted.sort();
        assert_eq!(dates, sorted);
    }
}
