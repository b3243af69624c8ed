//! Stories: short auto-advancing slideshows about school life.

pub mod player;
pub mod viewer;

use serde::{Deserialize, Serialize};

pub use player::{Player, PlayerCommand};
pub use viewer::{Phase, PlaybackState, StoryViewer, Transition};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: u32,
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub category: String,
    /// Thumbnail shown in the story list
    #[serde(default)]
    pub cover: Option<String>,
    pub slides: Vec<Slide>,
}

impl Story {
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn last_slide_index(&self) -> Option<usize> {
        self.slides.len().checked_sub(1)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    #[serde(default)]
    pub kind: MediaKind,
    pub media: String,
    pub caption: String,
    #[serde(default)]
    pub overlay: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    #[default]
    Image,
    Video,
}
