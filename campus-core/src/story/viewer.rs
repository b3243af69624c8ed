//! Story playback state machine.
//!
//! ```text
//! Closed --open--> Playing <--toggle--> Paused
//!    ^                |                    |
//!    +----close / last slide finished -----+
//! ```
//!
//! The viewer does no timing itself. Something else calls [`StoryViewer::tick`]
//! on a fixed interval while playing (see [`super::player`]).

use serde::Serialize;

use super::{Slide, Story};

pub const FULL_PROGRESS: u32 = 100;

/// Default progress gained per tick, in percent.
pub const DEFAULT_PROGRESS_STEP: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Closed,
    Playing,
    Paused,
}

/// What a single operation did to the viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Unchanged,
    Opened,
    Progressed(u32),
    /// Moved to the given slide index
    Slide(usize),
    Paused,
    Resumed,
    Closed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub active_story: Option<Story>,
    pub current_slide: usize,
    /// Percent of the current slide shown, `0..=100`
    pub progress: u32,
    pub is_playing: bool,
}

impl PlaybackState {
    fn closed() -> Self {
        PlaybackState {
            active_story: None,
            current_slide: 0,
            progress: 0,
            is_playing: false,
        }
    }

    pub fn phase(&self) -> Phase {
        match (&self.active_story, self.is_playing) {
            (None, _) => Phase::Closed,
            (Some(_), true) => Phase::Playing,
            (Some(_), false) => Phase::Paused,
        }
    }

    pub fn slide(&self) -> Option<&Slide> {
        self.active_story
            .as_ref()
            .and_then(|story| story.slides.get(self.current_slide))
    }

    /// Fill level of each slide's progress bar: finished slides are full,
    /// the current one shows live progress, later ones are empty.
    pub fn progress_bars(&self) -> Vec<u32> {
        let Some(story) = &self.active_story else {
            return Vec::new();
        };
        (0..story.slides.len())
            .map(|i| match i.cmp(&self.current_slide) {
                std::cmp::Ordering::Less => FULL_PROGRESS,
                std::cmp::Ordering::Equal => self.progress,
                std::cmp::Ordering::Greater => 0,
            })
            .collect()
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        PlaybackState::closed()
    }
}

#[derive(Debug, Clone)]
pub struct StoryViewer {
    state: PlaybackState,
    step: u32,
}

impl Default for StoryViewer {
    fn default() -> Self {
        StoryViewer::new(DEFAULT_PROGRESS_STEP)
    }
}

impl StoryViewer {
    /// `step` is clamped to `1..=100`.
    pub fn new(step: u32) -> Self {
        StoryViewer {
            state: PlaybackState::closed(),
            step: step.clamp(1, FULL_PROGRESS),
        }
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    /// Start playing `story` from its first slide.
    ///
    /// A story without slides is not opened.
    pub fn open(&mut self, story: Story) -> Transition {
        if story.slides.is_empty() {
            tracing::warn!(story = story.id, "story has no slides, not opening");
            return Transition::Unchanged;
        }

        tracing::info!(story = story.id, title = %story.title, "story opened");
        self.state = PlaybackState {
            active_story: Some(story),
            current_slide: 0,
            progress: 0,
            is_playing: true,
        };
        Transition::Opened
    }

    /// Advance progress by one step. Reaching 100% moves to the next slide,
    /// or closes the viewer after the last one. No effect unless playing.
    pub fn tick(&mut self) -> Transition {
        if self.phase() != Phase::Playing {
            return Transition::Unchanged;
        }

        self.state.progress = (self.state.progress + self.step).min(FULL_PROGRESS);
        if self.state.progress < FULL_PROGRESS {
            return Transition::Progressed(self.state.progress);
        }

        self.advance()
    }

    /// Skip to the next slide, closing after the last one.
    pub fn next(&mut self) -> Transition {
        if self.phase() == Phase::Closed {
            return Transition::Unchanged;
        }
        self.advance()
    }

    /// Back up one slide. Does nothing on the first slide.
    pub fn previous(&mut self) -> Transition {
        if self.phase() == Phase::Closed || self.state.current_slide == 0 {
            return Transition::Unchanged;
        }
        self.state.current_slide -= 1;
        self.state.progress = 0;
        tracing::debug!(slide = self.state.current_slide, "story slide back");
        Transition::Slide(self.state.current_slide)
    }

    /// Pause or resume. Progress is kept either way.
    pub fn toggle_play_pause(&mut self) -> Transition {
        match self.phase() {
            Phase::Closed => Transition::Unchanged,
            Phase::Playing => {
                self.state.is_playing = false;
                tracing::debug!(progress = self.state.progress, "story paused");
                Transition::Paused
            }
            Phase::Paused => {
                self.state.is_playing = true;
                tracing::debug!(progress = self.state.progress, "story resumed");
                Transition::Resumed
            }
        }
    }

    pub fn close(&mut self) -> Transition {
        if let Some(story) = &self.state.active_story {
            tracing::info!(story = story.id, "story closed");
        }
        self.state = PlaybackState::closed();
        Transition::Closed
    }

    fn advance(&mut self) -> Transition {
        let is_last = self
            .state
            .active_story
            .as_ref()
            .and_then(Story::last_slide_index)
            .is_none_or(|last| self.state.current_slide >= last);

        if is_last {
            return self.close();
        }

        self.state.current_slide += 1;
        self.state.progress = 0;
        tracing::debug!(slide = self.state.current_slide, "story slide forward");
        Transition::Slide(self.state.current_slide)
    }
}
