//! Timer-driven playback of a single story.
//!
//! The player owns a [`StoryViewer`] and a [`Ticker`]. The ticker is held
//! only while the viewer is playing: pausing, closing, exhausting the last
//! slide and dropping the command channel all release it.

use std::time::Duration;

use tokio::sync::mpsc;

use super::Story;
use super::viewer::{Phase, PlaybackState, StoryViewer, Transition};
use crate::config::StoryConfig;
use crate::error::guarded;
use crate::timer::Ticker;

/// User input forwarded to a playing story.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Next,
    Previous,
    TogglePlayPause,
    Close,
}

enum Wake {
    Tick,
    Command(Option<PlayerCommand>),
}

pub struct Player {
    viewer: StoryViewer,
    ticker: Ticker,
}

impl Player {
    pub fn new(viewer: StoryViewer, tick_interval: Duration) -> Self {
        Player {
            viewer,
            ticker: Ticker::new(tick_interval),
        }
    }

    pub fn from_config(config: &StoryConfig) -> Self {
        Player::new(StoryViewer::new(config.progress_step), config.tick_interval)
    }

    pub fn viewer(&self) -> &StoryViewer {
        &self.viewer
    }

    /// Play `story` until it closes.
    ///
    /// `observer` sees the playback state after opening and after every
    /// change. Dropping the command sender closes the story.
    pub async fn play<F>(
        &mut self,
        story: Story,
        commands: &mut mpsc::Receiver<PlayerCommand>,
        mut observer: F,
    ) -> PlaybackState
    where
        F: FnMut(&PlaybackState),
    {
        let opened = guarded("open", || Ok(self.viewer.open(story)));
        if opened == Some(Transition::Opened) {
            self.notify(&mut observer);
        }

        loop {
            let phase = self.viewer.phase();
            if phase == Phase::Closed {
                break;
            }
            self.ticker.set_active(phase == Phase::Playing);

            let wake = tokio::select! {
                _ = self.ticker.tick() => Wake::Tick,
                command = commands.recv() => Wake::Command(command),
            };

            let transition = match wake {
                Wake::Tick => guarded("tick", || Ok(self.viewer.tick())),
                Wake::Command(Some(command)) => self.apply(command),
                Wake::Command(None) => {
                    tracing::debug!("story commands dropped, closing");
                    guarded("close", || Ok(self.viewer.close()))
                }
            };

            if let Some(transition) = transition {
                if transition != Transition::Unchanged {
                    self.notify(&mut observer);
                }
            }
        }

        self.ticker.release();
        self.viewer.state().clone()
    }

    fn apply(&mut self, command: PlayerCommand) -> Option<Transition> {
        let viewer = &mut self.viewer;
        match command {
            PlayerCommand::Next => guarded("next", || Ok(viewer.next())),
            PlayerCommand::Previous => guarded("previous", || Ok(viewer.previous())),
            PlayerCommand::TogglePlayPause => {
                guarded("toggle_play_pause", || Ok(viewer.toggle_play_pause()))
            }
            PlayerCommand::Close => guarded("close", || Ok(viewer.close())),
        }
    }

    fn notify<F>(&self, observer: &mut F)
    where
        F: FnMut(&PlaybackState),
    {
        let state = self.viewer.state();
        guarded("render", || {
            observer(state);
            Ok(())
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StrayEvent;
    use crate::story::{MediaKind, Slide};

    const TICK: Duration = Duration::from_millis(50);

    fn story(slides: usize) -> Story {
        Story {
            id: 7,
            title: "Sports".to_string(),
            subtitle: String::new(),
            category: "Sports".to_string(),
            cover: None,
            slides: (0..slides)
                .map(|i| Slide {
                    kind: MediaKind::Video,
                    media: format!("/media/{i}.mp4"),
                    caption: format!("Match day {i}"),
                    overlay: Some("Go team".to_string()),
                })
                .collect(),
        }
    }

    type Frame = (Phase, usize, u32);

    fn frame(state: &PlaybackState) -> Frame {
        (state.phase(), state.current_slide, state.progress)
    }

    #[tokio::test(start_paused = true)]
    async fn test_plays_to_the_end_and_closes() {
        let mut player = Player::new(StoryViewer::default(), TICK);
        let (_tx, mut rx) = mpsc::channel(8);
        let mut frames: Vec<Frame> = Vec::new();

        let start = tokio::time::Instant::now();
        let end = player
            .play(story(3), &mut rx, |state| frames.push(frame(state)))
            .await;

        assert_eq!(end.phase(), Phase::Closed);
        assert_eq!(start.elapsed(), TICK * 300);
        assert_eq!(frames.first(), Some(&(Phase::Playing, 0, 0)));
        assert!(frames.contains(&(Phase::Playing, 1, 0)));
        assert!(frames.contains(&(Phase::Playing, 2, 99)));
        assert_eq!(frames.last(), Some(&(Phase::Closed, 0, 0)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks_until_resume() {
        let mut player = Player::new(StoryViewer::default(), TICK);
        let (tx, mut rx) = mpsc::channel(8);
        let mut frames: Vec<Frame> = Vec::new();

        let driver = async move {
            tokio::time::sleep(Duration::from_millis(2025)).await;
            tx.send(PlayerCommand::TogglePlayPause).await.unwrap();
            tokio::time::sleep(Duration::from_secs(5)).await;
            tx.send(PlayerCommand::TogglePlayPause).await.unwrap();
            tokio::time::sleep(Duration::from_millis(75)).await;
            tx.send(PlayerCommand::Close).await.unwrap();
        };
        let playback = player.play(story(3), &mut rx, |state| frames.push(frame(state)));

        let ((), end) = tokio::join!(driver, playback);

        assert_eq!(end.phase(), Phase::Closed);
        let paused_at = frames
            .iter()
            .position(|f| f.0 == Phase::Paused)
            .unwrap();
        assert_eq!(frames[paused_at], (Phase::Paused, 0, 40));
        assert_eq!(frames[paused_at + 1], (Phase::Playing, 0, 40));
        assert_eq!(frames[paused_at + 2], (Phase::Playing, 0, 41));
        assert_eq!(frames[paused_at + 3], (Phase::Closed, 0, 0));
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_navigation() {
        let mut player = Player::new(StoryViewer::default(), Duration::from_secs(60));
        let (tx, mut rx) = mpsc::channel(8);
        for command in [
            PlayerCommand::Previous,
            PlayerCommand::Next,
            PlayerCommand::Next,
            PlayerCommand::Previous,
            PlayerCommand::Next,
            PlayerCommand::Next,
        ] {
            tx.send(command).await.unwrap();
        }

        let mut slides = Vec::new();
        let end = player
            .play(story(3), &mut rx, |state| slides.push(state.current_slide))
            .await;

        assert_eq!(end.phase(), Phase::Closed);
        // the leading Previous is a no-op and is not observed
        assert_eq!(slides, vec![0, 1, 2, 1, 2, 0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_commands_close_the_story() {
        let mut player = Player::new(StoryViewer::default(), TICK);
        let (tx, mut rx) = mpsc::channel::<PlayerCommand>(1);
        drop(tx);

        let end = player.play(story(2), &mut rx, |_| {}).await;
        assert_eq!(end.phase(), Phase::Closed);
        assert_eq!(player.viewer().phase(), Phase::Closed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_fault_does_not_stop_playback() {
        let mut player = Player::new(StoryViewer::new(50), TICK);
        let (_tx, mut rx) = mpsc::channel(1);
        let mut calls = 0;

        let end = player
            .play(story(2), &mut rx, |_| {
                calls += 1;
                if calls == 1 {
                    std::panic::panic_any(StrayEvent::new("pointerdown"));
                }
            })
            .await;

        assert_eq!(end.phase(), Phase::Closed);
        // open, 50, slide 1, 50, closed
        assert_eq!(calls, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_story_returns_immediately() {
        let mut player = Player::new(StoryViewer::default(), TICK);
        let (_tx, mut rx) = mpsc::channel(1);
        let mut calls = 0;
        let end = player.play(story(0), &mut rx, |_| calls += 1).await;
        assert_eq!(end.phase(), Phase::Closed);
        assert_eq!(calls, 0);
    }
}
