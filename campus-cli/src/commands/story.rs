use anyhow::Result;
use campus_core::story::{Phase, PlaybackState, Player, PlayerCommand};
use campus_core::{CampusConfig, Content};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use tokio::sync::mpsc;

use crate::render::{Render, render_slide};

pub async fn run(config: &CampusConfig, content: &Content, id: u32, paused: bool) -> Result<()> {
    let story = content.story(id)?.clone();
    println!("{}", story.render());
    println!(
        "{}",
        "n: next   p: previous   s or space: pause/resume   q: close".dimmed()
    );

    let bars = MultiProgress::new();
    let bar_style = ProgressStyle::with_template("{bar:16.cyan/blue}")?.progress_chars("━━─");
    let slide_bars: Vec<ProgressBar> = story
        .slides
        .iter()
        .map(|_| {
            let bar = bars.add(ProgressBar::new(100));
            bar.set_style(bar_style.clone());
            bar
        })
        .collect();
    let caption = bars.add(ProgressBar::new_spinner());
    caption.set_style(ProgressStyle::with_template("{msg}")?);

    let (tx, mut rx) = mpsc::channel(16);
    if paused {
        tx.send(PlayerCommand::TogglePlayPause).await?;
    }
    spawn_input_reader(tx)?;

    let mut player = Player::from_config(&config.story);
    player
        .play(story, &mut rx, |state| draw(&slide_bars, &caption, state))
        .await;

    bars.clear()?;
    println!("{}", "Story closed".dimmed());

    Ok(())
}

fn draw(slide_bars: &[ProgressBar], caption: &ProgressBar, state: &PlaybackState) {
    for (bar, fill) in slide_bars.iter().zip(state.progress_bars()) {
        bar.set_position(u64::from(fill));
    }

    let status = match state.phase() {
        Phase::Paused => format!("{} ", "[paused]".yellow()),
        _ => String::new(),
    };
    caption.set_message(format!("{status}{}", render_slide(state)));
}

/// Turn stdin lines into player commands on a plain thread. A pending read
/// there does not keep the runtime alive once the story has closed.
fn spawn_input_reader(tx: mpsc::Sender<PlayerCommand>) -> Result<()> {
    std::thread::Builder::new()
        .name("campus-input".into())
        .spawn(move || {
            for line in std::io::stdin().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        tracing::warn!(error = %e, "could not read input");
                        break;
                    }
                };

                let Some(command) = parse_command(&line) else {
                    tracing::debug!(input = %line, "ignoring unknown input");
                    continue;
                };

                if tx.blocking_send(command).is_err() {
                    return;
                }
            }

            // Hold the sender so the story keeps playing without a terminal.
            loop {
                std::thread::park();
            }
        })?;

    Ok(())
}

/// One input line to a command. A line of only spaces toggles playback;
/// an empty line does nothing.
fn parse_command(line: &str) -> Option<PlayerCommand> {
    let line = line.trim_end_matches(['\r', '\n']);
    if !line.is_empty() && line.trim().is_empty() {
        return Some(PlayerCommand::TogglePlayPause);
    }

    match line.trim() {
        "n" => Some(PlayerCommand::Next),
        "p" => Some(PlayerCommand::Previous),
        "s" => Some(PlayerCommand::TogglePlayPause),
        "q" => Some(PlayerCommand::Close),
        _ => None,
    }
}
