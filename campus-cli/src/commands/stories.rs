use anyhow::Result;
use campus_core::Content;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(content: &Content) -> Result<()> {
    if content.stories.is_empty() {
        println!("{}", "No stories".dimmed());
        return Ok(());
    }

    for story in &content.stories {
        println!("{}", story.render());
    }

    Ok(())
}
