use anyhow::Result;
use campus_core::Content;
use campus_core::calendar::{CalendarWidget, CategoryFilter, SystemClock};
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(content: Content, filter: CategoryFilter) -> Result<()> {
    let mut widget = CalendarWidget::new(SystemClock, content.events);
    widget.set_filter(filter);

    let mut events = widget.filtered_events();
    events.sort_by_key(|e| e.date);

    println!("{}", widget.filter().display_name().bold());

    if events.is_empty() {
        println!("   {}", "No events".dimmed());
        return Ok(());
    }

    for (i, event) in events.iter().enumerate() {
        println!("{}", event.render());

        // Add spacing between events (but not after the last one)
        if i < events.len() - 1 {
            println!();
        }
    }

    Ok(())
}
