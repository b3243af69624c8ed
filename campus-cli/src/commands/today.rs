use anyhow::Result;
use campus_core::calendar::{CalendarWidget, SystemClock};
use campus_core::{CampusConfig, Content};
use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;

use crate::render::{Render, render_academic_year};

pub async fn run(config: &CampusConfig, content: Content, live: bool) -> Result<()> {
    let mut widget = CalendarWidget::new(SystemClock, content.events);
    widget.mount();

    if let Some(today) = widget.today() {
        println!("{}", today.format("%A, %B %-d, %Y").bold());
    }
    println!("{}", render_academic_year(widget.academic_year_progress()));
    println!();

    let events = widget.todays_events();
    if events.is_empty() {
        println!("   {}", "Nothing scheduled today".dimmed());
    }
    for event in events {
        println!("{}", event.render());
    }
    println!();

    let Some(face) = widget.clock_face() else {
        return Ok(());
    };
    if !live {
        println!("{}", face.render());
        return Ok(());
    }

    let clock_line = ProgressBar::new_spinner();
    clock_line.set_style(ProgressStyle::with_template("{msg}")?);
    clock_line.set_message(face.render());

    let unmount = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "could not listen for Ctrl-C");
        }
    };

    widget
        .run_live_clock(config.calendar.clock_tick_interval, unmount, |w| {
            if let Some(face) = w.clock_face() {
                clock_line.set_message(face.render());
            }
        })
        .await;

    clock_line.finish();
    Ok(())
}
