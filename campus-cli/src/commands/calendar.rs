use anyhow::Result;
use campus_core::calendar::{CalendarWidget, ClockSync, SystemClock, ViewState};
use campus_core::{CampusConfig, Content};
use owo_colors::OwoColorize;

use crate::render::{Render, render_academic_year};

pub async fn run(
    config: &CampusConfig,
    content: Content,
    view: Option<ViewState>,
    watch: bool,
) -> Result<()> {
    let mut widget = CalendarWidget::new(SystemClock, content.events);
    if let Some(view) = view {
        widget = widget.with_view(view);
    }
    widget.mount();

    print_calendar(&widget);

    if !watch {
        return Ok(());
    }

    println!("{}", "Watching for date changes, Ctrl-C to stop".dimmed());
    let unmount = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "could not listen for Ctrl-C");
        }
    };

    widget
        .run_clock_sync(config.calendar.clock_sync_interval, unmount, |w, outcome| {
            if outcome == ClockSync::DayChangedAndFollowed {
                println!();
            }
            print_calendar(w);
        })
        .await;

    Ok(())
}

fn print_calendar(widget: &CalendarWidget<SystemClock>) {
    println!("{}", widget.render());
    println!("{}", render_academic_year(widget.academic_year_progress()));

    let todays = widget.todays_events();
    if !todays.is_empty() {
        println!();
        println!("{}", "Today".bold());
        for event in todays {
            println!("   {}", event.title);
        }
    }
}
