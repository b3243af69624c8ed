//! TUI rendering traits for campus types.
//!
//! Extension traits that add colored terminal rendering to campus-core
//! types using owo_colors.

use campus_core::calendar::{
    CalendarEvent, CalendarWidget, Clock, ClockFace, DayCell, EventCategory, WEEKDAY_LABELS,
};
use campus_core::story::{PlaybackState, Story};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Width of one day column, including padding
const CELL_WIDTH: usize = 5;

/// Width of the academic year progress bar
const PROGRESS_WIDTH: usize = 24;

/// Quarter-circle glyphs for the minute hand, clockwise from 12.
const CLOCK_GLYPHS: [&str; 4] = ["◷", "◶", "◵", "◴"];

impl Render for EventCategory {
    fn render(&self) -> String {
        let name = self.display_name();
        match self {
            EventCategory::Academic => name.blue().to_string(),
            EventCategory::Exam => name.red().to_string(),
            EventCategory::Holiday => name.green().to_string(),
            EventCategory::Event => name.purple().to_string(),
            EventCategory::Sports => name.yellow().to_string(),
        }
    }
}

impl Render for DayCell {
    fn render(&self) -> String {
        match *self {
            DayCell::Empty => " ".repeat(CELL_WIDTH),
            DayCell::Day {
                day,
                is_today,
                has_event,
            } => {
                let marker = if has_event { "•" } else { " " };
                let text = format!("{day:>3}{marker} ");
                if is_today {
                    text.white().on_blue().bold().to_string()
                } else if has_event {
                    text.purple().bold().to_string()
                } else {
                    text
                }
            }
        }
    }
}

impl Render for CalendarEvent {
    fn render(&self) -> String {
        let date = self.date.format("%A, %B %-d, %Y").to_string();
        let category = format!("({})", self.category.render());
        let mut lines = vec![format!("{} {}", self.title.bold(), category.dimmed())];

        let mut when = date;
        if let Some(time) = &self.time {
            when = format!("{when} · {time}");
        }
        lines.push(format!("   {}", when.dimmed()));

        if let Some(location) = &self.location {
            lines.push(format!("   {}", location.dimmed()));
        }
        if let Some(description) = &self.description {
            lines.push(format!("   {description}"));
        }
        lines.join("\n")
    }
}

impl<C: Clock> Render for CalendarWidget<C> {
    fn render(&self) -> String {
        let view = self.view();
        let width = CELL_WIDTH * 7;
        let mut lines = Vec::new();

        let title = format!("{} {}", view.month_name(), view.year);
        lines.push(format!("{:^width$}", title).bold().to_string());

        let header: String = WEEKDAY_LABELS
            .iter()
            .map(|label| format!("{label:>4} "))
            .collect();
        lines.push(header.dimmed().to_string());

        for week in self.grid().chunks(7) {
            lines.push(week.iter().map(|cell| cell.render()).collect());
        }

        lines.push(String::new());
        let legend = format!(
            "{} today   {} event",
            "  ".on_blue(),
            "•".purple().bold()
        );
        lines.push(legend);

        lines.join("\n")
    }
}

impl Render for ClockFace {
    fn render(&self) -> String {
        let quarter = (self.minute_hand / 90.0) as usize % CLOCK_GLYPHS.len();
        format!(
            "{} {}",
            CLOCK_GLYPHS[quarter].cyan(),
            self.time.format("%-I:%M:%S %p").bold()
        )
    }
}

impl Render for Story {
    fn render(&self) -> String {
        let slides = match self.slides.len() {
            1 => "1 slide".to_string(),
            n => format!("{n} slides"),
        };
        format!(
            "{:>3}  {} {}  {}",
            self.id.dimmed(),
            self.title.bold(),
            format!("[{}]", self.category).cyan(),
            format!("{} · {}", self.subtitle, slides).dimmed()
        )
    }
}

/// Caption line for the slide currently showing.
pub fn render_slide(state: &PlaybackState) -> String {
    let Some(slide) = state.slide() else {
        return String::new();
    };
    match &slide.overlay {
        Some(overlay) => format!("{}  {}", slide.caption.bold(), overlay.italic().dimmed()),
        None => slide.caption.bold().to_string(),
    }
}

/// "Academic Year Progress" with a bar filled to `percent`.
pub fn render_academic_year(percent: u32) -> String {
    let percent = percent.min(100) as usize;
    let filled = percent * PROGRESS_WIDTH / 100;
    format!(
        "{} {}{} {percent}%",
        "Academic Year Progress".dimmed(),
        "━".repeat(filled).blue(),
        "─".repeat(PROGRESS_WIDTH - filled).dimmed()
    )
}
