mod commands;
mod render;

use anyhow::Result;
use campus_core::calendar::{CategoryFilter, Clock, SystemClock, ViewState};
use campus_core::error::StrayEvent;
use campus_core::{CampusConfig, Content};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "campus")]
#[command(about = "Browse the academic calendar and watch school stories")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a month of the academic calendar
    Calendar {
        /// Month to show (1-12), defaults to the current month
        #[arg(short, long)]
        month: Option<u32>,

        /// Year to show, defaults to the current year
        #[arg(short, long)]
        year: Option<i32>,

        /// Keep running and redraw when the date changes
        #[arg(long)]
        watch: bool,
    },
    /// List calendar events
    Events {
        /// all, academic, exam, holiday, event or sports
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,
    },
    /// Show the time, academic year progress and today's events
    Today {
        /// Keep the clock running until Ctrl-C
        #[arg(long)]
        live: bool,
    },
    /// List stories
    Stories,
    /// Play a story (n = next, p = previous, s = pause/resume, q = close)
    Story {
        id: u32,

        /// Start paused
        #[arg(long)]
        paused: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = CampusConfig::load()?;
    init_logging(&config.log_level);
    install_panic_hook();

    let content = Content::load(config.content_path().as_deref())?;

    match cli.command {
        Commands::Calendar { month, year, watch } => {
            let view = requested_view(month, year, current_year)?;
            commands::calendar::run(&config, content, view, watch).await
        }
        Commands::Events { category } => commands::events::run(content, category),
        Commands::Today { live } => commands::today::run(&config, content, live).await,
        Commands::Stories => commands::stories::run(&content),
        Commands::Story { id, paused } => commands::story::run(&config, &content, id, paused).await,
    }
}

/// The month asked for on the command line, `None` for the current one.
fn requested_view(
    month: Option<u32>,
    year: Option<i32>,
    current_year: impl FnOnce() -> i32,
) -> Result<Option<ViewState>> {
    let view = match (month, year) {
        (Some(month), year) => {
            let year = year.unwrap_or_else(current_year);
            Some(
                ViewState::from_calendar_month(month, year)
                    .ok_or_else(|| anyhow::anyhow!("Month must be between 1 and 12"))?,
            )
        }
        (None, Some(year)) => Some(ViewState::new(0, year)),
        (None, None) => None,
    };
    Ok(view)
}

fn current_year() -> i32 {
    ViewState::containing(SystemClock.today()).year
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr so they
/// never interleave with rendered output.
fn init_logging(level: &str) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Route panics through tracing instead of the default stderr dump, which
/// tears through indicatif's redraws. Stray UI events are left to the
/// handler boundary, which logs them itself.
fn install_panic_hook() {
    std::panic::set_hook(Box::new(|info| {
        if info.payload().is::<StrayEvent>() {
            return;
        }
        tracing::error!("campus panicked: {info}");
    }));
}
