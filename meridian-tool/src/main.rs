mod config;
mod error;
mod logging;
mod report;

#[cfg(feature = "board")]
mod board;

use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use meridian_core::{
    Catalog, ColumnSide, DEFAULT_COLUMN_WIDTH, DialTheme, HoursFormat, MeetingWindow,
    SEARCH_LIMIT, pixel_drag_to_window,
};
use tracing::{info, instrument};

use crate::config::{Settings, load_config, resolve_settings};
use crate::error::MerError;

#[derive(Parser)]
#[command(name = "mer")]
#[command(about = "Compare world clocks and pick meeting windows", long_about = None)]
struct Cli {
    /// Hours format: 12 or 24
    #[arg(long, global = true)]
    format: Option<HoursFormat>,

    /// Dial theme: sky, emerald, rose or mono
    #[arg(long, global = true)]
    theme: Option<DialTheme>,

    /// Home timezone (IANA name) used for differences
    #[arg(long, global = true)]
    home: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    #[cfg(feature = "board")]
    /// Open the interactive board
    Board {
        /// Zones to open instead of the configured ones
        zones: Vec<String>,
    },

    /// Print the dial rows of zones
    Show {
        zones: Vec<String>,

        /// Anchor the dials on this date (YYYY-MM-DD) as seen from home
        #[arg(long)]
        date: Option<NaiveDate>,
    },

    /// Search zones by name or abbreviation
    Search {
        query: String,

        /// Maximum number of matches
        #[arg(short, long, default_value_t = SEARCH_LIMIT)]
        limit: usize,
    },

    /// Convert a meeting window into local times for each zone
    Window {
        zones: Vec<String>,

        /// First column index of the window
        #[arg(long, default_value_t = 0.0)]
        start: f64,

        /// End column index of the window (default: one column after start)
        #[arg(long)]
        end: Option<f64>,

        /// Drag start and end positions on the grid, in pixels
        #[arg(long, num_args = 2, value_names = ["FROM", "TO"], conflicts_with_all = ["start", "end"])]
        drag: Option<Vec<f64>>,

        /// The drag began on the right half of its column
        #[arg(long, requires = "drag")]
        right: bool,

        /// Width of one dial column in pixels
        #[arg(long, default_value_t = DEFAULT_COLUMN_WIDTH)]
        column_width: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if owns_terminal(&cli.command) {
        init_board_logging()?;
    } else {
        logging::init_stderr();
    }

    let config = load_config();
    let settings = resolve_settings(cli.format, cli.theme, cli.home, &config)?;

    match cli.command {
        #[cfg(feature = "board")]
        Command::Board { zones } => {
            board::run(settings, config, zones).await?;
        }
        Command::Show { zones, date } => show(&settings, zones, date)?,
        Command::Search { query, limit } => search(&settings, &query, limit),
        Command::Window {
            zones,
            start,
            end,
            drag,
            right,
            column_width,
        } => {
            let window = match drag.as_deref() {
                Some([from, to]) => {
                    let side = if right {
                        ColumnSide::Right
                    } else {
                        ColumnSide::Left
                    };
                    pixel_drag_to_window(*from, *to, column_width, side)?
                }
                _ => MeetingWindow::new(start, end.unwrap_or(start + 1.0))?,
            };
            window_times(&settings, zones, window)?;
        }
    }

    Ok(())
}

fn owns_terminal(command: &Command) -> bool {
    match command {
        #[cfg(feature = "board")]
        Command::Board { .. } => true,
        _ => false,
    }
}

#[cfg(feature = "board")]
fn init_board_logging() -> Result<(), MerError> {
    logging::init_file()?;
    Ok(())
}

#[cfg(not(feature = "board"))]
fn init_board_logging() -> Result<(), MerError> {
    logging::init_stderr();
    Ok(())
}

#[instrument(skip(settings))]
fn show(settings: &Settings, zones: Vec<String>, date: Option<NaiveDate>) -> Result<(), MerError> {
    let now = Utc::now();
    let zones = settings.zones_or_default(zones);
    let mut board = settings.build_board(&zones, now)?;
    if let Some(date) = date {
        board.select_date(date, now)?;
    }

    print!("{}", report::render_board(&board));
    Ok(())
}

#[instrument(skip(settings))]
fn search(settings: &Settings, query: &str, limit: usize) {
    let catalog = Catalog::populate(Utc::now(), settings.format, settings.home);
    let results = catalog.search_limit(query, limit);
    info!("{} of {} zones matched", results.len(), catalog.len());

    print!("{}", report::render_search(&results));
}

#[instrument(skip(settings))]
fn window_times(
    settings: &Settings,
    zones: Vec<String>,
    window: MeetingWindow,
) -> Result<(), MerError> {
    let zones = settings.zones_or_default(zones);
    let mut board = settings.build_board(&zones, Utc::now())?;
    board.set_window(window);

    print!("{}", report::render_meeting_times(&board)?);
    Ok(())
}
