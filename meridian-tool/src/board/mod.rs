mod app;
mod input;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use meridian_core::{SystemClock, Ticker};
use ratatui::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use self::app::BoardApp;
use crate::config::{Config, Settings, save_config};
use crate::error::MerError;

pub async fn run(settings: Settings, mut config: Config, zones: Vec<String>) -> Result<(), MerError> {
    // Build the board before touching the terminal so bad zone names print plainly.
    let zones = settings.zones_or_default(zones);
    let board = settings.build_board(&zones, Utc::now())?;
    let mut app = BoardApp::new(board, Box::new(SystemClock));

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    config.format = app.board.format();
    config.theme = app.board.theme();
    config.zones = app.board.zone_names();
    match save_config(&config) {
        Ok(path) => info!("saved board to {}", path.display()),
        Err(e) => warn!("could not save config: {}", e),
    }

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut BoardApp,
) -> Result<(), MerError> {
    let (tick_tx, mut tick_rx) = mpsc::unbounded_channel();
    let mut ticker = Ticker::start(Arc::new(SystemClock), tick_tx.clone());

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Poll with a timeout so clock ticks are picked up between key presses
        if event::poll(Duration::from_millis(50))? {
            let event = event::read()?;
            input::handle_event(app, event);
        }

        while let Ok(tick) = tick_rx.try_recv() {
            debug!("clock tick {}", tick.sequence);
            app.on_tick();
        }

        if app.take_clock_restart() {
            // Replacing the ticker drops the old one, which stops its task.
            ticker = Ticker::start(Arc::new(SystemClock), tick_tx.clone());
        }

        if app.should_quit {
            break;
        }
    }

    drop(ticker);
    Ok(())
}
