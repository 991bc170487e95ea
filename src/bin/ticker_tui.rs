//! Ticker TUI - live crypto market table in the terminal
//!
//! Builds the asset store from config, starts the synthetic feed on a tokio
//! runtime and renders the table until `q` is pressed.

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crypto_ticker::bin_common::load_ticker_config;
use ticker::application::feed::{FeedConfig, SyntheticFeed};
use ticker::application::visualizer::{ui, App};
use ticker::domain::AssetStore;
use ticker::infrastructure::scheduler::TokioScheduler;

/// Upper bound on how long input polling may block between redraws
const MAX_POLL_INTERVAL: Duration = Duration::from_millis(50);

fn main() -> Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Note: Logging is disabled for TUI - it would corrupt the alternate screen display

    let config = load_ticker_config()?;

    // Create tokio runtime for the feed timer
    let runtime = tokio::runtime::Runtime::new()?;
    let scheduler = Arc::new(TokioScheduler::new(runtime.handle().clone()));

    let store = AssetStore::new(config.assets.clone())?.shared();
    let feed = SyntheticFeed::new(Arc::clone(&store), scheduler, FeedConfig::from(&config.feed));
    let mut app = App::new(store, feed, &config.display);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    app.start();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Stop the feed before the runtime goes away
    app.shutdown();
    drop(app);
    runtime.shutdown_timeout(Duration::from_millis(100));

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    let mut dirty = true;

    loop {
        let now = Instant::now();
        dirty |= app.sync(now);

        if dirty {
            terminal.draw(|frame| ui::draw(frame, app, now))?;
            dirty = false;
        }

        // Wake in time to clear the next flash
        let timeout = app
            .flashes
            .next_expiry()
            .map(|at| at.saturating_duration_since(now))
            .unwrap_or(MAX_POLL_INTERVAL)
            .min(MAX_POLL_INTERVAL);

        if event::poll(timeout)? {
            match event::read()? {
                // Only handle key press events (not release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match key.code {
                        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
                        KeyCode::Char('j') | KeyCode::Down => app.next_row(),
                        KeyCode::Char('k') | KeyCode::Up => app.prev_row(),
                        KeyCode::Char('p') => app.toggle_feed(),
                        KeyCode::Char('t') => app.toggle_theme(),
                        _ => {}
                    }
                    dirty = true;
                }
                Event::Resize(_, _) => dirty = true,
                _ => {}
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
