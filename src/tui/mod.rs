//! Interactive terminal UI

pub mod app;
pub mod colors;
pub mod search;
pub mod table;
pub mod ui;

use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;

use crate::controller::SearchController;
use crate::error::{MovieFinderError, Result};
pub use app::App;

/// Take over the terminal until the user quits. The terminal is restored
/// even when the event loop fails.
pub fn run(controller: SearchController) -> Result<()> {
    terminal::enable_raw_mode()
        .map_err(|e| MovieFinderError::Terminal(format!("Cannot enable raw mode: {}", e)))?;

    let mut stdout = io::stdout();
    if let Err(e) = execute!(stdout, EnterAlternateScreen) {
        let _ = terminal::disable_raw_mode();
        return Err(MovieFinderError::Terminal(format!(
            "Cannot enter alternate screen: {}",
            e
        )));
    }

    let result = Terminal::new(CrosstermBackend::new(stdout))
        .map_err(MovieFinderError::from)
        .and_then(|mut terminal| {
            let outcome = App::new(controller).run(&mut terminal);
            let _ = terminal.show_cursor();
            outcome
        });

    restore();
    result
}

fn restore() {
    if let Err(e) = terminal::disable_raw_mode() {
        log::warn!("Failed to disable raw mode: {}", e);
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
        log::warn!("Failed to leave alternate screen: {}", e);
    }
}
