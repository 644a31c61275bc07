//! Main TUI application.

use std::io;
use std::time::Duration;

use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{debug, warn};

use crate::collector::signal::terminate;
use crate::collector::traits::FileSystem;
use crate::collector::Sampler;

use super::event::{Event, EventSource};
use super::input::{KeyAction, handle_key};
use super::render::render;
use super::state::AppState;

/// Shortened tick after a confirmed kill so the outcome shows promptly.
const QUICK_REFRESH: Duration = Duration::from_millis(100);

/// Main TUI application.
pub struct App<F: FileSystem> {
    sampler: Sampler<F>,
    interval: Duration,
    state: AppState,
    should_quit: bool,
}

impl<F: FileSystem + Clone> App<F> {
    pub fn new(sampler: Sampler<F>, interval: Duration) -> Self {
        Self {
            sampler,
            interval,
            state: AppState::new(),
            should_quit: false,
        }
    }

    /// Runs the TUI application.
    pub fn run(mut self) -> io::Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let events = EventSource::new();

        // Initial data fetch
        self.refresh();

        // Main loop
        loop {
            terminal.draw(|frame| render(frame, &mut self.state))?;

            match events.next(self.next_timeout())? {
                // Ticks keep firing while the kill dialog is open so it
                // stays responsive, but the pipeline only runs in normal
                // mode, keeping the view stable behind the dialog.
                Event::Tick => {
                    if self.state.mode.is_normal() {
                        self.refresh();
                    }
                }
                Event::Key(key) => match handle_key(&mut self.state, key) {
                    KeyAction::Quit => self.should_quit = true,
                    KeyAction::Kill { pid } => {
                        // Failure (gone already, no permission) is not
                        // fatal; the next refresh shows the outcome.
                        if let Err(e) = terminate(pid) {
                            debug!(pid, error = %e, "SIGTERM failed");
                        }
                    }
                    KeyAction::None => {}
                },
                Event::Resize => {}
            }

            if self.should_quit {
                break;
            }
        }

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        Ok(())
    }

    /// How long to wait for input before the next refresh. While a
    /// search is being typed input blocks indefinitely, so the list does
    /// not shift under the cursor.
    fn next_timeout(&mut self) -> Option<Duration> {
        if self.state.mode.is_search() {
            None
        } else if std::mem::take(&mut self.state.quick_refresh) {
            Some(QUICK_REFRESH)
        } else {
            Some(self.interval)
        }
    }

    /// Samples the process table and rebuilds the view. A failed refresh
    /// keeps the previous snapshot on screen.
    fn refresh(&mut self) {
        match self.sampler.sample() {
            Ok(snapshot) => {
                self.state.snapshot = snapshot;
            }
            Err(e) => {
                warn!(error = %e, "refresh failed, keeping previous snapshot");
            }
        }
        self.state.rebuild_visible();
    }
}
