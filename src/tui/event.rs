//! Event handling for the TUI.
//!
//! Polls the terminal directly with a per-call timeout so the control
//! loop can vary the refresh cadence: a normal tick, a shortened tick
//! after a kill, or an indefinite block while the user is typing a
//! search.

use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// Timer expiry; time to refresh the process table.
    Tick,
    /// Keyboard input.
    Key(KeyEvent),
    /// Terminal resize.
    Resize,
}

/// Polls crossterm for the next relevant event.
pub struct EventSource;

impl EventSource {
    pub fn new() -> Self {
        Self
    }

    /// Returns the next event.
    ///
    /// With `Some(timeout)`, waits up to the deadline and yields
    /// [`Event::Tick`] on expiry. With `None`, blocks until a key or
    /// resize arrives and never ticks.
    pub fn next(&self, timeout: Option<Duration>) -> io::Result<Event> {
        let deadline = timeout.map(|t| Instant::now() + t);

        loop {
            let ready = match deadline {
                Some(deadline) => {
                    let remaining = deadline.saturating_duration_since(Instant::now());
                    if remaining.is_zero() {
                        return Ok(Event::Tick);
                    }
                    event::poll(remaining)?
                }
                None => {
                    event::poll(Duration::from_secs(3600))?
                }
            };
            if !ready {
                if deadline.is_some() {
                    return Ok(Event::Tick);
                }
                continue;
            }

            match event::read()? {
                // Release events would double every keystroke on
                // terminals that report them.
                CrosstermEvent::Key(key) if key.kind != KeyEventKind::Release => {
                    return Ok(Event::Key(key));
                }
                CrosstermEvent::Resize(_, _) => return Ok(Event::Resize),
                _ => continue,
            }
        }
    }
}

impl Default for EventSource {
    fn default() -> Self {
        Self::new()
    }
}
