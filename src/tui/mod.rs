//! Interactive terminal interface.
//!
//! A scrolling process table with sort keys, incremental name search and
//! a kill confirmation dialog, refreshed on a fixed tick.

mod app;
mod event;
mod input;
mod render;
mod state;
mod style;

pub use app::App;
pub use state::{AppState, FILTER_MAX, Mode};
