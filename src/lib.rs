//! proctop - interactive process browser library.
//!
//! Samples the process table from `/proc` on a fixed tick, estimates
//! per-process CPU usage from cumulative tick deltas, and serves an
//! interactive TUI with filtering, ranking and graceful termination.

pub mod collector;
pub mod model;
pub mod rank;
pub mod tui;
