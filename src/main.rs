//! proctop - interactive process browser.
//!
//! Usage:
//!   proctop              # 1 second refresh interval
//!   proctop 5            # 5 second refresh interval

use tikv_jemallocator::Jemalloc;
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use proctop::collector::{RealFs, Sampler};
use proctop::tui::App;

/// Interactive process browser.
#[derive(Parser)]
#[command(name = "proctop", about = "Interactive process browser")]
struct Args {
    /// Refresh interval in seconds (default: 1).
    #[arg(value_name = "INTERVAL")]
    interval: Option<u64>,

    /// Path to the proc filesystem.
    #[arg(long, default_value = "/proc")]
    proc_path: String,

    /// Append debug logs to this file. Without it logging is disabled,
    /// since the terminal belongs to the interface.
    #[arg(long, value_name = "FILE")]
    debug_log: Option<PathBuf>,
}

fn main() {
    let args = Args::parse();

    if let Some(ref path) = args.debug_log
        && let Err(e) = init_logging(path)
    {
        eprintln!("Error opening debug log '{}': {}", path.display(), e);
        std::process::exit(1);
    }

    let interval = Duration::from_secs(args.interval.unwrap_or(1).max(1));
    let sampler = Sampler::new(RealFs::new(), args.proc_path);

    if let Err(e) = App::new(sampler, interval).run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(path: &std::path::Path) -> std::io::Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("proctop=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(std::sync::Mutex::new(file))
        .init();

    Ok(())
}
