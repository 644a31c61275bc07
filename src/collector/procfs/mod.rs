//! Readers for the `/proc` filesystem.

pub mod parser;
pub mod process;
pub mod system;

pub use process::{ProcessReader, UNKNOWN_NAME, UserResolver};
pub use system::SystemReader;

/// Error type for collection failures that abort a refresh.
///
/// Per-process read failures never surface here; they degrade to default
/// field values inside [`ProcessReader`]. Only structural failures (no
/// proc root, unreadable system aggregate) reach the caller.
#[derive(Debug)]
pub enum CollectError {
    /// I/O error reading a structural source.
    Io(std::io::Error),
    /// Malformed content in a structural source.
    Parse(String),
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Io(e) => write!(f, "I/O error: {}", e),
            CollectError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for CollectError {}

impl From<std::io::Error> for CollectError {
    fn from(e: std::io::Error) -> Self {
        CollectError::Io(e)
    }
}
