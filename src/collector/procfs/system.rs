//! System-wide CPU accounting from `/proc/stat`.

use std::path::Path;

use crate::collector::procfs::CollectError;
use crate::collector::procfs::parser::{GlobalStat, parse_global_stat};
use crate::collector::traits::FileSystem;

/// Reads the aggregate CPU tick total and online core count.
pub struct SystemReader<F: FileSystem> {
    fs: F,
    proc_path: String,
}

impl<F: FileSystem> SystemReader<F> {
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self {
            fs,
            proc_path: proc_path.into(),
        }
    }

    /// Reads `/proc/stat` once for this tick.
    ///
    /// An unreadable or truncated aggregate line is an error: without a
    /// valid system total the whole refresh is skipped rather than
    /// producing a snapshot full of bogus percentages.
    pub fn read_global(&self) -> Result<GlobalStat, CollectError> {
        let path = format!("{}/stat", self.proc_path);
        let content = self.fs.read_to_string(Path::new(&path))?;
        parse_global_stat(&content).map_err(|e| CollectError::Parse(e.message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::mock::MockFs;

    #[test]
    fn reads_total_and_cores() {
        let reader = SystemReader::new(MockFs::typical_system(), "/proc");
        let stat = reader.read_global().unwrap();

        assert_eq!(stat.total_ticks, 100_000);
        assert_eq!(stat.cores, 4);
    }

    #[test]
    fn missing_stat_is_an_error() {
        let reader = SystemReader::new(MockFs::new(), "/proc");
        assert!(reader.read_global().is_err());
    }

    #[test]
    fn truncated_aggregate_line_is_an_error() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/stat", "cpu  100 200\n");

        let reader = SystemReader::new(fs, "/proc");
        assert!(matches!(
            reader.read_global(),
            Err(CollectError::Parse(_))
        ));
    }
}
