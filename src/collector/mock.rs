//! In-memory mock filesystem plus canned `/proc` scenarios for tests.

use crate::collector::traits::FileSystem;
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

/// In-memory filesystem for testing.
///
/// Stores files and directories in memory so tests can simulate `/proc`
/// states, including missing files and malformed contents.
#[derive(Debug, Clone, Default)]
pub struct MockFs {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
}

impl MockFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file with the given content. Parent directories are created
    /// automatically.
    pub fn add_file(&mut self, path: impl AsRef<Path>, content: impl Into<String>) {
        let path = path.as_ref().to_path_buf();

        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }

        self.files.insert(path, content.into());
    }

    /// Adds an empty directory.
    pub fn add_dir(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref().to_path_buf();
        self.directories.insert(path.clone());

        let mut parent = path.parent();
        while let Some(p) = parent {
            if !p.as_os_str().is_empty() {
                self.directories.insert(p.to_path_buf());
            }
            parent = p.parent();
        }
    }

    /// Removes a file, simulating a process that exited mid-scan.
    pub fn remove_file(&mut self, path: impl AsRef<Path>) {
        self.files.remove(path.as_ref());
    }

    /// Adds a process directory with its `comm`, `status` and `stat` files.
    /// Any empty argument skips that file, simulating a partial read failure.
    pub fn add_process(&mut self, pid: u32, comm: &str, status: &str, stat: &str) {
        let base = PathBuf::from(format!("/proc/{}", pid));
        self.add_dir(&base);
        if !comm.is_empty() {
            self.add_file(base.join("comm"), comm);
        }
        if !status.is_empty() {
            self.add_file(base.join("status"), status);
        }
        if !stat.is_empty() {
            self.add_file(base.join("stat"), stat);
        }
    }

    /// A small healthy system: three processes, a 4-core `/proc/stat`
    /// totalling 100_000 ticks, and an `/etc/passwd` with root and alice.
    pub fn typical_system() -> Self {
        let mut fs = Self::new();
        fs.add_file("/proc/stat", STAT_TICK_ONE);
        fs.add_file("/etc/passwd", PASSWD);
        fs.add_process(
            1,
            "systemd\n",
            "Name:\tsystemd\nPid:\t1\nUid:\t0\t0\t0\t0\nVmRSS:\t   12345 kB\n",
            "1 (systemd) S 0 1 1 0 -1 4194560 5000 0 10 0 300 200 0 0 20 0 1 0 1 100000000 3000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0",
        );
        fs.add_process(
            1000,
            "bash\n",
            "Name:\tbash\nPid:\t1000\nUid:\t1000\t1000\t1000\t1000\nVmRSS:\t    4096 kB\n",
            "1000 (bash) S 999 1000 1000 0 -1 4194304 100 0 0 0 10 5 0 0 20 0 1 0 5000 20000000 1000 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 0 0 0 0 0 0",
        );
        fs.add_process(
            1500,
            "firefox\n",
            "Name:\tfirefox\nPid:\t1500\nUid:\t1000\t1000\t1000\t1000\nVmRSS:\t  204800 kB\n",
            "1500 (firefox) S 1000 1500 1000 0 -1 4194304 90000 0 400 0 2000 800 0 0 20 0 40 0 6000 2000000000 51200 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 2 0 0 0 0 0",
        );
        fs
    }

    /// Processes whose names contain spaces and parentheses, which break
    /// naive `stat` parsing.
    pub fn with_special_names() -> Self {
        let mut fs = Self::typical_system();
        fs.add_process(
            5000,
            "Web Content\n",
            "Name:\tWeb Content\nPid:\t5000\nUid:\t1000\t1000\t1000\t1000\nVmRSS:\t   65536 kB\n",
            "5000 (Web Content) S 1500 5000 1000 0 -1 4194304 7000 0 50 0 40 25 0 0 20 0 12 0 7000 900000000 16384 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 1 0 0 0 0 0",
        );
        fs.add_process(
            5001,
            "a) b\n",
            "Name:\ta) b\nPid:\t5001\nUid:\t1000\t1000\t1000\t1000\nVmRSS:\t     512 kB\n",
            "5001 (a) b) R 1500 5001 1000 0 -1 4194304 10 0 0 0 7 3 0 0 20 0 1 0 7100 1000000 128 18446744073709551615 0 0 0 0 0 0 0 0 0 0 0 0 17 3 0 0 0 0 0",
        );
        fs
    }
}

/// Aggregate line sums to 100_000; four online cores.
const STAT_TICK_ONE: &str = "\
cpu  10000 500 3000 86000 200 100 50 150
cpu0 2500 125 750 21500 50 25 12 38
cpu1 2500 125 750 21500 50 25 12 38
cpu2 2500 125 750 21500 50 25 12 38
cpu3 2500 125 750 21500 50 25 13 36
ctxt 500000
btime 1700000000
processes 10000
procs_running 2
procs_blocked 0
";

const PASSWD: &str = "\
root:x:0:0:root:/root:/bin/bash
daemon:x:1:1:daemon:/usr/sbin:/usr/sbin/nologin
alice:x:1000:1000:Alice:/home/alice:/bin/bash
";

impl FileSystem for MockFs {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.files.get(path).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("file not found: {:?}", path),
            )
        })
    }

    fn read_dir(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        if !self.directories.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory not found: {:?}", path),
            ));
        }

        let mut entries = HashSet::new();

        for file_path in self.files.keys() {
            if file_path.parent().is_some_and(|parent| parent == path) {
                entries.insert(file_path.clone());
            }
        }

        for dir_path in &self.directories {
            if dir_path.parent().is_some_and(|parent| parent == path) && dir_path != path {
                entries.insert(dir_path.clone());
            }
        }

        Ok(entries.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_creates_parents() {
        let mut fs = MockFs::new();
        fs.add_file("/proc/1/stat", "1 (init) S");

        let entries = fs.read_dir(Path::new("/proc")).unwrap();
        assert_eq!(entries.len(), 1);

        let content = fs.read_to_string(Path::new("/proc/1/stat")).unwrap();
        assert_eq!(content, "1 (init) S");
    }

    #[test]
    fn missing_file_is_not_found() {
        let fs = MockFs::new();
        let err = fs.read_to_string(Path::new("/nonexistent")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn typical_system_has_three_processes() {
        let fs = MockFs::typical_system();
        let entries = fs.read_dir(Path::new("/proc")).unwrap();

        let pid_dirs: Vec<_> = entries
            .iter()
            .filter_map(|p| p.file_name()?.to_str()?.parse::<u32>().ok())
            .collect();
        assert_eq!(pid_dirs.len(), 3);
    }
}
