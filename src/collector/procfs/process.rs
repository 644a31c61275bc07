//! Per-process metric reads from `/proc/[pid]/`.
//!
//! Every read degrades to a default value on failure: a process that
//! exits mid-scan or denies permission must never abort the sampling pass
//! for the other processes.

use std::collections::HashMap;
use std::path::Path;

use crate::collector::procfs::parser::{
    parse_passwd, parse_stat_ticks, parse_status_rss_kb, parse_status_uid,
};
use crate::collector::traits::FileSystem;

/// Sentinel name for processes whose command name cannot be read.
pub const UNKNOWN_NAME: &str = "unknown";

/// Resolves UIDs to account names from `/etc/passwd` content.
#[derive(Debug, Clone, Default)]
pub struct UserResolver {
    uid_to_name: HashMap<u32, String>,
}

impl UserResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_content(&mut self, content: &str) {
        self.uid_to_name = parse_passwd(content);
    }

    /// Resolves a UID to its account name, falling back to the numeric
    /// UID rendered as a string.
    pub fn resolve(&self, uid: u32) -> String {
        self.uid_to_name
            .get(&uid)
            .cloned()
            .unwrap_or_else(|| uid.to_string())
    }
}

/// Reads identity and resource metrics for individual processes.
pub struct ProcessReader<F: FileSystem> {
    fs: F,
    proc_path: String,
    users: UserResolver,
}

impl<F: FileSystem> ProcessReader<F> {
    /// Creates a reader rooted at `proc_path` (usually `/proc`). The user
    /// resolver is loaded once from `/etc/passwd`; a missing passwd file
    /// just means every owner is shown numerically.
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        let mut users = UserResolver::new();
        if let Ok(content) = fs.read_to_string(Path::new("/etc/passwd")) {
            users.load_from_content(&content);
        }
        Self {
            fs,
            proc_path: proc_path.into(),
            users,
        }
    }

    /// Lists PIDs currently present in the proc root, ascending.
    ///
    /// Failure here (missing root) is the one enumeration error that
    /// aborts a whole refresh, so it is propagated.
    pub fn list_pids(&self) -> std::io::Result<Vec<u32>> {
        let entries = self.fs.read_dir(Path::new(&self.proc_path))?;
        let mut pids: Vec<u32> = entries
            .iter()
            .filter_map(|p| p.file_name()?.to_str()?.parse().ok())
            .collect();
        pids.sort_unstable();
        Ok(pids)
    }

    /// Reads the command name from `/proc/[pid]/comm`.
    pub fn read_name(&self, pid: u32) -> String {
        let path = format!("{}/{}/comm", self.proc_path, pid);
        match self.fs.read_to_string(Path::new(&path)) {
            Ok(content) => {
                let name = content.trim_end_matches('\n');
                if name.is_empty() {
                    UNKNOWN_NAME.to_string()
                } else {
                    name.to_string()
                }
            }
            Err(_) => UNKNOWN_NAME.to_string(),
        }
    }

    /// Resolves the owning account of a process, falling back to the
    /// numeric UID when it has no passwd entry. When the UID itself
    /// cannot be read the owner is `"unknown"`, never a guessed account.
    pub fn read_user(&self, pid: u32) -> String {
        let path = format!("{}/{}/status", self.proc_path, pid);
        match self
            .fs
            .read_to_string(Path::new(&path))
            .ok()
            .and_then(|content| parse_status_uid(&content))
        {
            Some(uid) => self.users.resolve(uid),
            None => UNKNOWN_NAME.to_string(),
        }
    }

    /// Reads resident memory in kilobytes; 0 when unreadable.
    pub fn read_memory_kb(&self, pid: u32) -> u64 {
        let path = format!("{}/{}/status", self.proc_path, pid);
        self.fs
            .read_to_string(Path::new(&path))
            .map(|content| parse_status_rss_kb(&content))
            .unwrap_or(0)
    }

    /// Reads cumulative CPU ticks (utime + stime); 0 when unreadable or
    /// malformed.
    pub fn read_process_ticks(&self, pid: u32) -> u64 {
        let path = format!("{}/{}/stat", self.proc_path, pid);
        self.fs
            .read_to_string(Path::new(&path))
            .ok()
            .and_then(|content| parse_stat_ticks(&content).ok())
            .unwrap_or(0)
    }
}
