//! Pure parsers for `/proc` file contents.
//!
//! Each function takes the file content as a string and is testable
//! without touching a real filesystem.

use std::collections::HashMap;

/// Error type for parsing failures.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
}

impl ParseError {
    pub fn new(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "parse error: {}", self.message)
    }
}

impl std::error::Error for ParseError {}

/// Extracts cumulative CPU ticks (utime + stime) from `/proc/[pid]/stat`.
///
/// The comm field is enclosed in parentheses and may itself contain spaces
/// and parentheses (e.g. `(Web Content)` or `(a) b)`), so positional
/// parsing must resume after the *last* `)` in the line. Splitting at the
/// first `)` silently misreads every later field for such names.
pub fn parse_stat_ticks(content: &str) -> Result<u64, ParseError> {
    let content = content.trim();

    let close_paren = content
        .rfind(')')
        .ok_or_else(|| ParseError::new("missing ')' in stat"))?;

    // Fields after the comm, starting at the state character.
    let fields: Vec<&str> = content[close_paren + 1..].split_whitespace().collect();

    // utime and stime are the 14th and 15th fields of the full line,
    // i.e. indexes 11 and 12 after the state field.
    if fields.len() < 13 {
        return Err(ParseError::new(format!(
            "not enough fields in stat: expected 13+ after comm, got {}",
            fields.len()
        )));
    }

    let utime: u64 = fields[11]
        .parse()
        .map_err(|_| ParseError::new("invalid utime"))?;
    let stime: u64 = fields[12]
        .parse()
        .map_err(|_| ParseError::new("invalid stime"))?;

    Ok(utime + stime)
}

/// Extracts the resident set size in kilobytes from the `VmRSS:` line of
/// `/proc/[pid]/status`. Returns 0 when the line is absent or malformed;
/// an absent metric is not an error for sampling purposes.
pub fn parse_status_rss_kb(content: &str) -> u64 {
    status_field(content, "VmRSS")
        .and_then(|v| v.split_whitespace().next())
        .and_then(|v| v.parse().ok())
        .unwrap_or(0)
}

/// Extracts the real UID from the `Uid:` line of `/proc/[pid]/status`.
pub fn parse_status_uid(content: &str) -> Option<u32> {
    status_field(content, "Uid")
        .and_then(|v| v.split_whitespace().next())
        .and_then(|v| v.parse().ok())
}

fn status_field<'a>(content: &'a str, key: &str) -> Option<&'a str> {
    content.lines().find_map(|line| {
        let (k, v) = line.split_once(':')?;
        (k.trim() == key).then(|| v.trim())
    })
}

/// System-wide CPU accounting from `/proc/stat`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlobalStat {
    /// Sum of the aggregate line's time categories: user, nice, system,
    /// idle, iowait, irq, softirq, steal.
    pub total_ticks: u64,
    /// Number of online logical cores (count of `cpuN` lines), at least 1.
    pub cores: usize,
}

/// Parses the aggregate `cpu ` line and counts `cpuN` lines.
///
/// At least the first four time categories must be present for the parse
/// to succeed; the remaining four are summed when available.
pub fn parse_global_stat(content: &str) -> Result<GlobalStat, ParseError> {
    let mut total_ticks = None;
    let mut cores = 0usize;

    for line in content.lines() {
        if let Some(rest) = line.strip_prefix("cpu") {
            if rest.starts_with(char::is_whitespace) {
                // Aggregate line: "cpu  user nice system idle iowait irq softirq steal ..."
                let values: Vec<u64> = rest
                    .split_whitespace()
                    .map_while(|v| v.parse().ok())
                    .take(8)
                    .collect();
                if values.len() < 4 {
                    return Err(ParseError::new(format!(
                        "aggregate cpu line has {} categories, need 4+",
                        values.len()
                    )));
                }
                total_ticks = Some(values.iter().sum());
            } else if rest.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                cores += 1;
            }
        }
    }

    let total_ticks = total_ticks.ok_or_else(|| ParseError::new("missing aggregate cpu line"))?;
    Ok(GlobalStat {
        total_ticks,
        cores: cores.max(1),
    })
}

/// Parses `/etc/passwd` content into a UID to user-name map.
pub fn parse_passwd(content: &str) -> HashMap<u32, String> {
    let mut map = HashMap::new();
    for line in content.lines() {
        let mut parts = line.split(':');
        let name = parts.next();
        let _password = parts.next();
        let uid = parts.next().and_then(|v| v.parse::<u32>().ok());
        if let (Some(name), Some(uid)) = (name, uid)
            && !name.is_empty()
        {
            map.insert(uid, name.to_string());
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stat_ticks_simple_name() {
        let line = "1000 (bash) S 999 1000 1000 0 -1 4194304 100 0 0 0 10 5 0 0 20 0 1 0 5000 20000000 1000 18446744073709551615";
        assert_eq!(parse_stat_ticks(line).unwrap(), 15);
    }

    #[test]
    fn stat_ticks_name_with_spaces() {
        let line = "5000 (Web Content) S 1500 5000 1000 0 -1 4194304 7000 0 50 0 40 25 0 0 20 0 12 0 7000 900000000 16384 18446744073709551615";
        assert_eq!(parse_stat_ticks(line).unwrap(), 65);
    }

    #[test]
    fn stat_ticks_name_with_parentheses() {
        // A first-')' split would read ") b) R 1500 ..." and misparse.
        let line = "5001 (a) b) R 1500 5001 1000 0 -1 4194304 10 0 0 0 7 3 0 0 20 0 1 0 7100 1000000 128 18446744073709551615";
        assert_eq!(parse_stat_ticks(line).unwrap(), 10);
    }

    #[test]
    fn stat_ticks_rejects_short_line() {
        assert!(parse_stat_ticks("42 (x) S 1 2 3").is_err());
        assert!(parse_stat_ticks("no parens at all").is_err());
    }

    #[test]
    fn status_rss_parses_kb() {
        let content = "Name:\tbash\nUid:\t1000\t1000\t1000\t1000\nVmRSS:\t    4096 kB\n";
        assert_eq!(parse_status_rss_kb(content), 4096);
    }

    #[test]
    fn status_rss_absent_is_zero() {
        // Kernel threads have no VmRSS line.
        let content = "Name:\tkworker/0:1\nUid:\t0\t0\t0\t0\n";
        assert_eq!(parse_status_rss_kb(content), 0);
        assert_eq!(parse_status_rss_kb(""), 0);
    }

    #[test]
    fn status_uid_takes_real_uid() {
        let content = "Name:\tsshd\nUid:\t0\t1000\t0\t0\n";
        assert_eq!(parse_status_uid(content), Some(0));
        assert_eq!(parse_status_uid("Name:\tx\n"), None);
    }

    #[test]
    fn global_stat_sums_eight_categories() {
        let content = "cpu  10000 500 3000 86000 200 100 50 150\ncpu0 1 2 3 4\ncpu1 1 2 3 4\n";
        let stat = parse_global_stat(content).unwrap();
        assert_eq!(stat.total_ticks, 100_000);
        assert_eq!(stat.cores, 2);
    }

    #[test]
    fn global_stat_accepts_four_categories() {
        let content = "cpu  10 20 30 40\ncpu0 10 20 30 40\n";
        let stat = parse_global_stat(content).unwrap();
        assert_eq!(stat.total_ticks, 100);
    }

    #[test]
    fn global_stat_rejects_three_categories() {
        assert!(parse_global_stat("cpu  10 20 30\n").is_err());
        assert!(parse_global_stat("ctxt 100\n").is_err());
    }

    #[test]
    fn global_stat_core_count_clamped_to_one() {
        // Aggregate line only, no per-core lines.
        let stat = parse_global_stat("cpu  1 2 3 4 5 6 7 8\n").unwrap();
        assert_eq!(stat.cores, 1);
    }

    #[test]
    fn passwd_maps_uid_to_name() {
        let content = "root:x:0:0:root:/root:/bin/bash\nalice:x:1000:1000::/home/alice:/bin/sh\nbroken line\n";
        let map = parse_passwd(content);
        assert_eq!(map.get(&0).map(String::as_str), Some("root"));
        assert_eq!(map.get(&1000).map(String::as_str), Some("alice"));
        assert_eq!(map.len(), 2);
    }
}
