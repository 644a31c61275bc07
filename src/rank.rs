//! Ranking of snapshot samples by a selectable key.

use std::cmp::Ordering;

use crate::model::ProcessSample;

/// Available sort keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    /// Ascending numeric PID.
    #[default]
    Pid,
    /// Ascending case-insensitive name.
    Name,
    /// Descending resident memory.
    Memory,
    /// Descending CPU percentage.
    Cpu,
}

fn name_cmp(a: &ProcessSample, b: &ProcessSample) -> Ordering {
    let lhs = a.name.bytes().map(|c| c.to_ascii_lowercase());
    let rhs = b.name.bytes().map(|c| c.to_ascii_lowercase());
    lhs.cmp(rhs)
}

/// Sorts samples in place. The underlying sort is stable, so equal keys
/// keep their relative order; there is no composed tie-break.
pub fn sort_samples(samples: &mut [ProcessSample], by: SortBy) {
    match by {
        SortBy::Pid => samples.sort_by(|a, b| a.pid.cmp(&b.pid)),
        SortBy::Name => samples.sort_by(name_cmp),
        SortBy::Memory => samples.sort_by(|a, b| b.memory_kb.cmp(&a.memory_kb)),
        SortBy::Cpu => samples.sort_by(|a, b| b.cpu_percent.total_cmp(&a.cpu_percent)),
    }
}
