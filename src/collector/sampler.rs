//! Snapshot building: per-tick enumeration and delta-based CPU estimation.

use tracing::debug;

use crate::collector::procfs::{CollectError, ProcessReader, SystemReader};
use crate::collector::traits::FileSystem;
use crate::model::{ProcessSample, Snapshot};
use std::collections::HashMap;

/// Upper bound on PID values for which delta tracking state is retained.
///
/// PIDs at or above the ceiling are never historized and therefore always
/// report 0% CPU. Documented behavior carried over from the original
/// fixed-size history; kernels default `pid_max` to 32768 and 131072
/// covers common raised configurations.
pub const PID_CEILING: u32 = 131_072;

/// Last-observed cumulative tick counters, process-wide state for the
/// lifetime of the run. Created empty at startup and mutated only by the
/// sampler.
#[derive(Debug, Clone, Default)]
pub struct TickHistory {
    per_pid: HashMap<u32, u64>,
    system: Option<u64>,
}

impl TickHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delta against the stored ticks for this PID.
    ///
    /// Returns 0 unless a nonzero prior value exists and `current` has not
    /// gone backwards. A decrease means the OS reused the PID between
    /// ticks; the stale baseline must not produce a negative or inflated
    /// delta.
    pub fn process_delta(&self, pid: u32, current: u64) -> u64 {
        match self.per_pid.get(&pid) {
            Some(&prior) if prior > 0 && current >= prior => current - prior,
            _ => 0,
        }
    }

    /// Records the baseline for the next tick. Unconditional for PIDs
    /// below the ceiling, even when no delta was computed this tick.
    pub fn record(&mut self, pid: u32, current: u64) {
        if pid < PID_CEILING {
            self.per_pid.insert(pid, current);
        }
    }

    /// Delta against the last system-wide total, then stores the new
    /// total. The first call ever has no baseline and yields 0.
    pub fn system_delta(&mut self, current: u64) -> u64 {
        let delta = match self.system {
            Some(prior) if current >= prior => current - prior,
            _ => 0,
        };
        self.system = Some(current);
        delta
    }
}

/// Estimates one process's CPU usage for the elapsed interval.
///
/// `cores` scales the result so a busy multi-core total can exceed 100%.
/// A zero system delta (first tick, or system time not advancing) yields
/// 0.0 — expected, not a defect.
pub fn estimate_cpu_percent(process_delta: u64, system_delta: u64, cores: usize) -> f32 {
    if system_delta == 0 {
        return 0.0;
    }
    process_delta as f32 / system_delta as f32 * 100.0 * cores as f32
}

/// Builds one complete [`Snapshot`] per tick.
pub struct Sampler<F: FileSystem> {
    process: ProcessReader<F>,
    system: SystemReader<F>,
    history: TickHistory,
}

impl<F: FileSystem + Clone> Sampler<F> {
    pub fn new(fs: F, proc_path: impl Into<String>) -> Self {
        Self::with_history(fs, proc_path, TickHistory::new())
    }

    /// Creates a sampler with a pre-existing tick history, so a baseline
    /// recorded through one filesystem view can be carried into another.
    pub fn with_history(fs: F, proc_path: impl Into<String>, history: TickHistory) -> Self {
        let proc_path = proc_path.into();
        Self {
            process: ProcessReader::new(fs.clone(), proc_path.clone()),
            system: SystemReader::new(fs, proc_path),
            history,
        }
    }

    /// Consumes the sampler, yielding its history.
    pub fn into_history(self) -> TickHistory {
        self.history
    }

    /// Samples the whole process table.
    ///
    /// On a structural failure (missing proc root, unreadable system
    /// aggregate) the error propagates before any history mutation and
    /// the caller keeps its previous snapshot: stale-but-valid data beats
    /// an empty screen. Individual processes that vanish mid-scan simply
    /// produce default field values.
    pub fn sample(&mut self) -> Result<Snapshot, CollectError> {
        let global = self.system.read_global()?;
        let pids = self.process.list_pids()?;

        let system_delta = self.history.system_delta(global.total_ticks);

        let mut snapshot = Snapshot::new();
        for pid in pids {
            let ticks = self.process.read_process_ticks(pid);
            let process_delta = self.history.process_delta(pid, ticks);
            self.history.record(pid, ticks);

            snapshot.push(ProcessSample {
                pid,
                name: self.process.read_name(pid),
                user: self.process.read_user(pid),
                memory_kb: self.process.read_memory_kb(pid),
                cpu_percent: estimate_cpu_percent(process_delta, system_delta, global.cores),
            });
        }

        if snapshot.truncated() > 0 {
            debug!(
                dropped = snapshot.truncated(),
                "snapshot cap reached, excess processes dropped"
            );
        }

        Ok(snapshot)
    }
}
