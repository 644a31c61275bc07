//! Data model for process snapshots.
//!
//! A [`Snapshot`] is the full ordered set of [`ProcessSample`]s captured
//! during one tick. It is bounded: appends beyond [`MAX_SAMPLES`] are
//! dropped and counted, never an error.

/// Maximum number of samples a snapshot will hold. Processes enumerated
/// beyond this cap are silently dropped; the drop count is reported via
/// [`Snapshot::truncated`].
pub const MAX_SAMPLES: usize = 2048;

/// One process's observed state at a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessSample {
    /// OS process identifier.
    pub pid: u32,
    /// Command name. `"unknown"` when the source is unreadable.
    pub name: String,
    /// Owning account name, or the numeric UID as a string when name
    /// lookup fails.
    pub user: String,
    /// Resident memory in kilobytes. 0 when unreadable.
    pub memory_kb: u64,
    /// Estimated CPU usage since the previous tick. 0.0 when no prior
    /// sample exists for this PID or system time has not advanced.
    pub cpu_percent: f32,
}

/// Bounded ordered collection of samples for one tick.
///
/// Enumeration order is not meaningful until the ranker runs.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    samples: Vec<ProcessSample>,
    truncated: usize,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sample, dropping it silently once the cap is reached.
    pub fn push(&mut self, sample: ProcessSample) {
        if self.samples.len() < MAX_SAMPLES {
            self.samples.push(sample);
        } else {
            self.truncated += 1;
        }
    }

    pub fn samples(&self) -> &[ProcessSample] {
        &self.samples
    }

    pub fn samples_mut(&mut self) -> &mut [ProcessSample] {
        &mut self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of enumerated processes that did not fit under the cap.
    pub fn truncated(&self) -> usize {
        self.truncated
    }

    /// Returns a snapshot containing, in original relative order, every
    /// sample whose name contains `text` as a case-insensitive ASCII
    /// substring. Empty `text` yields an equal copy. The source is never
    /// mutated.
    pub fn filter_by_name(&self, text: &str) -> Snapshot {
        if text.is_empty() {
            return self.clone();
        }
        let needle = text.to_ascii_lowercase();
        Snapshot {
            samples: self
                .samples
                .iter()
                .filter(|s| s.name.to_ascii_lowercase().contains(&needle))
                .cloned()
                .collect(),
            truncated: self.truncated,
        }
    }
}
