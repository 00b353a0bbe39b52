//! Sampler statistics.
//!
//! Counters accumulate over the lifetime of a sampler. Use
//! [`SamplerStatistics::since`] to report the work done between two
//! snapshots.

/// Running counts for one sampler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SamplerStatistics {
    /// Contexts passed to `process`.
    pub contexts_processed: u64,
    /// Candidate transitions scored.
    pub proposals_evaluated: u64,
    /// Non-empty transitions left applied.
    pub proposals_accepted: u64,
    /// Weight updates made by SampleRank.
    pub weight_updates: u64,
}

impl SamplerStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the acceptance rate (accepted / evaluated).
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposals_evaluated == 0 {
            0.0
        } else {
            self.proposals_accepted as f64 / self.proposals_evaluated as f64
        }
    }

    /// Counts accumulated after `earlier` was taken.
    ///
    /// Counts that are lower than in `earlier` clamp to zero.
    pub fn since(&self, earlier: &SamplerStatistics) -> SamplerStatistics {
        SamplerStatistics {
            contexts_processed: self.contexts_processed.saturating_sub(earlier.contexts_processed),
            proposals_evaluated: self
                .proposals_evaluated
                .saturating_sub(earlier.proposals_evaluated),
            proposals_accepted: self.proposals_accepted.saturating_sub(earlier.proposals_accepted),
            weight_updates: self.weight_updates.saturating_sub(earlier.weight_updates),
        }
    }

    /// Adds another sampler's counts.
    pub fn merge(&mut self, other: &SamplerStatistics) {
        self.contexts_processed += other.contexts_processed;
        self.proposals_evaluated += other.proposals_evaluated;
        self.proposals_accepted += other.proposals_accepted;
        self.weight_updates += other.weight_updates;
    }

    pub(crate) fn record_context(&mut self, evaluated: u64, accepted: bool, updated: bool) {
        self.contexts_processed += 1;
        self.proposals_evaluated += evaluated;
        if accepted {
            self.proposals_accepted += 1;
        }
        if updated {
            self.weight_updates += 1;
        }
    }
}
