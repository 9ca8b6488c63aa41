//! Run-wide counters and append-only event logs.
//!
//! Both are plain values owned by the report writer for the lifetime of a
//! run, so several runs in one process never share state.

use crate::playlist::SkippedLine;
use crate::processing::ChannelResult;
use crate::reconcile::Mismatch;
use crate::tier::ResolutionTier;

/// Aggregate counts for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub total: usize,
    pub connected_true: usize,
    pub connected_false: usize,
    tier_counts: [usize; 5],
}

fn tier_index(tier: ResolutionTier) -> usize {
    match tier {
        ResolutionTier::Hd => 0,
        ResolutionTier::Uhd4k => 1,
        ResolutionTier::Sd => 2,
        ResolutionTier::Other => 3,
        ResolutionTier::Error => 4,
    }
}

impl RunStatistics {
    /// Counts one finished channel.
    pub fn update(&mut self, result: &ChannelResult) {
        self.total += 1;
        if result.connected {
            self.connected_true += 1;
        } else {
            self.connected_false += 1;
        }
        self.tier_counts[tier_index(result.tier)] += 1;
    }

    /// Number of channels classified as `tier`.
    #[must_use]
    pub fn count(&self, tier: ResolutionTier) -> usize {
        self.tier_counts[tier_index(tier)]
    }

    /// `(tier, count)` pairs in report order.
    pub fn tier_counts(&self) -> impl Iterator<Item = (ResolutionTier, usize)> + '_ {
        ResolutionTier::ALL.iter().map(|t| (*t, self.count(*t)))
    }
}

/// Informational findings collected during a run.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    mismatches: Vec<Mismatch>,
    skipped: Vec<SkippedLine>,
}

impl EventLog {
    pub fn record_mismatch(&mut self, mismatch: Mismatch) {
        self.mismatches.push(mismatch);
    }

    pub fn record_skipped(&mut self, line: SkippedLine) {
        self.skipped.push(line);
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }
}
