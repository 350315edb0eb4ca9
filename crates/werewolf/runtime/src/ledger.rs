//! Learning Ledger — cross-session memory of vote outcomes
//!
//! Every day vote a participant casts in a finished session becomes a
//! [`VoteRecord`]. The ledger folds those records into per-target
//! `{wins, total}` counters and derives the *effective targets*: identities
//! whose historical win fraction is above the threshold. The derived set is
//! never edited directly; it is recomputed after every recorded outcome.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use werewolf_types::PlayerId;

/// Win fraction above which a target counts as effective
pub const DEFAULT_EFFECTIVE_THRESHOLD: f64 = 0.5;

/// One day vote and whether the voter's camp went on to win
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub target: PlayerId,
    pub won: bool,
}

/// Cumulative outcome counters for one target
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStats {
    pub wins: u32,
    pub total: u32,
}

impl TargetStats {
    /// Win fraction, or `None` when there is no history to divide by
    pub fn win_rate(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(self.wins as f64 / self.total as f64)
        }
    }
}

/// Per-participant durable memory
#[derive(Clone, Debug, PartialEq)]
pub struct LearningLedger {
    vote_records: Vec<VoteRecord>,
    wolf_targets: Vec<PlayerId>,
    suspicious: BTreeSet<PlayerId>,
    target_history: BTreeMap<PlayerId, TargetStats>,
    effective_targets: BTreeSet<PlayerId>,
    threshold: f64,
}

impl Default for LearningLedger {
    fn default() -> Self {
        Self::new(DEFAULT_EFFECTIVE_THRESHOLD)
    }
}

impl LearningLedger {
    pub fn new(threshold: f64) -> Self {
        Self {
            vote_records: Vec::new(),
            wolf_targets: Vec::new(),
            suspicious: BTreeSet::new(),
            target_history: BTreeMap::new(),
            effective_targets: BTreeSet::new(),
            threshold,
        }
    }

    /// Rebuild a ledger from persisted parts. Effective targets are derived,
    /// not restored.
    pub fn restore(
        vote_records: Vec<VoteRecord>,
        wolf_targets: Vec<PlayerId>,
        suspicious: BTreeSet<PlayerId>,
        target_history: BTreeMap<PlayerId, TargetStats>,
        threshold: f64,
    ) -> Self {
        let mut ledger = Self {
            vote_records,
            wolf_targets,
            suspicious,
            target_history,
            effective_targets: BTreeSet::new(),
            threshold,
        };
        ledger.recompute();
        ledger
    }

    /// Record the outcome of a vote against `target`.
    ///
    /// `against_opponent` must be true only when `target` belonged to the
    /// voter's opposing camp and is not the voter; only then does a loss
    /// mark the target suspicious. `as_werewolf` also logs the target in the
    /// werewolf target list.
    pub fn record_outcome(
        &mut self,
        target: &PlayerId,
        won: bool,
        against_opponent: bool,
        as_werewolf: bool,
    ) {
        self.vote_records.push(VoteRecord {
            target: target.clone(),
            won,
        });

        let stats = self.target_history.entry(target.clone()).or_default();
        stats.total += 1;
        if won {
            stats.wins += 1;
        }

        if as_werewolf {
            self.wolf_targets.push(target.clone());
        }
        if against_opponent && !won {
            self.suspicious.insert(target.clone());
        }

        self.recompute();
    }

    fn recompute(&mut self) {
        self.effective_targets = self
            .target_history
            .iter()
            .filter(|(_, stats)| {
                stats
                    .win_rate()
                    .is_some_and(|rate| rate > self.threshold)
            })
            .map(|(target, _)| target.clone())
            .collect();
    }

    /// Historical win fraction against `target`; `None` without history
    pub fn target_win_rate(&self, target: &PlayerId) -> Option<f64> {
        self.target_history.get(target).and_then(TargetStats::win_rate)
    }

    pub fn is_effective(&self, target: &PlayerId) -> bool {
        self.effective_targets.contains(target)
    }

    pub fn is_suspicious(&self, target: &PlayerId) -> bool {
        self.suspicious.contains(target)
    }

    pub fn vote_records(&self) -> &[VoteRecord] {
        &self.vote_records
    }

    pub fn wolf_targets(&self) -> &[PlayerId] {
        &self.wolf_targets
    }

    pub fn suspicious(&self) -> &BTreeSet<PlayerId> {
        &self.suspicious
    }

    pub fn target_history(&self) -> &BTreeMap<PlayerId, TargetStats> {
        &self.target_history
    }

    pub fn effective_targets(&self) -> &BTreeSet<PlayerId> {
        &self.effective_targets
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }
}
