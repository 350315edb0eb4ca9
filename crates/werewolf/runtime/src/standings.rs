//! Global standings — process-lifetime win/loss ledger and ranking

use crate::participant::win_rate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use werewolf_types::PlayerId;

/// Totals for one identity across all sessions since the last reset
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalStats {
    pub total: u32,
    pub wins: u32,
    pub win_rate: f64,
}

/// One line of the ranking
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub identity: PlayerId,
    pub total: u32,
    pub wins: u32,
    pub win_rate: f64,
}

/// Identity → totals, updated once per finished session
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Standings {
    stats: BTreeMap<PlayerId, GlobalStats>,
}

impl Standings {
    pub fn new(identities: &[PlayerId]) -> Self {
        Self {
            stats: identities
                .iter()
                .map(|id| (id.clone(), GlobalStats::default()))
                .collect(),
        }
    }

    /// Rebuild from persisted totals; rates are recomputed
    pub fn restore(stats: BTreeMap<PlayerId, GlobalStats>) -> Self {
        Self {
            stats: stats
                .into_iter()
                .map(|(id, s)| {
                    (
                        id,
                        GlobalStats {
                            win_rate: win_rate(s.wins, s.total),
                            ..s
                        },
                    )
                })
                .collect(),
        }
    }

    pub fn record(&mut self, id: &PlayerId, won: bool) {
        let stats = self.stats.entry(id.clone()).or_default();
        stats.total += 1;
        if won {
            stats.wins += 1;
        }
        stats.win_rate = win_rate(stats.wins, stats.total);
    }

    pub fn get(&self, id: &PlayerId) -> Option<&GlobalStats> {
        self.stats.get(id)
    }

    pub fn as_map(&self) -> &BTreeMap<PlayerId, GlobalStats> {
        &self.stats
    }

    /// Zero every identity's totals
    pub fn reset(&mut self) {
        for stats in self.stats.values_mut() {
            *stats = GlobalStats::default();
        }
    }

    /// Sorted by win rate, then wins (both descending), then identity
    pub fn ranking(&self) -> Vec<RankingEntry> {
        let mut entries: Vec<RankingEntry> = self
            .stats
            .iter()
            .map(|(id, s)| RankingEntry {
                identity: id.clone(),
                total: s.total,
                wins: s.wins,
                win_rate: s.win_rate,
            })
            .collect();

        entries.sort_by(|a, b| {
            b.win_rate
                .total_cmp(&a.win_rate)
                .then_with(|| b.wins.cmp(&a.wins))
                .then_with(|| a.identity.cmp(&b.identity))
        });
        entries
    }
}
