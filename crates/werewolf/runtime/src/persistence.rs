//! Persisted state shapes
//!
//! Derived values (`win_rate`, `effective_targets`) are written out for
//! readers but never trusted on the way back in: loading recomputes them
//! from the raw counters.

use crate::ledger::{LearningLedger, TargetStats, VoteRecord};
use crate::participant::{win_rate, LifetimeRecord, Participant};
use crate::session::Seat;
use crate::standings::GlobalStats;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use werewolf_types::{PlayerId, Role, WerewolfError, WerewolfResult};

/// One-time witch potions of the current session
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceFlags {
    pub resurrect_used: bool,
    pub poison_used: bool,
}

fn alive_by_default() -> bool {
    true
}

/// Persisted shape of one participant
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantState {
    pub identity: PlayerId,
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub win_rate: f64,
    #[serde(default)]
    pub current_role: Option<Role>,
    #[serde(default = "alive_by_default")]
    pub alive: bool,
    #[serde(default)]
    pub vote_history: Vec<VoteRecord>,
    #[serde(default)]
    pub wolf_targets: Vec<PlayerId>,
    #[serde(default)]
    pub suspicious_targets: BTreeSet<PlayerId>,
    #[serde(default)]
    pub resource_flags: ResourceFlags,
    #[serde(default)]
    pub effective_targets: BTreeSet<PlayerId>,
    #[serde(default)]
    pub target_history: BTreeMap<PlayerId, TargetStats>,
}

impl ParticipantState {
    /// Parse and recompute derived fields
    pub fn from_json(json: &str) -> WerewolfResult<Self> {
        let state: ParticipantState =
            serde_json::from_str(json).map_err(|e| WerewolfError::State(e.to_string()))?;
        Ok(state.normalized(crate::ledger::DEFAULT_EFFECTIVE_THRESHOLD))
    }

    pub fn to_json(&self) -> WerewolfResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WerewolfError::State(e.to_string()))
    }

    /// Recompute `win_rate` and `effective_targets` from the raw counters
    pub fn normalized(mut self, effective_threshold: f64) -> Self {
        self.win_rate = win_rate(self.wins, self.games_played);
        self.effective_targets = self
            .target_history
            .iter()
            .filter(|(_, stats)| {
                stats
                    .win_rate()
                    .is_some_and(|rate| rate > effective_threshold)
            })
            .map(|(target, _)| target.clone())
            .collect();
        self
    }
}

impl Participant {
    /// Snapshot this participant, with its seat when a session is running
    pub fn to_state(&self, seat: Option<&Seat>) -> ParticipantState {
        let ledger = self.ledger();
        let record = self.record();
        ParticipantState {
            identity: self.id().clone(),
            games_played: record.games_played,
            wins: record.wins,
            win_rate: record.win_rate,
            current_role: seat.map(|s| s.role),
            alive: seat.map(|s| s.alive).unwrap_or(true),
            vote_history: ledger.vote_records().to_vec(),
            wolf_targets: ledger.wolf_targets().to_vec(),
            suspicious_targets: ledger.suspicious().clone(),
            resource_flags: seat
                .map(|s| ResourceFlags {
                    resurrect_used: s.resurrect_used,
                    poison_used: s.poison_used,
                })
                .unwrap_or_default(),
            effective_targets: ledger.effective_targets().clone(),
            target_history: ledger.target_history().clone(),
        }
    }

    /// Restore the durable part of a snapshot.
    ///
    /// Session fields (`current_role`, `alive`, `resource_flags`) are not
    /// carried over: a restored participant always starts between sessions.
    pub fn from_state(state: ParticipantState, effective_threshold: f64) -> Self {
        let ledger = LearningLedger::restore(
            state.vote_history,
            state.wolf_targets,
            state.suspicious_targets,
            state.target_history,
            effective_threshold,
        );
        Participant::from_parts(
            state.identity,
            ledger,
            LifetimeRecord::new(state.games_played, state.wins),
        )
    }
}

/// Persisted shape of a whole moderator
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModeratorState {
    #[serde(default)]
    pub sessions_played: u64,
    pub participants: Vec<ParticipantState>,
    #[serde(default)]
    pub standings: BTreeMap<PlayerId, GlobalStats>,
}

impl ModeratorState {
    pub fn from_json(json: &str) -> WerewolfResult<Self> {
        serde_json::from_str(json).map_err(|e| WerewolfError::State(e.to_string()))
    }

    pub fn to_json(&self) -> WerewolfResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| WerewolfError::State(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: usize) -> PlayerId {
        PlayerId::seat(n)
    }

    fn seasoned() -> Participant {
        let mut participant = Participant::new(p(4), 0.5);
        participant.mark_win();
        participant.mark_lose();
        participant.mark_win();
        let ledger = participant.ledger_mut();
        ledger.record_outcome(&p(1), true, true, false);
        ledger.record_outcome(&p(2), false, true, false);
        ledger.record_outcome(&p(7), true, false, true);
        participant
    }

    #[test]
    fn test_round_trip_is_identical() {
        let first = seasoned().to_state(None).to_json().unwrap();
        let restored = Participant::from_state(ParticipantState::from_json(&first).unwrap(), 0.5);
        let second = restored.to_state(None).to_json().unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_load_recomputes_derived_fields() {
        let mut state = seasoned().to_state(None);
        state.win_rate = 0.01;
        state.effective_targets.clear();
        state.effective_targets.insert(p(9));

        let json = serde_json::to_string(&state).unwrap();
        let loaded = ParticipantState::from_json(&json).unwrap();
        assert_eq!(loaded.win_rate, 0.67);
        assert_eq!(
            loaded.effective_targets.into_iter().collect::<Vec<_>>(),
            vec![p(1), p(7)]
        );
    }

    #[test]
    fn test_sparse_document_loads() {
        let json = r#"{"identity": "Player3", "games_played": 2, "wins": 1}"#;
        let loaded = ParticipantState::from_json(json).unwrap();
        assert_eq!(loaded.identity, p(3));
        assert_eq!(loaded.win_rate, 0.5);
        assert!(loaded.alive);
        assert_eq!(loaded.current_role, None);
        assert_eq!(loaded.resource_flags, ResourceFlags::default());
    }

    #[test]
    fn test_snapshot_with_seat() {
        let mut seat = Seat::new(Role::Witch);
        seat.poison_used = true;
        let state = seasoned().to_state(Some(&seat));
        assert_eq!(state.current_role, Some(Role::Witch));
        assert!(state.resource_flags.poison_used);
        assert!(!state.resource_flags.resurrect_used);
    }

    #[test]
    fn test_malformed_json_is_state_error() {
        assert!(matches!(
            ParticipantState::from_json("{"),
            Err(WerewolfError::State(_))
        ));
    }
}
