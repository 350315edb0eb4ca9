//! Participant — durable identity, memory and lifetime record
//!
//! Per-session state (role, alive flag, witch potions) lives in
//! [`Seat`](crate::session::Seat) and is discarded when a session ends.
//! What survives sessions is here.

use crate::ledger::LearningLedger;
use serde::{Deserialize, Serialize};
use werewolf_types::PlayerId;

/// Round a win fraction to two decimals; zero games is a rate of 0.0
pub fn win_rate(wins: u32, games: u32) -> f64 {
    if games == 0 {
        return 0.0;
    }
    (wins as f64 / games as f64 * 100.0).round() / 100.0
}

/// Games played and won over the participant's lifetime
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LifetimeRecord {
    pub games_played: u32,
    pub wins: u32,
    pub win_rate: f64,
}

impl LifetimeRecord {
    pub fn new(games_played: u32, wins: u32) -> Self {
        Self {
            games_played,
            wins,
            win_rate: win_rate(wins, games_played),
        }
    }
}

/// One of the nine players and everything it remembers
#[derive(Clone, Debug)]
pub struct Participant {
    id: PlayerId,
    ledger: LearningLedger,
    record: LifetimeRecord,
}

impl Participant {
    pub fn new(id: PlayerId, effective_threshold: f64) -> Self {
        Self {
            id,
            ledger: LearningLedger::new(effective_threshold),
            record: LifetimeRecord::default(),
        }
    }

    pub(crate) fn from_parts(id: PlayerId, ledger: LearningLedger, record: LifetimeRecord) -> Self {
        Self { id, ledger, record }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn ledger(&self) -> &LearningLedger {
        &self.ledger
    }

    pub(crate) fn ledger_mut(&mut self) -> &mut LearningLedger {
        &mut self.ledger
    }

    pub fn record(&self) -> &LifetimeRecord {
        &self.record
    }

    pub fn mark_win(&mut self) {
        self.record = LifetimeRecord::new(self.record.games_played + 1, self.record.wins + 1);
    }

    pub fn mark_lose(&mut self) {
        self.record = LifetimeRecord::new(self.record.games_played + 1, self.record.wins);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> Participant {
        Participant::new(PlayerId::seat(1), 0.5)
    }

    #[test]
    fn test_first_win_is_full_rate() {
        let mut participant = fresh();
        participant.mark_win();
        assert_eq!(participant.record().games_played, 1);
        assert_eq!(participant.record().wins, 1);
        assert_eq!(participant.record().win_rate, 1.0);
    }

    #[test]
    fn test_first_loss_is_zero_rate() {
        let mut participant = fresh();
        participant.mark_lose();
        assert_eq!(participant.record().games_played, 1);
        assert_eq!(participant.record().wins, 0);
        assert_eq!(participant.record().win_rate, 0.0);
    }

    #[test]
    fn test_rate_rounds_to_two_decimals() {
        let mut participant = fresh();
        participant.mark_win();
        participant.mark_lose();
        participant.mark_lose();
        assert_eq!(participant.record().win_rate, 0.33);
    }

    #[test]
    fn test_zero_games() {
        assert_eq!(win_rate(0, 0), 0.0);
        assert_eq!(LifetimeRecord::new(0, 0).win_rate, 0.0);
    }
}
