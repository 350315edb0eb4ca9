//! Session state — everything that lives for exactly one game
//!
//! A [`Session`] is built fresh from a role assignment, owned by the
//! moderator while the game runs, and dropped once the outcome has been
//! written into the durable ledgers. Participants never touch it.

use crate::policy::SeatView;
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use werewolf_types::{
    Action, Camp, PlayerId, Role, RoleAssignment, SessionId, WerewolfError, WerewolfResult, Winner,
};

/// Shuffle `roles` and bind them onto `identities`
pub fn assign_roles<R: Rng + ?Sized>(
    identities: &[PlayerId],
    roles: &[Role],
    rng: &mut R,
) -> WerewolfResult<RoleAssignment> {
    let mut shuffled = roles.to_vec();
    shuffled.shuffle(rng);
    RoleAssignment::new(identities, &shuffled)
}

/// Phases of the moderator's state machine
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    RoleAssignment,
    NightWolf,
    NightWitch,
    DayReveal,
    DaySeer,
    DayVote,
    DayHunter,
    TerminationCheck,
    SessionEnd,
}

impl Phase {
    /// Unconditional successor. `TerminationCheck` loops back to the night;
    /// the moderator diverts to `SessionEnd` when a camp has won.
    pub fn next(self) -> Phase {
        match self {
            Phase::RoleAssignment => Phase::NightWolf,
            Phase::NightWolf => Phase::NightWitch,
            Phase::NightWitch => Phase::DayReveal,
            Phase::DayReveal => Phase::DaySeer,
            Phase::DaySeer => Phase::DayVote,
            Phase::DayVote => Phase::DayHunter,
            Phase::DayHunter => Phase::TerminationCheck,
            Phase::TerminationCheck => Phase::NightWolf,
            Phase::SessionEnd => Phase::SessionEnd,
        }
    }
}

/// Who may see a logged event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Wolves,
    Private(PlayerId),
}

/// Something that happened during a session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EventKind {
    RoleNotice { player: PlayerId, role: Role },
    Discussion {
        turn: u32,
        speaker: PlayerId,
        action: Action,
    },
    WolfVote { voter: PlayerId, action: Action },
    WolfAgreement { target: PlayerId, votes: usize },
    WolfConfirmation { wolf: PlayerId, action: Action },
    NightKill { target: PlayerId },
    NightReveal { eliminated: Vec<PlayerId> },
    WitchAction { witch: PlayerId, action: Action },
    Resurrected { target: PlayerId },
    Poisoned { target: PlayerId },
    LastWords { player: PlayerId, action: Action },
    SeerCheck { seer: PlayerId, action: Action },
    DayVote { voter: PlayerId, action: Action },
    DayElimination { target: PlayerId, votes: usize },
    HunterAction { hunter: PlayerId, action: Action },
    HunterShot { hunter: PlayerId, target: PlayerId },
    MalformedFallback {
        actor: PlayerId,
        reason: String,
        substitute: PlayerId,
    },
    Status {
        alive_wolves: usize,
        alive_good: usize,
    },
    GameOver { winner: Winner },
}

/// A logged event with its position in the game
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SessionEvent {
    pub round: u32,
    pub phase: Phase,
    pub visibility: Visibility,
    #[serde(flatten)]
    pub kind: EventKind,
}

/// Per-session state of one participant
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Seat {
    pub role: Role,
    pub alive: bool,
    pub resurrect_used: bool,
    pub poison_used: bool,
}

impl Seat {
    pub fn new(role: Role) -> Self {
        Self {
            role,
            alive: true,
            resurrect_used: false,
            poison_used: false,
        }
    }
}

/// One game from role assignment to termination
#[derive(Clone, Debug)]
pub struct Session {
    id: SessionId,
    roles: RoleAssignment,
    seats: BTreeMap<PlayerId, Seat>,
    eliminated: Vec<PlayerId>,
    round: u32,
    phase: Phase,
    /// Day votes of the current round (voter → target)
    votes: BTreeMap<PlayerId, PlayerId>,
    round_start_alive: Vec<PlayerId>,
    night_eliminated: Vec<PlayerId>,
    day_eliminated: Option<PlayerId>,
    events: Vec<SessionEvent>,
    started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(roles: RoleAssignment) -> Self {
        let seats = roles
            .iter()
            .map(|(id, role)| (id.clone(), Seat::new(role)))
            .collect();
        let round_start_alive = roles.iter().map(|(id, _)| id.clone()).collect();

        Self {
            id: SessionId::generate(),
            roles,
            seats,
            eliminated: Vec::new(),
            round: 1,
            phase: Phase::RoleAssignment,
            votes: BTreeMap::new(),
            round_start_alive,
            night_eliminated: Vec::new(),
            day_eliminated: None,
            events: Vec::new(),
            started_at: Utc::now(),
        }
    }

    // --- Queries ---

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn roles(&self) -> &RoleAssignment {
        &self.roles
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn seat(&self, id: &PlayerId) -> Option<&Seat> {
        self.seats.get(id)
    }

    pub fn is_alive(&self, id: &PlayerId) -> bool {
        self.seats.get(id).is_some_and(|seat| seat.alive)
    }

    /// Alive identities in seat order
    pub fn alive(&self) -> Vec<PlayerId> {
        self.seats
            .iter()
            .filter(|(_, seat)| seat.alive)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Alive identities holding `role`
    pub fn alive_with_role(&self, role: Role) -> Vec<PlayerId> {
        self.seats
            .iter()
            .filter(|(_, seat)| seat.alive && seat.role == role)
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// (alive werewolves, alive good-camp participants)
    pub fn alive_counts(&self) -> (usize, usize) {
        self.seats
            .values()
            .filter(|seat| seat.alive)
            .fold((0, 0), |(wolves, good), seat| match seat.role.camp() {
                Camp::Wolf => (wolves + 1, good),
                Camp::Good => (wolves, good + 1),
            })
    }

    pub fn verdict(&self) -> Option<Winner> {
        let (wolves, good) = self.alive_counts();
        Winner::evaluate(wolves, good)
    }

    /// Eliminations in the order they happened
    pub fn eliminated(&self) -> &[PlayerId] {
        &self.eliminated
    }

    pub fn votes(&self) -> &BTreeMap<PlayerId, PlayerId> {
        &self.votes
    }

    pub fn round_start_alive(&self) -> &[PlayerId] {
        &self.round_start_alive
    }

    /// Night eliminations of the current round that still stand
    pub fn night_eliminated(&self) -> &[PlayerId] {
        &self.night_eliminated
    }

    /// Identity removed by this round's day vote
    pub fn day_eliminated(&self) -> Option<&PlayerId> {
        self.day_eliminated.as_ref()
    }

    pub fn events(&self) -> &[SessionEvent] {
        &self.events
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// What `id` knows about its own seat
    pub fn seat_view(&self, id: &PlayerId) -> SeatView {
        match self.seats.get(id) {
            Some(seat) => SeatView {
                role: Some(seat.role),
                resurrect_used: seat.resurrect_used,
                poison_used: seat.poison_used,
                night_eliminated: self.night_eliminated.contains(id),
            },
            None => SeatView::default(),
        }
    }

    // --- Mutations (moderator only) ---

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    /// Start the next round: bump the counter and forget the round's votes
    pub(crate) fn advance_round(&mut self) {
        self.round += 1;
        self.begin_round();
    }

    pub(crate) fn begin_round(&mut self) {
        self.votes.clear();
        self.night_eliminated.clear();
        self.day_eliminated = None;
        self.round_start_alive = self.alive();
    }

    pub(crate) fn eliminate(&mut self, id: &PlayerId) -> WerewolfResult<()> {
        let seat = self
            .seats
            .get_mut(id)
            .ok_or_else(|| WerewolfError::UnknownPlayer(id.clone()))?;
        if !seat.alive || self.eliminated.contains(id) {
            return Err(WerewolfError::DuplicateElimination(id.clone()));
        }
        seat.alive = false;
        self.eliminated.push(id.clone());
        Ok(())
    }

    /// Eliminate during the night; the elimination can still be reversed
    pub(crate) fn eliminate_at_night(&mut self, id: &PlayerId) -> WerewolfResult<()> {
        self.eliminate(id)?;
        self.night_eliminated.push(id.clone());
        Ok(())
    }

    pub(crate) fn eliminate_by_day_vote(&mut self, id: &PlayerId) -> WerewolfResult<()> {
        self.eliminate(id)?;
        self.day_eliminated = Some(id.clone());
        Ok(())
    }

    /// Reverse a provisional night elimination
    pub(crate) fn revive(&mut self, id: &PlayerId) -> WerewolfResult<()> {
        if !self.night_eliminated.contains(id) {
            return Err(WerewolfError::State(format!(
                "{} was not eliminated tonight",
                id
            )));
        }
        let seat = self
            .seats
            .get_mut(id)
            .ok_or_else(|| WerewolfError::UnknownPlayer(id.clone()))?;
        seat.alive = true;
        self.eliminated.retain(|e| e != id);
        self.night_eliminated.retain(|e| e != id);
        Ok(())
    }

    pub(crate) fn use_resurrect(&mut self, witch: &PlayerId) {
        if let Some(seat) = self.seats.get_mut(witch) {
            seat.resurrect_used = true;
        }
    }

    pub(crate) fn use_poison(&mut self, witch: &PlayerId) {
        if let Some(seat) = self.seats.get_mut(witch) {
            seat.poison_used = true;
        }
    }

    pub(crate) fn record_vote(&mut self, voter: PlayerId, target: PlayerId) {
        self.votes.insert(voter, target);
    }

    pub(crate) fn log(&mut self, visibility: Visibility, kind: EventKind) {
        self.events.push(SessionEvent {
            round: self.round,
            phase: self.phase,
            visibility,
            kind,
        });
    }

    pub(crate) fn into_events(self) -> Vec<SessionEvent> {
        self.events
    }
}

/// How one participant fared, and what it learned
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParticipantOutcome {
    pub id: PlayerId,
    pub role: Role,
    pub won: bool,
    pub games_played: u32,
    pub wins: u32,
    pub win_rate: f64,
    pub effective_targets: Vec<PlayerId>,
}

/// Everything a finished session hands back to its caller
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionReport {
    pub session_id: SessionId,
    /// 1-based position among sessions since the last standings reset
    pub sequence: u64,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub rounds: u32,
    pub winner: Winner,
    pub roles: BTreeMap<PlayerId, Role>,
    pub eliminated: Vec<PlayerId>,
    pub events: Vec<SessionEvent>,
    pub outcomes: Vec<ParticipantOutcome>,
}

impl SessionReport {
    pub fn public_events(&self) -> impl Iterator<Item = &SessionEvent> {
        self.events
            .iter()
            .filter(|event| event.visibility == Visibility::Public)
    }

    pub fn outcome(&self, id: &PlayerId) -> Option<&ParticipantOutcome> {
        self.outcomes.iter().find(|outcome| &outcome.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use werewolf_types::{roster, standard_roles};

    fn p(n: usize) -> PlayerId {
        PlayerId::seat(n)
    }

    /// Player1-3 werewolves, Player4 seer, Player5 witch, Player6 hunter,
    /// Player7-9 villagers.
    fn session() -> Session {
        Session::new(RoleAssignment::new(&roster(), &standard_roles()).unwrap())
    }

    #[test]
    fn test_assign_roles_is_bijection() {
        for seed in 0..20 {
            let mut rng = StdRng::seed_from_u64(seed);
            let roles = assign_roles(&roster(), &standard_roles(), &mut rng).unwrap();
            assert_eq!(roles.len(), 9);
            assert_eq!(roles.count(Role::Werewolf), 3);
            assert_eq!(roles.count(Role::Seer), 1);
            assert_eq!(roles.count(Role::Witch), 1);
            assert_eq!(roles.count(Role::Hunter), 1);
            assert_eq!(roles.count(Role::Villager), 3);
        }
    }

    #[test]
    fn test_assign_roles_size_mismatch() {
        let mut rng = StdRng::seed_from_u64(0);
        let ids = &roster()[..8];
        assert!(matches!(
            assign_roles(ids, &standard_roles(), &mut rng),
            Err(WerewolfError::InvalidRoleAssignment { .. })
        ));
    }

    #[test]
    fn test_phase_order() {
        let mut phase = Phase::RoleAssignment;
        let mut seen = vec![phase];
        while phase != Phase::TerminationCheck {
            phase = phase.next();
            seen.push(phase);
        }
        assert_eq!(seen.len(), 8);
        assert_eq!(Phase::TerminationCheck.next(), Phase::NightWolf);
    }

    #[test]
    fn test_fresh_session() {
        let s = session();
        assert_eq!(s.round(), 1);
        assert_eq!(s.alive().len(), 9);
        assert_eq!(s.alive_counts(), (3, 6));
        assert_eq!(s.verdict(), None);
    }

    #[test]
    fn test_elimination_order_and_duplicates() {
        let mut s = session();
        s.eliminate(&p(4)).unwrap();
        s.eliminate(&p(1)).unwrap();
        assert_eq!(s.eliminated(), &[p(4), p(1)]);
        assert!(matches!(
            s.eliminate(&p(4)),
            Err(WerewolfError::DuplicateElimination(_))
        ));
        assert!(matches!(
            s.eliminate(&PlayerId::new("Nobody")),
            Err(WerewolfError::UnknownPlayer(_))
        ));
    }

    #[test]
    fn test_revive_only_tonight() {
        let mut s = session();
        s.eliminate(&p(7)).unwrap();
        assert!(s.revive(&p(7)).is_err());

        s.eliminate_at_night(&p(8)).unwrap();
        assert!(s.seat_view(&p(8)).night_eliminated);
        s.revive(&p(8)).unwrap();
        assert!(s.is_alive(&p(8)));
        assert_eq!(s.eliminated(), &[p(7)]);
    }

    #[test]
    fn test_verdicts() {
        let mut s = session();
        for n in 1..=3 {
            s.eliminate(&p(n)).unwrap();
        }
        assert_eq!(s.verdict(), Some(Winner::Good));

        let mut s = session();
        for n in 4..=6 {
            s.eliminate(&p(n)).unwrap();
        }
        assert_eq!(s.verdict(), Some(Winner::Wolves));
    }

    #[test]
    fn test_advance_round_resets_votes() {
        let mut s = session();
        s.record_vote(p(1), p(4));
        s.eliminate_at_night(&p(5)).unwrap();
        s.advance_round();
        assert_eq!(s.round(), 2);
        assert!(s.votes().is_empty());
        assert!(s.night_eliminated().is_empty());
        assert_eq!(s.round_start_alive().len(), 8);
    }

    #[test]
    fn test_log_stamps_round_and_phase() {
        let mut s = session();
        s.set_phase(Phase::DayVote);
        s.log(
            Visibility::Public,
            EventKind::Status {
                alive_wolves: 3,
                alive_good: 6,
            },
        );
        assert_eq!(s.events()[0].round, 1);
        assert_eq!(s.events()[0].phase, Phase::DayVote);
    }
}
