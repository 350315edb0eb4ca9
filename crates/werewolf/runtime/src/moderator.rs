//! Moderator — owns the participants and drives every session
//!
//! The moderator is the only component that mutates session state. It walks
//! the phase state machine, asks each participant's [`DecisionPolicy`] for an
//! action, validates the answer, and applies the result. Participants run
//! concurrently within a phase (they only read their own ledger); sessions
//! run strictly one at a time, which [`SharedModerator`] enforces for callers
//! on different tasks.

use crate::config::GameConfig;
use crate::participant::Participant;
use crate::persistence::ModeratorState;
use crate::policy::{DecisionPolicy, DecisionRequest, HeuristicPolicy};
use crate::session::{
    assign_roles, EventKind, ParticipantOutcome, Phase, Session, SessionReport, Visibility,
};
use crate::standings::{GlobalStats, RankingEntry, Standings};
use crate::tally::tally;
use chrono::Utc;
use futures::future::join_all;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use werewolf_types::{
    roster, standard_roles, Action, ActionKind, PlayerId, Role, RoleAssignment, WerewolfError,
    WerewolfResult, Winner,
};

/// Runs sessions for a fixed table of participants
pub struct Moderator {
    config: GameConfig,
    identities: Vec<PlayerId>,
    roles: Vec<Role>,
    participants: BTreeMap<PlayerId, Participant>,
    standings: Standings,

    // --- Decision sources ---
    /// Used for every identity without an override
    default_policy: Arc<dyn DecisionPolicy>,
    overrides: HashMap<PlayerId, Arc<dyn DecisionPolicy>>,

    rng: StdRng,
    sessions_played: u64,
}

impl Moderator {
    /// The standard nine-seat table
    pub fn new(config: GameConfig) -> WerewolfResult<Self> {
        Self::with_table(config, roster(), standard_roles())
    }

    /// A table with custom identities and role multiset
    pub fn with_table(
        config: GameConfig,
        identities: Vec<PlayerId>,
        roles: Vec<Role>,
    ) -> WerewolfResult<Self> {
        config.validate()?;
        RoleAssignment::new(&identities, &roles)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let threshold = config.policy.effective_threshold;
        let participants = identities
            .iter()
            .map(|id| (id.clone(), Participant::new(id.clone(), threshold)))
            .collect();

        info!(
            players = identities.len(),
            seeded = config.seed.is_some(),
            discussion_rounds = config.discussion_rounds,
            "Moderator created"
        );

        Ok(Self {
            default_policy: Arc::new(HeuristicPolicy::new(config.policy.clone())),
            overrides: HashMap::new(),
            standings: Standings::new(&identities),
            participants,
            identities,
            roles,
            config,
            rng,
            sessions_played: 0,
        })
    }

    /// Rebuild a moderator from a persisted snapshot
    pub fn restore(config: GameConfig, state: ModeratorState) -> WerewolfResult<Self> {
        let mut moderator = Self::new(config)?;
        moderator.load(state)?;
        Ok(moderator)
    }

    /// Replace the policy used for every identity without an override
    pub fn with_policy(mut self, policy: Arc<dyn DecisionPolicy>) -> Self {
        self.default_policy = policy;
        self
    }

    /// Route one identity's decisions through `policy`
    pub fn with_policy_for(mut self, id: PlayerId, policy: Arc<dyn DecisionPolicy>) -> Self {
        self.overrides.insert(id, policy);
        self
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn identities(&self) -> &[PlayerId] {
        &self.identities
    }

    pub fn participant(&self, id: &PlayerId) -> Option<&Participant> {
        self.participants.get(id)
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    pub fn standings(&self) -> &Standings {
        &self.standings
    }

    /// Sessions finished since creation or the last standings reset
    pub fn sessions_played(&self) -> u64 {
        self.sessions_played
    }

    /// Identities ordered by global win rate, then wins, then identity
    pub fn ranking(&self) -> Vec<RankingEntry> {
        self.standings.ranking()
    }

    /// Zero the global standings. Lifetime records and ledgers are kept.
    pub fn reset_standings(&mut self) {
        self.standings.reset();
        self.sessions_played = 0;
        info!("Global standings reset");
    }

    // =========================================================================
    // PERSISTENCE
    // =========================================================================

    /// Durable state between sessions
    pub fn snapshot(&self) -> ModeratorState {
        ModeratorState {
            sessions_played: self.sessions_played,
            participants: self
                .participants
                .values()
                .map(|participant| participant.to_state(None))
                .collect(),
            standings: self.standings.as_map().clone(),
        }
    }

    /// Replace participants and standings with a snapshot's content.
    ///
    /// Identities missing from the snapshot keep their current state;
    /// identities not seated at this table are rejected.
    pub fn load(&mut self, state: ModeratorState) -> WerewolfResult<()> {
        let unknown = state
            .participants
            .iter()
            .map(|p| &p.identity)
            .chain(state.standings.keys())
            .find(|id| !self.participants.contains_key(*id));
        if let Some(id) = unknown {
            return Err(WerewolfError::UnknownPlayer(id.clone()));
        }

        let threshold = self.config.policy.effective_threshold;
        for participant_state in state.participants {
            let participant = Participant::from_state(participant_state, threshold);
            let id = participant.id().clone();
            self.participants.insert(id, participant);
        }

        let mut stats: BTreeMap<PlayerId, GlobalStats> = self
            .identities
            .iter()
            .map(|id| (id.clone(), GlobalStats::default()))
            .collect();
        stats.extend(state.standings);
        self.standings = Standings::restore(stats);
        self.sessions_played = state.sessions_played;

        info!(
            sessions_played = self.sessions_played,
            "Moderator state loaded"
        );
        Ok(())
    }

    // =========================================================================
    // SESSIONS
    // =========================================================================

    /// Play `count` sessions back to back
    pub async fn run_sessions(&mut self, count: usize) -> WerewolfResult<Vec<SessionReport>> {
        let mut reports = Vec::with_capacity(count);
        for _ in 0..count {
            reports.push(self.run_session().await?);
        }
        Ok(reports)
    }

    /// Play one session from role assignment to a winner
    pub async fn run_session(&mut self) -> WerewolfResult<SessionReport> {
        let roles = assign_roles(&self.identities, &self.roles, &mut self.rng)?;
        let mut session = Session::new(roles);
        info!(session = %session.id(), "Session started");

        let mut phase = Phase::RoleAssignment;
        let mut winner = None;
        while phase != Phase::SessionEnd {
            session.set_phase(phase);
            debug!(
                session = %session.id(),
                round = session.round(),
                phase = ?phase,
                "Entering phase"
            );

            phase = match phase {
                Phase::RoleAssignment => {
                    self.deliver_roles(&mut session);
                    phase.next()
                }
                Phase::NightWolf => {
                    self.night_wolf(&mut session).await?;
                    phase.next()
                }
                Phase::NightWitch => {
                    self.night_witch(&mut session).await?;
                    phase.next()
                }
                Phase::DayReveal => {
                    self.day_reveal(&mut session).await;
                    phase.next()
                }
                Phase::DaySeer => {
                    self.day_seer(&mut session).await;
                    phase.next()
                }
                Phase::DayVote => {
                    self.day_vote(&mut session).await?;
                    phase.next()
                }
                Phase::DayHunter => {
                    self.day_hunter(&mut session).await?;
                    phase.next()
                }
                Phase::TerminationCheck => match self.termination_check(&mut session) {
                    Some(verdict) => {
                        winner = Some(verdict);
                        Phase::SessionEnd
                    }
                    None => {
                        session.advance_round();
                        phase.next()
                    }
                },
                Phase::SessionEnd => Phase::SessionEnd,
            };
        }

        let Some(winner) = winner else {
            return Err(WerewolfError::State("no winner at session end".into()));
        };
        Ok(self.conclude(session, winner))
    }

    // --- Phases ---

    fn deliver_roles(&mut self, session: &mut Session) {
        let notices: Vec<(PlayerId, Role)> = session
            .roles()
            .iter()
            .map(|(id, role)| (id.clone(), role))
            .collect();
        for (player, role) in notices {
            debug!(player = %player, role = %role, "Role delivered");
            session.log(
                Visibility::Private(player.clone()),
                EventKind::RoleNotice { player, role },
            );
        }
    }

    async fn night_wolf(&mut self, session: &mut Session) -> WerewolfResult<()> {
        let wolves = session.alive_with_role(Role::Werewolf);
        if wolves.is_empty() {
            return Ok(());
        }

        for turn in 1..=self.config.discussion_rounds {
            let proposals = self
                .query(session, &wolves, ActionKind::Discussion, Visibility::Wolves)
                .await;
            for (speaker, action) in proposals {
                session.log(
                    Visibility::Wolves,
                    EventKind::Discussion {
                        turn,
                        speaker,
                        action,
                    },
                );
            }
        }

        let ballots = self
            .query(session, &wolves, ActionKind::Vote, Visibility::Wolves)
            .await;
        let mut votes = BTreeMap::new();
        for (voter, action) in ballots {
            votes.insert(voter.clone(), action.vote().clone());
            session.log(Visibility::Wolves, EventKind::WolfVote { voter, action });
        }

        let outcome = tally(&votes, &mut self.rng)?;
        session.log(
            Visibility::Wolves,
            EventKind::WolfAgreement {
                target: outcome.winner.clone(),
                votes: outcome.votes,
            },
        );

        // Each wolf acknowledges the agreed target; the kill stands either way
        let confirmations = self
            .query(session, &wolves, ActionKind::Vote, Visibility::Wolves)
            .await;
        for (wolf, action) in confirmations {
            session.log(
                Visibility::Wolves,
                EventKind::WolfConfirmation { wolf, action },
            );
        }

        session.eliminate_at_night(&outcome.winner)?;
        session.log(
            Visibility::Wolves,
            EventKind::NightKill {
                target: outcome.winner.clone(),
            },
        );
        info!(
            session = %session.id(),
            round = session.round(),
            target = %outcome.winner,
            "Werewolves struck"
        );
        Ok(())
    }

    async fn night_witch(&mut self, session: &mut Session) -> WerewolfResult<()> {
        let Some(witch) = session
            .round_start_alive()
            .iter()
            .find(|id| session.roles().role_of(id) == Some(Role::Witch))
            .cloned()
        else {
            return Ok(());
        };

        let private = Visibility::Private(witch.clone());
        let answer = self
            .query(session, &[witch.clone()], ActionKind::Vote, private.clone())
            .await;
        let Some((_, action)) = answer.into_iter().next() else {
            return Ok(());
        };
        session.log(
            private,
            EventKind::WitchAction {
                witch: witch.clone(),
                action: action.clone(),
            },
        );

        let (resurrect, poison) = match action {
            Action::Witch {
                resurrect, poison, ..
            } => (resurrect, poison),
            _ => (false, false),
        };
        let seat = session.seat_view(&witch);

        if let Some(victim) = session.night_eliminated().first().cloned() {
            if !seat.resurrect_used {
                if resurrect {
                    session.revive(&victim)?;
                    session.log(
                        Visibility::Private(witch.clone()),
                        EventKind::Resurrected {
                            target: victim.clone(),
                        },
                    );
                    info!(witch = %witch, target = %victim, "Witch resurrected");
                }
                session.use_resurrect(&witch);
            }
        }

        if poison && !seat.poison_used {
            if let Some(target) = self.punish_target(session, &witch) {
                session.eliminate_at_night(&target)?;
                session.log(
                    Visibility::Private(witch.clone()),
                    EventKind::Poisoned {
                        target: target.clone(),
                    },
                );
                info!(witch = %witch, target = %target, "Witch poisoned");
            }
            session.use_poison(&witch);
        }
        Ok(())
    }

    async fn day_reveal(&mut self, session: &mut Session) {
        let fallen = session.night_eliminated().to_vec();
        session.log(
            Visibility::Public,
            EventKind::NightReveal {
                eliminated: fallen.clone(),
            },
        );
        if fallen.is_empty() {
            return;
        }

        let last_words = self
            .query(session, &fallen, ActionKind::Vote, Visibility::Public)
            .await;
        for (player, action) in last_words {
            session.log(Visibility::Public, EventKind::LastWords { player, action });
        }
    }

    async fn day_seer(&mut self, session: &mut Session) {
        let Some(seer) = session.alive_with_role(Role::Seer).into_iter().next() else {
            return;
        };
        let private = Visibility::Private(seer.clone());
        let checks = self
            .query(session, &[seer], ActionKind::Vote, private.clone())
            .await;
        for (seer, action) in checks {
            session.log(private.clone(), EventKind::SeerCheck { seer, action });
        }
    }

    async fn day_vote(&mut self, session: &mut Session) -> WerewolfResult<()> {
        let voters = session.alive();
        let ballots = self
            .query(session, &voters, ActionKind::Vote, Visibility::Public)
            .await;
        for (voter, action) in ballots {
            session.record_vote(voter.clone(), action.vote().clone());
            session.log(Visibility::Public, EventKind::DayVote { voter, action });
        }

        let outcome = tally(session.votes(), &mut self.rng)?;
        session.eliminate_by_day_vote(&outcome.winner)?;
        session.log(
            Visibility::Public,
            EventKind::DayElimination {
                target: outcome.winner.clone(),
                votes: outcome.votes,
            },
        );
        info!(
            session = %session.id(),
            round = session.round(),
            target = %outcome.winner,
            votes = outcome.votes,
            tie = outcome.is_tie(),
            "Day vote eliminated"
        );
        Ok(())
    }

    async fn day_hunter(&mut self, session: &mut Session) -> WerewolfResult<()> {
        let Some(hunter) = session
            .day_eliminated()
            .filter(|id| session.roles().role_of(id) == Some(Role::Hunter))
            .cloned()
        else {
            return Ok(());
        };

        let hunters = [hunter.clone()];
        let answer = self
            .query(session, &hunters, ActionKind::Vote, Visibility::Public)
            .await;
        let Some((_, action)) = answer.into_iter().next() else {
            return Ok(());
        };
        let shoot = matches!(action, Action::Hunter { shoot: true, .. });
        session.log(
            Visibility::Public,
            EventKind::HunterAction {
                hunter: hunter.clone(),
                action,
            },
        );

        if shoot {
            if let Some(target) = self.punish_target(session, &hunter) {
                session.eliminate(&target)?;
                session.log(
                    Visibility::Public,
                    EventKind::HunterShot {
                        hunter: hunter.clone(),
                        target: target.clone(),
                    },
                );
                info!(hunter = %hunter, target = %target, "Hunter fired");
            }
        }
        Ok(())
    }

    fn termination_check(&mut self, session: &mut Session) -> Option<Winner> {
        let (alive_wolves, alive_good) = session.alive_counts();
        session.log(
            Visibility::Public,
            EventKind::Status {
                alive_wolves,
                alive_good,
            },
        );
        debug!(
            session = %session.id(),
            round = session.round(),
            alive_wolves,
            alive_good,
            "Termination check"
        );
        session.verdict()
    }

    /// Write the outcome into every ledger and build the report
    fn conclude(&mut self, mut session: Session, winner: Winner) -> SessionReport {
        session.set_phase(Phase::SessionEnd);
        session.log(Visibility::Public, EventKind::GameOver { winner });

        let winning_camp = winner.camp();
        let roles = session.roles().clone();

        for (id, role) in roles.iter() {
            let won = role.camp() == winning_camp;
            if let Some(participant) = self.participants.get_mut(id) {
                if won {
                    participant.mark_win();
                } else {
                    participant.mark_lose();
                }
            }
            self.standings.record(id, won);
        }

        // Learning reads the day votes of the round that ended the game
        for (voter, target) in session.votes() {
            let Some(voter_role) = roles.role_of(voter) else {
                continue;
            };
            let own_camp = voter_role.camp();
            let against_opponent =
                voter != target && roles.camp_of(target).is_some_and(|camp| camp != own_camp);
            if let Some(participant) = self.participants.get_mut(voter) {
                participant.ledger_mut().record_outcome(
                    target,
                    own_camp == winning_camp,
                    against_opponent,
                    voter_role == Role::Werewolf,
                );
            }
        }

        self.sessions_played += 1;

        let outcomes = roles
            .iter()
            .filter_map(|(id, role)| {
                let participant = self.participants.get(id)?;
                let record = participant.record();
                Some(ParticipantOutcome {
                    id: id.clone(),
                    role,
                    won: role.camp() == winning_camp,
                    games_played: record.games_played,
                    wins: record.wins,
                    win_rate: record.win_rate,
                    effective_targets: participant
                        .ledger()
                        .effective_targets()
                        .iter()
                        .cloned()
                        .collect(),
                })
            })
            .collect();

        info!(
            session = %session.id(),
            winner = %winner,
            rounds = session.round(),
            sequence = self.sessions_played,
            "Session finished"
        );

        SessionReport {
            session_id: session.id().clone(),
            sequence: self.sessions_played,
            started_at: session.started_at(),
            finished_at: Utc::now(),
            rounds: session.round(),
            winner,
            roles: roles.as_map().clone(),
            eliminated: session.eliminated().to_vec(),
            outcomes,
            events: session.into_events(),
        }
    }

    // --- Querying participants ---

    fn policy_for(&self, id: &PlayerId) -> &dyn DecisionPolicy {
        self.overrides
            .get(id)
            .unwrap_or(&self.default_policy)
            .as_ref()
    }

    fn request(
        &mut self,
        session: &Session,
        actor: &PlayerId,
        kind: ActionKind,
    ) -> DecisionRequest {
        DecisionRequest {
            actor: actor.clone(),
            seat: session.seat_view(actor),
            roles: session.roles().clone(),
            alive: session.alive(),
            kind,
            seed: self.rng.gen(),
        }
    }

    async fn ask(&self, request: &DecisionRequest) -> WerewolfResult<Action> {
        let participant = self
            .participants
            .get(&request.actor)
            .ok_or_else(|| WerewolfError::UnknownPlayer(request.actor.clone()))?;
        let policy = self.policy_for(&request.actor);
        debug!(
            actor = %request.actor,
            policy = policy.name(),
            kind = ?request.kind,
            "Querying participant"
        );
        policy.decide(participant.ledger(), request).await
    }

    /// Ask `actors` concurrently; answers come back in `actors` order, each
    /// one validated or replaced by a random fallback
    async fn query(
        &mut self,
        session: &mut Session,
        actors: &[PlayerId],
        kind: ActionKind,
        visibility: Visibility,
    ) -> Vec<(PlayerId, Action)> {
        let view: &Session = session;
        let requests: Vec<DecisionRequest> = actors
            .iter()
            .map(|actor| self.request(view, actor, kind))
            .collect();

        let answers = join_all(requests.iter().map(|request| self.ask(request))).await;

        let mut accepted = Vec::with_capacity(requests.len());
        for (request, answer) in requests.into_iter().zip(answers) {
            let action = self.accept(session, &request, answer, &visibility);
            accepted.push((request.actor, action));
        }
        accepted
    }

    fn accept(
        &mut self,
        session: &mut Session,
        request: &DecisionRequest,
        answer: WerewolfResult<Action>,
        visibility: &Visibility,
    ) -> Action {
        let checked = answer
            .map_err(|err| match err {
                malformed @ WerewolfError::MalformedAction { .. } => malformed,
                other => WerewolfError::MalformedAction {
                    actor: request.actor.clone(),
                    reason: other.to_string(),
                },
            })
            .and_then(|action| validate(request, action));

        match checked {
            Ok(action) => action,
            Err(err) => {
                let substitute = self.fallback_target(request);
                warn!(
                    actor = %request.actor,
                    error = %err,
                    substitute = %substitute,
                    "Malformed action replaced by fallback"
                );
                session.log(
                    visibility.clone(),
                    EventKind::MalformedFallback {
                        actor: request.actor.clone(),
                        reason: err.to_string(),
                        substitute: substitute.clone(),
                    },
                );
                match request.kind {
                    ActionKind::Discussion => Action::Proposal {
                        target_role: request.roles.role_of(&substitute),
                        target_win_rate: None,
                        target: substitute,
                    },
                    ActionKind::Vote => Action::fallback(request.role(), substitute),
                }
            }
        }
    }

    /// Uniformly random alive identity other than the actor
    fn fallback_target(&mut self, request: &DecisionRequest) -> PlayerId {
        let others: Vec<&PlayerId> = request
            .alive
            .iter()
            .filter(|id| **id != request.actor)
            .collect();
        others
            .choose(&mut self.rng)
            .map(|id| (*id).clone())
            .unwrap_or_else(|| request.actor.clone())
    }

    /// Random alive werewolf, else any alive identity other than `actor`
    fn punish_target(&mut self, session: &Session, actor: &PlayerId) -> Option<PlayerId> {
        let wolves: Vec<PlayerId> = session
            .alive_with_role(Role::Werewolf)
            .into_iter()
            .filter(|id| id != actor)
            .collect();
        if let Some(wolf) = wolves.choose(&mut self.rng) {
            return Some(wolf.clone());
        }
        let others: Vec<PlayerId> = session
            .alive()
            .into_iter()
            .filter(|id| id != actor)
            .collect();
        others.choose(&mut self.rng).cloned()
    }
}

/// Check an answer's shape and target against the request it answers
fn validate(request: &DecisionRequest, action: Action) -> WerewolfResult<Action> {
    let malformed = |reason: String| WerewolfError::MalformedAction {
        actor: request.actor.clone(),
        reason,
    };

    let expected_shape = match request.kind {
        ActionKind::Discussion => matches!(action, Action::Proposal { .. }),
        ActionKind::Vote => action.matches_role(request.role()),
    };
    if !expected_shape {
        return Err(malformed(format!(
            "{:?} answer does not fit a {} {:?} query",
            action,
            request.role(),
            request.kind
        )));
    }
    let target = action.vote();
    match request.kind {
        // Proposals are talk; any seated identity may be named
        ActionKind::Discussion if request.roles.role_of(target).is_none() => {
            return Err(malformed(format!("target {} is not seated", target)));
        }
        ActionKind::Vote if !request.alive.contains(target) => {
            return Err(malformed(format!("target {} is not alive", target)));
        }
        _ => {}
    }
    Ok(action)
}

/// A moderator shared between tasks; sessions run one at a time
#[derive(Clone)]
pub struct SharedModerator {
    inner: Arc<Mutex<Moderator>>,
}

impl SharedModerator {
    pub fn new(moderator: Moderator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(moderator)),
        }
    }

    pub async fn run_session(&self) -> WerewolfResult<SessionReport> {
        self.inner.lock().await.run_session().await
    }

    pub async fn run_sessions(&self, count: usize) -> WerewolfResult<Vec<SessionReport>> {
        self.inner.lock().await.run_sessions(count).await
    }

    pub async fn ranking(&self) -> Vec<RankingEntry> {
        self.inner.lock().await.ranking()
    }

    pub async fn reset_standings(&self) {
        self.inner.lock().await.reset_standings()
    }

    pub async fn sessions_played(&self) -> u64 {
        self.inner.lock().await.sessions_played()
    }

    pub async fn snapshot(&self) -> ModeratorState {
        self.inner.lock().await.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PolicyConfig;
    use werewolf_types::Camp;

    fn seeded(seed: u64) -> Moderator {
        Moderator::new(GameConfig::default().with_seed(seed)).unwrap()
    }

    #[test]
    fn test_rejects_out_of_range_weight() {
        let config = GameConfig {
            policy: PolicyConfig {
                poison_weight: 1.5,
                ..PolicyConfig::default()
            },
            ..GameConfig::default()
        };
        assert!(matches!(
            Moderator::new(config),
            Err(WerewolfError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_rejects_mismatched_table() {
        let result = Moderator::with_table(
            GameConfig::default(),
            roster()[..8].to_vec(),
            standard_roles(),
        );
        assert!(matches!(
            result,
            Err(WerewolfError::InvalidRoleAssignment {
                identities: 8,
                roles: 9
            })
        ));
    }

    #[tokio::test]
    async fn test_custom_identities_are_valid_targets() {
        let names = ["Ada", "Bo", "Cy", "Di", "Ed", "Fay", "Gus", "Hal", "Ivy"];
        let identities: Vec<PlayerId> = names.iter().map(|name| PlayerId::new(*name)).collect();
        let mut moderator = Moderator::with_table(
            GameConfig::default().with_seed(31),
            identities.clone(),
            standard_roles(),
        )
        .unwrap();

        let report = moderator.run_session().await.unwrap();
        assert!(!report
            .events
            .iter()
            .any(|event| matches!(event.kind, EventKind::MalformedFallback { .. })));
        for event in &report.events {
            let action = match &event.kind {
                EventKind::Discussion { action, .. } | EventKind::DayVote { action, .. } => action,
                _ => continue,
            };
            assert!(identities.contains(action.vote()));
        }
    }

    #[tokio::test]
    async fn test_seeded_sessions_are_reproducible() {
        let mut a = seeded(42);
        let mut b = seeded(42);
        let ra = a.run_session().await.unwrap();
        let rb = b.run_session().await.unwrap();
        assert_eq!(ra.winner, rb.winner);
        assert_eq!(ra.roles, rb.roles);
        assert_eq!(ra.eliminated, rb.eliminated);
        assert_eq!(ra.events, rb.events);
    }

    #[tokio::test]
    async fn test_session_updates_every_record() {
        let mut moderator = seeded(3);
        let report = moderator.run_session().await.unwrap();

        assert_eq!(report.sequence, 1);
        assert_eq!(report.outcomes.len(), 9);
        for outcome in &report.outcomes {
            let won = outcome.role.camp() == report.winner.camp();
            assert_eq!(outcome.won, won);
            assert_eq!(outcome.games_played, 1);
            assert_eq!(outcome.wins, u32::from(won));

            let stats = moderator.standings().get(&outcome.id).unwrap();
            assert_eq!(stats.total, 1);
            assert_eq!(stats.wins, u32::from(won));
        }
    }

    #[tokio::test]
    async fn test_winner_matches_final_counts() {
        for seed in 0..10 {
            let mut moderator = seeded(seed);
            let report = moderator.run_session().await.unwrap();
            let alive: Vec<&PlayerId> = report
                .roles
                .keys()
                .filter(|id| !report.eliminated.contains(id))
                .collect();
            let wolves = alive
                .iter()
                .filter(|id| report.roles[**id].camp() == Camp::Wolf)
                .count();
            match report.winner {
                Winner::Good => assert_eq!(wolves, 0),
                Winner::Wolves => assert!(wolves >= alive.len() - wolves),
            }
        }
    }

    #[tokio::test]
    async fn test_reset_standings_keeps_lifetime_records() {
        let mut moderator = seeded(9);
        moderator.run_sessions(3).await.unwrap();
        assert_eq!(moderator.sessions_played(), 3);

        moderator.reset_standings();
        assert_eq!(moderator.sessions_played(), 0);
        assert!(moderator.ranking().iter().all(|entry| entry.total == 0));
        let player = moderator.participant(&PlayerId::seat(1)).unwrap();
        assert_eq!(player.record().games_played, 3);
    }

    #[tokio::test]
    async fn test_snapshot_restores() {
        let mut moderator = seeded(5);
        moderator.run_sessions(2).await.unwrap();
        let snapshot = moderator.snapshot();

        let restored = Moderator::restore(GameConfig::default(), snapshot.clone()).unwrap();
        assert_eq!(restored.sessions_played(), 2);
        assert_eq!(restored.snapshot(), snapshot);
        assert_eq!(restored.ranking(), moderator.ranking());
    }

    #[test]
    fn test_load_rejects_unknown_identity() {
        let mut moderator = seeded(1);
        let mut snapshot = moderator.snapshot();
        snapshot.participants[0].identity = PlayerId::new("Stranger");
        assert!(matches!(
            moderator.load(snapshot),
            Err(WerewolfError::UnknownPlayer(_))
        ));
    }

    #[tokio::test]
    async fn test_shared_moderator_serializes_sessions() {
        let shared = SharedModerator::new(seeded(11));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let shared = shared.clone();
                tokio::spawn(async move { shared.run_session().await })
            })
            .collect();

        let mut sequences = Vec::new();
        for handle in handles {
            sequences.push(handle.await.unwrap().unwrap().sequence);
        }
        sequences.sort_unstable();
        assert_eq!(sequences, vec![1, 2, 3, 4]);
        assert_eq!(shared.sessions_played().await, 4);
        assert!(shared.ranking().await.iter().all(|entry| entry.total == 4));
    }
}
