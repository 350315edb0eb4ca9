//! Decision Policy — how a participant picks a target
//!
//! The moderator never asks a participant directly. It builds a
//! [`DecisionRequest`] and hands it, together with the participant's
//! read-only [`LearningLedger`], to a [`DecisionPolicy`]. The built-in
//! [`HeuristicPolicy`] implements the role heuristics; other policies (scripted
//! tables in tests, remote agents) plug in through the same trait.
//!
//! # Target selection
//!
//! [`smart_target`] walks these tiers and stops at the first that yields a
//! candidate:
//!
//! 1. alive opponents that are effective targets in the ledger
//! 2. alive opponents that are suspicious in the ledger
//! 3. any alive opponent
//! 4. any alive identity other than the actor
//! 5. the first roster seat

use crate::config::PolicyConfig;
use crate::ledger::LearningLedger;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use werewolf_types::{
    roster, Action, ActionKind, Camp, PlayerId, Role, RoleAssignment, WerewolfResult,
};

/// What the acting participant knows about its own seat
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatView {
    /// `None` before a role notice arrived; treated as villager
    pub role: Option<Role>,
    pub resurrect_used: bool,
    pub poison_used: bool,
    /// Eliminated during the night phase of the current round
    pub night_eliminated: bool,
}

/// One moderator query
#[derive(Clone, Debug)]
pub struct DecisionRequest {
    pub actor: PlayerId,
    pub seat: SeatView,
    pub roles: RoleAssignment,
    /// Identities alive when the query was issued, in seat order
    pub alive: Vec<PlayerId>,
    pub kind: ActionKind,
    /// Per-query seed drawn by the moderator
    pub seed: u64,
}

impl DecisionRequest {
    pub fn role(&self) -> Role {
        self.seat.role.unwrap_or_default()
    }

    pub fn camp(&self) -> Camp {
        self.role().camp()
    }

    /// Alive identities of the actor's opposing camp, never the actor
    pub fn opponents(&self) -> Vec<PlayerId> {
        let own = self.camp();
        self.alive
            .iter()
            .filter(|id| **id != self.actor)
            .filter(|id| self.roles.camp_of(id).is_some_and(|camp| camp != own))
            .cloned()
            .collect()
    }

    /// Alive identities holding seer, witch or hunter
    pub fn key_targets(&self) -> Vec<PlayerId> {
        self.alive
            .iter()
            .filter(|id| self.roles.role_of(id).is_some_and(Role::is_key))
            .cloned()
            .collect()
    }

    /// Alive werewolves other than the actor
    pub fn wolf_allies(&self) -> Vec<PlayerId> {
        self.alive_with(|role| role == Role::Werewolf)
    }

    /// Alive werewolves, the actor included
    pub fn alive_wolves(&self) -> Vec<PlayerId> {
        self.alive
            .iter()
            .filter(|id| self.roles.role_of(id) == Some(Role::Werewolf))
            .cloned()
            .collect()
    }

    fn alive_with(&self, predicate: impl Fn(Role) -> bool) -> Vec<PlayerId> {
        self.alive
            .iter()
            .filter(|id| **id != self.actor)
            .filter(|id| self.roles.role_of(id).is_some_and(&predicate))
            .cloned()
            .collect()
    }
}

/// A source of participant actions
#[async_trait]
pub trait DecisionPolicy: Send + Sync {
    /// Human-readable policy name, used in logs
    fn name(&self) -> &str;

    /// Produce the action for `request`.
    ///
    /// An error, or an action naming a target the moderator cannot accept,
    /// is replaced by a random fallback vote.
    async fn decide(
        &self,
        memory: &LearningLedger,
        request: &DecisionRequest,
    ) -> WerewolfResult<Action>;
}

/// Which tier of the selection produced a target
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetReason {
    KeyRole,
    PlainVillager,
    Effective,
    Suspicious,
    Opponent,
    AnyAlive,
    DefaultSeat,
}

impl std::fmt::Display for TargetReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TargetReason::KeyRole => "holds a key role",
            TargetReason::PlainVillager => "plain villager",
            TargetReason::Effective => "historically effective target",
            TargetReason::Suspicious => "suspicious from past losses",
            TargetReason::Opponent => "opposing camp",
            TargetReason::AnyAlive => "only alive candidate",
            TargetReason::DefaultSeat => "default seat",
        };
        write!(f, "{}", text)
    }
}

/// Tiered target selection over the actor's opponents
pub fn smart_target(
    memory: &LearningLedger,
    request: &DecisionRequest,
    rng: &mut StdRng,
) -> (PlayerId, TargetReason) {
    let opponents = request.opponents();

    let effective: Vec<PlayerId> = opponents
        .iter()
        .filter(|id| memory.is_effective(id))
        .cloned()
        .collect();
    if let Some(target) = effective.choose(rng) {
        return (target.clone(), TargetReason::Effective);
    }

    let suspicious: Vec<PlayerId> = opponents
        .iter()
        .filter(|id| memory.is_suspicious(id))
        .cloned()
        .collect();
    if let Some(target) = suspicious.choose(rng) {
        return (target.clone(), TargetReason::Suspicious);
    }

    if let Some(target) = opponents.choose(rng) {
        return (target.clone(), TargetReason::Opponent);
    }

    let others: Vec<PlayerId> = request
        .alive
        .iter()
        .filter(|id| **id != request.actor)
        .cloned()
        .collect();
    if let Some(target) = others.choose(rng) {
        return (target.clone(), TargetReason::AnyAlive);
    }

    (roster()[0].clone(), TargetReason::DefaultSeat)
}

/// The built-in role heuristics
#[derive(Clone, Debug, Default)]
pub struct HeuristicPolicy {
    config: PolicyConfig,
}

impl HeuristicPolicy {
    pub fn new(config: PolicyConfig) -> Self {
        Self { config }
    }

    fn propose(
        &self,
        memory: &LearningLedger,
        request: &DecisionRequest,
        rng: &mut StdRng,
    ) -> Action {
        let target = match request.key_targets().choose(rng) {
            Some(key) => key.clone(),
            None => smart_target(memory, request, rng).0,
        };
        Action::Proposal {
            target_role: request.roles.role_of(&target),
            target_win_rate: memory.target_win_rate(&target),
            target,
        }
    }

    fn werewolf_vote(
        &self,
        memory: &LearningLedger,
        request: &DecisionRequest,
        rng: &mut StdRng,
    ) -> Action {
        let allies = request.wolf_allies();
        let pool = if allies.is_empty() || rng.gen_bool(self.config.key_target_bias) {
            (request.key_targets(), TargetReason::KeyRole)
        } else {
            (
                request.alive_with(|role| role == Role::Villager),
                TargetReason::PlainVillager,
            )
        };

        let (vote, reason) = match pool.0.choose(rng) {
            Some(target) => (target.clone(), pool.1),
            None => smart_target(memory, request, rng),
        };

        Action::Werewolf {
            rationale: reason.to_string(),
            vote,
            reach_agreement: true,
        }
    }

    fn witch_vote(
        &self,
        memory: &LearningLedger,
        request: &DecisionRequest,
        rng: &mut StdRng,
    ) -> Action {
        let (vote, _) = smart_target(memory, request, rng);

        let resurrect = if request.seat.resurrect_used {
            false
        } else if !request.key_targets().is_empty() {
            rng.gen_bool(self.config.resurrect_weight)
        } else {
            rng.gen_bool(0.5)
        };

        let poison = if request.seat.poison_used {
            false
        } else if !request.alive_wolves().is_empty() {
            rng.gen_bool(self.config.poison_weight)
        } else {
            rng.gen_bool(0.5)
        };

        Action::Witch {
            vote,
            resurrect,
            poison,
        }
    }
}

#[async_trait]
impl DecisionPolicy for HeuristicPolicy {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn decide(
        &self,
        memory: &LearningLedger,
        request: &DecisionRequest,
    ) -> WerewolfResult<Action> {
        let mut rng = StdRng::seed_from_u64(request.seed);
        let role = request.role();

        let action = match (request.kind, role) {
            (ActionKind::Discussion, Role::Werewolf) => self.propose(memory, request, &mut rng),
            (_, Role::Werewolf) => self.werewolf_vote(memory, request, &mut rng),
            (_, Role::Witch) => self.witch_vote(memory, request, &mut rng),
            (_, Role::Seer) => {
                let (vote, _) = smart_target(memory, request, &mut rng);
                let identity = request.roles.camp_of(&vote).unwrap_or(Camp::Good);
                Action::Seer {
                    check: vote.clone(),
                    vote,
                    identity,
                }
            }
            (_, Role::Hunter) => {
                let (vote, _) = smart_target(memory, request, &mut rng);
                let shoot = !request.seat.night_eliminated && rng.gen_bool(0.5);
                Action::Hunter { vote, shoot }
            }
            (_, Role::Villager) => Action::Villager {
                vote: smart_target(memory, request, &mut rng).0,
            },
        };

        Ok(action)
    }
}
