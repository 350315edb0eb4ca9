//! Structured participant actions
//!
//! Each role answers the moderator with its own variant. All variants name a
//! target through [`Action::vote`], which is the only field the vote
//! aggregator reads.

use crate::{Camp, PlayerId, Role};
use serde::{Deserialize, Serialize};

/// What the moderator is asking for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Werewolf-only kill proposal during the night discussion
    Discussion,
    /// Role-specific action carrying a vote target
    Vote,
}

/// A participant's answer to one moderator query
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Action {
    /// Night discussion proposal from a werewolf
    Proposal {
        target: PlayerId,
        /// Role of the target as the wolves see it
        target_role: Option<Role>,
        /// Proposer's historical win fraction against the target, if any
        target_win_rate: Option<f64>,
    },
    Werewolf {
        vote: PlayerId,
        reach_agreement: bool,
        rationale: String,
    },
    Seer {
        vote: PlayerId,
        check: PlayerId,
        identity: Camp,
    },
    Witch {
        vote: PlayerId,
        resurrect: bool,
        poison: bool,
    },
    Hunter {
        vote: PlayerId,
        shoot: bool,
    },
    Villager {
        vote: PlayerId,
    },
}

impl Action {
    /// The target this action votes for
    pub fn vote(&self) -> &PlayerId {
        match self {
            Action::Proposal { target, .. } => target,
            Action::Werewolf { vote, .. }
            | Action::Seer { vote, .. }
            | Action::Witch { vote, .. }
            | Action::Hunter { vote, .. }
            | Action::Villager { vote } => vote,
        }
    }

    /// Plain vote of the shape `role` answers with, used as the random fallback
    pub fn fallback(role: Role, vote: PlayerId) -> Self {
        match role {
            Role::Werewolf => Action::Werewolf {
                vote,
                reach_agreement: true,
                rationale: "fallback".to_string(),
            },
            Role::Seer => Action::Seer {
                check: vote.clone(),
                vote,
                identity: Camp::Good,
            },
            Role::Witch => Action::Witch {
                vote,
                resurrect: false,
                poison: false,
            },
            Role::Hunter => Action::Hunter { vote, shoot: false },
            Role::Villager => Action::Villager { vote },
        }
    }

    /// Whether this action is the variant `role` is expected to produce
    pub fn matches_role(&self, role: Role) -> bool {
        matches!(
            (self, role),
            (Action::Werewolf { .. }, Role::Werewolf)
                | (Action::Seer { .. }, Role::Seer)
                | (Action::Witch { .. }, Role::Witch)
                | (Action::Hunter { .. }, Role::Hunter)
                | (Action::Villager { .. }, Role::Villager)
        )
    }
}
