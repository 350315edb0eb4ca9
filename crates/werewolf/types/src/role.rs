//! Roles, camps and role assignment

use crate::{PlayerId, WerewolfError, WerewolfResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The two opposing sides of the table
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Camp {
    Wolf,
    Good,
}

impl Camp {
    pub fn opponent(self) -> Self {
        match self {
            Camp::Wolf => Camp::Good,
            Camp::Good => Camp::Wolf,
        }
    }
}

impl std::fmt::Display for Camp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Camp::Wolf => write!(f, "wolf"),
            Camp::Good => write!(f, "good"),
        }
    }
}

/// A participant's secret role for one session
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Werewolf,
    Seer,
    Witch,
    Hunter,
    Villager,
}

impl Default for Role {
    fn default() -> Self {
        Role::Villager
    }
}

impl Role {
    pub fn camp(self) -> Camp {
        match self {
            Role::Werewolf => Camp::Wolf,
            _ => Camp::Good,
        }
    }

    /// Seer, witch and hunter: the preferred targets of the wolf camp
    pub fn is_key(self) -> bool {
        matches!(self, Role::Seer | Role::Witch | Role::Hunter)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Role::Werewolf => "werewolf",
            Role::Seer => "seer",
            Role::Witch => "witch",
            Role::Hunter => "hunter",
            Role::Villager => "villager",
        };
        write!(f, "{}", name)
    }
}

/// Fixed role multiset for a nine-seat table
pub const ROLE_COUNTS: [(Role, usize); 5] = [
    (Role::Werewolf, 3),
    (Role::Seer, 1),
    (Role::Witch, 1),
    (Role::Hunter, 1),
    (Role::Villager, 3),
];

/// The fixed role multiset, expanded in declaration order
pub fn standard_roles() -> Vec<Role> {
    ROLE_COUNTS
        .iter()
        .flat_map(|(role, count)| std::iter::repeat(*role).take(*count))
        .collect()
}

/// A bijection from identities onto a role multiset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleAssignment {
    roles: BTreeMap<PlayerId, Role>,
}

impl RoleAssignment {
    /// Bind `roles[i]` to `identities[i]`.
    ///
    /// Fails when the two sides differ in size or an identity repeats.
    pub fn new(identities: &[PlayerId], roles: &[Role]) -> WerewolfResult<Self> {
        if identities.len() != roles.len() {
            return Err(WerewolfError::InvalidRoleAssignment {
                identities: identities.len(),
                roles: roles.len(),
            });
        }

        let map: BTreeMap<PlayerId, Role> = identities
            .iter()
            .cloned()
            .zip(roles.iter().copied())
            .collect();
        if map.len() != identities.len() {
            return Err(WerewolfError::InvalidRoleAssignment {
                identities: map.len(),
                roles: roles.len(),
            });
        }

        Ok(Self { roles: map })
    }

    pub fn role_of(&self, id: &PlayerId) -> Option<Role> {
        self.roles.get(id).copied()
    }

    pub fn camp_of(&self, id: &PlayerId) -> Option<Camp> {
        self.role_of(id).map(Role::camp)
    }

    /// Identities holding `role`, in identity order
    pub fn holders(&self, role: Role) -> Vec<PlayerId> {
        self.roles
            .iter()
            .filter(|(_, r)| **r == role)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn count(&self, role: Role) -> usize {
        self.roles.values().filter(|r| **r == role).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, Role)> {
        self.roles.iter().map(|(id, role)| (id, *role))
    }

    pub fn as_map(&self) -> &BTreeMap<PlayerId, Role> {
        &self.roles
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}
