//! Session identity and outcome

use crate::Camp;
use serde::{Deserialize, Serialize};

/// Unique identifier for one session
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which camp won a finished session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    /// No werewolf left alive
    Good,
    /// Alive werewolves at least match alive good-camp participants
    Wolves,
}

impl Winner {
    pub fn camp(self) -> Camp {
        match self {
            Winner::Good => Camp::Good,
            Winner::Wolves => Camp::Wolf,
        }
    }

    /// Apply the two termination predicates, good-wins first
    pub fn evaluate(alive_wolves: usize, alive_good: usize) -> Option<Self> {
        if alive_wolves == 0 {
            Some(Winner::Good)
        } else if alive_wolves >= alive_good {
            Some(Winner::Wolves)
        } else {
            None
        }
    }
}

impl std::fmt::Display for Winner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Winner::Good => write!(f, "good players win"),
            Winner::Wolves => write!(f, "werewolves win"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_termination_predicates() {
        assert_eq!(Winner::evaluate(3, 6), None);
        assert_eq!(Winner::evaluate(2, 3), None);
        assert_eq!(Winner::evaluate(2, 2), Some(Winner::Wolves));
        assert_eq!(Winner::evaluate(3, 1), Some(Winner::Wolves));
        assert_eq!(Winner::evaluate(0, 4), Some(Winner::Good));
    }

    #[test]
    fn test_good_checked_first() {
        // Nobody alive at all still counts as a good-camp win.
        assert_eq!(Winner::evaluate(0, 0), Some(Winner::Good));
    }

    #[test]
    fn test_session_id() {
        let id = SessionId::generate();
        assert!(!id.0.is_empty());
        assert_eq!(format!("{}", SessionId::new("s-1")), "s-1");
    }
}
