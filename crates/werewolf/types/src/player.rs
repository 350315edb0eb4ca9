//! Player identities and the fixed roster

use serde::{Deserialize, Serialize};

/// Number of seats at the table
pub const TABLE_SIZE: usize = 9;

/// Stable identity of a participant across sessions
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identity of the seat at 1-based position `seat`
    pub fn seat(seat: usize) -> Self {
        Self(format!("Player{}", seat))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The nine fixed identifiers, in seat order
pub fn roster() -> Vec<PlayerId> {
    (1..=TABLE_SIZE).map(PlayerId::seat).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_order() {
        let ids = roster();
        assert_eq!(ids.len(), TABLE_SIZE);
        assert_eq!(ids[0], PlayerId::new("Player1"));
        assert_eq!(ids[8], PlayerId::new("Player9"));
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&PlayerId::new("Player7")).unwrap();
        assert_eq!(json, "\"Player7\"");
    }
}
