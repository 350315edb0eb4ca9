//! Error types for the werewolf table

use crate::PlayerId;

/// Errors that can occur while running a werewolf table
#[derive(Debug, thiserror::Error)]
pub enum WerewolfError {
    #[error("Malformed action from {actor}: {reason}")]
    MalformedAction { actor: PlayerId, reason: String },

    #[error("Vote tally invoked with no voters")]
    EmptyVoteSet,

    #[error("Invalid role assignment: {identities} identities for {roles} roles")]
    InvalidRoleAssignment { identities: usize, roles: usize },

    #[error("Unknown player: {0}")]
    UnknownPlayer(PlayerId),

    #[error("Player already eliminated: {0}")]
    DuplicateElimination(PlayerId),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("State error: {0}")]
    State(String),
}

/// Result type alias for werewolf operations
pub type WerewolfResult<T> = Result<T, WerewolfError>;
