//! Werewolf Table Runtime
//!
//! This crate runs nine-player werewolf sessions and carries what the
//! players learn from one session into the next.
//!
//! # Architecture
//!
//! The [`Moderator`] is the main entry point. It owns every participant and
//! drives each session through its phases:
//!
//! - [`Session`] — per-game state: seats, eliminations, the event log
//! - [`DecisionPolicy`] — where actions come from; [`HeuristicPolicy`] is the
//!   built-in role logic built on [`smart_target`]
//! - [`tally`] — plurality vote with a uniformly random tie-break
//! - [`LearningLedger`] — per-participant memory of past vote outcomes
//! - [`Standings`] — global win/loss totals behind the ranking
//!
//! # Key Invariants
//!
//! 1. Only the moderator mutates session state
//! 2. Each session assigns the nine roles as a bijection
//! 3. Every finished session increments every participant's games played once
//! 4. Sessions on one moderator never overlap; [`SharedModerator`] serializes
//!    callers on different tasks
//!
//! # Example
//!
//! ```rust,no_run
//! use werewolf_runtime::{GameConfig, Moderator};
//!
//! # async fn example() -> werewolf_types::WerewolfResult<()> {
//! let mut moderator = Moderator::new(GameConfig::default().with_seed(7))?;
//! let report = moderator.run_session().await?;
//! println!("{} won after {} rounds", report.winner, report.rounds);
//!
//! for entry in moderator.ranking() {
//!     println!("{}: {:.2}", entry.identity, entry.win_rate);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod ledger;
pub mod moderator;
pub mod participant;
pub mod persistence;
pub mod policy;
pub mod session;
pub mod standings;
pub mod tally;

// Re-export main types for convenience
pub use config::{GameConfig, PolicyConfig, DEFAULT_DISCUSSION_ROUNDS};
pub use ledger::{LearningLedger, TargetStats, VoteRecord, DEFAULT_EFFECTIVE_THRESHOLD};
pub use moderator::{Moderator, SharedModerator};
pub use participant::{win_rate, LifetimeRecord, Participant};
pub use persistence::{ModeratorState, ParticipantState, ResourceFlags};
pub use policy::{
    smart_target, DecisionPolicy, DecisionRequest, HeuristicPolicy, SeatView, TargetReason,
};
pub use session::{
    assign_roles, EventKind, ParticipantOutcome, Phase, Seat, Session, SessionEvent, SessionReport,
    Visibility,
};
pub use standings::{GlobalStats, RankingEntry, Standings};
pub use tally::{tally, TallyOutcome};
