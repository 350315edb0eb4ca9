//! Werewolf Table Domain Types
//!
//! This crate defines the domain types shared by the werewolf runtime and
//! its callers: the fixed nine-seat roster, the five roles and the two camps
//! they belong to, and the structured actions participants hand back to the
//! moderator.
//!
//! # Key Concepts
//!
//! - **Roster**: exactly nine stable identities (`Player1`..`Player9`).
//! - **Role / Camp**: werewolves form the wolf camp, everyone else is good.
//!   Seer, witch and hunter are *key* roles.
//! - **Action**: a tagged variant per role. Every variant names a `vote`
//!   target so the aggregator can treat all of them uniformly.
//!
//! # Architecture
//!
//! This is a pure types crate with no runtime dependencies. All types
//! implement `Clone`, `Debug`, `Serialize`, `Deserialize`.

#![deny(unsafe_code)]

mod action;
mod errors;
mod player;
mod role;
mod session;

pub use action::*;
pub use errors::*;
pub use player::*;
pub use role::*;
pub use session::*;
