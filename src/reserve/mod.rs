//! Reserve matching.
//!
//! Places competitors left over after every team-forming pass into team
//! reserve slots. Placement follows weapon-matching rules that depend on
//! the team's category-B headcount; see [`ReserveMatcher`] for the tiers.
//!
//! # Design
//!
//! Candidate search ([`candidates`]) is pure and deterministic; the only
//! randomness is the final draw among equally good candidates
//! ([`choose`]), driven by a caller-supplied RNG.

mod config;
mod matcher;
mod types;

pub use config::ReserveRules;
pub use matcher::{candidates, choose, ReserveMatcher};
pub use types::{Candidate, MatchTier};
