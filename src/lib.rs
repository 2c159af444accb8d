//! Constraint-based team assignment for three-weapon fencing events.
//!
//! Competitors carry a category (A or B) and a preference score per weapon
//! (foil, epee, sabre). The crate forms teams of three, one per weapon,
//! with at least one category-B and one category-A main each, maximizing
//! total preference, and places leftovers as team reserves.
//!
//! - **Roster**: [`roster`] holds the domain types: [`Competitor`],
//!   [`Team`], [`Weapon`], [`Category`].
//! - **Partitioning**: [`partition`] decides who enters optimization.
//! - **ILP**: [`ilp`] is a small binary-program layer with a
//!   [`good_lp`]/microlp backend behind the [`IlpSolver`](ilp::IlpSolver) trait.
//! - **Assignment**: [`assign`] builds and solves one model per pass and
//!   extracts teams.
//! - **Reserves**: [`reserve`] places leftovers by weapon-matching tiers.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use u_roster::{AssignConfig, Category, Competitor, Preferences, TeamAssigner};
//!
//! let roster: Vec<Competitor> = [
//!     ("Ada", Category::A, (5, 3, 1)),
//!     ("Ben", Category::A, (1, 5, 3)),
//!     ("Cal", Category::B, (3, 1, 5)),
//!     ("Dee", Category::B, (5, 1, 1)),
//!     ("Eve", Category::A, (1, 1, 5)),
//!     ("Fay", Category::B, (1, 5, 1)),
//!     ("Gus", Category::A, (5, 3, 1)),
//! ]
//! .into_iter()
//! .map(|(name, cat, (f, e, s))| Competitor::new(name, cat, Preferences::new(f, e, s)))
//! .collect();
//!
//! let config = AssignConfig::default()
//!     .with_seed(7)
//!     .with_time_limit(Duration::from_secs(10));
//! let result = TeamAssigner::new(config).assign(&roster).unwrap();
//!
//! assert_eq!(result.teams.len(), 2);
//! assert_eq!(result.reserve_count(), 1);
//! ```
//!
//! # Logging
//!
//! Uses the [`log`] facade: `debug` for model sizes and partition splits,
//! `info` per pass and per reserve placement, `warn` on time limits and
//! failures. No logger is installed by the crate.

pub mod assign;
pub mod error;
pub mod ilp;
pub mod partition;
pub mod random;
pub mod reserve;
pub mod roster;

pub use assign::{AssignConfig, Assignment, TeamAssigner};
pub use error::{AssignError, PassKind};
pub use roster::{Category, Competitor, Preferences, Team, Weapon};
