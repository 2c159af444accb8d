//! Team assignment pipeline.
//!
//! Forms three-weapon teams from a roster by integer programming, then
//! places whoever is left over as reserves.
//!
//! # Pipeline
//!
//! 1. [`partition`](crate::partition::partition) splits the roster into a
//!    batch that can meet the category-B quota and a list of leftovers.
//! 2. The main pass builds a [`TeamModel`] for the batch and maximizes
//!    total preference.
//! 3. The reserve-team pass (on by default) regroups the first `3k`
//!    leftovers into additional teams with the category-B quota waived.
//! 4. [`ReserveMatcher`](crate::reserve::ReserveMatcher) places the rest.
//!
//! # Key Types
//!
//! - [`AssignConfig`]: Pipeline parameters (seed, time limit, passes, rules)
//! - [`TeamAssigner`]: Runs the pipeline against an [`IlpSolver`](crate::ilp::IlpSolver)
//! - [`Assignment`]: Teams plus one [`PassReport`] per pass
//!
//! # Submodules
//!
//! - [`TeamModel`] / [`ModelOptions`]: the binary program of one pass
//! - [`extract_teams`]: reads teams back out of a solution

mod config;
mod extract;
mod model;
mod runner;

pub use config::{AssignConfig, CompositionWeights};
pub use extract::extract_teams;
pub use model::{ModelOptions, TeamModel};
pub use runner::{Assignment, PassReport, TeamAssigner};
