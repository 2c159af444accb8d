//! Roster data model.
//!
//! Competitors arrive with a [`Category`] and [`Preferences`] over the
//! three [`Weapon`]s; optimization passes turn them into [`Team`]s of three
//! [`Member`]s, and the reserve matcher adds at most one [`Reserve`] per team.

mod team;
mod types;

pub use team::{Member, Reserve, Team, TeamClass};
pub use types::{Category, Competitor, Preferences, Weapon, TEAM_SIZE};
