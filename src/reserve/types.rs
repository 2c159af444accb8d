//! Reserve matching types.

use crate::roster::Weapon;

/// Matching tier that produced a candidate. Lower tiers are preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchTier {
    /// Multi-B team; the reserve's weapon coincides with a category-B main's.
    Priority,
    /// Single-B team; the reserve's weapon differs from the category-B main's.
    Secondary,
    /// Any reserve-free team with a category-B main, favorite weapon.
    Fallback,
    /// Any team with a category-B main, even if it already has a reserve.
    Overflow,
    /// Any team at all.
    Any,
}

/// A (team, weapon) placement for one reserve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    /// Index into the team slice.
    pub team: usize,
    /// Weapon the reserve would cover.
    pub weapon: Weapon,
    pub tier: MatchTier,
    /// The reserve's preference score for `weapon`.
    pub score: i64,
}
