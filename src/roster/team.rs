//! Team-side types produced by extraction and reserve matching.

use super::types::{Category, Competitor, Preferences, Weapon, TEAM_SIZE};
use crate::reserve::MatchTier;

/// A competitor occupying a main slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Member {
    pub name: String,
    pub category: Category,
    pub weapon: Weapon,
    /// The competitor's preference score for `weapon`.
    pub score: i64,
}

impl Member {
    pub fn from_competitor(competitor: &Competitor, weapon: Weapon) -> Self {
        Self {
            name: competitor.name.clone(),
            category: competitor.category,
            weapon,
            score: competitor.score(weapon),
        }
    }
}

/// A competitor placed in a team's reserve slot.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reserve {
    pub name: String,
    pub category: Category,
    /// Weapon the reserve covers on this team.
    pub weapon: Weapon,
    pub preferences: Preferences,
    /// Which matching tier placed this reserve.
    pub tier: MatchTier,
}

impl Reserve {
    /// The reserve's preference score for its resolved weapon.
    pub fn score(&self) -> i64 {
        self.preferences.score(self.weapon)
    }
}

/// Team composition by number of category-B mains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TeamClass {
    AllA,
    OneB,
    TwoB,
    AllB,
}

impl TeamClass {
    /// All classes, indexed by category-B count.
    pub const ALL: [TeamClass; TEAM_SIZE + 1] =
        [TeamClass::AllA, TeamClass::OneB, TeamClass::TwoB, TeamClass::AllB];

    pub fn from_b_count(count: usize) -> Self {
        match count {
            0 => TeamClass::AllA,
            1 => TeamClass::OneB,
            2 => TeamClass::TwoB,
            _ => TeamClass::AllB,
        }
    }

    /// Number of category-B mains in this class.
    pub fn b_count(self) -> usize {
        match self {
            TeamClass::AllA => 0,
            TeamClass::OneB => 1,
            TeamClass::TwoB => 2,
            TeamClass::AllB => 3,
        }
    }
}

/// A team of three mains, one per weapon, plus reserves.
///
/// Mains are stored in weapon order, so `mains()[w.index()].weapon == w`.
/// Serialized, the mains form a map from weapon to
/// `{name, category, score}`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Team {
    /// 1-based team number, continuous across passes.
    pub number: usize,
    #[cfg_attr(feature = "serde", serde(with = "mains_by_weapon"))]
    mains: [Member; TEAM_SIZE],
    reserves: Vec<Reserve>,
}

impl Team {
    /// Builds a team from one member per weapon, in any order.
    ///
    /// Returns `None` unless every weapon is covered exactly once.
    pub fn new(number: usize, mains: [Member; TEAM_SIZE]) -> Option<Self> {
        let mut seen = [false; TEAM_SIZE];
        for m in &mains {
            if std::mem::replace(&mut seen[m.weapon.index()], true) {
                return None;
            }
        }
        let mut mains = mains;
        mains.sort_by_key(|m| m.weapon);
        Some(Self {
            number,
            mains,
            reserves: Vec::new(),
        })
    }

    /// The three mains, in weapon order.
    pub fn mains(&self) -> &[Member; TEAM_SIZE] {
        &self.mains
    }

    /// The main holding `weapon`.
    pub fn main(&self, weapon: Weapon) -> &Member {
        &self.mains[weapon.index()]
    }

    pub fn reserves(&self) -> &[Reserve] {
        &self.reserves
    }

    pub fn has_reserve(&self) -> bool {
        !self.reserves.is_empty()
    }

    pub(crate) fn push_reserve(&mut self, reserve: Reserve) {
        self.reserves.push(reserve);
    }

    /// Number of category-B mains.
    pub fn category_b_count(&self) -> usize {
        self.mains
            .iter()
            .filter(|m| m.category == Category::B)
            .count()
    }

    pub fn class(&self) -> TeamClass {
        TeamClass::from_b_count(self.category_b_count())
    }

    /// Weapons held by category-B mains, in weapon order.
    pub fn category_b_weapons(&self) -> Vec<Weapon> {
        self.mains
            .iter()
            .filter(|m| m.category == Category::B)
            .map(|m| m.weapon)
            .collect()
    }

    /// Sum of the mains' resolved preference scores.
    pub fn total_score(&self) -> i64 {
        self.mains.iter().map(|m| m.score).sum()
    }

    /// Names of mains and reserves.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.mains
            .iter()
            .map(|m| m.name.as_str())
            .chain(self.reserves.iter().map(|r| r.name.as_str()))
    }
}

#[cfg(feature = "serde")]
mod mains_by_weapon {
    use super::{Category, Member, Weapon, TEAM_SIZE};
    use serde::de::Error as _;
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::collections::HashMap;

    #[derive(Serialize)]
    struct SlotRef<'a> {
        name: &'a str,
        category: Category,
        score: i64,
    }

    #[derive(Deserialize)]
    struct Slot {
        name: String,
        category: Category,
        score: i64,
    }

    pub fn serialize<S: Serializer>(
        mains: &[Member; TEAM_SIZE],
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(TEAM_SIZE))?;
        for m in mains {
            let slot = SlotRef {
                name: &m.name,
                category: m.category,
                score: m.score,
            };
            map.serialize_entry(&m.weapon, &slot)?;
        }
        map.end()
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<[Member; TEAM_SIZE], D::Error> {
        let mut slots = HashMap::<Weapon, Slot>::deserialize(deserializer)?;
        let mut mains = Vec::with_capacity(TEAM_SIZE);
        for weapon in Weapon::ALL {
            let slot = slots
                .remove(&weapon)
                .ok_or_else(|| D::Error::custom(format!("team has no {weapon} main")))?;
            mains.push(Member {
                name: slot.name,
                category: slot.category,
                weapon,
                score: slot.score,
            });
        }
        mains
            .try_into()
            .map_err(|_| D::Error::custom("team is incomplete"))
    }
}
