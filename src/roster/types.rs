//! Competitor-side types: category, weapon, preferences.

use std::fmt;
use std::str::FromStr;

/// Number of main slots per team (one per weapon).
pub const TEAM_SIZE: usize = 3;

/// Two-valued competitor category driving team composition quotas.
///
/// Parsed case-insensitively. `M` and `F` are accepted as aliases of
/// `A` and `B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Category {
    A,
    B,
}

impl Category {
    pub fn as_str(self) -> &'static str {
        match self {
            Category::A => "A",
            Category::B => "B",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" | "M" => Ok(Category::A),
            "B" | "F" => Ok(Category::B),
            _ => Err(format!("unknown category '{s}'")),
        }
    }
}

impl TryFrom<String> for Category {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.as_str().to_string()
    }
}

/// One of the three fixed disciplines. Declaration order is the
/// deterministic tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub enum Weapon {
    Foil,
    Epee,
    Sabre,
}

impl Weapon {
    /// All weapons in tie-break order.
    pub const ALL: [Weapon; TEAM_SIZE] = [Weapon::Foil, Weapon::Epee, Weapon::Sabre];

    /// Dense index in `0..3`.
    pub fn index(self) -> usize {
        match self {
            Weapon::Foil => 0,
            Weapon::Epee => 1,
            Weapon::Sabre => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Weapon::Foil => "foil",
            Weapon::Epee => "epee",
            Weapon::Sabre => "sabre",
        }
    }
}

impl fmt::Display for Weapon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weapon {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "foil" => Ok(Weapon::Foil),
            "epee" => Ok(Weapon::Epee),
            "sabre" | "saber" => Ok(Weapon::Sabre),
            _ => Err(format!("unknown weapon '{s}'")),
        }
    }
}

impl TryFrom<String> for Weapon {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Weapon> for String {
    fn from(value: Weapon) -> Self {
        value.as_str().to_string()
    }
}

/// Preference score per weapon. Higher is more preferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Preferences {
    pub foil: i64,
    pub epee: i64,
    pub sabre: i64,
}

impl Preferences {
    pub fn new(foil: i64, epee: i64, sabre: i64) -> Self {
        Self { foil, epee, sabre }
    }

    /// Score for `weapon`.
    pub fn score(&self, weapon: Weapon) -> i64 {
        match weapon {
            Weapon::Foil => self.foil,
            Weapon::Epee => self.epee,
            Weapon::Sabre => self.sabre,
        }
    }

    /// Weapons by score descending; equal scores keep weapon order.
    pub fn ranked(&self) -> [Weapon; TEAM_SIZE] {
        let mut ranked = Weapon::ALL;
        ranked.sort_by_key(|&w| std::cmp::Reverse(self.score(w)));
        ranked
    }

    /// Highest-scored weapon.
    pub fn favorite(&self) -> Weapon {
        self.ranked()[0]
    }
}

/// A competitor as received from the caller. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Competitor {
    /// Unique name within a request.
    pub name: String,
    pub category: Category,
    #[cfg_attr(feature = "serde", serde(rename = "preference"))]
    pub preferences: Preferences,
}

impl Competitor {
    pub fn new(name: impl Into<String>, category: Category, preferences: Preferences) -> Self {
        Self {
            name: name.into(),
            category,
            preferences,
        }
    }

    pub fn is_category_b(&self) -> bool {
        self.category == Category::B
    }

    /// Preference score for `weapon`.
    pub fn score(&self, weapon: Weapon) -> i64 {
        self.preferences.score(weapon)
    }
}
