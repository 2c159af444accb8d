//! Tiered reserve placement.
//!
//! # Algorithm
//!
//! For each reserve, in arrival order:
//!
//! 1. Rank the reserve's weapons by score; the first is the favorite.
//! 2. Skip teams that already hold a reserve and all-A teams.
//! 3. Multi-B teams yield a [`MatchTier::Priority`] candidate when the
//!    favorite, or failing that the best-ranked weapon scoring at least
//!    [`ReserveRules::acceptable_score`], coincides with a category-B
//!    main's weapon.
//! 4. Single-B teams yield a [`MatchTier::Secondary`] candidate with the
//!    favorite if it differs from the category-B main's weapon, otherwise
//!    with the best-ranked weapon that differs (category-A reserves, or
//!    any reserve under [`ReserveRules::switch_any_category`]).
//! 5. Otherwise any reserve-free team with a category-B main, favorite
//!    weapon ([`MatchTier::Fallback`]); then, unless
//!    [`ReserveRules::overflow`] is turned off, any team with a category-B
//!    main, then any team. Under the default rules placement fails only
//!    when there are no teams at all.
//!
//! Within the first non-empty tier the candidates with the highest resolved
//! score tie, and one of them is drawn uniformly at random. Everything
//! before that draw is deterministic: see [`candidates`].

use super::config::ReserveRules;
use super::types::{Candidate, MatchTier};
use crate::error::AssignError;
use crate::roster::{Category, Competitor, Reserve, Team, TeamClass, Weapon, TEAM_SIZE};
use rand::seq::IndexedRandom;
use rand::Rng;

/// All candidates of the best non-empty tier for `reserve`.
///
/// Pure: the result depends only on the rules, the reserve, and the teams.
/// Empty when no team is eligible.
pub fn candidates(rules: &ReserveRules, reserve: &Competitor, teams: &[Team]) -> Vec<Candidate> {
    let ranked = reserve.preferences.ranked();
    let favorite = ranked[0];
    let candidate = |team: usize, weapon: Weapon, tier: MatchTier| Candidate {
        team,
        weapon,
        tier,
        score: reserve.score(weapon),
    };

    let mut priority = Vec::new();
    let mut secondary = Vec::new();
    for (idx, team) in teams.iter().enumerate() {
        if team.has_reserve() {
            continue;
        }
        match team.class() {
            TeamClass::AllA => {}
            TeamClass::OneB => {
                if let Some(w) = single_b_weapon(rules, reserve, &ranked, team) {
                    secondary.push(candidate(idx, w, MatchTier::Secondary));
                }
            }
            TeamClass::TwoB | TeamClass::AllB => {
                if let Some(w) = multi_b_weapon(rules, reserve, &ranked, team) {
                    priority.push(candidate(idx, w, MatchTier::Priority));
                }
            }
        }
    }
    if !priority.is_empty() {
        return priority;
    }
    if !secondary.is_empty() {
        return secondary;
    }

    let tiers: [(MatchTier, fn(&Team) -> bool); 3] = [
        (MatchTier::Fallback, |t| !t.has_reserve() && t.category_b_count() > 0),
        (MatchTier::Overflow, |t| t.category_b_count() > 0),
        (MatchTier::Any, |_| true),
    ];
    for (tier, eligible) in tiers {
        if tier > MatchTier::Fallback && !rules.overflow {
            break;
        }
        let found: Vec<Candidate> = teams
            .iter()
            .enumerate()
            .filter(|(_, t)| eligible(t))
            .map(|(idx, _)| candidate(idx, favorite, tier))
            .collect();
        if !found.is_empty() {
            return found;
        }
    }
    Vec::new()
}

/// Weapon for joining a multi-B team: must coincide with a category-B main.
fn multi_b_weapon(
    rules: &ReserveRules,
    reserve: &Competitor,
    ranked: &[Weapon; TEAM_SIZE],
    team: &Team,
) -> Option<Weapon> {
    let b_weapons = team.category_b_weapons();
    let favorite = ranked[0];
    if b_weapons.contains(&favorite) {
        return Some(favorite);
    }
    ranked[1..]
        .iter()
        .take_while(|&&w| reserve.score(w) >= rules.acceptable_score)
        .find(|w| b_weapons.contains(w))
        .copied()
}

/// Weapon for joining a single-B team: must differ from the category-B main.
fn single_b_weapon(
    rules: &ReserveRules,
    reserve: &Competitor,
    ranked: &[Weapon; TEAM_SIZE],
    team: &Team,
) -> Option<Weapon> {
    let b_weapon = *team.category_b_weapons().first()?;
    let favorite = ranked[0];
    if favorite != b_weapon {
        return Some(favorite);
    }
    if reserve.category == Category::A || rules.switch_any_category {
        return ranked.iter().copied().find(|&w| w != b_weapon);
    }
    None
}

/// Picks uniformly among the highest-scored candidates.
pub fn choose<R: Rng>(candidates: &[Candidate], rng: &mut R) -> Option<Candidate> {
    let best = candidates.iter().map(|c| c.score).max()?;
    let top: Vec<&Candidate> = candidates.iter().filter(|c| c.score == best).collect();
    top.choose(rng).map(|c| **c)
}

/// Places leftover competitors into team reserve slots.
#[derive(Debug, Clone, Default)]
pub struct ReserveMatcher {
    rules: ReserveRules,
}

impl ReserveMatcher {
    pub fn new(rules: ReserveRules) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &ReserveRules {
        &self.rules
    }

    /// Places every reserve on a team, in arrival order.
    ///
    /// # Errors
    ///
    /// [`AssignError::ReserveExhaustion`] for the first reserve that has no
    /// eligible team. Reserves placed before it stay placed.
    pub fn place<R: Rng>(
        &self,
        teams: &mut [Team],
        reserves: &[&Competitor],
        rng: &mut R,
    ) -> Result<(), AssignError> {
        for &reserve in reserves {
            let found = candidates(&self.rules, reserve, teams);
            let Some(chosen) = choose(&found, rng) else {
                log::warn!("no eligible team for reserve '{}'", reserve.name);
                return Err(AssignError::ReserveExhaustion {
                    name: reserve.name.clone(),
                });
            };

            let team = &mut teams[chosen.team];
            log::info!(
                "reserve '{}' -> team {} ({}, {:?} among {} candidate(s))",
                reserve.name,
                team.number,
                chosen.weapon,
                chosen.tier,
                found.len()
            );
            team.push_reserve(Reserve {
                name: reserve.name.clone(),
                category: reserve.category,
                weapon: chosen.weapon,
                preferences: reserve.preferences,
                tier: chosen.tier,
            });
        }
        Ok(())
    }
}
