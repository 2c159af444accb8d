//! Roster partitioning.
//!
//! Splits a roster into a batch the optimizer can always cover with full
//! teams (size a multiple of 3, at least one category-B competitor per
//! team) and a pool of reserves.
//!
//! # Algorithm
//!
//! 1. If `3·|B| < n`, exclude `n − 3·|B|` category-A competitors.
//! 2. If the remainder is not a multiple of 3, exclude `remainder mod 3`
//!    more category-A competitors.
//!
//! Exclusions are drawn uniformly at random without replacement. Only
//! category A is ever excluded; running out of category A is an error.

use crate::error::AssignError;
use crate::roster::{Category, Competitor, TEAM_SIZE};
use rand::Rng;

/// Result of [`partition`].
#[derive(Debug, Clone)]
pub struct Partition<'a> {
    /// Competitors for the main optimization pass, in roster order.
    pub batch: Vec<&'a Competitor>,
    /// Excluded competitors, in roster (arrival) order.
    pub reserves: Vec<&'a Competitor>,
}

impl Partition<'_> {
    /// Number of teams the batch forms.
    pub fn team_count(&self) -> usize {
        self.batch.len() / TEAM_SIZE
    }
}

/// Partitions `roster` into a formable batch and reserves.
///
/// # Errors
///
/// [`AssignError::CategoryImbalance`] when there are not enough category-A
/// competitors to exclude.
///
/// # Examples
///
/// ```
/// use u_roster::partition::partition;
/// use u_roster::random::create_rng;
/// use u_roster::roster::{Category, Competitor, Preferences};
///
/// let prefs = Preferences::new(3, 2, 1);
/// let roster: Vec<Competitor> = ["a1", "a2", "a3", "a4", "b1", "b2", "b3"]
///     .iter()
///     .map(|n| {
///         let cat = if n.starts_with('a') { Category::A } else { Category::B };
///         Competitor::new(*n, cat, prefs)
///     })
///     .collect();
///
/// let p = partition(&roster, &mut create_rng(1)).unwrap();
/// assert_eq!(p.batch.len(), 6);
/// assert_eq!(p.reserves.len(), 1);
/// assert_eq!(p.reserves[0].category, Category::A);
/// ```
pub fn partition<'a, R: Rng>(
    roster: &'a [Competitor],
    rng: &mut R,
) -> Result<Partition<'a>, AssignError> {
    let total = roster.len();
    let b_count = roster.iter().filter(|c| c.is_category_b()).count();

    let mut a_pool: Vec<usize> = roster
        .iter()
        .enumerate()
        .filter(|(_, c)| c.category == Category::A)
        .map(|(i, _)| i)
        .collect();
    let mut excluded = vec![false; total];

    let quota_excess = total.saturating_sub(TEAM_SIZE * b_count);
    exclude_random(&mut a_pool, quota_excess, &mut excluded, rng)?;

    let remainder = (total - quota_excess) % TEAM_SIZE;
    exclude_random(&mut a_pool, remainder, &mut excluded, rng)?;

    let (reserves, batch): (Vec<_>, Vec<_>) = roster
        .iter()
        .zip(&excluded)
        .partition(|&(_, &is_excluded)| is_excluded);
    let batch: Vec<&Competitor> = batch.into_iter().map(|(c, _)| c).collect();
    let reserves: Vec<&Competitor> = reserves.into_iter().map(|(c, _)| c).collect();

    log::debug!(
        "partitioned {total} competitors ({b_count} category B): batch {}, reserves {} \
         (quota excess {quota_excess}, remainder {remainder})",
        batch.len(),
        reserves.len()
    );

    Ok(Partition { batch, reserves })
}

/// Marks `count` random members of `pool` as excluded and removes them
/// from the pool.
fn exclude_random<R: Rng>(
    pool: &mut Vec<usize>,
    count: usize,
    excluded: &mut [bool],
    rng: &mut R,
) -> Result<(), AssignError> {
    if count == 0 {
        return Ok(());
    }
    if count > pool.len() {
        return Err(AssignError::CategoryImbalance {
            needed: count,
            available: pool.len(),
        });
    }

    let picks = rand::seq::index::sample(rng, pool.len(), count);
    for pick in picks.iter() {
        excluded[pool[pick]] = true;
    }
    pool.retain(|&i| !excluded[i]);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::create_rng;
    use crate::roster::Preferences;
    use proptest::prelude::*;

    fn roster(a: usize, b: usize) -> Vec<Competitor> {
        let prefs = Preferences::new(3, 2, 1);
        (0..a)
            .map(|i| Competitor::new(format!("A{i}"), Category::A, prefs))
            .chain((0..b).map(|i| Competitor::new(format!("B{i}"), Category::B, prefs)))
            .collect()
    }

    fn b_in(batch: &[&Competitor]) -> usize {
        batch.iter().filter(|c| c.is_category_b()).count()
    }

    #[test]
    fn test_balanced_roster_untouched() {
        let r = roster(3, 3);
        let p = partition(&r, &mut create_rng(42)).unwrap();
        assert_eq!(p.batch.len(), 6);
        assert!(p.reserves.is_empty());
        assert_eq!(p.team_count(), 2);
    }

    #[test]
    fn test_remainder_excluded_from_a() {
        let r = roster(4, 3);
        let p = partition(&r, &mut create_rng(42)).unwrap();
        assert_eq!(p.batch.len(), 6);
        assert_eq!(p.reserves.len(), 1);
        assert_eq!(p.reserves[0].category, Category::A);
        assert_eq!(b_in(&p.batch), 3);
    }

    #[test]
    fn test_quota_excess_excluded() {
        // 1 B supports one team: 7 A minus 5 excluded.
        let r = roster(7, 1);
        let p = partition(&r, &mut create_rng(42)).unwrap();
        assert_eq!(p.batch.len(), 3);
        assert_eq!(p.reserves.len(), 5);
        assert!(p.reserves.iter().all(|c| c.category == Category::A));
    }

    #[test]
    fn test_no_category_b_empties_batch() {
        let r = roster(5, 0);
        let p = partition(&r, &mut create_rng(42)).unwrap();
        assert!(p.batch.is_empty());
        assert_eq!(p.reserves.len(), 5);
    }

    #[test]
    fn test_a_exhausted_fails_fast() {
        let r = roster(0, 7);
        let err = partition(&r, &mut create_rng(42)).unwrap_err();
        assert_eq!(
            err,
            AssignError::CategoryImbalance {
                needed: 1,
                available: 0
            }
        );
    }

    #[test]
    fn test_reserves_keep_arrival_order() {
        let r = roster(9, 1);
        let p = partition(&r, &mut create_rng(3)).unwrap();
        let positions: Vec<usize> = p
            .reserves
            .iter()
            .map(|c| r.iter().position(|x| x.name == c.name).unwrap())
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
    }

    #[test]
    fn test_seed_reproducible() {
        let r = roster(10, 2);
        let p1 = partition(&r, &mut create_rng(99)).unwrap();
        let p2 = partition(&r, &mut create_rng(99)).unwrap();
        let names = |p: &Partition| p.reserves.iter().map(|c| c.name.clone()).collect::<Vec<_>>();
        assert_eq!(names(&p1), names(&p2));
    }

    #[test]
    fn test_exclusion_is_random() {
        let r = roster(10, 2);
        let mut seen = std::collections::HashSet::new();
        for seed in 0..20 {
            let p = partition(&r, &mut create_rng(seed)).unwrap();
            let mut names: Vec<String> = p.batch.iter().map(|c| c.name.clone()).collect();
            names.sort();
            seen.insert(names);
        }
        assert!(seen.len() > 1, "exclusion should vary with the seed");
    }

    proptest! {
        #[test]
        fn prop_partition_invariants(a in 0usize..30, b in 0usize..30, seed in any::<u64>()) {
            let r = roster(a, b);
            let total = a + b;
            let excess = total.saturating_sub(3 * b);
            let needed = excess + (total - excess) % 3;

            match partition(&r, &mut create_rng(seed)) {
                Ok(p) => {
                    prop_assert_eq!(p.batch.len() % 3, 0);
                    prop_assert!(3 * b_in(&p.batch) >= p.batch.len());
                    prop_assert_eq!(p.batch.len() + p.reserves.len(), total);
                    prop_assert_eq!(p.reserves.len(), needed);
                    prop_assert!(p.reserves.iter().all(|c| c.category == Category::A));
                }
                Err(AssignError::CategoryImbalance { .. }) => {
                    prop_assert!(needed > a);
                }
                Err(other) => prop_assert!(false, "unexpected error {other}"),
            }
        }
    }
}
