//! Assignment model builder.
//!
//! Turns one batch of `3T` competitors into a binary program over
//! `x[i,t,w]` ("competitor `i` fences weapon `w` for team `t`").
//!
//! # Constraints
//!
//! - exactly once: `Σ_{t,w} x[i,t,w] = 1` per competitor
//! - slot fullness: `Σ_i x[i,t,w] = 1` per team and weapon
//! - category-B presence: `Σ_{i∈B,w} x[i,t,w] ≥ 1` per team (waivable)
//! - category-A presence: `Σ_{i∈A,w} x[i,t,w] ≥ 1` per team (optional)
//!
//! The objective is `Σ score(i,w)·x[i,t,w]` in the pass direction.
//!
//! # Composition terms
//!
//! When [`CompositionWeights`] is active, each team gets one indicator per
//! [`TeamClass`] with `Σ_k c[t,k] = 1` and `Σ_{i∈B,w} x[i,t,w] = Σ_k k·c[t,k]`.
//! Class bonuses weigh the indicators directly; class preference weights
//! weigh `x[i,t,w] AND c[t,k]` through [`IlpModel::add_and`].

use super::config::{AssignConfig, CompositionWeights};
use crate::ilp::{IlpModel, LinearExpr, Sense, VarId};
use crate::roster::{Category, Competitor, TeamClass, Weapon, TEAM_SIZE};

const PERMUTATIONS: [[Weapon; TEAM_SIZE]; 6] = [
    [Weapon::Foil, Weapon::Epee, Weapon::Sabre],
    [Weapon::Foil, Weapon::Sabre, Weapon::Epee],
    [Weapon::Epee, Weapon::Foil, Weapon::Sabre],
    [Weapon::Epee, Weapon::Sabre, Weapon::Foil],
    [Weapon::Sabre, Weapon::Foil, Weapon::Epee],
    [Weapon::Sabre, Weapon::Epee, Weapon::Foil],
];

/// Per-pass modeling options.
///
/// The default is the main pass of [`AssignConfig::default`]: both quotas
/// enforced, preference maximized.
#[derive(Debug, Clone)]
pub struct ModelOptions {
    /// Drop the category-B presence constraint.
    pub waive_category_b: bool,
    /// Keep the category-A presence constraint.
    pub require_category_a: bool,
    /// Objective direction.
    pub sense: Sense,
    pub composition: CompositionWeights,
}

impl ModelOptions {
    /// Options for the main pass: both quotas, maximize preference.
    pub fn main_pass(config: &AssignConfig) -> Self {
        Self {
            waive_category_b: false,
            require_category_a: config.require_category_a,
            sense: Sense::Maximize,
            composition: config.composition.clone(),
        }
    }

    /// Options for the reserve-team pass: category-B quota waived.
    pub fn reserve_pass(config: &AssignConfig) -> Self {
        Self {
            waive_category_b: true,
            require_category_a: config.require_category_a,
            sense: config.reserve_pass_sense,
            composition: config.composition.clone(),
        }
    }
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self::main_pass(&AssignConfig::default())
    }
}

/// A built assignment model and the index needed to read its solution.
#[derive(Debug, Clone)]
pub struct TeamModel<'a> {
    model: IlpModel,
    batch: Vec<&'a Competitor>,
    teams: usize,
    /// `x[i,t,w]` at `(i * teams + t) * 3 + w`.
    assign_vars: Vec<VarId>,
    /// `c[t,k]`, present only when composition terms are active.
    class_vars: Vec<[VarId; 4]>,
}

impl<'a> TeamModel<'a> {
    /// Builds the model for `batch`.
    ///
    /// # Errors
    ///
    /// When the batch is empty or its size is not a multiple of 3.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_roster::assign::{ModelOptions, TeamModel};
    /// use u_roster::roster::{Category, Competitor, Preferences};
    ///
    /// let roster = vec![
    ///     Competitor::new("a", Category::A, Preferences::new(3, 2, 1)),
    ///     Competitor::new("b", Category::B, Preferences::new(1, 3, 2)),
    ///     Competitor::new("c", Category::A, Preferences::new(2, 1, 3)),
    /// ];
    /// let batch: Vec<&Competitor> = roster.iter().collect();
    /// let tm = TeamModel::build("demo", &batch, &ModelOptions::default()).unwrap();
    /// assert_eq!(tm.team_count(), 1);
    /// assert_eq!(tm.model().var_count(), 9);
    /// ```
    pub fn build(
        name: impl Into<String>,
        batch: &[&'a Competitor],
        options: &ModelOptions,
    ) -> Result<Self, String> {
        let n = batch.len();
        if n == 0 || n % TEAM_SIZE != 0 {
            return Err(format!(
                "batch size must be a positive multiple of {TEAM_SIZE}, got {n}"
            ));
        }
        let teams = n / TEAM_SIZE;
        let mut model = IlpModel::new(name);

        let mut assign_vars = Vec::with_capacity(n * teams * TEAM_SIZE);
        for (i, c) in batch.iter().enumerate() {
            for t in 0..teams {
                for w in Weapon::ALL {
                    assign_vars.push(model.add_bool_var(format!("x[{i}:{},{t},{w}]", c.name)));
                }
            }
        }
        let x = |i: usize, t: usize, w: Weapon| assign_vars[(i * teams + t) * TEAM_SIZE + w.index()];
        let members_of = |category: Category, t: usize| -> LinearExpr {
            LinearExpr::sum(
                batch
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.category == category)
                    .flat_map(|(i, _)| Weapon::ALL.map(|w| x(i, t, w))),
            )
        };

        for i in 0..n {
            model.add_eq(
                format!("once[{i}]"),
                LinearExpr::sum((0..teams).flat_map(|t| Weapon::ALL.map(|w| x(i, t, w)))),
                1.0,
            );
        }
        for t in 0..teams {
            for w in Weapon::ALL {
                model.add_eq(
                    format!("slot[{t},{w}]"),
                    LinearExpr::sum((0..n).map(|i| x(i, t, w))),
                    1.0,
                );
            }
        }
        for t in 0..teams {
            if !options.waive_category_b {
                model.add_ge(format!("has_b[{t}]"), members_of(Category::B, t), 1.0);
            }
            if options.require_category_a {
                model.add_ge(format!("has_a[{t}]"), members_of(Category::A, t), 1.0);
            }
        }

        let mut objective = LinearExpr::with_capacity(assign_vars.len());
        for (i, c) in batch.iter().enumerate() {
            for t in 0..teams {
                for w in Weapon::ALL {
                    objective.add_term(x(i, t, w), c.score(w) as f64);
                }
            }
        }

        let mut class_vars = Vec::new();
        let mut and_vars = Vec::new();
        if options.composition.is_active() {
            for t in 0..teams {
                let c = TeamClass::ALL.map(|k| model.add_bool_var(format!("class[{t},{k:?}]")));
                model.add_eq(format!("one_class[{t}]"), LinearExpr::sum(c), 1.0);

                let mut link = members_of(Category::B, t);
                for k in TeamClass::ALL {
                    link.add_term(c[k.b_count()], -(k.b_count() as f64));
                }
                model.add_eq(format!("class_link[{t}]"), link, 0.0);

                for k in TeamClass::ALL {
                    let bonus = options.composition.class_bonus[k.b_count()];
                    if bonus != 0.0 {
                        objective.add_term(c[k.b_count()], bonus);
                    }
                    let weight = options.composition.preference_weight[k.b_count()];
                    if weight == 0.0 {
                        continue;
                    }
                    for (i, member) in batch.iter().enumerate() {
                        for w in Weapon::ALL {
                            let a = x(i, t, w);
                            let z = model.add_and(format!("in_class[{i},{t},{w},{k:?}]"), a, c[k.b_count()]);
                            and_vars.push((z, a, c[k.b_count()]));
                            objective.add_term(z, weight * member.score(w) as f64);
                        }
                    }
                }
                class_vars.push(c);
            }
        }
        model.set_objective(options.sense, objective);

        let mut tm = Self {
            model,
            batch: batch.to_vec(),
            teams,
            assign_vars,
            class_vars,
        };
        if let Some(hint) = tm.greedy_hint(options, &and_vars) {
            tm.model.set_hint(hint);
        }

        log::debug!(
            "built model '{}': {} teams, {} variables, {} constraints",
            tm.model.name,
            teams,
            tm.model.var_count(),
            tm.model.constraint_count()
        );
        Ok(tm)
    }

    /// The underlying ILP.
    pub fn model(&self) -> &IlpModel {
        &self.model
    }

    /// Competitors of this batch, in model order.
    pub fn batch(&self) -> &[&'a Competitor] {
        &self.batch
    }

    /// Number of teams `T`.
    pub fn team_count(&self) -> usize {
        self.teams
    }

    /// Handle of `x[i,t,w]`.
    pub fn var(&self, competitor: usize, team: usize, weapon: Weapon) -> VarId {
        self.assign_vars[(competitor * self.teams + team) * TEAM_SIZE + weapon.index()]
    }

    /// Handle of the class indicator `c[t,k]`, if composition terms are active.
    pub fn class_var(&self, team: usize, class: TeamClass) -> Option<VarId> {
        self.class_vars.get(team).map(|c| c[class.b_count()])
    }

    /// A feasible assignment built without the solver, if one is easy to find.
    ///
    /// Category-B members are dealt one per team, then category-A members,
    /// then the rest in batch order; each team's weapons are permuted for
    /// the best score in the pass direction.
    fn greedy_hint(&self, options: &ModelOptions, and_vars: &[(VarId, VarId, VarId)]) -> Option<Vec<f64>> {
        let n = self.batch.len();
        let of = |category: Category| -> Vec<usize> {
            (0..n).filter(|&i| self.batch[i].category == category).collect()
        };

        let mut groups: Vec<Vec<usize>> = vec![Vec::with_capacity(TEAM_SIZE); self.teams];
        let mut used = vec![false; n];
        let seeds = [
            (!options.waive_category_b, Category::B),
            (options.require_category_a, Category::A),
        ];
        for (needed, category) in seeds {
            if !needed {
                continue;
            }
            let pool = of(category);
            if pool.len() < self.teams {
                return None;
            }
            for (group, &i) in groups.iter_mut().zip(&pool) {
                group.push(i);
                used[i] = true;
            }
        }
        for i in (0..n).filter(|&i| !used[i]) {
            groups.iter_mut().find(|g| g.len() < TEAM_SIZE)?.push(i);
        }

        let mut hint = vec![0.0; self.model.var_count()];
        for (t, group) in groups.iter().enumerate() {
            let score = |perm: &[Weapon; TEAM_SIZE]| -> i64 {
                group.iter().zip(perm).map(|(&i, &w)| self.batch[i].score(w)).sum()
            };
            let best = match options.sense {
                Sense::Maximize => PERMUTATIONS.iter().max_by_key(|p| score(*p)),
                Sense::Minimize => PERMUTATIONS.iter().min_by_key(|p| score(*p)),
            }?;
            for (&i, &w) in group.iter().zip(best) {
                hint[self.var(i, t, w).index()] = 1.0;
            }
            if let Some(c) = self.class_vars.get(t) {
                let b_count = group.iter().filter(|&&i| self.batch[i].is_category_b()).count();
                hint[c[b_count].index()] = 1.0;
            }
        }
        for &(z, a, b) in and_vars {
            hint[z.index()] = hint[a.index()] * hint[b.index()];
        }
        Some(hint)
    }
}
