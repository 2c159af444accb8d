//! Assignment pipeline configuration.
//!
//! [`AssignConfig`] holds every parameter of a [`TeamAssigner`](super::TeamAssigner)
//! run; [`CompositionWeights`] optionally shapes team composition in the
//! objective.

use crate::ilp::{Sense, SolverConfig};
use crate::reserve::ReserveRules;
use crate::roster::TeamClass;
use std::time::Duration;

/// Objective terms keyed by [`TeamClass`], indexed by category-B count.
///
/// Both arrays default to zero, which adds nothing to the model. Values are
/// in objective units and follow the pass direction: under maximization a
/// negative bonus is a penalty.
///
/// # Examples
///
/// ```
/// use u_roster::assign::CompositionWeights;
/// use u_roster::roster::TeamClass;
///
/// // Favor teams with two category-B mains, and weigh preferences in
/// // single-B teams double.
/// let weights = CompositionWeights::default()
///     .with_class_bonus(TeamClass::TwoB, 2.0)
///     .with_preference_weight(TeamClass::OneB, 1.0);
/// assert!(weights.is_active());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompositionWeights {
    /// Flat bonus per team of the class.
    pub class_bonus: [f64; 4],
    /// Extra weight on member preference scores in teams of the class.
    pub preference_weight: [f64; 4],
}

impl CompositionWeights {
    pub fn with_class_bonus(mut self, class: TeamClass, bonus: f64) -> Self {
        self.class_bonus[class.b_count()] = bonus;
        self
    }

    pub fn with_preference_weight(mut self, class: TeamClass, weight: f64) -> Self {
        self.preference_weight[class.b_count()] = weight;
        self
    }

    /// Whether any term is non-zero (class indicators are needed).
    pub fn is_active(&self) -> bool {
        self.class_bonus
            .iter()
            .chain(&self.preference_weight)
            .any(|&w| w != 0.0)
    }

    pub fn validate(&self) -> Result<(), String> {
        for (i, w) in self.class_bonus.iter().enumerate() {
            if !w.is_finite() {
                return Err(format!("class_bonus[{i}] must be finite, got {w}"));
            }
        }
        for (i, w) in self.preference_weight.iter().enumerate() {
            if !w.is_finite() {
                return Err(format!("preference_weight[{i}] must be finite, got {w}"));
            }
        }
        Ok(())
    }
}

/// Configuration for [`TeamAssigner`](super::TeamAssigner).
///
/// # Defaults
///
/// ```
/// use u_roster::assign::AssignConfig;
/// use u_roster::ilp::Sense;
///
/// let config = AssignConfig::default();
/// assert!(config.form_reserve_teams);
/// assert_eq!(config.reserve_pass_sense, Sense::Minimize);
/// assert!(config.require_category_a);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use std::time::Duration;
/// use u_roster::assign::AssignConfig;
/// use u_roster::reserve::ReserveRules;
///
/// let config = AssignConfig::default()
///     .with_seed(42)
///     .with_time_limit(Duration::from_secs(5))
///     .with_reserve_rules(ReserveRules::default().with_acceptable_score(2));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct AssignConfig {
    /// Random seed for partitioning and reserve tie-breaks.
    /// `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    /// Solver settings applied to every pass.
    pub solver: SolverConfig,

    /// Whether leftovers from the main pass (three or more) are regrouped
    /// into additional teams, with the category-B quota waived.
    ///
    /// The first `3k` leftovers by arrival form the pass; the rest go to
    /// the reserve matcher.
    pub form_reserve_teams: bool,

    /// Objective direction of the reserve-team pass.
    ///
    /// Defaults to minimization: reserve teams are deliberately built from
    /// the least preferred pairings.
    pub reserve_pass_sense: Sense,

    /// Require at least one category-A main per team.
    pub require_category_a: bool,

    /// Optional composition terms added to every pass.
    pub composition: CompositionWeights,

    /// Reserve matching policy.
    pub reserve_rules: ReserveRules,
}

impl Default for AssignConfig {
    fn default() -> Self {
        Self {
            seed: None,
            solver: SolverConfig::default(),
            form_reserve_teams: true,
            reserve_pass_sense: Sense::Minimize,
            require_category_a: true,
            composition: CompositionWeights::default(),
            reserve_rules: ReserveRules::default(),
        }
    }
}

impl AssignConfig {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.solver = self.solver.with_time_limit(limit);
        self
    }

    pub fn without_time_limit(mut self) -> Self {
        self.solver = self.solver.without_time_limit();
        self
    }

    pub fn with_reserve_teams(mut self, enabled: bool) -> Self {
        self.form_reserve_teams = enabled;
        self
    }

    pub fn with_reserve_pass_sense(mut self, sense: Sense) -> Self {
        self.reserve_pass_sense = sense;
        self
    }

    pub fn with_require_category_a(mut self, required: bool) -> Self {
        self.require_category_a = required;
        self
    }

    pub fn with_composition(mut self, composition: CompositionWeights) -> Self {
        self.composition = composition;
        self
    }

    pub fn with_reserve_rules(mut self, rules: ReserveRules) -> Self {
        self.reserve_rules = rules;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        self.solver.validate()?;
        self.composition.validate()?;
        Ok(())
    }
}
