//! Assignment pipeline execution.
//!
//! [`TeamAssigner`] runs the whole pipeline:
//! partition → main pass → reserve-team pass → reserve matching.

use super::config::AssignConfig;
use super::extract::extract_teams;
use super::model::{ModelOptions, TeamModel};
use crate::error::{AssignError, PassKind};
use crate::ilp::{IlpSolver, MicroLpSolver, SolverStatus};
use crate::partition::partition;
use crate::random::rng_from_seed;
use crate::reserve::ReserveMatcher;
use crate::roster::{Competitor, Team, TEAM_SIZE};
use rand::Rng;
use std::collections::HashSet;

/// Outcome of one optimization pass.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PassReport {
    pub kind: PassKind,
    /// Solver status; [`SolverStatus::Feasible`] when the time limit cut
    /// the search short.
    pub status: SolverStatus,
    pub objective: Option<f64>,
    /// Number of the first team this pass formed.
    pub first_team: usize,
    pub team_count: usize,
    pub solve_time_ms: i64,
}

/// Result of a successful run.
///
/// Every competitor of the roster appears exactly once, either as a main or
/// as a reserve.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Assignment {
    /// Teams in formation order, numbered from 1.
    pub teams: Vec<Team>,
    /// One report per pass that ran.
    pub passes: Vec<PassReport>,
}

impl Assignment {
    /// Total number of placed competitors, mains and reserves.
    pub fn placed_count(&self) -> usize {
        self.teams
            .iter()
            .map(|t| TEAM_SIZE + t.reserves().len())
            .sum()
    }

    pub fn reserve_count(&self) -> usize {
        self.teams.iter().map(|t| t.reserves().len()).sum()
    }

    /// The team `name` was placed on.
    pub fn team_of(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.names().any(|n| n == name))
    }

    /// Report of the given pass, if it ran.
    pub fn pass(&self, kind: PassKind) -> Option<&PassReport> {
        self.passes.iter().find(|p| p.kind == kind)
    }
}

/// Forms teams from a roster.
///
/// Generic over the solver so the ILP backend can be swapped; the default
/// is [`MicroLpSolver`].
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use u_roster::assign::{AssignConfig, TeamAssigner};
/// use u_roster::roster::{Category, Competitor, Preferences};
///
/// let roster = vec![
///     Competitor::new("a1", Category::A, Preferences::new(5, 1, 1)),
///     Competitor::new("a2", Category::A, Preferences::new(1, 5, 1)),
///     Competitor::new("a3", Category::A, Preferences::new(1, 1, 5)),
///     Competitor::new("b1", Category::B, Preferences::new(5, 1, 1)),
///     Competitor::new("b2", Category::B, Preferences::new(1, 5, 1)),
///     Competitor::new("b3", Category::B, Preferences::new(1, 1, 5)),
/// ];
///
/// let config = AssignConfig::default()
///     .with_seed(42)
///     .with_time_limit(Duration::from_secs(10));
/// let result = TeamAssigner::new(config).assign(&roster).unwrap();
/// assert_eq!(result.teams.len(), 2);
/// assert_eq!(result.placed_count(), 6);
/// ```
#[derive(Debug, Clone)]
pub struct TeamAssigner<S: IlpSolver = MicroLpSolver> {
    config: AssignConfig,
    solver: S,
}

impl TeamAssigner {
    pub fn new(config: AssignConfig) -> Self {
        Self::with_solver(config, MicroLpSolver::new())
    }
}

impl<S: IlpSolver> TeamAssigner<S> {
    pub fn with_solver(config: AssignConfig, solver: S) -> Self {
        Self { config, solver }
    }

    pub fn config(&self) -> &AssignConfig {
        &self.config
    }

    /// Runs the pipeline with an RNG seeded from [`AssignConfig::seed`].
    pub fn assign(&self, roster: &[Competitor]) -> Result<Assignment, AssignError> {
        let mut rng = rng_from_seed(self.config.seed);
        self.assign_with_rng(roster, &mut rng)
    }

    /// Runs the pipeline with a caller-supplied RNG.
    ///
    /// # Errors
    ///
    /// - [`AssignError::InvalidConfig`] / [`AssignError::InvalidInput`] before
    ///   any work is done
    /// - [`AssignError::NoTeams`] when the roster cannot fill a single team
    /// - [`AssignError::CategoryImbalance`] from partitioning
    /// - [`AssignError::Infeasible`] / [`AssignError::MalformedSolution`]
    ///   from either pass
    /// - [`AssignError::ReserveExhaustion`] from reserve matching
    pub fn assign_with_rng<R: Rng>(
        &self,
        roster: &[Competitor],
        rng: &mut R,
    ) -> Result<Assignment, AssignError> {
        self.config.validate().map_err(AssignError::InvalidConfig)?;
        validate_roster(roster)?;

        if roster.len() < TEAM_SIZE {
            log::warn!("roster of {} cannot form a team", roster.len());
            return Err(AssignError::NoTeams {
                unplaced: roster.iter().map(|c| c.name.clone()).collect(),
            });
        }

        let split = partition(roster, rng)?;
        let mut teams: Vec<Team> = Vec::new();
        let mut passes = Vec::new();

        if !split.batch.is_empty() {
            let options = ModelOptions::main_pass(&self.config);
            let (formed, report) = self.run_pass(PassKind::Main, &split.batch, &options, 1)?;
            teams.extend(formed);
            passes.push(report);
        }

        let mut leftovers = split.reserves;
        if self.config.form_reserve_teams && leftovers.len() >= TEAM_SIZE {
            let batch_len = leftovers.len() - leftovers.len() % TEAM_SIZE;
            let rest = leftovers.split_off(batch_len);
            let options = ModelOptions::reserve_pass(&self.config);
            let (formed, report) =
                self.run_pass(PassKind::Reserve, &leftovers, &options, teams.len() + 1)?;
            teams.extend(formed);
            passes.push(report);
            leftovers = rest;
        }

        if teams.is_empty() {
            log::warn!("no team formed from {} competitors", roster.len());
            return Err(AssignError::NoTeams {
                unplaced: leftovers.iter().map(|c| c.name.clone()).collect(),
            });
        }

        ReserveMatcher::new(self.config.reserve_rules.clone()).place(&mut teams, &leftovers, rng)?;

        let assignment = Assignment { teams, passes };
        log::info!(
            "assigned {} competitors: {} teams, {} reserves",
            assignment.placed_count(),
            assignment.teams.len(),
            assignment.reserve_count()
        );
        Ok(assignment)
    }

    /// Runs [`assign`](Self::assign) over many rosters in parallel.
    ///
    /// With a configured seed, roster `i` uses `seed + i`.
    #[cfg(feature = "parallel")]
    pub fn assign_many(&self, rosters: &[Vec<Competitor>]) -> Vec<Result<Assignment, AssignError>>
    where
        S: Sync,
    {
        use rayon::prelude::*;

        rosters
            .par_iter()
            .enumerate()
            .map(|(idx, roster)| {
                let seed = self.config.seed.map(|s| s.wrapping_add(idx as u64));
                let mut rng = rng_from_seed(seed);
                self.assign_with_rng(roster, &mut rng)
            })
            .collect()
    }

    fn run_pass(
        &self,
        kind: PassKind,
        batch: &[&Competitor],
        options: &ModelOptions,
        first_team: usize,
    ) -> Result<(Vec<Team>, PassReport), AssignError> {
        let tm = TeamModel::build(format!("{kind}-pass"), batch, options)
            .map_err(AssignError::InvalidInput)?;
        let solution = self.solver.solve(tm.model(), &self.config.solver);
        if !solution.is_solution_found() {
            log::warn!("{kind} pass ended with status {}", solution.status);
            return Err(AssignError::Infeasible {
                pass: kind,
                status: solution.status,
                detail: solution.message,
            });
        }

        let teams = extract_teams(&tm, &solution, first_team)
            .map_err(|reason| AssignError::MalformedSolution { pass: kind, reason })?;
        log::info!(
            "{kind} pass: {} teams from {} competitors, status {}, objective {:?} ({} ms)",
            teams.len(),
            batch.len(),
            solution.status,
            solution.objective_value,
            solution.solve_time_ms
        );

        let report = PassReport {
            kind,
            status: solution.status,
            objective: solution.objective_value,
            first_team,
            team_count: teams.len(),
            solve_time_ms: solution.solve_time_ms,
        };
        Ok((teams, report))
    }
}

fn validate_roster(roster: &[Competitor]) -> Result<(), AssignError> {
    if roster.is_empty() {
        return Err(AssignError::InvalidInput("roster is empty".into()));
    }
    let mut seen = HashSet::with_capacity(roster.len());
    for c in roster {
        if c.name.trim().is_empty() {
            return Err(AssignError::InvalidInput("competitor name is blank".into()));
        }
        if !seen.insert(c.name.as_str()) {
            return Err(AssignError::InvalidInput(format!(
                "duplicate competitor name '{}'",
                c.name
            )));
        }
    }
    Ok(())
}
