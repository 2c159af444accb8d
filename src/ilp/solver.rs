//! ILP solver interface and the `good_lp` adapter.

use super::model::{Comparison, IlpModel, Sense};
use super::variables::LinearExpr;
use good_lp::solvers::microlp::microlp;
use good_lp::{
    variable, Expression, ProblemVariables, ResolutionError, Solution, SolutionStatus, SolverModel,
    Variable, WithInitialSolution, WithTimeLimit,
};
use std::fmt;
use std::time::{Duration, Instant};

/// Values within this distance of 0 or 1 count as integral.
const INTEGRALITY_TOLERANCE: f64 = 1e-6;

/// Status of the solver after execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SolverStatus {
    /// Proven optimal solution found.
    Optimal,
    /// Feasible (but not necessarily optimal) solution found.
    Feasible,
    /// No feasible solution exists.
    Infeasible,
    /// Model is invalid or malformed.
    ModelInvalid,
    /// Solver exceeded its time limit without a usable solution.
    Timeout,
    /// No solution found for unknown reasons.
    Unknown,
}

impl fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolverStatus::Optimal => "optimal",
            SolverStatus::Feasible => "feasible",
            SolverStatus::Infeasible => "infeasible",
            SolverStatus::ModelInvalid => "model invalid",
            SolverStatus::Timeout => "timeout",
            SolverStatus::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Solution from an ILP solver.
#[derive(Debug, Clone)]
pub struct IlpSolution {
    /// Solver status.
    pub status: SolverStatus,
    /// Objective function value (if a solution was found).
    pub objective_value: Option<f64>,
    /// One value per model variable; empty when no solution was found.
    pub values: Vec<f64>,
    /// Solver diagnostic, if any.
    pub message: Option<String>,
    /// Solve time in milliseconds.
    pub solve_time_ms: i64,
}

impl IlpSolution {
    /// Creates an empty solution with the given status.
    pub fn empty(status: SolverStatus) -> Self {
        Self {
            status,
            objective_value: None,
            values: Vec::new(),
            message: None,
            solve_time_ms: 0,
        }
    }

    /// Attaches a diagnostic message.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Whether a feasible solution was found.
    pub fn is_solution_found(&self) -> bool {
        matches!(self.status, SolverStatus::Optimal | SolverStatus::Feasible)
    }

    /// Value of a variable, 0 when absent.
    pub fn value(&self, var: super::VarId) -> f64 {
        self.values.get(var.index()).copied().unwrap_or(0.0)
    }
}

/// Solver configuration.
#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Wall-clock bound per solve. `None` waits for the solver indefinitely.
    pub time_limit: Option<Duration>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            time_limit: Some(Duration::from_secs(60)),
        }
    }
}

impl SolverConfig {
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    pub fn without_time_limit(mut self) -> Self {
        self.time_limit = None;
        self
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.time_limit.is_some_and(|t| t.is_zero()) {
            return Err("time_limit must be positive".into());
        }
        Ok(())
    }
}

/// Trait for ILP solver implementations.
///
/// Implementors get a fresh, self-contained model per call and keep no
/// state between calls.
pub trait IlpSolver {
    /// Solves the model and returns a solution.
    fn solve(&self, model: &IlpModel, config: &SolverConfig) -> IlpSolution;
}

/// Exact branch-and-bound solver backed by `good_lp`'s pure-Rust
/// `microlp` backend.
///
/// The time limit is handed to microlp, which stops on the calling thread
/// once it elapses. A feasible model hint is passed in as the warm start, so
/// a cut-short search still returns the best incumbent as
/// [`SolverStatus::Feasible`]. If microlp stops before holding any
/// incumbent, the hint is returned when it satisfies every constraint;
/// otherwise the result is [`SolverStatus::Timeout`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MicroLpSolver;

impl MicroLpSolver {
    pub fn new() -> Self {
        Self
    }
}

impl IlpSolver for MicroLpSolver {
    fn solve(&self, model: &IlpModel, config: &SolverConfig) -> IlpSolution {
        if let Err(reason) = model.validate() {
            return IlpSolution::empty(SolverStatus::ModelInvalid).with_message(reason);
        }

        let start_time = Instant::now();
        let mut solution = match solve_exact(model, config.time_limit) {
            Ok((values, proven)) => {
                let (status, message) = if proven {
                    (SolverStatus::Optimal, None)
                } else {
                    log::warn!(
                        "model '{}' stopped at the {:?} time limit, keeping the incumbent",
                        model.name,
                        config.time_limit
                    );
                    (
                        SolverStatus::Feasible,
                        Some("time limit reached, returning best incumbent".to_string()),
                    )
                };
                IlpSolution {
                    status,
                    objective_value: Some(model.objective_value(&values)),
                    values,
                    message,
                    solve_time_ms: 0,
                }
            }
            Err(ResolutionError::Infeasible) => IlpSolution::empty(SolverStatus::Infeasible),
            // microlp reports a limit hit before any incumbent as `Other`.
            Err(ResolutionError::Other(reason)) if config.time_limit.is_some() => {
                log::warn!("model '{}': {reason}", model.name);
                hint_fallback(model)
            }
            Err(err) => IlpSolution::empty(SolverStatus::Unknown).with_message(err.to_string()),
        };
        solution.solve_time_ms = start_time.elapsed().as_millis() as i64;
        solution
    }
}

fn hint_fallback(model: &IlpModel) -> IlpSolution {
    match feasible_hint(model) {
        Some(hint) => IlpSolution {
            status: SolverStatus::Feasible,
            objective_value: Some(model.objective_value(hint)),
            values: hint.to_vec(),
            message: Some("time limit reached, returning warm-start assignment".into()),
            solve_time_ms: 0,
        },
        None => IlpSolution::empty(SolverStatus::Timeout)
            .with_message("time limit reached without a feasible assignment"),
    }
}

fn feasible_hint(model: &IlpModel) -> Option<&[f64]> {
    model
        .hint
        .as_deref()
        .filter(|hint| model.is_feasible(hint, INTEGRALITY_TOLERANCE))
}

/// Solves `model` with microlp. The flag is `true` when optimality was proven.
fn solve_exact(
    model: &IlpModel,
    time_limit: Option<Duration>,
) -> Result<(Vec<f64>, bool), ResolutionError> {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .vars
        .iter()
        .map(|v| vars.add(variable().binary().name(v.name.clone())))
        .collect();

    let objective = to_expression(&model.objective.expr, &handles);
    let unsolved = match model.objective.sense {
        Sense::Maximize => vars.maximise(objective),
        Sense::Minimize => vars.minimise(objective),
    };
    let mut problem = unsolved.using(microlp);
    if let Some(limit) = time_limit {
        problem = problem.with_time_limit(limit.as_secs_f64());
    }
    if let Some(hint) = feasible_hint(model) {
        problem = problem.with_initial_solution(handles.iter().copied().zip(hint.iter().copied()));
    }

    for c in &model.constraints {
        // Constants move to the right-hand side.
        let lhs = to_expression(&c.expr, &handles);
        let rhs = c.rhs - c.expr.constant;
        let constraint = match c.comparison {
            Comparison::Eq => lhs.eq(rhs),
            Comparison::Le => lhs.leq(rhs),
            Comparison::Ge => lhs.geq(rhs),
        };
        problem = problem.with(constraint);
    }

    let solution = problem.solve()?;
    let proven = matches!(solution.status(), SolutionStatus::Optimal);
    // Every variable is binary; snap away solver round-off.
    let values = handles.iter().map(|&h| solution.value(h).round()).collect();
    Ok((values, proven))
}

fn to_expression(expr: &LinearExpr, handles: &[Variable]) -> Expression {
    let mut out = Expression::with_capacity(expr.terms.len());
    for &(var, coef) in &expr.terms {
        out.add_mul(coef, handles[var.index()]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ilp::{IlpModel, LinearExpr, Sense};

    fn pick_one_model(sense: Sense) -> IlpModel {
        let mut model = IlpModel::new("pick-one");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        let c = model.add_bool_var("c");
        model.add_eq("one", LinearExpr::sum([a, b, c]), 1.0);
        model.set_objective(
            sense,
            LinearExpr::new()
                .with_term(a, 1.0)
                .with_term(b, 5.0)
                .with_term(c, 3.0),
        );
        model
    }

    #[test]
    fn test_maximize_picks_best() {
        let model = pick_one_model(Sense::Maximize);
        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!(solution.is_solution_found());
        assert!((solution.objective_value.unwrap() - 5.0).abs() < 1e-6);
        assert!(solution.values[1] > 0.5);
    }

    #[test]
    fn test_minimize_picks_worst() {
        let model = pick_one_model(Sense::Minimize);
        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default().without_time_limit());

        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!((solution.objective_value.unwrap() - 1.0).abs() < 1e-6);
        assert!(solution.values[0] > 0.5);
    }

    #[test]
    fn test_infeasible() {
        let mut model = IlpModel::new("infeasible");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        model.add_ge("both", LinearExpr::sum([a, b]), 3.0);

        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Infeasible);
        assert!(!solution.is_solution_found());
        assert!(solution.values.is_empty());
    }

    #[test]
    fn test_invalid_model() {
        let mut model = IlpModel::new("invalid");
        model.add_eq("dangling", LinearExpr::sum([crate::ilp::VarId(9)]), 1.0);

        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::ModelInvalid);
        assert!(solution.message.is_some());
    }

    #[test]
    fn test_and_linearization_solved() {
        let mut model = IlpModel::new("and");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        let z = model.add_and("z", a, b);
        // Reward z, but a costs more than z pays: optimum leaves z at 0.
        model.set_objective(
            Sense::Maximize,
            LinearExpr::new()
                .with_term(z, 2.0)
                .with_term(a, -3.0)
                .with_term(b, 0.5),
        );

        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!(solution.value(a) < 0.5);
        assert!(solution.value(b) > 0.5);
        assert!(solution.value(z) < 0.5);
    }

    #[test]
    fn test_and_forced_true() {
        let mut model = IlpModel::new("and");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        let z = model.add_and("z", a, b);
        model.add_eq("a_on", LinearExpr::sum([a]), 1.0);
        model.add_eq("b_on", LinearExpr::sum([b]), 1.0);
        model.set_objective(Sense::Minimize, LinearExpr::new().with_term(z, 1.0));

        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());
        assert_eq!(solution.status, SolverStatus::Optimal);
        assert!(solution.value(z) > 0.5, "z must follow a AND b even when minimized");
    }

    #[test]
    fn test_constant_moves_to_rhs() {
        let mut model = IlpModel::new("constant");
        let a = model.add_bool_var("a");
        // a + 1 == 2  =>  a == 1
        model.add_eq("shifted", LinearExpr::sum([a]).with_constant(1.0), 2.0);
        model.set_objective(Sense::Minimize, LinearExpr::new().with_term(a, 1.0));

        let solution = MicroLpSolver::new().solve(&model, &SolverConfig::default());
        assert!(solution.value(a) > 0.5);
    }

    #[test]
    fn test_hint_fallback_feasible() {
        let mut model = pick_one_model(Sense::Maximize);
        model.set_hint(vec![0.0, 0.0, 1.0]);

        let solution = hint_fallback(&model);
        assert_eq!(solution.status, SolverStatus::Feasible);
        assert!((solution.objective_value.unwrap() - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_hint_fallback_rejects_infeasible_hint() {
        let mut model = pick_one_model(Sense::Maximize);
        model.set_hint(vec![1.0, 1.0, 0.0]);
        assert_eq!(hint_fallback(&model).status, SolverStatus::Timeout);

        let model = pick_one_model(Sense::Maximize);
        assert_eq!(hint_fallback(&model).status, SolverStatus::Timeout);
    }

    /// 0/1 knapsack with awkward weights; branch-and-bound needs many nodes.
    fn knapsack_model(n: usize) -> IlpModel {
        let mut model = IlpModel::new("knapsack");
        let items: Vec<_> = (0..n).map(|i| model.add_bool_var(format!("k{i}"))).collect();
        let mut weight = LinearExpr::new();
        let mut value = LinearExpr::new();
        for (i, &v) in items.iter().enumerate() {
            let w = 1000.0 + ((i * 7919) % 997) as f64;
            weight.add_term(v, w);
            value.add_term(v, w + ((i * 104_729) % 89) as f64);
        }
        let capacity = (n as f64) * 1000.0 / 2.0 + 0.5;
        model.add_le("capacity", weight, capacity);
        model.set_objective(Sense::Maximize, value);
        model.set_hint(vec![0.0; n]);
        model
    }

    #[test]
    fn test_time_limit_returns_on_caller_thread() {
        let model = knapsack_model(80);
        let config = SolverConfig::default().with_time_limit(Duration::from_millis(200));

        let start = Instant::now();
        let solution = MicroLpSolver::new().solve(&model, &config);
        let elapsed = start.elapsed();

        assert!(elapsed < Duration::from_secs(5), "solve took {elapsed:?}");
        assert!(solution.is_solution_found());
        assert!(model.is_feasible(&solution.values, 1e-6));
        if solution.status == SolverStatus::Feasible {
            assert!(solution.message.is_some());
        }
    }

    #[test]
    fn test_expired_limit_keeps_feasible_hint() {
        let mut model = pick_one_model(Sense::Maximize);
        model.set_hint(vec![0.0, 0.0, 1.0]);
        let config = SolverConfig::default().with_time_limit(Duration::from_nanos(1));

        let solution = MicroLpSolver::new().solve(&model, &config);
        assert!(solution.is_solution_found());
        assert!(model.is_feasible(&solution.values, 1e-6));
        assert!(solution.objective_value.unwrap() >= 3.0);
    }

    #[test]
    fn test_solver_config_default() {
        let config = SolverConfig::default();
        assert_eq!(config.time_limit, Some(Duration::from_secs(60)));
        assert!(config.validate().is_ok());
        assert!(SolverConfig::default()
            .with_time_limit(Duration::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_status_display() {
        assert_eq!(SolverStatus::Infeasible.to_string(), "infeasible");
        assert_eq!(SolverStatus::Timeout.to_string(), "timeout");
    }
}
