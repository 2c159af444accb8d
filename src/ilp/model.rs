//! ILP model definition.

use super::variables::{BoolVar, LinearExpr, VarId};

/// Relation between a constraint's expression and its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    /// `expr == rhs`
    Eq,
    /// `expr <= rhs`
    Le,
    /// `expr >= rhs`
    Ge,
}

/// A linear constraint `expr (==|<=|>=) rhs`.
#[derive(Debug, Clone)]
pub struct Constraint {
    /// Constraint name, for diagnostics only.
    pub name: String,
    /// Left-hand side.
    pub expr: LinearExpr,
    /// Relation.
    pub comparison: Comparison,
    /// Right-hand side constant.
    pub rhs: f64,
}

impl Constraint {
    /// Whether `values` satisfies this constraint within `tolerance`.
    pub fn is_satisfied(&self, values: &[f64], tolerance: f64) -> bool {
        let lhs = self.expr.evaluate(values);
        match self.comparison {
            Comparison::Eq => (lhs - self.rhs).abs() <= tolerance,
            Comparison::Le => lhs <= self.rhs + tolerance,
            Comparison::Ge => lhs >= self.rhs - tolerance,
        }
    }
}

/// Optimization direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Sense {
    /// Larger objective values are better.
    #[default]
    Maximize,
    /// Smaller objective values are better.
    Minimize,
}

/// Objective function: a linear expression and a direction.
#[derive(Debug, Clone, Default)]
pub struct Objective {
    /// Direction.
    pub sense: Sense,
    /// Expression to optimize.
    pub expr: LinearExpr,
}

/// A binary integer linear program.
///
/// All variables are 0/1. Constraints are linear; the objective is linear
/// with a direction. An optional hint holds a complete assignment the
/// caller believes to be feasible, for solvers that need a fallback.
///
/// # Examples
///
/// ```
/// use u_roster::ilp::{IlpModel, LinearExpr, Sense};
///
/// let mut model = IlpModel::new("pick-one");
/// let a = model.add_bool_var("a");
/// let b = model.add_bool_var("b");
/// model.add_eq("one", LinearExpr::sum([a, b]), 1.0);
/// model.set_objective(Sense::Maximize, LinearExpr::new().with_term(a, 1.0).with_term(b, 2.0));
/// assert!(model.validate().is_ok());
/// assert!(model.is_feasible(&[0.0, 1.0], 1e-6));
/// ```
#[derive(Debug, Clone)]
pub struct IlpModel {
    /// Model name.
    pub name: String,
    /// Boolean variables, indexed by [`VarId`].
    pub vars: Vec<BoolVar>,
    /// Constraints.
    pub constraints: Vec<Constraint>,
    /// Objective function.
    pub objective: Objective,
    /// Warm-start / fallback assignment, one value per variable.
    pub hint: Option<Vec<f64>>,
}

impl IlpModel {
    /// Creates a new empty model with a zero maximization objective.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            vars: Vec::new(),
            constraints: Vec::new(),
            objective: Objective::default(),
            hint: None,
        }
    }

    /// Adds a boolean variable and returns its handle.
    pub fn add_bool_var(&mut self, name: impl Into<String>) -> VarId {
        let id = VarId(self.vars.len());
        self.vars.push(BoolVar::new(name));
        id
    }

    /// Adds a constraint.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    /// Convenience: add `expr == rhs`.
    pub fn add_eq(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.push(name, expr, Comparison::Eq, rhs);
    }

    /// Convenience: add `expr <= rhs`.
    pub fn add_le(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.push(name, expr, Comparison::Le, rhs);
    }

    /// Convenience: add `expr >= rhs`.
    pub fn add_ge(&mut self, name: impl Into<String>, expr: LinearExpr, rhs: f64) {
        self.push(name, expr, Comparison::Ge, rhs);
    }

    fn push(&mut self, name: impl Into<String>, expr: LinearExpr, comparison: Comparison, rhs: f64) {
        self.constraints.push(Constraint {
            name: name.into(),
            expr,
            comparison,
            rhs,
        });
    }

    /// Adds `z = a AND b` for binary `a`, `b` and returns `z`.
    ///
    /// Linearized as `z <= a`, `z <= b`, `z >= a + b - 1`.
    pub fn add_and(&mut self, name: impl Into<String>, a: VarId, b: VarId) -> VarId {
        let name = name.into();
        let z = self.add_bool_var(name.clone());
        self.add_le(
            format!("{name}/le_a"),
            LinearExpr::new().with_term(z, 1.0).with_term(a, -1.0),
            0.0,
        );
        self.add_le(
            format!("{name}/le_b"),
            LinearExpr::new().with_term(z, 1.0).with_term(b, -1.0),
            0.0,
        );
        self.add_ge(
            format!("{name}/ge_ab"),
            LinearExpr::new()
                .with_term(z, 1.0)
                .with_term(a, -1.0)
                .with_term(b, -1.0),
            -1.0,
        );
        z
    }

    /// Sets the objective function.
    pub fn set_objective(&mut self, sense: Sense, expr: LinearExpr) {
        self.objective = Objective { sense, expr };
    }

    /// Sets the fallback assignment.
    pub fn set_hint(&mut self, values: Vec<f64>) {
        self.hint = Some(values);
    }

    /// Validates the model for consistency.
    ///
    /// Checks that every referenced variable exists, every coefficient is
    /// finite, and the hint (if any) covers exactly the model's variables.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.vars.len();
        let check_expr = |what: &str, expr: &LinearExpr| -> Result<(), String> {
            for &(var, coef) in &expr.terms {
                if var.0 >= n {
                    return Err(format!("{what}: undefined variable {var}"));
                }
                if !coef.is_finite() {
                    return Err(format!("{what}: non-finite coefficient on {var}"));
                }
            }
            if !expr.constant.is_finite() {
                return Err(format!("{what}: non-finite constant"));
            }
            Ok(())
        };

        for c in &self.constraints {
            check_expr(&c.name, &c.expr)?;
            if !c.rhs.is_finite() {
                return Err(format!("{}: non-finite right-hand side", c.name));
            }
        }
        check_expr("objective", &self.objective.expr)?;

        if let Some(hint) = &self.hint {
            if hint.len() != n {
                return Err(format!(
                    "hint has {} values for {} variables",
                    hint.len(),
                    n
                ));
            }
        }
        Ok(())
    }

    /// Whether `values` is a 0/1 assignment satisfying every constraint.
    pub fn is_feasible(&self, values: &[f64], tolerance: f64) -> bool {
        values.len() == self.vars.len()
            && values
                .iter()
                .all(|&v| v.abs() <= tolerance || (v - 1.0).abs() <= tolerance)
            && self
                .constraints
                .iter()
                .all(|c| c.is_satisfied(values, tolerance))
    }

    /// Objective value of `values`.
    pub fn objective_value(&self, values: &[f64]) -> f64 {
        self.objective.expr.evaluate(values)
    }

    /// Returns the number of variables.
    pub fn var_count(&self) -> usize {
        self.vars.len()
    }

    /// Returns the number of constraints.
    pub fn constraint_count(&self) -> usize {
        self.constraints.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_creation() {
        let mut model = IlpModel::new("test");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        model.add_eq("pick", LinearExpr::sum([a, b]), 1.0);
        model.set_objective(Sense::Minimize, LinearExpr::new().with_term(b, 1.0));

        assert_eq!(model.var_count(), 2);
        assert_eq!(model.constraint_count(), 1);
        assert_eq!(model.objective.sense, Sense::Minimize);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_undefined_variable() {
        let mut model = IlpModel::new("test");
        model.add_ge("bad", LinearExpr::sum([VarId(3)]), 1.0);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_non_finite_coefficient() {
        let mut model = IlpModel::new("test");
        let a = model.add_bool_var("a");
        model.set_objective(Sense::Maximize, LinearExpr::new().with_term(a, f64::NAN));
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_hint_length_mismatch() {
        let mut model = IlpModel::new("test");
        model.add_bool_var("a");
        model.set_hint(vec![1.0, 0.0]);
        assert!(model.validate().is_err());
    }

    #[test]
    fn test_and_adds_three_constraints() {
        let mut model = IlpModel::new("test");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        let z = model.add_and("z", a, b);
        assert_eq!(z.index(), 2);
        assert_eq!(model.constraint_count(), 3);
        assert!(model.validate().is_ok());
    }

    #[test]
    fn test_and_truth_table() {
        let mut model = IlpModel::new("test");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        model.add_and("z", a, b);

        for a_val in [0.0, 1.0] {
            for b_val in [0.0, 1.0] {
                let and = if a_val == 1.0 && b_val == 1.0 { 1.0 } else { 0.0 };
                let not_and = 1.0 - and;
                assert!(model.is_feasible(&[a_val, b_val, and], 1e-9));
                assert!(
                    !model.is_feasible(&[a_val, b_val, not_and], 1e-9),
                    "z={not_and} accepted for a={a_val}, b={b_val}"
                );
            }
        }
    }

    #[test]
    fn test_is_feasible_rejects_fractional() {
        let mut model = IlpModel::new("test");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        model.add_eq("pick", LinearExpr::sum([a, b]), 1.0);
        assert!(!model.is_feasible(&[0.5, 0.5], 1e-6));
        assert!(model.is_feasible(&[1.0, 0.0], 1e-6));
        assert!(!model.is_feasible(&[1.0, 1.0], 1e-6));
    }

    #[test]
    fn test_objective_value() {
        let mut model = IlpModel::new("test");
        let a = model.add_bool_var("a");
        let b = model.add_bool_var("b");
        model.set_objective(
            Sense::Maximize,
            LinearExpr::new().with_term(a, 3.0).with_term(b, 5.0),
        );
        assert_eq!(model.objective_value(&[1.0, 1.0]), 8.0);
    }

    #[test]
    fn test_constraint_comparisons() {
        let expr = LinearExpr::sum([VarId(0)]);
        let le = Constraint {
            name: "le".into(),
            expr: expr.clone(),
            comparison: Comparison::Le,
            rhs: 0.0,
        };
        let ge = Constraint {
            name: "ge".into(),
            expr,
            comparison: Comparison::Ge,
            rhs: 1.0,
        };
        assert!(le.is_satisfied(&[0.0], 1e-9));
        assert!(!le.is_satisfied(&[1.0], 1e-9));
        assert!(ge.is_satisfied(&[1.0], 1e-9));
        assert!(!ge.is_satisfied(&[0.0], 1e-9));
    }
}
