//! ILP variable and expression types.

use std::fmt;

/// Handle to a variable inside an [`IlpModel`](super::IlpModel).
///
/// Handles are dense indices in creation order, so solver values can be
/// stored in a plain `Vec<f64>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub(crate) usize);

impl VarId {
    /// Position of this variable in the model's variable list.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// A binary (0/1) decision variable.
#[derive(Debug, Clone)]
pub struct BoolVar {
    /// Variable name, for diagnostics only.
    pub name: String,
}

impl BoolVar {
    /// Creates a new boolean variable.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A linear combination of variables plus a constant.
///
/// # Examples
///
/// ```
/// use u_roster::ilp::{IlpModel, LinearExpr};
///
/// let mut model = IlpModel::new("example");
/// let a = model.add_bool_var("a");
/// let b = model.add_bool_var("b");
///
/// let expr = LinearExpr::new().with_term(a, 2.0).with_term(b, 3.0);
/// assert_eq!(expr.evaluate(&[1.0, 1.0]), 5.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinearExpr {
    /// (variable, coefficient) pairs. Duplicates are summed by solvers.
    pub terms: Vec<(VarId, f64)>,
    /// Constant offset.
    pub constant: f64,
}

impl LinearExpr {
    /// Creates an empty expression (value 0).
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty expression with room for `n` terms.
    pub fn with_capacity(n: usize) -> Self {
        Self {
            terms: Vec::with_capacity(n),
            constant: 0.0,
        }
    }

    /// Sum of `vars`, each with coefficient 1.
    pub fn sum<I: IntoIterator<Item = VarId>>(vars: I) -> Self {
        Self {
            terms: vars.into_iter().map(|v| (v, 1.0)).collect(),
            constant: 0.0,
        }
    }

    /// Appends `coefficient * var`.
    pub fn add_term(&mut self, var: VarId, coefficient: f64) {
        self.terms.push((var, coefficient));
    }

    /// Builder form of [`add_term`](Self::add_term).
    pub fn with_term(mut self, var: VarId, coefficient: f64) -> Self {
        self.add_term(var, coefficient);
        self
    }

    /// Adds to the constant offset.
    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant += constant;
        self
    }

    /// Whether the expression has no variable terms.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Evaluates the expression against a dense value vector.
    ///
    /// Variables outside `values` count as 0.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.constant
            + self
                .terms
                .iter()
                .map(|&(v, c)| c * values.get(v.0).copied().unwrap_or(0.0))
                .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum_has_unit_coefficients() {
        let e = LinearExpr::sum([VarId(0), VarId(2)]);
        assert_eq!(e.terms, vec![(VarId(0), 1.0), (VarId(2), 1.0)]);
        assert_eq!(e.evaluate(&[1.0, 1.0, 1.0]), 2.0);
    }

    #[test]
    fn test_evaluate_with_constant() {
        let e = LinearExpr::new()
            .with_term(VarId(0), -1.0)
            .with_term(VarId(1), 4.0)
            .with_constant(2.5);
        assert!((e.evaluate(&[1.0, 0.5]) - 3.5).abs() < 1e-12);
    }

    #[test]
    fn test_evaluate_missing_values_are_zero() {
        let e = LinearExpr::new().with_term(VarId(5), 3.0);
        assert_eq!(e.evaluate(&[]), 0.0);
        assert!(!e.is_empty());
        assert!(LinearExpr::new().is_empty());
    }

    #[test]
    fn test_var_id_display() {
        assert_eq!(VarId(12).to_string(), "v12");
        assert_eq!(VarId(3).index(), 3);
    }
}
