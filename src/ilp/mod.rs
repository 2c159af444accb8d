//! Binary integer linear programming (ILP) layer.
//!
//! Provides a small, solver-independent model for 0/1 decision problems:
//! boolean variables, linear constraints, and a linear objective with a
//! direction. The [`IlpSolver`] trait is the seam to the external solver;
//! [`MicroLpSolver`] implements it on top of `good_lp`.
//!
//! # Key Components
//!
//! - **Variables**: [`BoolVar`] addressed by [`VarId`], combined in [`LinearExpr`]
//! - **Constraints**: [`Constraint`] with [`Comparison`] `==`, `<=`, `>=`
//! - **Model**: [`IlpModel`]: container for variables, constraints, objective,
//!   and an optional fallback hint; [`IlpModel::add_and`] linearizes the
//!   conjunction of two binaries
//! - **Solver**: [`IlpSolver`] trait, [`SolverConfig`], [`IlpSolution`]
//!
//! # References
//!
//! Wolsey (1998), "Integer Programming", ch. 1 (logical conditions as
//! linear inequalities)

mod model;
mod solver;
mod variables;

pub use model::{Comparison, Constraint, IlpModel, Objective, Sense};
pub use solver::{IlpSolution, IlpSolver, MicroLpSolver, SolverConfig, SolverStatus};
pub use variables::{BoolVar, LinearExpr, VarId};
