//! Error taxonomy for the assignment pipeline.

use crate::ilp::SolverStatus;
use std::fmt;
use thiserror::Error;

/// Which optimization pass produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassKind {
    /// The partitioned batch with both category quotas.
    Main,
    /// Leftover competitors regrouped with the category-B quota waived.
    Reserve,
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassKind::Main => f.write_str("main"),
            PassKind::Reserve => f.write_str("reserve"),
        }
    }
}

/// Pipeline stage an error originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    Partition,
    Optimize(PassKind),
    Extract(PassKind),
    ReserveMatch,
}

/// Errors surfaced by [`TeamAssigner`](crate::assign::TeamAssigner).
///
/// None of these are retried: each describes a structural problem with the
/// roster or the model, not a transient failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssignError {
    #[error("invalid roster: {0}")]
    InvalidInput(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(
        "cannot balance roster: {needed} category-A competitors must be excluded but only {available} are available"
    )]
    CategoryImbalance { needed: usize, available: usize },

    #[error("no team can be formed; {} competitor(s) left unplaced", .unplaced.len())]
    NoTeams { unplaced: Vec<String> },

    #[error("{pass} pass failed: solver status {status}{}", detail_suffix(.detail))]
    Infeasible {
        pass: PassKind,
        status: SolverStatus,
        detail: Option<String>,
    },

    #[error("{pass} pass returned a malformed solution: {reason}")]
    MalformedSolution { pass: PassKind, reason: String },

    #[error("no eligible team for reserve '{name}'")]
    ReserveExhaustion { name: String },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_deref()
        .map(|d| format!(" ({d})"))
        .unwrap_or_default()
}

impl AssignError {
    /// The stage this error belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            AssignError::InvalidInput(_) | AssignError::InvalidConfig(_) => Stage::Input,
            AssignError::CategoryImbalance { .. } | AssignError::NoTeams { .. } => {
                Stage::Partition
            }
            AssignError::Infeasible { pass, .. } => Stage::Optimize(*pass),
            AssignError::MalformedSolution { pass, .. } => Stage::Extract(*pass),
            AssignError::ReserveExhaustion { .. } => Stage::ReserveMatch,
        }
    }
}
