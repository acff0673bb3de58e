use std::result::Result as StdResult;

use thiserror::Error;

use crate::domain::{CategoryId, ExpenseId};

/// Rejections raised at the store's validation boundary.
///
/// Every variant is recoverable by correcting the input; the store keeps its
/// last valid state whenever one is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("All fields are required")]
    MissingFields,
    #[error("Budget is insufficient: {required:.2} required, {available:.2} available")]
    OverBudget { required: f64, available: f64 },
    #[error("Budget must be a number greater than zero (got {0})")]
    InvalidBudget(f64),
    #[error("Unknown category `{0}`")]
    UnknownCategory(CategoryId),
    #[error("Expense {0} not found")]
    ExpenseNotFound(ExpenseId),
    #[error("Inconsistent state: {0}")]
    InconsistentState(String),
}

impl ValidationError {
    /// Stable kebab-case identifier of the failure.
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationError::MissingFields => "missing-fields",
            ValidationError::OverBudget { .. } => "over-budget",
            ValidationError::InvalidBudget(_) => "invalid-budget",
            ValidationError::UnknownCategory(_) => "unknown-category",
            ValidationError::ExpenseNotFound(_) => "expense-not-found",
            ValidationError::InconsistentState(_) => "inconsistent-state",
        }
    }
}

pub type Result<T> = StdResult<T, ValidationError>;
