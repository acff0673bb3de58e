//! Canonical budget state and its invariants.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::core::validation::{exceeds, validate_budget_value};
use crate::domain::common::total_amount;
use crate::domain::{CategoryId, Expense, ExpenseId};
use crate::errors::{Result, ValidationError};

/// Whether an expense is currently loaded into the entry form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Idle,
    Editing(ExpenseId),
}

impl EditMode {
    pub fn is_editing(&self) -> bool {
        matches!(self, EditMode::Editing(_))
    }
}

/// Everything the store owns. Readers only ever see it through `&`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BudgetState {
    pub budget: f64,
    #[serde(default)]
    pub expenses: Vec<Expense>,
    #[serde(default)]
    pub editing_id: Option<ExpenseId>,
    #[serde(default)]
    pub current_category: Option<CategoryId>,
}

impl BudgetState {
    /// Session start: no budget, no expenses, nothing edited or filtered.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn edit_mode(&self) -> EditMode {
        match self.editing_id {
            Some(id) => EditMode::Editing(id),
            None => EditMode::Idle,
        }
    }

    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    pub(crate) fn position(&self, id: ExpenseId) -> Option<usize> {
        self.expenses.iter().position(|expense| expense.id == id)
    }

    /// Checks every state invariant, used when a state is injected from outside.
    pub fn check_invariants(&self) -> Result<()> {
        if self.budget != 0.0 {
            validate_budget_value(self.budget)?;
        }

        for expense in &self.expenses {
            if !expense.amount.is_finite() || expense.amount <= 0.0 {
                return Err(ValidationError::InconsistentState(format!(
                    "expense {} has amount {}",
                    expense.id, expense.amount
                )));
            }
            if expense.expense_name.trim().is_empty() || expense.category.is_blank() {
                return Err(ValidationError::InconsistentState(format!(
                    "expense {} is missing a name or category",
                    expense.id
                )));
            }
        }

        let spent = total_amount(&self.expenses);
        if exceeds(spent, self.budget) {
            return Err(ValidationError::OverBudget {
                required: spent,
                available: self.budget,
            });
        }

        let mut seen = HashSet::with_capacity(self.expenses.len());
        for expense in &self.expenses {
            if !seen.insert(expense.id) {
                return Err(ValidationError::InconsistentState(format!(
                    "duplicate expense id {}",
                    expense.id
                )));
            }
        }

        if let Some(id) = self.editing_id {
            if !seen.contains(&id) {
                return Err(ValidationError::InconsistentState(format!(
                    "editing id {} does not reference an expense",
                    id
                )));
            }
        }

        Ok(())
    }
}
