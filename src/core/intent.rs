//! The action vocabulary accepted by the store.

use crate::domain::{CategoryId, DraftExpense, Expense, ExpenseId};

/// A request to transition the budget state.
#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetBudget(f64),
    AddExpense(DraftExpense),
    BeginEdit(ExpenseId),
    CancelEdit,
    UpdateExpense { id: ExpenseId, draft: DraftExpense },
    RemoveExpense(ExpenseId),
    SetCategoryFilter(Option<CategoryId>),
    Reset,
}

impl Intent {
    pub fn name(&self) -> &'static str {
        match self {
            Intent::SetBudget(_) => "set-budget",
            Intent::AddExpense(_) => "add-expense",
            Intent::BeginEdit(_) => "begin-edit",
            Intent::CancelEdit => "cancel-edit",
            Intent::UpdateExpense { .. } => "update-expense",
            Intent::RemoveExpense(_) => "remove-expense",
            Intent::SetCategoryFilter(_) => "set-category-filter",
            Intent::Reset => "reset",
        }
    }
}

/// What an accepted intent did.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    BudgetSet(f64),
    ExpenseAdded(ExpenseId),
    EditStarted(ExpenseId),
    EditCancelled,
    ExpenseUpdated(ExpenseId),
    ExpenseRemoved(Expense),
    FilterChanged(Option<CategoryId>),
    Reset,
    /// The intent targeted something absent and was ignored.
    Unchanged,
}
