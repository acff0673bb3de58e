//! The store instance that owns a session's state.

use tracing::{debug, warn};

use crate::core::intent::{Intent, Outcome};
use crate::core::reducer::apply;
use crate::core::selectors;
use crate::core::state::{BudgetState, EditMode};
use crate::domain::{Category, CategoryCatalog, Expense};
use crate::errors::Result;

/// Owns the session's budget state and is the only place it changes.
///
/// Presentation code calls [`BudgetStore::dispatch`] and reads back through
/// the selector methods; every selector recomputes from the current snapshot.
#[derive(Debug, Clone)]
pub struct BudgetStore {
    state: BudgetState,
    catalog: CategoryCatalog,
}

impl BudgetStore {
    pub fn new(catalog: CategoryCatalog) -> Self {
        Self {
            state: BudgetState::new(),
            catalog,
        }
    }

    /// Starts from an injected state after checking its invariants.
    pub fn with_state(catalog: CategoryCatalog, state: BudgetState) -> Result<Self> {
        state.check_invariants()?;
        Ok(Self { state, catalog })
    }

    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    /// Validates and applies `intent`. On error the state is left as it was.
    pub fn dispatch(&mut self, intent: Intent) -> Result<Outcome> {
        debug!(intent = intent.name(), "dispatching intent");
        match apply(&self.state, &intent, &self.catalog) {
            Ok((next, outcome)) => {
                self.state = next;
                debug!(intent = intent.name(), ?outcome, "intent applied");
                Ok(outcome)
            }
            Err(err) => {
                warn!(intent = intent.name(), kind = err.kind(), "intent rejected: {err}");
                Err(err)
            }
        }
    }

    pub fn budget(&self) -> f64 {
        self.state.budget
    }

    pub fn expenses(&self) -> &[Expense] {
        &self.state.expenses
    }

    pub fn total_spent(&self) -> f64 {
        selectors::total_spent(&self.state)
    }

    pub fn remaining_budget(&self) -> f64 {
        selectors::remaining_budget(&self.state)
    }

    pub fn spent_percentage(&self) -> f64 {
        selectors::spent_percentage(&self.state)
    }

    pub fn visible_expenses(&self) -> Vec<&Expense> {
        selectors::visible_expenses(&self.state)
    }

    pub fn editing_expense(&self) -> Option<&Expense> {
        selectors::editing_expense(&self.state)
    }

    pub fn edit_mode(&self) -> EditMode {
        self.state.edit_mode()
    }

    pub fn is_budget_defined(&self) -> bool {
        selectors::is_budget_defined(&self.state)
    }

    pub fn category_of(&self, expense: &Expense) -> Option<&Category> {
        self.catalog.find(&expense.category)
    }
}

impl Default for BudgetStore {
    fn default() -> Self {
        Self::new(CategoryCatalog::builtin())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DraftExpense, ExpenseId};
    use crate::errors::ValidationError;
    use chrono::NaiveDate;

    fn draft(name: &str, amount: f64, category: &str) -> DraftExpense {
        let date = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();
        DraftExpense::new(name, amount, category, date)
    }

    #[test]
    fn rejected_intent_keeps_state() {
        let mut store = BudgetStore::default();
        store.dispatch(Intent::SetBudget(100.0)).unwrap();
        let before = store.state().clone();

        let err = store
            .dispatch(Intent::AddExpense(draft("Sofa", 150.0, "home")))
            .unwrap_err();

        assert_eq!(err.kind(), "over-budget");
        assert_eq!(store.state(), &before);
    }

    #[test]
    fn failed_update_keeps_editing_id() {
        let mut store = BudgetStore::default();
        store.dispatch(Intent::SetBudget(100.0)).unwrap();
        let Outcome::ExpenseAdded(id) = store
            .dispatch(Intent::AddExpense(draft("Cinema", 30.0, "leisure")))
            .unwrap()
        else {
            panic!("expected an added expense");
        };
        store.dispatch(Intent::BeginEdit(id)).unwrap();

        let err = store
            .dispatch(Intent::UpdateExpense {
                id,
                draft: draft("", 30.0, "leisure"),
            })
            .unwrap_err();

        assert_eq!(err, ValidationError::MissingFields);
        assert_eq!(store.edit_mode(), EditMode::Editing(id));
        assert_eq!(store.editing_expense().map(|e| e.id), Some(id));
    }

    #[test]
    fn update_of_unknown_expense_is_rejected() {
        let mut store = BudgetStore::default();
        store.dispatch(Intent::SetBudget(100.0)).unwrap();
        let id = ExpenseId::new();
        let err = store
            .dispatch(Intent::UpdateExpense {
                id,
                draft: draft("Gym", 20.0, "health"),
            })
            .unwrap_err();
        assert_eq!(err, ValidationError::ExpenseNotFound(id));
    }

    #[test]
    fn with_state_rejects_broken_invariants() {
        let state = BudgetState {
            budget: 10.0,
            editing_id: Some(ExpenseId::new()),
            ..BudgetState::default()
        };
        let err = BudgetStore::with_state(CategoryCatalog::builtin(), state).unwrap_err();
        assert_eq!(err.kind(), "inconsistent-state");
    }

    #[test]
    fn category_of_resolves_through_catalog() {
        let mut store = BudgetStore::default();
        store.dispatch(Intent::SetBudget(100.0)).unwrap();
        store
            .dispatch(Intent::AddExpense(draft("Netflix", 12.0, "subscriptions")))
            .unwrap();
        let expense = &store.expenses()[0];
        assert_eq!(store.category_of(expense).unwrap().name, "Subscriptions");
    }
}
