//! Values derived from a state snapshot on every read.

use crate::core::state::BudgetState;
use crate::domain::common::total_amount;
use crate::domain::{BelongsToCategory, Expense};

pub fn total_spent(state: &BudgetState) -> f64 {
    total_amount(&state.expenses)
}

pub fn remaining_budget(state: &BudgetState) -> f64 {
    state.budget - total_spent(state)
}

/// Share of the budget already spent, `0.0` while no budget is defined.
pub fn spent_percentage(state: &BudgetState) -> f64 {
    if state.budget == 0.0 {
        return 0.0;
    }
    100.0 * total_spent(state) / state.budget
}

/// Expenses passing the active category filter, in insertion order.
pub fn visible_expenses(state: &BudgetState) -> Vec<&Expense> {
    match &state.current_category {
        None => state.expenses.iter().collect(),
        Some(category) => state
            .expenses
            .iter()
            .filter(|expense| expense.category_id() == category)
            .collect(),
    }
}

pub fn editing_expense(state: &BudgetState) -> Option<&Expense> {
    state.editing_id.and_then(|id| state.expense(id))
}

pub fn is_budget_defined(state: &BudgetState) -> bool {
    state.budget > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DraftExpense, ExpenseId};
    use chrono::NaiveDate;

    fn expense(amount: f64, category: &str) -> Expense {
        let date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let draft = DraftExpense::new("Item", amount, category, date);
        Expense::from_draft(ExpenseId::new(), &draft, date)
    }

    #[test]
    fn percentage_is_zero_without_budget() {
        let state = BudgetState::new();
        assert_eq!(spent_percentage(&state), 0.0);
        assert!(!is_budget_defined(&state));
    }

    #[test]
    fn percentage_tracks_spending() {
        let state = BudgetState {
            budget: 200.0,
            expenses: vec![expense(50.0, "food"), expense(25.0, "home")],
            ..BudgetState::default()
        };
        assert_eq!(total_spent(&state), 75.0);
        assert_eq!(remaining_budget(&state), 125.0);
        assert!((spent_percentage(&state) - 37.5).abs() < f64::EPSILON);
    }

    #[test]
    fn filter_preserves_insertion_order() {
        let first = expense(1.0, "food");
        let second = expense(2.0, "home");
        let third = expense(3.0, "food");
        let state = BudgetState {
            budget: 10.0,
            expenses: vec![first.clone(), second, third.clone()],
            current_category: Some("food".into()),
            ..BudgetState::default()
        };
        let visible = visible_expenses(&state);
        assert_eq!(visible, vec![&first, &third]);
    }
}
