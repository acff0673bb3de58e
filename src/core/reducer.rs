//! State transitions. `apply` validates then reduces; `reduce` never fails.

use crate::core::intent::{Intent, Outcome};
use crate::core::state::BudgetState;
use crate::core::validation::validate;
use crate::domain::{CategoryCatalog, DraftExpense, Expense, ExpenseId};
use crate::errors::Result;

/// Computes the state that follows `intent`, leaving `state` untouched.
pub fn apply(
    state: &BudgetState,
    intent: &Intent,
    catalog: &CategoryCatalog,
) -> Result<(BudgetState, Outcome)> {
    validate(state, intent, catalog)?;
    Ok(reduce(state, intent))
}

/// Unconditional apply step. Assumes `intent` already passed validation.
pub(crate) fn reduce(state: &BudgetState, intent: &Intent) -> (BudgetState, Outcome) {
    let mut next = state.clone();
    let outcome = match intent {
        Intent::SetBudget(amount) => {
            next.budget = *amount;
            Outcome::BudgetSet(*amount)
        }
        Intent::AddExpense(draft) => match draft.date {
            Some(date) => {
                let id = ExpenseId::new();
                next.expenses.push(Expense::from_draft(id, draft, date));
                Outcome::ExpenseAdded(id)
            }
            None => Outcome::Unchanged,
        },
        Intent::BeginEdit(id) => {
            if next.expense(*id).is_some() {
                next.editing_id = Some(*id);
                Outcome::EditStarted(*id)
            } else {
                Outcome::Unchanged
            }
        }
        Intent::CancelEdit => match next.editing_id.take() {
            Some(_) => Outcome::EditCancelled,
            None => Outcome::Unchanged,
        },
        Intent::UpdateExpense { id, draft } => replace_expense(&mut next, *id, draft),
        Intent::RemoveExpense(id) => match next.position(*id) {
            Some(index) => {
                let removed = next.expenses.remove(index);
                if next.editing_id == Some(*id) {
                    next.editing_id = None;
                }
                Outcome::ExpenseRemoved(removed)
            }
            None => Outcome::Unchanged,
        },
        Intent::SetCategoryFilter(category) => {
            next.current_category = category.clone();
            Outcome::FilterChanged(category.clone())
        }
        Intent::Reset => {
            next = BudgetState::new();
            Outcome::Reset
        }
    };
    (next, outcome)
}

fn replace_expense(state: &mut BudgetState, id: ExpenseId, draft: &DraftExpense) -> Outcome {
    let (Some(index), Some(date)) = (state.position(id), draft.date) else {
        return Outcome::Unchanged;
    };
    state.expenses[index] = Expense::from_draft(id, draft, date);
    state.editing_id = None;
    Outcome::ExpenseUpdated(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(amount: f64, category: &str) -> DraftExpense {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        DraftExpense::new("Groceries", amount, category, date)
    }

    fn funded(budget: f64) -> BudgetState {
        BudgetState {
            budget,
            ..BudgetState::default()
        }
    }

    #[test]
    fn apply_leaves_input_state_untouched() {
        let catalog = CategoryCatalog::builtin();
        let state = funded(100.0);
        let (next, outcome) =
            apply(&state, &Intent::AddExpense(draft(40.0, "food")), &catalog).unwrap();
        assert!(state.expenses.is_empty());
        assert_eq!(next.expenses.len(), 1);
        assert!(matches!(outcome, Outcome::ExpenseAdded(id) if id == next.expenses[0].id));
    }

    #[test]
    fn update_preserves_id_and_position() {
        let catalog = CategoryCatalog::builtin();
        let (state, _) =
            apply(&funded(100.0), &Intent::AddExpense(draft(10.0, "food")), &catalog).unwrap();
        let (state, _) = apply(&state, &Intent::AddExpense(draft(20.0, "home")), &catalog).unwrap();
        let id = state.expenses[0].id;

        let mut changed = draft(15.0, "health");
        changed.expense_name = "Pharmacy".into();
        let (next, outcome) = apply(
            &state,
            &Intent::UpdateExpense { id, draft: changed },
            &catalog,
        )
        .unwrap();

        assert_eq!(outcome, Outcome::ExpenseUpdated(id));
        assert_eq!(next.expenses[0].id, id);
        assert_eq!(next.expenses[0].expense_name, "Pharmacy");
        assert_eq!(next.expenses[0].category.as_str(), "health");
        assert_eq!(next.expenses[1], state.expenses[1]);
    }

    #[test]
    fn begin_edit_on_missing_id_is_a_no_op() {
        let state = funded(10.0);
        let (next, outcome) = reduce(&state, &Intent::BeginEdit(ExpenseId::new()));
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(next, state);
    }

    #[test]
    fn cancel_edit_returns_to_idle() {
        let catalog = CategoryCatalog::builtin();
        let (state, _) =
            apply(&funded(50.0), &Intent::AddExpense(draft(5.0, "food")), &catalog).unwrap();
        let id = state.expenses[0].id;
        let (editing, _) = reduce(&state, &Intent::BeginEdit(id));
        assert_eq!(editing.editing_id, Some(id));

        let (idle, outcome) = reduce(&editing, &Intent::CancelEdit);
        assert_eq!(outcome, Outcome::EditCancelled);
        assert!(idle.editing_id.is_none());
        assert_eq!(idle.expenses, editing.expenses);
    }

    #[test]
    fn reset_returns_to_initial_state() {
        let catalog = CategoryCatalog::builtin();
        let (state, _) =
            apply(&funded(50.0), &Intent::AddExpense(draft(5.0, "food")), &catalog).unwrap();
        let (state, _) = reduce(&state, &Intent::SetCategoryFilter(Some("food".into())));
        let (next, outcome) = reduce(&state, &Intent::Reset);
        assert_eq!(outcome, Outcome::Reset);
        assert_eq!(next, BudgetState::new());
    }
}
