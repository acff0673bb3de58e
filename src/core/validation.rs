//! Pure predicates guarding every mutating intent.
//!
//! Nothing here caches: each check recomputes the totals from the state it is
//! handed, so a rejected intent can never be caused by a stale counter.

use crate::core::intent::Intent;
use crate::core::selectors::{remaining_budget, total_spent};
use crate::core::state::BudgetState;
use crate::domain::{CategoryCatalog, DraftExpense, ExpenseId};
use crate::errors::{Result, ValidationError};

/// Slack allowed when comparing summed floating point amounts.
pub const AMOUNT_TOLERANCE: f64 = 1e-9;

pub(crate) fn exceeds(required: f64, available: f64) -> bool {
    required - available > AMOUNT_TOLERANCE
}

/// Accepts finite amounts strictly greater than zero.
pub fn validate_budget_value(amount: f64) -> Result<f64> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(ValidationError::InvalidBudget(amount))
    }
}

/// Whether the budget form should allow submitting `amount`.
pub fn can_submit_budget(amount: f64) -> bool {
    validate_budget_value(amount).is_ok()
}

/// Field completeness first, then the category lookup.
pub fn validate_draft(draft: &DraftExpense, catalog: &CategoryCatalog) -> Result<()> {
    if !draft.is_complete() {
        return Err(ValidationError::MissingFields);
    }
    if !catalog.contains(&draft.category) {
        return Err(ValidationError::UnknownCategory(draft.category.clone()));
    }
    Ok(())
}

/// Checks that recording `amount` fits the remaining budget.
///
/// When `replacing` names an existing expense, its current amount is released
/// first. The previous amount is always read from `state`, never remembered
/// from when editing began.
pub fn ensure_budget_covers(
    state: &BudgetState,
    amount: f64,
    replacing: Option<ExpenseId>,
) -> Result<()> {
    let previous = replacing
        .and_then(|id| state.expense(id))
        .map_or(0.0, |expense| expense.amount);
    let required = amount - previous;
    let available = remaining_budget(state);
    if exceeds(required, available) {
        return Err(ValidationError::OverBudget {
            required,
            available,
        });
    }
    Ok(())
}

/// Decides whether `intent` may be applied to `state`.
pub fn validate(state: &BudgetState, intent: &Intent, catalog: &CategoryCatalog) -> Result<()> {
    match intent {
        Intent::SetBudget(amount) => {
            let amount = validate_budget_value(*amount)?;
            let spent = total_spent(state);
            if exceeds(spent, amount) {
                return Err(ValidationError::OverBudget {
                    required: spent,
                    available: amount,
                });
            }
            Ok(())
        }
        Intent::AddExpense(draft) => {
            validate_draft(draft, catalog)?;
            ensure_budget_covers(state, draft.amount, None)
        }
        Intent::UpdateExpense { id, draft } => {
            if state.expense(*id).is_none() {
                return Err(ValidationError::ExpenseNotFound(*id));
            }
            validate_draft(draft, catalog)?;
            ensure_budget_covers(state, draft.amount, Some(*id))
        }
        Intent::BeginEdit(_)
        | Intent::CancelEdit
        | Intent::RemoveExpense(_)
        | Intent::SetCategoryFilter(_)
        | Intent::Reset => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Expense, ExpenseId};
    use chrono::NaiveDate;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn state_with(budget: f64, amounts: &[f64]) -> BudgetState {
        let expenses = amounts
            .iter()
            .map(|amount| {
                let draft = DraftExpense::new("Item", *amount, "food", date());
                Expense::from_draft(ExpenseId::new(), &draft, date())
            })
            .collect();
        BudgetState {
            budget,
            expenses,
            ..BudgetState::default()
        }
    }

    #[test]
    fn budget_must_be_positive_and_finite() {
        assert!(can_submit_budget(200.0));
        assert!(!can_submit_budget(0.0));
        assert!(!can_submit_budget(-5.0));
        assert!(!can_submit_budget(f64::NAN));
        assert!(!can_submit_budget(f64::INFINITY));
    }

    #[test]
    fn completeness_is_checked_before_budget() {
        let state = state_with(10.0, &[]);
        let draft = DraftExpense::new("", 500.0, "food", date());
        let err = validate(&state, &Intent::AddExpense(draft), &CategoryCatalog::builtin())
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingFields);
    }

    #[test]
    fn unknown_category_is_rejected() {
        let state = state_with(100.0, &[]);
        let draft = DraftExpense::new("Bus", 5.0, "transport", date());
        let err = validate(&state, &Intent::AddExpense(draft), &CategoryCatalog::builtin())
            .unwrap_err();
        assert_eq!(err.kind(), "unknown-category");
    }

    #[test]
    fn replacing_releases_previous_amount() {
        let state = state_with(100.0, &[30.0, 60.0]);
        let id = state.expenses[0].id;
        assert!(ensure_budget_covers(&state, 40.0, Some(id)).is_ok());
        assert!(ensure_budget_covers(&state, 40.0, None).is_err());
    }

    #[test]
    fn tolerance_absorbs_float_drift() {
        let state = state_with(0.3, &[0.1]);
        assert!(ensure_budget_covers(&state, 0.2, None).is_ok());
    }

    #[test]
    fn lowering_budget_below_spent_is_rejected() {
        let state = state_with(100.0, &[90.0]);
        let err = validate(&state, &Intent::SetBudget(50.0), &CategoryCatalog::builtin())
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::OverBudget {
                required: 90.0,
                available: 50.0
            }
        );
    }
}
