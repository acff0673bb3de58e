#![doc(test(attr(deny(warnings))))]

//! Budget Store keeps a spending budget and the expenses recorded against it.
//!
//! All state lives in a [`BudgetStore`](core::BudgetStore). Callers send it
//! [`Intent`](core::Intent)s and read derived values back; the store refuses
//! any intent that would push total spending past the budget.
//!
//! ```
//! use budget_store::core::{BudgetStore, Intent};
//! use budget_store::domain::DraftExpense;
//! use chrono::NaiveDate;
//!
//! let mut store = BudgetStore::default();
//! store.dispatch(Intent::SetBudget(100.0)).unwrap();
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
//! store
//!     .dispatch(Intent::AddExpense(DraftExpense::new("Lunch", 40.0, "food", date)))
//!     .unwrap();
//! assert_eq!(store.remaining_budget(), 60.0);
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod utils;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("Budget Store tracing initialized.");
    });
}
