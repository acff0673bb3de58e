//! The budget state machine: intents, validation, reducer, and selectors.

pub mod intent;
pub mod reducer;
pub mod selectors;
pub mod state;
pub mod store;
pub mod validation;

pub use intent::{Intent, Outcome};
pub use reducer::apply;
pub use state::{BudgetState, EditMode};
pub use store::BudgetStore;
pub use validation::{can_submit_budget, AMOUNT_TOLERANCE};
