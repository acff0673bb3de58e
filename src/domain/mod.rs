//! Domain types for expenses and the category catalog.

pub mod category;
pub mod common;
pub mod expense;

pub use category::{Category, CategoryCatalog, CategoryId};
pub use common::{Amounted, BelongsToCategory, NamedEntity};
pub use expense::{DraftExpense, Expense, ExpenseId};
