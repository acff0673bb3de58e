//! Expense records and the draft handed over by the entry form.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::category::CategoryId;
use crate::domain::common::{Amounted, BelongsToCategory, NamedEntity};

/// Identity assigned to an expense when it is recorded. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseId(Uuid);

impl ExpenseId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// First eight hex digits, enough to tell expenses apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for ExpenseId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for ExpenseId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for ExpenseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A recorded expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,
    pub expense_name: String,
    pub amount: f64,
    pub category: CategoryId,
    pub date: NaiveDate,
}

impl Expense {
    /// Materialises a validated draft under the given identity.
    pub(crate) fn from_draft(id: ExpenseId, draft: &DraftExpense, date: NaiveDate) -> Self {
        Self {
            id,
            expense_name: draft.expense_name.trim().to_string(),
            amount: draft.amount,
            category: draft.category.clone(),
            date,
        }
    }
}

impl NamedEntity for Expense {
    fn name(&self) -> &str {
        &self.expense_name
    }
}

impl Amounted for Expense {
    fn amount(&self) -> f64 {
        self.amount
    }
}

impl BelongsToCategory for Expense {
    fn category_id(&self) -> &CategoryId {
        &self.category
    }
}

/// Expense fields as supplied by the entry form, before identity exists.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DraftExpense {
    pub expense_name: String,
    pub amount: f64,
    pub category: CategoryId,
    pub date: Option<NaiveDate>,
}

impl DraftExpense {
    pub fn new(
        expense_name: impl Into<String>,
        amount: f64,
        category: impl Into<CategoryId>,
        date: NaiveDate,
    ) -> Self {
        Self {
            expense_name: expense_name.into(),
            amount,
            category: category.into(),
            date: Some(date),
        }
    }

    /// Every field is filled in and the amount is a positive number.
    pub fn is_complete(&self) -> bool {
        !self.expense_name.trim().is_empty()
            && self.amount.is_finite()
            && self.amount > 0.0
            && !self.category.is_blank()
            && self.date.is_some()
    }
}

impl From<&Expense> for DraftExpense {
    fn from(expense: &Expense) -> Self {
        Self {
            expense_name: expense.expense_name.clone(),
            amount: expense.amount,
            category: expense.category.clone(),
            date: Some(expense.date),
        }
    }
}
