//! Static category reference data.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::common::NamedEntity;

/// Identifier referencing an entry of the category catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(String);

impl CategoryId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<&str> for CategoryId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for CategoryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single `{id, name, icon}` record of the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub icon: String,
}

impl Category {
    pub fn new(id: impl Into<String>, name: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            id: CategoryId::new(id),
            name: name.into(),
            icon: icon.into(),
        }
    }
}

impl NamedEntity for Category {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered, read-only lookup table of categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "Vec<Category>", from = "Vec<Category>")]
pub struct CategoryCatalog {
    categories: Vec<Category>,
}

impl CategoryCatalog {
    /// Builds a catalog, keeping the first record for any repeated id.
    pub fn new(categories: Vec<Category>) -> Self {
        let mut unique: Vec<Category> = Vec::with_capacity(categories.len());
        for category in categories {
            if !unique.iter().any(|existing| existing.id == category.id) {
                unique.push(category);
            }
        }
        Self { categories: unique }
    }

    /// The catalog shipped with the application.
    pub fn builtin() -> Self {
        Self::new(vec![
            Category::new("savings", "Savings", "savings"),
            Category::new("food", "Food", "food"),
            Category::new("home", "Home", "home"),
            Category::new("expenses", "Miscellaneous Expenses", "expenses"),
            Category::new("leisure", "Leisure", "leisure"),
            Category::new("health", "Health", "health"),
            Category::new("subscriptions", "Subscriptions", "subscriptions"),
        ])
    }

    pub fn find(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|category| &category.id == id)
    }

    pub fn contains(&self, id: &CategoryId) -> bool {
        self.find(id).is_some()
    }

    /// Resolves a user-typed reference by id or case-insensitive name.
    pub fn resolve(&self, reference: &str) -> Option<&Category> {
        let needle = reference.trim();
        self.categories.iter().find(|category| {
            category.id.as_str().eq_ignore_ascii_case(needle)
                || category.name.eq_ignore_ascii_case(needle)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl From<Vec<Category>> for CategoryCatalog {
    fn from(categories: Vec<Category>) -> Self {
        Self::new(categories)
    }
}

impl From<CategoryCatalog> for Vec<Category> {
    fn from(catalog: CategoryCatalog) -> Self {
        catalog.categories
    }
}

impl Default for CategoryCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
