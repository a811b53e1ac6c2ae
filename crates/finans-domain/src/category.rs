//! Domain types representing revenue and expense categories.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::common::*;

/// Groups revenues and expenses for reporting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
        }
    }

    /// Categories every new household starts with.
    pub fn defaults() -> Vec<Category> {
        vec![
            Category::new("Salary", CategoryKind::Revenue),
            Category::new("Rent", CategoryKind::Expense),
            Category::new("Groceries", CategoryKind::Expense),
            Category::new("Freelance", CategoryKind::Revenue),
        ]
    }
}

impl Identifiable for Category {
    fn id(&self) -> Uuid {
        self.id
    }
}

/// Which side of the household balance a category belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryKind {
    Revenue,
    Expense,
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            CategoryKind::Revenue => "Revenue",
            CategoryKind::Expense => "Expense",
        };
        f.write_str(label)
    }
}
