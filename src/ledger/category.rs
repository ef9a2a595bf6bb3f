use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Categorises transactions for budgeting and reporting.
///
/// The engine trusts `kind` as given and does not cross-validate it against
/// linked transactions' `is_income`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub icon: String,
}

impl Category {
    pub fn new(name: impl Into<String>, kind: CategoryKind, icon: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            icon: icon.into(),
        }
    }
}

/// Supported category types.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryKind {
    Expense,
    Income,
}
