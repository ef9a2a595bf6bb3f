//! Domain value types consumed by the analytics engine.

pub mod budget;
pub mod category;
pub mod transaction;

pub use budget::{Budget, BudgetPeriod};
pub use category::{Category, CategoryKind};
pub use transaction::Transaction;
