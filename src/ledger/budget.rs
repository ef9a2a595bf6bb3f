use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A spending guardrail for a specific category, expressed in the units of
/// its own `period`. Upstream is expected to supply at most one budget per
/// category; on duplicates the engine keeps the first definition it sees.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub amount: f64,
    pub period: BudgetPeriod,
}

impl Budget {
    pub fn new(category_id: Uuid, amount: f64, period: BudgetPeriod) -> Self {
        Self {
            id: Uuid::new_v4(),
            category_id,
            amount,
            period,
        }
    }
}

/// Enumeration of native budgeting periods.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BudgetPeriod {
    Monthly,
    Quarterly,
    Yearly,
}
