use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single dated cash movement.
///
/// The direction of the flow is carried by `is_income`; `billing_amount` is
/// always a non-negative magnitude. Upstream data can violate that invariant,
/// so the engine checks [`Transaction::is_countable`] before summing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    pub id: Uuid,
    pub date: NaiveDate,
    pub business_name: String,
    pub billing_amount: f64,
    pub is_income: bool,
    pub category_id: Option<Uuid>,
}

impl Transaction {
    pub fn new(
        date: NaiveDate,
        business_name: impl Into<String>,
        billing_amount: f64,
        is_income: bool,
        category_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            business_name: business_name.into(),
            billing_amount,
            is_income,
            category_id,
        }
    }

    /// Whether the amount may participate in sums. Non-finite or negative
    /// magnitudes are excluded from every aggregate, never fatal.
    pub fn is_countable(&self) -> bool {
        self.billing_amount.is_finite() && self.billing_amount >= 0.0
    }
}
