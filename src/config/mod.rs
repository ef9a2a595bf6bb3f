//! Engine policy configuration.
//!
//! Every threshold the engine applies lives here under a name so behavior is
//! documented and independently testable: the budget normalization table, the
//! anomalous-spending multiplier, the new-spending floor, and the memoization
//! cache capacity.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;
use crate::ledger::BudgetPeriod;
use crate::period::PeriodKind;

/// Process-wide defaults for hosts that do not inject their own config.
pub static DEFAULT_CONFIG: Lazy<AnalyticsConfig> = Lazy::new(AnalyticsConfig::default);

/// Tunable policy knobs for the analytics engine.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyticsConfig {
    /// Budget conversion factors indexed by `[native period][viewed period]`,
    /// rows Monthly/Quarterly/Yearly, columns Week/Month/Quarter/Year.
    pub budget_multipliers: [[f64; 4]; 3],
    /// A category is anomalous when current spend exceeds prior spend times
    /// this factor.
    pub anomaly_multiplier: f64,
    /// Minimum current spend for a category with no prior spend to count as
    /// "new category spending", in whole currency units.
    pub new_spending_floor: f64,
    /// Entry capacity of the aggregate memoization cache.
    pub cache_capacity: usize,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            budget_multipliers: [
                // monthly budget viewed per week/month/quarter/year
                [1.0 / 4.33, 1.0, 3.0, 12.0],
                // quarterly
                [1.0 / 13.0, 1.0 / 3.0, 1.0, 4.0],
                // yearly
                [1.0 / 52.0, 1.0 / 12.0, 1.0 / 4.0, 1.0],
            ],
            anomaly_multiplier: 1.5,
            new_spending_floor: 50.0,
            cache_capacity: 32,
        }
    }
}

impl AnalyticsConfig {
    /// Factor converting a budget from its native period into the viewed one.
    pub fn multiplier(&self, native: BudgetPeriod, view: PeriodKind) -> f64 {
        let row = match native {
            BudgetPeriod::Monthly => 0,
            BudgetPeriod::Quarterly => 1,
            BudgetPeriod::Yearly => 2,
        };
        let column = match view {
            PeriodKind::Week => 0,
            PeriodKind::Month => 1,
            PeriodKind::Quarter => 2,
            PeriodKind::Year => 3,
        };
        self.budget_multipliers[row][column]
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        for row in &self.budget_multipliers {
            for &factor in row {
                if !(factor.is_finite() && factor > 0.0) {
                    return Err(EngineError::InvalidConfig(format!(
                        "budget multiplier must be a positive finite number, got {factor}"
                    )));
                }
            }
        }
        if !(self.anomaly_multiplier.is_finite() && self.anomaly_multiplier > 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "anomaly multiplier must exceed 1.0, got {}",
                self.anomaly_multiplier
            )));
        }
        if !(self.new_spending_floor.is_finite() && self.new_spending_floor >= 0.0) {
            return Err(EngineError::InvalidConfig(format!(
                "new-spending floor must be non-negative, got {}",
                self.new_spending_floor
            )));
        }
        if self.cache_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "cache capacity must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
