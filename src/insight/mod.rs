//! Period-over-period insights: spending trend, budget overruns, and
//! anomalous category spending.
//!
//! Insights are always account-wide; a UI category filter never reaches this
//! module. Nothing persists across calls.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregate::{aggregate, period_totals};
use crate::config::AnalyticsConfig;
use crate::ledger::{Budget, Category, CategoryKind, Transaction};
use crate::period::{current_period, previous_adjacent_period, PeriodKind};

/// Direction and size of the expense change versus the previous period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpendingTrend {
    pub change_percentage: i64,
    pub is_increase: bool,
}

/// An expense category whose period spend exceeded its normalized budget.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverBudgetEntry {
    pub category_id: Uuid,
    pub name: String,
    pub actual: f64,
    pub budgeted: f64,
    pub over_percentage: i64,
}

/// An expense category whose current spend is anomalous versus the previous
/// adjacent period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnusualSpendingEntry {
    pub category_id: Uuid,
    pub name: String,
    pub current: f64,
    pub previous: f64,
    pub increase_percentage: i64,
    /// True when the category had no prior spend at all ("new category
    /// spending" above the configured floor).
    pub is_new: bool,
}

/// Everything the insight generator derives for one period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsightResult {
    /// `None` only when both periods have zero expenses.
    pub spending_trend: Option<SpendingTrend>,
    /// Sorted descending by `over_percentage`.
    pub over_budget: Vec<OverBudgetEntry>,
    /// Sorted descending by `increase_percentage`.
    pub unusual_spending: Vec<UnusualSpendingEntry>,
    pub previous_total_income: f64,
    pub previous_total_expenses: f64,
}

/// Compares the period containing `reference` against its calendar-adjacent
/// predecessor.
pub fn insights(
    transactions: &[Transaction],
    categories: &[Category],
    budgets: &[Budget],
    kind: PeriodKind,
    reference: NaiveDate,
    config: &AnalyticsConfig,
) -> InsightResult {
    let current = current_period(kind, reference);
    let previous = previous_adjacent_period(&current, kind);

    let current_totals = period_totals(transactions, &current);
    let previous_totals = period_totals(transactions, &previous);

    let current_agg = aggregate(
        transactions,
        categories,
        budgets,
        kind,
        reference,
        None,
        config,
    );
    let previous_agg = aggregate(
        transactions,
        categories,
        budgets,
        kind,
        previous.start,
        None,
        config,
    );

    let mut over_budget: Vec<OverBudgetEntry> = current_agg
        .category_summaries
        .iter()
        .filter(|summary| summary.kind == CategoryKind::Expense)
        .filter_map(|summary| {
            let budgeted = summary.normalized_budget?;
            if budgeted > 0.0 && summary.total_amount > budgeted {
                Some(OverBudgetEntry {
                    category_id: summary.category_id,
                    name: summary.name.clone(),
                    actual: summary.total_amount,
                    budgeted,
                    over_percentage: relative_change(summary.total_amount, budgeted),
                })
            } else {
                None
            }
        })
        .collect();
    over_budget.sort_by(|a, b| b.over_percentage.cmp(&a.over_percentage));

    let previous_by_category: HashMap<Uuid, f64> = previous_agg
        .category_summaries
        .iter()
        .map(|summary| (summary.category_id, summary.total_amount))
        .collect();

    let mut unusual_spending: Vec<UnusualSpendingEntry> = current_agg
        .category_summaries
        .iter()
        .filter(|summary| summary.kind == CategoryKind::Expense && summary.total_amount > 0.0)
        .filter_map(|summary| {
            let previous_amount = previous_by_category
                .get(&summary.category_id)
                .copied()
                .unwrap_or(0.0);
            if previous_amount > 0.0
                && summary.total_amount > config.anomaly_multiplier * previous_amount
            {
                Some(UnusualSpendingEntry {
                    category_id: summary.category_id,
                    name: summary.name.clone(),
                    current: summary.total_amount,
                    previous: previous_amount,
                    increase_percentage: relative_change(summary.total_amount, previous_amount),
                    is_new: false,
                })
            } else if previous_amount == 0.0 && summary.total_amount > config.new_spending_floor {
                Some(UnusualSpendingEntry {
                    category_id: summary.category_id,
                    name: summary.name.clone(),
                    current: summary.total_amount,
                    previous: 0.0,
                    increase_percentage: 100,
                    is_new: true,
                })
            } else {
                None
            }
        })
        .collect();
    unusual_spending.sort_by(|a, b| b.increase_percentage.cmp(&a.increase_percentage));

    tracing::debug!(
        period_start = %current.start,
        over_budget = over_budget.len(),
        unusual = unusual_spending.len(),
        "insight pass complete"
    );

    InsightResult {
        spending_trend: spending_trend(current_totals.expenses, previous_totals.expenses),
        over_budget,
        unusual_spending,
        previous_total_income: previous_totals.income,
        previous_total_expenses: previous_totals.expenses,
    }
}

/// Rounded percentage change of `current` relative to a positive `baseline`.
fn relative_change(current: f64, baseline: f64) -> i64 {
    ((current - baseline) / baseline * 100.0).round() as i64
}

/// Division-by-zero cases are special-cased, never errors: spending that
/// appears out of nowhere is a defined 100% increase, and two silent periods
/// yield no trend at all.
fn spending_trend(current: f64, previous: f64) -> Option<SpendingTrend> {
    if previous > 0.0 {
        Some(SpendingTrend {
            change_percentage: relative_change(current, previous),
            is_increase: current > previous,
        })
    } else if current > 0.0 {
        Some(SpendingTrend {
            change_percentage: 100,
            is_increase: true,
        })
    } else {
        None
    }
}
