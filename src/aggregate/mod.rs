//! Aggregation engine: turns a flat transaction list into period totals,
//! per-category summaries with budget-normalized progress, and a zero-filled
//! daily series.
//!
//! Everything here is a pure function over borrowed snapshots; concurrent
//! calls need no coordination.

use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AnalyticsConfig;
use crate::ledger::{Budget, Category, CategoryKind, Transaction};
use crate::period::{current_period, PeriodKind, PeriodRange};

/// Totals and progress for one category within a period.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategorySummary {
    pub category_id: Uuid,
    pub name: String,
    pub kind: CategoryKind,
    pub icon: String,
    pub total_amount: f64,
    pub transaction_count: usize,
    /// Budget converted into the viewed period's unit, when one exists.
    pub normalized_budget: Option<f64>,
    /// Rounded percentage of the normalized budget consumed; `None` when no
    /// positive budget applies, never 0 as a stand-in.
    pub budget_percentage: Option<i64>,
}

/// One day of the zero-filled series spanning the period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub income: f64,
    pub expenses: f64,
}

/// A labeled value for pie/donut style breakdowns.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartSlice {
    pub name: String,
    pub value: f64,
    pub icon: String,
}

/// Everything the engine derives for one (period, filter) view.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AggregateResult {
    pub period: PeriodRange,
    /// Account-wide income for the period, rounded after summing. Never
    /// affected by the category filter.
    pub total_income: f64,
    /// Account-wide expenses for the period, rounded after summing. Never
    /// affected by the category filter.
    pub total_expenses: f64,
    pub net_flow: f64,
    /// One entry per known category, zero-filled when nothing matched.
    pub category_summaries: Vec<CategorySummary>,
    pub daily_series: Vec<DailyPoint>,
    pub expense_chart: Vec<ChartSlice>,
    pub income_chart: Vec<ChartSlice>,
}

/// Raw income/expense sums for a window, used for headline comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeriodTotals {
    pub income: f64,
    pub expenses: f64,
}

#[derive(Default)]
struct CategoryAccumulator {
    total: f64,
    count: usize,
}

/// Computes the full aggregate view for the period containing `reference`.
///
/// `filter` narrows the per-category view, the daily series, and the chart
/// slices to the given category ids; headline totals always stay
/// account-wide. An empty filter set means no filter.
pub fn aggregate(
    transactions: &[Transaction],
    categories: &[Category],
    budgets: &[Budget],
    kind: PeriodKind,
    reference: NaiveDate,
    filter: Option<&BTreeSet<Uuid>>,
    config: &AnalyticsConfig,
) -> AggregateResult {
    let period = current_period(kind, reference);
    let filter = filter.filter(|set| !set.is_empty());

    let category_lookup: HashMap<Uuid, &Category> =
        categories.iter().map(|c| (c.id, c)).collect();
    let budget_lookup = budgets_by_category(budgets);

    let mut income_sum = 0.0;
    let mut expense_sum = 0.0;
    let mut per_category: HashMap<Uuid, CategoryAccumulator> = HashMap::new();
    let mut daily_series: Vec<DailyPoint> = period
        .days()
        .map(|date| DailyPoint {
            date,
            income: 0.0,
            expenses: 0.0,
        })
        .collect();

    let mut excluded = 0usize;
    let mut dangling = 0usize;

    for txn in transactions {
        if !txn.is_countable() {
            excluded += 1;
            continue;
        }
        if !period.contains(txn.date) {
            continue;
        }

        // Headline totals come from the unfiltered period set.
        if txn.is_income {
            income_sum += txn.billing_amount;
        } else {
            expense_sum += txn.billing_amount;
        }

        let in_filter = match filter {
            Some(set) => txn.category_id.map(|id| set.contains(&id)).unwrap_or(false),
            None => true,
        };
        if !in_filter {
            continue;
        }

        let day = (txn.date - period.start).num_days() as usize;
        if txn.is_income {
            daily_series[day].income += txn.billing_amount;
        } else {
            daily_series[day].expenses += txn.billing_amount;
        }

        match txn.category_id {
            Some(id) if category_lookup.contains_key(&id) => {
                let acc = per_category.entry(id).or_default();
                acc.total += txn.billing_amount;
                acc.count += 1;
            }
            Some(_) => dangling += 1,
            // Uncategorized stays in headline totals and the daily series.
            None => {}
        }
    }

    if excluded > 0 {
        tracing::warn!(excluded, "skipped transactions with non-countable amounts");
    }
    if dangling > 0 {
        tracing::debug!(
            dangling,
            "transactions referencing unknown categories left out of category summaries"
        );
    }

    let mut category_summaries: Vec<CategorySummary> = categories
        .iter()
        .map(|category| {
            let (total_amount, transaction_count) = per_category
                .get(&category.id)
                .map(|acc| (acc.total, acc.count))
                .unwrap_or((0.0, 0));
            let normalized_budget = budget_lookup
                .get(&category.id)
                .map(|budget| budget.amount * config.multiplier(budget.period, kind));
            let budget_percentage = normalized_budget
                .filter(|&normalized| normalized > 0.0)
                .map(|normalized| (total_amount / normalized * 100.0).round() as i64);
            CategorySummary {
                category_id: category.id,
                name: category.name.clone(),
                kind: category.kind,
                icon: category.icon.clone(),
                total_amount,
                transaction_count,
                normalized_budget,
                budget_percentage,
            }
        })
        .collect();
    category_summaries.sort_by(|a, b| a.name.cmp(&b.name));

    let total_income = income_sum.round();
    let total_expenses = expense_sum.round();

    AggregateResult {
        period,
        total_income,
        total_expenses,
        net_flow: total_income - total_expenses,
        expense_chart: chart_slices(&category_summaries, CategoryKind::Expense),
        income_chart: chart_slices(&category_summaries, CategoryKind::Income),
        category_summaries,
        daily_series,
    }
}

/// Sums the countable transactions inside `period`, account-wide, rounding
/// whole-unit totals after summation.
pub fn period_totals(transactions: &[Transaction], period: &PeriodRange) -> PeriodTotals {
    let mut totals = PeriodTotals::default();
    for txn in transactions {
        if !txn.is_countable() || !period.contains(txn.date) {
            continue;
        }
        if txn.is_income {
            totals.income += txn.billing_amount;
        } else {
            totals.expenses += txn.billing_amount;
        }
    }
    totals.income = totals.income.round();
    totals.expenses = totals.expenses.round();
    totals
}

/// At most one budget applies per category; the first definition in input
/// order wins and later duplicates are reported.
fn budgets_by_category(budgets: &[Budget]) -> HashMap<Uuid, &Budget> {
    let mut lookup: HashMap<Uuid, &Budget> = HashMap::new();
    for budget in budgets {
        use std::collections::hash_map::Entry;
        match lookup.entry(budget.category_id) {
            Entry::Vacant(slot) => {
                slot.insert(budget);
            }
            Entry::Occupied(_) => {
                tracing::warn!(
                    category_id = %budget.category_id,
                    budget_id = %budget.id,
                    "duplicate budget ignored; first definition wins"
                );
            }
        }
    }
    lookup
}

fn chart_slices(summaries: &[CategorySummary], kind: CategoryKind) -> Vec<ChartSlice> {
    let mut slices: Vec<ChartSlice> = summaries
        .iter()
        .filter(|summary| summary.kind == kind && summary.total_amount > 0.0)
        .map(|summary| ChartSlice {
            name: summary.name.clone(),
            value: summary.total_amount,
            icon: summary.icon.clone(),
        })
        .collect();
    slices.sort_by(|a, b| b.value.total_cmp(&a.value));
    slices
}
