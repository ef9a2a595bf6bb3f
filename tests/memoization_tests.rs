mod common;

use analytics_core::cache::{aggregate_cached, AggregateCache};
use analytics_core::period::PeriodKind;

use common::{date, Fixture};

#[test]
fn repeated_renders_reuse_the_cached_aggregate() {
    let mut fx = Fixture::new();
    fx.spend(date(2024, 3, 5), 120.0, fx.food);
    let cache = AggregateCache::with_config(&fx.config);

    let first = aggregate_cached(
        &cache,
        &fx.transactions,
        &fx.categories,
        &fx.budgets,
        PeriodKind::Month,
        date(2024, 3, 15),
        None,
        &fx.config,
        fx.transactions.len() as u64,
    );
    let second = aggregate_cached(
        &cache,
        &fx.transactions,
        &fx.categories,
        &fx.budgets,
        PeriodKind::Month,
        date(2024, 3, 15),
        None,
        &fx.config,
        fx.transactions.len() as u64,
    );

    assert!(std::sync::Arc::ptr_eq(&first, &second));
    assert_eq!(cache.len(), 1);
}

#[test]
fn a_new_data_version_recomputes() {
    let mut fx = Fixture::new();
    fx.spend(date(2024, 3, 5), 120.0, fx.food);
    let cache = AggregateCache::with_config(&fx.config);

    let before = aggregate_cached(
        &cache,
        &fx.transactions,
        &fx.categories,
        &fx.budgets,
        PeriodKind::Month,
        date(2024, 3, 15),
        None,
        &fx.config,
        1,
    );
    fx.spend(date(2024, 3, 6), 80.0, fx.food);
    let after = aggregate_cached(
        &cache,
        &fx.transactions,
        &fx.categories,
        &fx.budgets,
        PeriodKind::Month,
        date(2024, 3, 15),
        None,
        &fx.config,
        2,
    );

    assert_eq!(before.total_expenses, 120.0);
    assert_eq!(after.total_expenses, 200.0);
    assert_eq!(cache.len(), 2);
}
