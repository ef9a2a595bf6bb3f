#![allow(dead_code)]

use analytics_core::config::AnalyticsConfig;
use analytics_core::ledger::{Budget, BudgetPeriod, Category, CategoryKind, Transaction};
use chrono::NaiveDate;
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A small account: two expense categories (one with a monthly budget), one
/// income category, and default policy config.
pub struct Fixture {
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    pub transactions: Vec<Transaction>,
    pub config: AnalyticsConfig,
    pub food: Uuid,
    pub rent: Uuid,
    pub salary: Uuid,
}

impl Fixture {
    pub fn new() -> Self {
        let food = Category::new("Food", CategoryKind::Expense, "apple");
        let rent = Category::new("Rent", CategoryKind::Expense, "house");
        let salary = Category::new("Salary", CategoryKind::Income, "briefcase");
        let (food_id, rent_id, salary_id) = (food.id, rent.id, salary.id);
        Self {
            budgets: vec![Budget::new(food_id, 500.0, BudgetPeriod::Monthly)],
            categories: vec![food, rent, salary],
            transactions: Vec::new(),
            config: AnalyticsConfig::default(),
            food: food_id,
            rent: rent_id,
            salary: salary_id,
        }
    }

    pub fn spend(&mut self, date: NaiveDate, amount: f64, category: Uuid) {
        self.transactions
            .push(Transaction::new(date, "Shop", amount, false, Some(category)));
    }

    pub fn earn(&mut self, date: NaiveDate, amount: f64) {
        let salary = self.salary;
        self.transactions
            .push(Transaction::new(date, "Employer", amount, true, Some(salary)));
    }
}
