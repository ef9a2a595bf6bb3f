#![doc(test(attr(deny(warnings))))]

//! Analytics Core turns flat lists of dated, signed transactions into
//! calendar-period aggregates, budget-relative progress, and
//! period-over-period insights.
//!
//! The engine is pure and synchronous: it consumes in-memory slices of
//! [`ledger::Transaction`]s, [`ledger::Category`]s, and [`ledger::Budget`]s
//! together with a period selection, and produces plain value objects.
//! Persistence, import pipelines, and rendering live in the host application.

pub mod aggregate;
pub mod cache;
pub mod config;
pub mod errors;
pub mod insight;
pub mod ledger;
pub mod period;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("analytics_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
        tracing::info!("Analytics Core tracing initialized.");
    });
}

#[cfg(test)]
mod tests {
    #[test]
    fn init_does_not_panic() {
        super::init();
    }
}
