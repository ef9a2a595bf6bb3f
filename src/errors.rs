use chrono::NaiveDate;
use thiserror::Error;

/// Error type for caller mistakes. Data-quality problems (malformed amounts,
/// dangling category references) never error; the engine degrades by omission
/// and reports exclusion counts through tracing instead.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid period range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
