//! Calendar period resolution.
//!
//! Three distinct operations live here and callers must not substitute one
//! for another:
//! - [`current_period`] resolves a reference date into its calendar-aligned
//!   containing window;
//! - [`prior_period`] shifts a window N units back while preserving its
//!   day-length (subject to clamping at short-month edges);
//! - [`previous_adjacent_period`] resolves the calendar-aligned period that
//!   immediately precedes a window (e.g. "last calendar month" in full).
//!
//! The last two intentionally disagree at month and quarter edges.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::EngineError;

/// Granularity of a reporting period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PeriodKind {
    Week,
    Month,
    Quarter,
    Year,
}

/// An inclusive, calendar-day-aligned date interval with `start <= end`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, EngineError> {
        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, inclusive of both bounds.
    pub fn day_count(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Iterates every day of the range in order.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.day_count() as usize)
    }
}

/// Resolves the calendar-aligned period of the given kind containing
/// `reference`. Weeks are Sunday-aligned 7-day windows; month, quarter, and
/// year run first-to-last calendar day of the containing unit.
pub fn current_period(kind: PeriodKind, reference: NaiveDate) -> PeriodRange {
    match kind {
        PeriodKind::Week => {
            let back = reference.weekday().num_days_from_sunday() as i64;
            let start = reference - Duration::days(back);
            PeriodRange {
                start,
                end: start + Duration::days(6),
            }
        }
        PeriodKind::Month => month_range(reference.year(), reference.month()),
        PeriodKind::Quarter => quarter_range(reference),
        PeriodKind::Year => PeriodRange {
            start: ymd(reference.year(), 1, 1),
            end: ymd(reference.year(), 12, 31),
        },
    }
}

/// Returns a window `periods_back` units earlier that preserves the
/// day-length of `current` wherever the target unit is long enough.
///
/// Month and year shifts clamp the start's day-of-month to the target unit
/// (Mar 31 shifted one month back starts Feb 28/29, never spills to Mar 3);
/// quarter shifts reapply the start's day-offset from its own quarter start.
/// The end is additionally clamped to the target unit's last day, so a window
/// longer than the target unit comes back shortened.
pub fn prior_period(current: &PeriodRange, kind: PeriodKind, periods_back: u32) -> PeriodRange {
    let len = current.day_count();
    let back = periods_back as i32;
    match kind {
        PeriodKind::Week => {
            let shift = Duration::days(7 * periods_back as i64);
            PeriodRange {
                start: current.start - shift,
                end: current.end - shift,
            }
        }
        PeriodKind::Month => {
            let (year, month) = add_months(current.start.year(), current.start.month(), -back);
            let day = current.start.day().min(days_in_month(year, month));
            let start = ymd(year, month, day);
            let month_end = ymd(year, month, days_in_month(year, month));
            PeriodRange {
                start,
                end: (start + Duration::days(len - 1)).min(month_end),
            }
        }
        PeriodKind::Quarter => {
            let own_quarter = quarter_range(current.start);
            let offset = (current.start - own_quarter.start).num_days();
            let (year, month) = add_months(
                own_quarter.start.year(),
                own_quarter.start.month(),
                -3 * back,
            );
            let target = quarter_range(ymd(year, month, 1));
            let offset = offset.min(target.day_count() - 1);
            let start = target.start + Duration::days(offset);
            PeriodRange {
                start,
                end: (start + Duration::days(len - 1)).min(target.end),
            }
        }
        PeriodKind::Year => {
            let year = current.start.year() - back;
            let month = current.start.month();
            let day = current.start.day().min(days_in_month(year, month));
            let start = ymd(year, month, day);
            PeriodRange {
                start,
                end: (start + Duration::days(len - 1)).min(ymd(year, 12, 31)),
            }
        }
    }
}

/// Resolves the calendar-aligned period immediately preceding `current`:
/// the full calendar week/month/quarter/year before the one containing
/// `current.start`.
pub fn previous_adjacent_period(current: &PeriodRange, kind: PeriodKind) -> PeriodRange {
    // Anchor on the unit containing the window's start; the day before that
    // unit's first day always falls in the preceding unit.
    let containing = current_period(kind, current.start);
    let anchor = containing.start.pred_opt().unwrap_or(containing.start);
    current_period(kind, anchor)
}

fn month_range(year: i32, month: u32) -> PeriodRange {
    PeriodRange {
        start: ymd(year, month, 1),
        end: ymd(year, month, days_in_month(year, month)),
    }
}

fn quarter_range(date: NaiveDate) -> PeriodRange {
    let first_month = ((date.month() - 1) / 3) * 3 + 1;
    let last_month = first_month + 2;
    PeriodRange {
        start: ymd(date.year(), first_month, 1),
        end: ymd(date.year(), last_month, days_in_month(date.year(), last_month)),
    }
}

fn add_months(year: i32, month: u32, months: i32) -> (i32, u32) {
    let mut year = year;
    let mut month = month as i32 + months;
    while month > 12 {
        month -= 12;
        year += 1;
    }
    while month < 1 {
        month += 12;
        year -= 1;
    }
    (year, month as u32)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = add_months(year, month, 1);
    let first_next = ymd(next_year, next_month, 1);
    (first_next - Duration::days(1)).day()
}

// Infallible for the day-clamped arguments used throughout this module.
fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day)
        .unwrap_or_else(|| panic!("invalid calendar day {year:04}-{month:02}-{day:02}"))
}
