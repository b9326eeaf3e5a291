//! Business day calendars and conventions.
//!
//! This module provides:
//! - The [`Calendar`] trait with date rolling and business-day arithmetic
//! - [`BusinessDayCalendar`], a holiday calendar with a configurable weekend
//! - [`WeekendCalendar`], a holiday-free Saturday/Sunday calendar

use chrono::Weekday;

mod bitmap;
mod business_day;
mod conventions;

pub use bitmap::{WeekendMask, MAX_YEAR, MIN_YEAR};
pub use business_day::{BusinessDayCalendar, CalendarData};
pub use conventions::BusinessDayConvention;

use crate::types::Date;

/// Trait for business day calendars.
///
/// Every query is a pure function of the date and the calendar's immutable
/// configuration, so calendars can be shared freely across threads.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &str;

    /// Returns true if the date is neither a weekend day nor a holiday.
    fn is_business_day(&self, date: Date) -> bool;

    /// Adjusts a date according to the given business day convention.
    ///
    /// Idempotent: adjusting an adjusted date returns it unchanged.
    fn adjust(&self, date: Date, convention: BusinessDayConvention) -> Date {
        conventions::adjust(date, convention, self)
    }

    /// Moves `days` business days from `start`, Excel `WORKDAY` style.
    ///
    /// `days == 0` returns `start` if it is a business day and the next
    /// business day otherwise. The start date never counts toward `|days|`.
    fn workday(&self, start: Date, days: i32) -> Date {
        if days == 0 {
            return conventions::following(start, self);
        }

        let direction: i64 = if days > 0 { 1 } else { -1 };
        let mut remaining = days.unsigned_abs();
        let mut result = start;

        while remaining > 0 {
            result = result.add_days(direction);
            if self.is_business_day(result) {
                remaining -= 1;
            }
        }

        result
    }

    /// Alias of [`Calendar::workday`].
    fn shift_business_days(&self, date: Date, days: i32) -> Date {
        self.workday(date, days)
    }

    /// Returns the first business day strictly after the given date.
    fn next_business_day(&self, date: Date) -> Date {
        conventions::following(date.add_days(1), self)
    }

    /// Returns the last business day strictly before the given date.
    fn previous_business_day(&self, date: Date) -> Date {
        conventions::preceding(date.add_days(-1), self)
    }

    /// Counts business days between two dates.
    ///
    /// With `inclusive == false` both ends are excluded; with
    /// `inclusive == true` both are included. When `a > b` the count is
    /// negated unless `signed` is false.
    fn business_days_between(&self, a: Date, b: Date, inclusive: bool, signed: bool) -> i64 {
        if a == b {
            return i64::from(inclusive && self.is_business_day(a));
        }

        let (start, end, sign) = if a < b { (a, b, 1) } else { (b, a, -1) };

        let mut count = 0i64;
        let mut current = start;
        while current <= end {
            let counted = inclusive || (start < current && current < end);
            if counted && self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }

        if signed {
            count * sign
        } else {
            count
        }
    }
}

/// A simple weekend-only calendar (no holidays).
///
/// Useful for testing or when holiday data is not available.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }
}
