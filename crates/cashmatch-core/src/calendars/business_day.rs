//! Holiday calendar with a configurable weekend.
//!
//! # Example
//!
//! ```
//! use cashmatch_core::calendars::{BusinessDayCalendar, BusinessDayConvention, Calendar};
//! use cashmatch_core::types::Date;
//!
//! let cal = BusinessDayCalendar::new("UK", [Date::from_ymd(2025, 12, 25).unwrap()]);
//!
//! let xmas = Date::from_ymd(2025, 12, 25).unwrap();
//! assert!(!cal.is_business_day(xmas));
//! assert_eq!(
//!     cal.adjust(xmas, BusinessDayConvention::Following),
//!     Date::from_ymd(2025, 12, 26).unwrap()
//! );
//! ```

use chrono::{NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

use super::bitmap::{HolidayBitmap, WeekendMask};
use super::Calendar;
use crate::error::{CoreError, CoreResult};
use crate::types::Date;

/// An immutable holiday calendar.
///
/// Holds a holiday set and a weekend mask, plus a closed-day bitmap built
/// once at construction. Lookups never touch shared state, so each
/// instance is independent of every other calendar.
#[derive(Clone)]
pub struct BusinessDayCalendar {
    name: String,
    holidays: BTreeSet<NaiveDate>,
    weekend: WeekendMask,
    table: HolidayBitmap,
}

impl std::fmt::Debug for BusinessDayCalendar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BusinessDayCalendar")
            .field("name", &self.name)
            .field("weekend", &self.weekend.weekdays())
            .field("holiday_count", &self.holidays.len())
            .finish()
    }
}

impl BusinessDayCalendar {
    /// Creates a Saturday/Sunday calendar with the given holidays.
    pub fn new(name: impl Into<String>, holidays: impl IntoIterator<Item = Date>) -> Self {
        Self::with_weekend(name, holidays, WeekendMask::default())
    }

    /// Creates a calendar with a custom weekend.
    pub fn with_weekend(
        name: impl Into<String>,
        holidays: impl IntoIterator<Item = Date>,
        weekend: WeekendMask,
    ) -> Self {
        let holidays: BTreeSet<NaiveDate> =
            holidays.into_iter().map(|d| d.as_naive_date()).collect();
        let table = HolidayBitmap::build(weekend, holidays.iter());

        Self {
            name: name.into(),
            holidays,
            weekend,
            table,
        }
    }

    /// Loads a calendar from JSON.
    ///
    /// # JSON Format
    ///
    /// ```json
    /// {
    ///   "name": "UK",
    ///   "weekend": ["Sat", "Sun"],
    ///   "holidays": ["2025-01-01", "2025-12-25"]
    /// }
    /// ```
    ///
    /// `weekend` is optional and defaults to Saturday/Sunday.
    pub fn from_json(json: &str) -> CoreResult<Self> {
        let data: CalendarData = serde_json::from_str(json)
            .map_err(|e| CoreError::calendar_error(format!("Failed to parse JSON: {e}")))?;
        Self::from_calendar_data(data)
    }

    /// Loads a calendar from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CoreError::calendar_error(format!("Failed to read file: {e}")))?;
        Self::from_json(&content)
    }

    /// Builds a calendar from already-parsed calendar data.
    pub fn from_calendar_data(data: CalendarData) -> CoreResult<Self> {
        let weekend = match data.weekend {
            Some(days) => {
                let parsed = days
                    .iter()
                    .map(|s| {
                        s.parse::<Weekday>().map_err(|_| {
                            CoreError::calendar_error(format!("Unknown weekday '{s}'"))
                        })
                    })
                    .collect::<CoreResult<Vec<_>>>()?;
                WeekendMask::from_weekdays(parsed)?
            }
            None => WeekendMask::default(),
        };

        let holidays = data
            .holidays
            .iter()
            .map(|s| {
                Date::parse(s)
                    .map_err(|_| CoreError::calendar_error(format!("Invalid holiday '{s}'")))
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Self::with_weekend(data.name, holidays, weekend))
    }

    /// Returns true if the date is a listed holiday (weekends excluded).
    pub fn is_holiday(&self, date: Date) -> bool {
        self.holidays.contains(&date.as_naive_date())
    }

    /// Holidays in ascending order.
    pub fn holidays(&self) -> impl Iterator<Item = Date> + '_ {
        self.holidays.iter().map(|&d| Date::from(d))
    }

    /// Returns the weekend mask.
    pub fn weekend(&self) -> WeekendMask {
        self.weekend
    }
}

impl Calendar for BusinessDayCalendar {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_business_day(&self, date: Date) -> bool {
        !self.table.is_closed(date.as_naive_date())
    }
}

/// Serialized calendar definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarData {
    /// Name of the calendar
    pub name: String,

    /// Weekend weekday names, e.g. `["Sat", "Sun"]`
    #[serde(default)]
    pub weekend: Option<Vec<String>>,

    /// Holiday dates in YYYY-MM-DD format
    #[serde(default)]
    pub holidays: Vec<String>,
}
