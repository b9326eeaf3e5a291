//! Bitmap-based closed-day table for O(1) business day lookups.
//!
//! Each calendar instance owns its own table: one bit per day from 1970
//! to 2100, set when the day is a weekend day or a holiday. Dates outside
//! that range fall back to the weekend mask and an ordered holiday set.

use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

use crate::error::{CoreError, CoreResult};

/// Minimum year covered by the bitmap.
pub const MIN_YEAR: i32 = 1970;
/// Maximum year covered by the bitmap.
pub const MAX_YEAR: i32 = 2100;

const YEAR_COUNT: usize = (MAX_YEAR - MIN_YEAR + 1) as usize;

const MAX_DAYS_PER_YEAR: usize = 366;

const TOTAL_BITS: usize = YEAR_COUNT * MAX_DAYS_PER_YEAR;

const WORD_COUNT: usize = (TOTAL_BITS + 63) / 64;

/// Set of weekdays treated as non-business days.
///
/// Stored as a 7-bit mask indexed by `Weekday::num_days_from_monday`.
/// A mask covering every day of the week cannot be built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WeekendMask(u8);

impl WeekendMask {
    /// Saturday and Sunday.
    pub const SATURDAY_SUNDAY: WeekendMask = WeekendMask(0b110_0000);

    /// Friday and Saturday.
    pub const FRIDAY_SATURDAY: WeekendMask = WeekendMask(0b011_0000);

    /// No weekend days.
    pub const NONE: WeekendMask = WeekendMask(0);

    /// Builds a mask from a set of weekdays.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::CalendarError` if all seven days are weekend days,
    /// which would leave no business day to roll to.
    pub fn from_weekdays(days: impl IntoIterator<Item = Weekday>) -> CoreResult<Self> {
        let bits = days
            .into_iter()
            .fold(0u8, |acc, day| acc | (1 << day.num_days_from_monday()));
        if bits == 0b111_1111 {
            return Err(CoreError::calendar_error(
                "weekend cannot cover every day of the week",
            ));
        }
        Ok(WeekendMask(bits))
    }

    /// Returns true if the weekday is a weekend day.
    #[inline]
    pub fn contains(&self, weekday: Weekday) -> bool {
        self.0 & (1 << weekday.num_days_from_monday()) != 0
    }

    /// Weekend days in Monday-first order.
    pub fn weekdays(&self) -> Vec<Weekday> {
        [
            Weekday::Mon,
            Weekday::Tue,
            Weekday::Wed,
            Weekday::Thu,
            Weekday::Fri,
            Weekday::Sat,
            Weekday::Sun,
        ]
        .into_iter()
        .filter(|d| self.contains(*d))
        .collect()
    }
}

impl Default for WeekendMask {
    fn default() -> Self {
        Self::SATURDAY_SUNDAY
    }
}

/// Precomputed closed-day bitmap for one calendar.
#[derive(Clone)]
pub(crate) struct HolidayBitmap {
    /// 1 = weekend or holiday, 0 = business day
    closed: Box<[u64]>,
    weekend: WeekendMask,
    /// Holidays outside the bitmap range
    overflow: BTreeSet<NaiveDate>,
}

impl std::fmt::Debug for HolidayBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HolidayBitmap")
            .field("weekend", &self.weekend)
            .field("closed_days", &self.count_closed())
            .field("overflow", &self.overflow.len())
            .finish()
    }
}

impl HolidayBitmap {
    /// Builds the table from a weekend mask and a holiday set.
    pub(crate) fn build<'a>(
        weekend: WeekendMask,
        holidays: impl IntoIterator<Item = &'a NaiveDate>,
    ) -> Self {
        let mut bitmap = Self {
            closed: vec![0u64; WORD_COUNT].into_boxed_slice(),
            weekend,
            overflow: BTreeSet::new(),
        };

        if weekend != WeekendMask::NONE {
            let mut day = NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1);
            while let Some(d) = day {
                if d.year() > MAX_YEAR {
                    break;
                }
                if weekend.contains(d.weekday()) {
                    bitmap.mark(d);
                }
                day = d.succ_opt();
            }
        }

        for &date in holidays {
            if !bitmap.mark(date) {
                bitmap.overflow.insert(date);
            }
        }

        bitmap
    }

    /// Returns true if the date is a weekend day or a holiday.
    #[inline]
    pub(crate) fn is_closed(&self, date: NaiveDate) -> bool {
        match Self::date_to_indices(date) {
            Some((word_idx, bit_idx)) => (self.closed[word_idx] & (1u64 << bit_idx)) != 0,
            None => self.weekend.contains(date.weekday()) || self.overflow.contains(&date),
        }
    }

    fn mark(&mut self, date: NaiveDate) -> bool {
        match Self::date_to_indices(date) {
            Some((word_idx, bit_idx)) => {
                self.closed[word_idx] |= 1u64 << bit_idx;
                true
            }
            None => false,
        }
    }

    fn count_closed(&self) -> usize {
        self.closed.iter().map(|w| w.count_ones() as usize).sum()
    }

    /// Converts a date to (word_index, bit_index), or None if out of range.
    #[inline]
    fn date_to_indices(date: NaiveDate) -> Option<(usize, usize)> {
        let year = date.year();
        if year < MIN_YEAR || year > MAX_YEAR {
            return None;
        }

        let year_offset = (year - MIN_YEAR) as usize;
        let bit_position = year_offset * MAX_DAYS_PER_YEAR + date.ordinal0() as usize;

        Some((bit_position / 64, bit_position % 64))
    }
}
