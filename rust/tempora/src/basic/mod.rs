//! The generic arithmetic core.
//!
//! [`BasicCalendar`] derives year, month, day, week and weekyear values
//! from the handful of answers a [`CalendarRules`] implementation gives.
//! [`BasicChronology`] assembles those derivations into fields.

use tempora_common::{Error, Result, verify_arg};

use crate::field::utils::verify_value_bounds;
use crate::field_type::DateTimeFieldType;
use crate::{MILLIS_PER_DAY, MILLIS_PER_WEEK};

mod chronology;
mod fields;
mod rules;
mod year_cache;

pub use chronology::BasicChronology;
pub(crate) use fields::SingleEraField;
pub use rules::{CalendarRules, EraStyle};
pub use year_cache::YearInfoCache;

/// Calendar arithmetic shared by every rule set.
#[derive(Debug)]
pub struct BasicCalendar {
    rules: Box<dyn CalendarRules>,
    min_days_in_first_week: i32,
    years: YearInfoCache,
}

impl BasicCalendar {
    /// Builds the core over `rules`. `min_days_in_first_week` must be in
    /// `1..=7`; 4 gives ISO-8601 weeks.
    pub fn new(rules: impl CalendarRules + 'static, min_days_in_first_week: i32) -> Result<Self> {
        verify_arg!(
            min_days_in_first_week,
            (1..=7).contains(&min_days_in_first_week)
        );
        Ok(BasicCalendar {
            rules: Box::new(rules),
            min_days_in_first_week,
            years: YearInfoCache::new(),
        })
    }

    /// Builds the core with ISO-8601 weeks.
    pub fn with_iso_weeks(rules: impl CalendarRules + 'static) -> Self {
        BasicCalendar {
            rules: Box::new(rules),
            min_days_in_first_week: 4,
            years: YearInfoCache::new(),
        }
    }

    pub fn rules(&self) -> &dyn CalendarRules {
        self.rules.as_ref()
    }

    pub fn name(&self) -> &str {
        self.rules.name()
    }

    pub fn min_days_in_first_week(&self) -> i32 {
        self.min_days_in_first_week
    }

    pub fn min_year(&self) -> i32 {
        self.rules.min_year()
    }

    pub fn max_year(&self) -> i32 {
        self.rules.max_year()
    }

    pub fn is_leap_year(&self, year: i32) -> bool {
        self.rules.is_leap_year(year)
    }

    /// Fails with a capacity error unless `year` is within the supported range.
    pub fn verify_year(&self, year: i64) -> Result<i32> {
        let (min, max) = (self.min_year(), self.max_year());
        if year < min as i64 || year > max as i64 {
            return Err(Error::year_out_of_range(self.name(), year, min, max));
        }
        Ok(year as i32)
    }

    /// First instant of `year`, through the year-info cache.
    pub fn year_millis(&self, year: i32) -> i64 {
        self.years
            .get_or_compute(year, |y| self.rules.first_day_of_year_millis(y))
    }

    pub fn year_month_millis(&self, year: i32, month: i32) -> i64 {
        self.year_millis(year) + self.rules.millis_to_month_start(year, month)
    }

    pub fn year_month_day_millis(&self, year: i32, month: i32, day: i32) -> i64 {
        self.year_month_millis(year, month) + (day as i64 - 1) * MILLIS_PER_DAY
    }

    fn year_length_millis(&self, year: i32) -> i64 {
        self.rules.days_in_year(year) as i64 * MILLIS_PER_DAY
    }

    /// Arithmetic year containing `instant`.
    ///
    /// Estimated from halved quantities so that no intermediate overflows,
    /// then corrected against the exact year boundaries. Instants outside
    /// the supported range report the nearest supported year.
    pub fn year(&self, instant: i64) -> i32 {
        let unit = self.rules.average_millis_per_year_div2();
        let mut i2 = (instant >> 1) + self.rules.approx_millis_at_epoch_div2();
        if i2 < 0 {
            i2 = i2 - unit + 1;
        }
        let (min, max) = (self.min_year(), self.max_year());
        let mut year = (i2 / unit).clamp(min as i64, max as i64) as i32;
        let mut start = self.year_millis(year);
        while instant < start && year > min {
            year -= 1;
            start = self.year_millis(year);
        }
        while year < max && instant.saturating_sub(start) >= self.year_length_millis(year) {
            start += self.year_length_millis(year);
            year += 1;
        }
        year
    }

    /// Like [`year`](Self::year), failing for years outside the supported range.
    pub fn checked_year(&self, instant: i64) -> Result<i32> {
        let year = self.year(instant);
        let start = self.year_millis(year);
        if instant < start {
            return Err(Error::year_out_of_range(
                self.name(),
                year as i64 - 1,
                self.min_year(),
                self.max_year(),
            ));
        }
        if instant.saturating_sub(start) >= self.year_length_millis(year) {
            return Err(Error::year_out_of_range(
                self.name(),
                year as i64 + 1,
                self.min_year(),
                self.max_year(),
            ));
        }
        Ok(year)
    }

    pub fn month_of_year(&self, instant: i64) -> i32 {
        self.month_of_year_in(instant, self.year(instant))
    }

    pub fn month_of_year_in(&self, instant: i64, year: i32) -> i32 {
        self.rules
            .month_of_year(instant - self.year_millis(year), year)
    }

    pub fn day_of_month(&self, instant: i64) -> i32 {
        let year = self.year(instant);
        let month = self.month_of_year_in(instant, year);
        self.day_of_month_in(instant, year, month)
    }

    pub fn day_of_month_in(&self, instant: i64, year: i32, month: i32) -> i32 {
        ((instant - self.year_month_millis(year, month)) / MILLIS_PER_DAY) as i32 + 1
    }

    pub fn day_of_year(&self, instant: i64) -> i32 {
        self.day_of_year_in(instant, self.year(instant))
    }

    pub fn day_of_year_in(&self, instant: i64, year: i32) -> i32 {
        ((instant - self.year_millis(year)) / MILLIS_PER_DAY) as i32 + 1
    }

    /// ISO day of week, 1 (Monday) to 7 (Sunday). The epoch day is a Thursday.
    pub fn day_of_week(&self, instant: i64) -> i32 {
        day_of_week(instant)
    }

    pub fn millis_of_day(&self, instant: i64) -> i32 {
        instant.rem_euclid(MILLIS_PER_DAY) as i32
    }

    pub fn days_in_year_month(&self, year: i32, month: i32) -> i32 {
        self.rules.days_in_year_month(year, month)
    }

    pub fn days_in_month_max_at(&self, instant: i64) -> i32 {
        let year = self.year(instant);
        let month = self.month_of_year_in(instant, year);
        self.days_in_year_month(year, month)
    }

    pub fn days_in_year(&self, year: i32) -> i32 {
        self.rules.days_in_year(year)
    }

    pub fn months_in_year(&self, year: i32) -> i32 {
        self.rules.months_in_year(year)
    }

    /// Start of week 1 of `year`: the first week holding at least
    /// `min_days_in_first_week` days of the year.
    pub fn first_week_of_year_millis(&self, year: i32) -> i64 {
        let jan1 = self.year_millis(year);
        let jan1_dow = day_of_week(jan1) as i64;
        if jan1_dow > 8 - self.min_days_in_first_week as i64 {
            jan1 + (8 - jan1_dow) * MILLIS_PER_DAY
        } else {
            jan1 - (jan1_dow - 1) * MILLIS_PER_DAY
        }
    }

    pub fn weeks_in_year(&self, year: i32) -> i32 {
        let start = self.first_week_of_year_millis(year);
        let end = self.first_week_of_year_millis(year + 1);
        ((end - start) / MILLIS_PER_WEEK) as i32
    }

    pub fn weekyear(&self, instant: i64) -> i32 {
        let year = self.year(instant);
        if instant < self.first_week_of_year_millis(year) {
            year - 1
        } else if instant >= self.first_week_of_year_millis(year + 1) {
            year + 1
        } else {
            year
        }
    }

    pub fn week_of_weekyear(&self, instant: i64) -> i32 {
        let weekyear = self.weekyear(instant);
        let start = self.first_week_of_year_millis(weekyear);
        ((instant - start) / MILLIS_PER_WEEK) as i32 + 1
    }

    /// Moves `instant` to `year`, keeping month, day and time of day where
    /// possible and clamping the month and day otherwise. `instant` itself
    /// must fall within the supported years.
    pub fn set_year(&self, instant: i64, year: i32) -> Result<i64> {
        let year = self.verify_year(year as i64)?;
        let this_year = self.checked_year(instant)?;
        let month = self.month_of_year_in(instant, this_year);
        let day = self.day_of_month_in(instant, this_year, month);
        let month = month.min(self.months_in_year(year));
        let day = day.min(self.days_in_year_month(year, month));
        Ok(self.year_month_day_millis(year, month, day) + self.millis_of_day(instant) as i64)
    }

    /// Whole years from `subtrahend` to `minuend`; requires
    /// `minuend >= subtrahend`.
    pub fn year_difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        let minuend_year = self.year(minuend);
        let subtrahend_year = self.year(subtrahend);
        let mut diff = minuend_year as i64 - subtrahend_year as i64;
        if diff > 0 && self.set_year(subtrahend, minuend_year)? > minuend {
            diff -= 1;
        }
        Ok(diff)
    }

    /// Moves `instant` by whole months, clamping the day of month.
    pub fn add_months(&self, instant: i64, months: i64) -> Result<i64> {
        if months == 0 {
            return Ok(instant);
        }
        let time = self.millis_of_day(instant) as i64;
        let this_year = self.checked_year(instant)?;
        let this_month = self.month_of_year_in(instant, this_year);
        let day = self.day_of_month_in(instant, this_year, this_month);
        let (year, month) = if self.rules.months_vary() {
            self.walk_months(this_year, this_month, months)?
        } else {
            let max = self.rules.max_month() as i64;
            let index = (this_month as i64 - 1)
                .checked_add(months)
                .ok_or_else(|| Error::overflow("month addition"))?;
            let year = self.verify_year(this_year as i64 + index.div_euclid(max))?;
            (year, index.rem_euclid(max) as i32 + 1)
        };
        let day = day.min(self.days_in_year_month(year, month));
        Ok(self.year_month_day_millis(year, month, day) + time)
    }

    fn walk_months(&self, year: i32, month: i32, months: i64) -> Result<(i32, i32)> {
        let mut year = year;
        let mut index = month as i64 - 1 + months;
        while index >= self.months_in_year(year) as i64 {
            index -= self.months_in_year(year) as i64;
            year = self.verify_year(year as i64 + 1)?;
        }
        while index < 0 {
            year = self.verify_year(year as i64 - 1)?;
            index += self.months_in_year(year) as i64;
        }
        Ok((year, index as i32 + 1))
    }

    /// Whole months from `subtrahend` to `minuend`, for calendars with a
    /// fixed month count; requires `minuend >= subtrahend`.
    pub fn month_difference(&self, minuend: i64, subtrahend: i64) -> i64 {
        let max = self.rules.max_month() as i64;
        let minuend_year = self.year(minuend);
        let minuend_month = self.month_of_year_in(minuend, minuend_year);
        let subtrahend_year = self.year(subtrahend);
        let subtrahend_month = self.month_of_year_in(subtrahend, subtrahend_year);
        let mut diff = (minuend_year as i64 - subtrahend_year as i64) * max
            + minuend_month as i64
            - subtrahend_month as i64;

        // A month addition clamped to the last day of a short month still
        // counts as a whole month.
        let mut subtrahend = subtrahend;
        let minuend_day = self.day_of_month_in(minuend, minuend_year, minuend_month);
        if minuend_day == self.days_in_year_month(minuend_year, minuend_month) {
            let subtrahend_day =
                self.day_of_month_in(subtrahend, subtrahend_year, subtrahend_month);
            if subtrahend_day > minuend_day {
                subtrahend -= (subtrahend_day - minuend_day) as i64 * MILLIS_PER_DAY;
            }
        }
        let minuend_rem = minuend - self.year_month_millis(minuend_year, minuend_month);
        let subtrahend_rem = subtrahend - self.year_month_millis(subtrahend_year, subtrahend_month);
        if minuend_rem < subtrahend_rem {
            diff -= 1;
        }
        diff
    }

    /// Midnight of the given arithmetic date, validating every component.
    pub fn date_midnight_millis(&self, year: i32, month: i32, day: i32) -> Result<i64> {
        let year = self.verify_year(year as i64)?;
        verify_value_bounds(
            DateTimeFieldType::MonthOfYear.name(),
            month as i64,
            1,
            self.months_in_year(year) as i64,
        )?;
        verify_value_bounds(
            DateTimeFieldType::DayOfMonth.name(),
            day as i64,
            1,
            self.days_in_year_month(year, month) as i64,
        )?;
        Ok(self.year_month_day_millis(year, month, day))
    }

    /// Converts a public year (as the year field presents it) to the
    /// arithmetic year.
    pub fn arithmetic_year(&self, year: i32) -> Result<i32> {
        if !self.rules.skips_year_zero() || year > 0 {
            return Ok(year);
        }
        if year == 0 {
            return Err(Error::illegal_value(
                DateTimeFieldType::Year.name(),
                0,
                None,
                None,
            ));
        }
        Ok(year + 1)
    }

    pub fn date_time_millis(
        &self,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i32,
    ) -> Result<i64> {
        verify_value_bounds(
            DateTimeFieldType::MillisOfDay.name(),
            millis_of_day as i64,
            0,
            MILLIS_PER_DAY - 1,
        )?;
        let year = self.arithmetic_year(year)?;
        let midnight = self.date_midnight_millis(year, month, day)?;
        midnight
            .checked_add(millis_of_day as i64)
            .ok_or_else(|| Error::overflow("date-time construction"))
    }
}

/// ISO day of week of `instant`, 1 (Monday) to 7 (Sunday).
pub fn day_of_week(instant: i64) -> i32 {
    1 + (instant.div_euclid(MILLIS_PER_DAY) + 3).rem_euclid(7) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn epoch_is_thursday() {
        assert_eq!(day_of_week(0), 4);
        assert_eq!(day_of_week(-1), 3);
        assert_eq!(day_of_week(-MILLIS_PER_DAY), 3);
        assert_eq!(day_of_week(-MILLIS_PER_DAY - 1), 2);
        assert_eq!(day_of_week(3 * MILLIS_PER_DAY), 7);
        assert_eq!(day_of_week(4 * MILLIS_PER_DAY), 1);
        assert_eq!(day_of_week(-4 * MILLIS_PER_DAY), 7);
    }
}
