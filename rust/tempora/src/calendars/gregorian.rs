//! The proleptic Gregorian calendar.

use std::sync::{Arc, LazyLock};

use tempora_common::Result;

use super::months;
use crate::basic::{BasicCalendar, BasicChronology, CalendarRules};
use crate::cache::{CalendarSystem, ChronologyCache};
use crate::chronology::Chronology;
use crate::zone::TimeZone;
use crate::MILLIS_PER_DAY;

pub const MIN_YEAR: i32 = -292_275_054;
pub const MAX_YEAR: i32 = 292_278_993;

const MILLIS_PER_YEAR: i64 = 31_556_952_000;
const MILLIS_PER_MONTH: i64 = 2_629_746_000;
const DAYS_0000_TO_1970: i64 = 719_527;

#[derive(Debug, Clone, Copy, Default)]
pub struct GregorianRules;

pub fn is_leap_year(year: i32) -> bool {
    (year & 3) == 0 && (year % 100 != 0 || year % 400 == 0)
}

impl CalendarRules for GregorianRules {
    fn name(&self) -> &str {
        "Gregorian"
    }

    fn min_year(&self) -> i32 {
        MIN_YEAR
    }

    fn max_year(&self) -> i32 {
        MAX_YEAR
    }

    fn is_leap_year(&self, year: i32) -> bool {
        is_leap_year(year)
    }

    fn days_in_year_month(&self, year: i32, month: i32) -> i32 {
        months::days_in_month(month, is_leap_year(year))
    }

    fn days_in_month_max(&self, month: i32) -> i32 {
        months::days_in_month_max(month)
    }

    fn first_day_of_year_millis(&self, year: i32) -> i64 {
        let centuries = year / 100;
        let leap_years = if year < 0 {
            // Add 3 before shifting right so that the division rounds toward zero.
            ((year + 3) >> 2) - centuries + ((centuries + 3) >> 2) - 1
        } else {
            let count = (year >> 2) - centuries + (centuries >> 2);
            if is_leap_year(year) { count - 1 } else { count }
        };
        (year as i64 * 365 + (leap_years as i64 - DAYS_0000_TO_1970)) * MILLIS_PER_DAY
    }

    fn average_millis_per_year(&self) -> i64 {
        MILLIS_PER_YEAR
    }

    fn average_millis_per_month(&self) -> i64 {
        MILLIS_PER_MONTH
    }

    fn approx_millis_at_epoch_div2(&self) -> i64 {
        (1970 * MILLIS_PER_YEAR) / 2
    }

    fn month_of_year(&self, millis_of_year: i64, year: i32) -> i32 {
        months::month_of_year(millis_of_year, is_leap_year(year))
    }

    fn millis_to_month_start(&self, year: i32, month: i32) -> i64 {
        months::millis_to_month_start(month, is_leap_year(year))
    }

    fn is_leap_month(&self, year: i32, month: i32) -> bool {
        month == 2 && is_leap_year(year)
    }
}

/// Gregorian core with ISO-8601 weeks, shared by everything that needs
/// plain civil dates without going through a chronology.
pub(crate) static CORE: LazyLock<BasicCalendar> =
    LazyLock::new(|| BasicCalendar::with_iso_weeks(GregorianRules));

pub fn chronology(min_days_in_first_week: i32) -> Result<BasicChronology> {
    BasicChronology::new(
        CalendarSystem::Gregorian {
            min_days_in_first_week,
        },
        BasicCalendar::new(GregorianRules, min_days_in_first_week)?,
    )
}

/// The shared Gregorian chronology with ISO-8601 weeks in `zone`.
pub fn instance(zone: Arc<dyn TimeZone>) -> Result<Arc<dyn Chronology>> {
    ChronologyCache::global().calendar(
        CalendarSystem::Gregorian {
            min_days_in_first_week: 4,
        },
        zone,
    )
}

pub fn instance_utc() -> Result<Arc<dyn Chronology>> {
    instance(crate::zone::utc())
}
