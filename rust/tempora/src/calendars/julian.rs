//! The proleptic Julian calendar. Public year numbering has no year zero:
//! the year before 1 is -1.

use std::sync::Arc;

use tempora_common::Result;

use super::months;
use crate::basic::{BasicCalendar, BasicChronology, CalendarRules};
use crate::cache::{CalendarSystem, ChronologyCache};
use crate::chronology::Chronology;
use crate::zone::TimeZone;
use crate::MILLIS_PER_DAY;

pub const MIN_YEAR: i32 = -292_269_053;
pub const MAX_YEAR: i32 = 292_272_992;

const MILLIS_PER_YEAR: i64 = 31_557_600_000;
const MILLIS_PER_MONTH: i64 = 2_629_800_000;

#[derive(Debug, Clone, Copy, Default)]
pub struct JulianRules;

pub fn is_leap_year(year: i32) -> bool {
    (year & 3) == 0
}

impl CalendarRules for JulianRules {
    fn name(&self) -> &str {
        "Julian"
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
        // Count from 1968, a leap year close to the epoch.
        let relative = year as i64 - 1968;
        let leap_years = if relative <= 0 {
            (relative + 3) >> 2
        } else {
            let count = relative >> 2;
            if is_leap_year(year) { count } else { count + 1 }
        };
        // Scale to millis last: the last supported year ends just below i64::MAX.
        (relative * 365 + leap_years - (366 + 352)) * MILLIS_PER_DAY
    }

    fn average_millis_per_year(&self) -> i64 {
        MILLIS_PER_YEAR
    }

    fn average_millis_per_month(&self) -> i64 {
        MILLIS_PER_MONTH
    }

    fn approx_millis_at_epoch_div2(&self) -> i64 {
        (1969 * MILLIS_PER_YEAR + 352 * MILLIS_PER_DAY) / 2
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

    fn skips_year_zero(&self) -> bool {
        true
    }
}

pub fn chronology(min_days_in_first_week: i32) -> Result<BasicChronology> {
    BasicChronology::new(
        CalendarSystem::Julian {
            min_days_in_first_week,
        },
        BasicCalendar::new(JulianRules, min_days_in_first_week)?,
    )
}

pub fn instance(zone: Arc<dyn TimeZone>) -> Result<Arc<dyn Chronology>> {
    ChronologyCache::global().calendar(
        CalendarSystem::Julian {
            min_days_in_first_week: 4,
        },
        zone,
    )
}

pub fn instance_utc() -> Result<Arc<dyn Chronology>> {
    instance(crate::zone::utc())
}

#[cfg(test)]
mod tests {
    use std::sync::LazyLock;

    use super::*;
    use crate::calendars::gregorian;

    static CORE: LazyLock<BasicCalendar> =
        LazyLock::new(|| BasicCalendar::with_iso_weeks(JulianRules));

    #[test]
    fn epoch_is_december_19th_1969() {
        let core = &*CORE;
        assert_eq!(core.year(0), 1969);
        assert_eq!(core.month_of_year(0), 12);
        assert_eq!(core.day_of_month(0), 19);
    }

    #[test]
    fn julian_drift_against_gregorian() {
        // Both calendars agree during the third century.
        let julian = CORE.year_month_day_millis(200, 3, 1);
        let gregorian = gregorian::CORE.year_month_day_millis(200, 3, 1);
        assert_eq!(julian, gregorian);
        // The eve of the 1582 reform: Julian 1582-10-05 is Gregorian 1582-10-15.
        let julian = CORE.year_month_day_millis(1582, 10, 5);
        let gregorian = gregorian::CORE.year_month_day_millis(1582, 10, 15);
        assert_eq!(julian, gregorian);
    }

    #[test]
    fn consecutive_years_differ_by_their_length() {
        let rules = JulianRules;
        for year in [-5, -4, -1, 0, 1, 3, 4, 1967, 1968, 1969] {
            let length =
                rules.first_day_of_year_millis(year + 1) - rules.first_day_of_year_millis(year);
            assert_eq!(length, rules.days_in_year(year) as i64 * MILLIS_PER_DAY, "year {year}");
        }
    }

    #[test]
    fn last_year_starts_below_the_top_of_the_timeline() {
        let rules = JulianRules;
        let start = rules.first_day_of_year_millis(MAX_YEAR);
        assert_eq!(start, 9_223_372_004_947_200_000);
        let end = rules.first_day_of_year_millis(MAX_YEAR + 1);
        assert_eq!(end - start, rules.days_in_year(MAX_YEAR) as i64 * MILLIS_PER_DAY);
        let core = &*CORE;
        assert_eq!(core.year(start), MAX_YEAR);
        assert_eq!(core.year(i64::MAX), MAX_YEAR);
    }

    #[test]
    fn year_zero_is_rejected_publicly() {
        let core = &*CORE;
        assert!(core.date_time_millis(0, 1, 1, 0).is_err());
        assert_eq!(
            core.date_time_millis(-1, 1, 1, 0).unwrap(),
            core.year_month_day_millis(0, 1, 1)
        );
    }
}
