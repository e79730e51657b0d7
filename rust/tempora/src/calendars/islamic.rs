//! The tabular (arithmetic) Islamic calendar: 30-year cycles of 354- and
//! 355-day years, months alternating 30 and 29 days.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tempora_common::Result;

use crate::basic::{BasicCalendar, BasicChronology, CalendarRules, EraStyle};
use crate::cache::{CalendarSystem, ChronologyCache};
use crate::chronology::Chronology;
use crate::zone::TimeZone;
use crate::MILLIS_PER_DAY;

const MIN_YEAR: i32 = 1;
const MAX_YEAR: i32 = 292_271_022;

/// First day of year 1: 622-07-16 (Julian).
const MILLIS_YEAR_1: i64 = -42_521_587_200_000;
const CYCLE: i32 = 30;
const DAYS_PER_CYCLE: i64 = 10_631;
const MONTH_PAIR_LENGTH: i32 = 59;
const LONG_MONTH_LENGTH: i32 = 30;
const SHORT_MONTH_LENGTH: i32 = 29;
const MILLIS_PER_YEAR: i64 = 30_617_280_288;
const MILLIS_PER_MONTH: i64 = 2_551_440_384;

/// Which years of each 30-year cycle are leap years. The variants are the
/// tabular schemes in common use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeapYearPattern {
    /// 2, 5, 7, 10, 13, 15, 18, 21, 24, 26, 29.
    Base15,
    /// 2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29.
    #[default]
    Base16,
    /// 2, 5, 8, 10, 13, 16, 19, 21, 24, 27, 29.
    Indian,
    /// 2, 5, 8, 11, 13, 16, 19, 21, 24, 27, 30.
    HabashAlHasib,
}

impl LeapYearPattern {
    fn bits(self) -> u32 {
        match self {
            LeapYearPattern::Base15 => 623_158_436,
            LeapYearPattern::Base16 => 623_191_204,
            LeapYearPattern::Indian => 690_562_340,
            LeapYearPattern::HabashAlHasib => 153_692_453,
        }
    }

    pub fn is_leap_year(self, year: i32) -> bool {
        self.bits() & (1 << year.rem_euclid(CYCLE)) != 0
    }

    pub fn name(self) -> &'static str {
        match self {
            LeapYearPattern::Base15 => "15-based",
            LeapYearPattern::Base16 => "16-based",
            LeapYearPattern::Indian => "Indian",
            LeapYearPattern::HabashAlHasib => "Habash al-Hasib",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct IslamicRules {
    leap_years: LeapYearPattern,
}

impl IslamicRules {
    pub fn new(leap_years: LeapYearPattern) -> IslamicRules {
        IslamicRules { leap_years }
    }

    fn year_days(&self, year: i32) -> i64 {
        if self.is_leap_year(year) { 355 } else { 354 }
    }
}

impl CalendarRules for IslamicRules {
    fn name(&self) -> &str {
        "Islamic"
    }

    fn min_year(&self) -> i32 {
        MIN_YEAR
    }

    fn max_year(&self) -> i32 {
        MAX_YEAR
    }

    fn is_leap_year(&self, year: i32) -> bool {
        self.leap_years.is_leap_year(year)
    }

    fn days_in_year_month(&self, year: i32, month: i32) -> i32 {
        if (month == 12 && self.is_leap_year(year)) || (month - 1) % 2 == 0 {
            LONG_MONTH_LENGTH
        } else {
            SHORT_MONTH_LENGTH
        }
    }

    fn days_in_month_max(&self, month: i32) -> i32 {
        if month == 12 || (month - 1) % 2 == 0 {
            LONG_MONTH_LENGTH
        } else {
            SHORT_MONTH_LENGTH
        }
    }

    fn days_in_month_max_overall(&self) -> i32 {
        LONG_MONTH_LENGTH
    }

    fn days_in_year(&self, year: i32) -> i32 {
        self.year_days(year) as i32
    }

    fn days_in_year_max(&self) -> i32 {
        355
    }

    fn first_day_of_year_millis(&self, year: i32) -> i64 {
        let elapsed = year as i64 - 1;
        let cycles = elapsed.div_euclid(CYCLE as i64);
        let into_cycle = elapsed.rem_euclid(CYCLE as i64) as i32;
        let days: i64 = (1..=into_cycle).map(|y| self.year_days(y)).sum();
        MILLIS_YEAR_1 + (cycles * DAYS_PER_CYCLE + days) * MILLIS_PER_DAY
    }

    fn average_millis_per_year(&self) -> i64 {
        MILLIS_PER_YEAR
    }

    fn average_millis_per_month(&self) -> i64 {
        MILLIS_PER_MONTH
    }

    fn approx_millis_at_epoch_div2(&self) -> i64 {
        (MILLIS_PER_YEAR - MILLIS_YEAR_1) / 2
    }

    fn month_of_year(&self, millis_of_year: i64, _year: i32) -> i32 {
        let day = (millis_of_year / MILLIS_PER_DAY) as i32;
        if day == 354 {
            12
        } else {
            day * 2 / MONTH_PAIR_LENGTH + 1
        }
    }

    fn millis_to_month_start(&self, _year: i32, month: i32) -> i64 {
        let index = month - 1;
        let pairs = (index / 2) as i64 * MONTH_PAIR_LENGTH as i64;
        let days = if index % 2 == 1 {
            pairs + LONG_MONTH_LENGTH as i64
        } else {
            pairs
        };
        days * MILLIS_PER_DAY
    }

    fn is_leap_month(&self, year: i32, month: i32) -> bool {
        month == 12 && self.is_leap_year(year)
    }

    fn era_style(&self) -> EraStyle {
        EraStyle::Single
    }
}

pub fn chronology(leap_years: LeapYearPattern) -> Result<BasicChronology> {
    BasicChronology::new(
        CalendarSystem::Islamic { leap_years },
        BasicCalendar::with_iso_weeks(IslamicRules::new(leap_years)),
    )
}

pub fn instance(
    leap_years: LeapYearPattern,
    zone: Arc<dyn TimeZone>,
) -> Result<Arc<dyn Chronology>> {
    ChronologyCache::global().calendar(CalendarSystem::Islamic { leap_years }, zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leap_patterns() {
        let leaps =
            |p: LeapYearPattern| (1..=30).filter(|&y| p.is_leap_year(y)).collect::<Vec<_>>();
        assert_eq!(leaps(LeapYearPattern::Base15), [2, 5, 7, 10, 13, 15, 18, 21, 24, 26, 29]);
        assert_eq!(leaps(LeapYearPattern::Base16), [2, 5, 7, 10, 13, 16, 18, 21, 24, 26, 29]);
        assert_eq!(leaps(LeapYearPattern::Indian), [2, 5, 8, 10, 13, 16, 19, 21, 24, 27, 29]);
        assert_eq!(
            leaps(LeapYearPattern::HabashAlHasib),
            [2, 5, 8, 11, 13, 16, 19, 21, 24, 27, 30]
        );
    }

    #[test]
    fn cycle_length() {
        let rules = IslamicRules::new(LeapYearPattern::Base16);
        let days: i64 = (1..=30).map(|y| rules.year_days(y)).sum();
        assert_eq!(days, DAYS_PER_CYCLE);
        assert_eq!(
            rules.first_day_of_year_millis(31) - rules.first_day_of_year_millis(1),
            DAYS_PER_CYCLE * MILLIS_PER_DAY
        );
    }

    #[test]
    fn months_alternate() {
        let core = BasicCalendar::with_iso_weeks(IslamicRules::new(LeapYearPattern::Base16));
        assert_eq!(core.days_in_year_month(1, 1), 30);
        assert_eq!(core.days_in_year_month(1, 2), 29);
        assert_eq!(core.days_in_year_month(1, 12), 29);
        assert_eq!(core.days_in_year_month(2, 12), 30);
        let start = core.year_millis(2);
        assert_eq!(core.month_of_year(start + 354 * MILLIS_PER_DAY), 12);
        assert_eq!(core.day_of_month(start + 354 * MILLIS_PER_DAY), 30);
        assert_eq!(core.month_of_year(start + 30 * MILLIS_PER_DAY), 2);
        assert_eq!(core.year(MILLIS_YEAR_1), 1);
        // 1 Muharram 1421 was 2000-04-06.
        let y1421 = core.year_millis(1421);
        assert_eq!(y1421, 954_979_200_000);
    }
}
