//! Calendars of twelve 30-day months followed by a 5- or 6-day thirteenth
//! month: Coptic and Ethiopic. Both count years from a single era and have
//! no public year zero.

use std::sync::Arc;

use tempora_common::Result;

use crate::basic::{BasicCalendar, BasicChronology, CalendarRules, EraStyle};
use crate::cache::{CalendarSystem, ChronologyCache};
use crate::chronology::Chronology;
use crate::zone::TimeZone;
use crate::MILLIS_PER_DAY;

const MONTH_LENGTH: i64 = 30;
const MILLIS_PER_MONTH_LENGTH: i64 = MONTH_LENGTH * MILLIS_PER_DAY;
const MILLIS_PER_YEAR: i64 = 31_557_600_000;
const MILLIS_PER_MONTH: i64 = MILLIS_PER_YEAR / 13;

/// Which fixed-month calendar; they differ only in the year at the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixedMonthKind {
    Coptic,
    Ethiopic,
}

#[derive(Debug, Clone, Copy)]
pub struct FixedMonthRules {
    kind: FixedMonthKind,
}

impl FixedMonthRules {
    pub fn new(kind: FixedMonthKind) -> FixedMonthRules {
        FixedMonthRules { kind }
    }

    pub fn kind(&self) -> FixedMonthKind {
        self.kind
    }

    /// Year whose first day falls on 1970-09-11.
    fn year_at_epoch_start(&self) -> i64 {
        match self.kind {
            FixedMonthKind::Coptic => 1687,
            FixedMonthKind::Ethiopic => 1963,
        }
    }
}

impl CalendarRules for FixedMonthRules {
    fn name(&self) -> &str {
        match self.kind {
            FixedMonthKind::Coptic => "Coptic",
            FixedMonthKind::Ethiopic => "Ethiopic",
        }
    }

    fn min_year(&self) -> i32 {
        match self.kind {
            FixedMonthKind::Coptic => -292_269_336,
            FixedMonthKind::Ethiopic => -292_269_060,
        }
    }

    fn max_year(&self) -> i32 {
        match self.kind {
            FixedMonthKind::Coptic => 292_272_708,
            FixedMonthKind::Ethiopic => 292_272_984,
        }
    }

    fn is_leap_year(&self, year: i32) -> bool {
        (year & 3) == 3
    }

    fn max_month(&self) -> i32 {
        13
    }

    fn days_in_year_month(&self, year: i32, month: i32) -> i32 {
        if month > 12 {
            if self.is_leap_year(year) { 6 } else { 5 }
        } else {
            MONTH_LENGTH as i32
        }
    }

    fn days_in_month_max(&self, month: i32) -> i32 {
        if month == 13 { 6 } else { MONTH_LENGTH as i32 }
    }

    fn days_in_month_max_overall(&self) -> i32 {
        MONTH_LENGTH as i32
    }

    fn first_day_of_year_millis(&self, year: i32) -> i64 {
        let relative = year as i64 - self.year_at_epoch_start();
        let leap_years = if relative <= 0 {
            // Add 3 before shifting right so that the division rounds toward zero.
            (relative + 3) >> 2
        } else {
            let count = relative >> 2;
            if self.is_leap_year(year) { count } else { count + 1 }
        };
        (relative * 365 + leap_years) * MILLIS_PER_DAY + (365 - 112) * MILLIS_PER_DAY
    }

    fn average_millis_per_year(&self) -> i64 {
        MILLIS_PER_YEAR
    }

    fn average_millis_per_month(&self) -> i64 {
        MILLIS_PER_MONTH
    }

    fn approx_millis_at_epoch_div2(&self) -> i64 {
        ((self.year_at_epoch_start() - 1) * MILLIS_PER_YEAR + 112 * MILLIS_PER_DAY) / 2
    }

    fn month_of_year(&self, millis_of_year: i64, _year: i32) -> i32 {
        (millis_of_year / MILLIS_PER_MONTH_LENGTH) as i32 + 1
    }

    fn millis_to_month_start(&self, _year: i32, month: i32) -> i64 {
        (month as i64 - 1) * MILLIS_PER_MONTH_LENGTH
    }

    fn is_leap_month(&self, year: i32, month: i32) -> bool {
        month == 13 && self.is_leap_year(year)
    }

    fn era_style(&self) -> EraStyle {
        EraStyle::Single
    }

    fn skips_year_zero(&self) -> bool {
        true
    }
}

fn system(kind: FixedMonthKind, min_days_in_first_week: i32) -> CalendarSystem {
    match kind {
        FixedMonthKind::Coptic => CalendarSystem::Coptic {
            min_days_in_first_week,
        },
        FixedMonthKind::Ethiopic => CalendarSystem::Ethiopic {
            min_days_in_first_week,
        },
    }
}

pub fn chronology(kind: FixedMonthKind, min_days_in_first_week: i32) -> Result<BasicChronology> {
    BasicChronology::new(
        system(kind, min_days_in_first_week),
        BasicCalendar::new(FixedMonthRules::new(kind), min_days_in_first_week)?,
    )
}

pub fn instance(kind: FixedMonthKind, zone: Arc<dyn TimeZone>) -> Result<Arc<dyn Chronology>> {
    ChronologyCache::global().calendar(system(kind, 4), zone)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_year_1970() {
        for kind in [FixedMonthKind::Coptic, FixedMonthKind::Ethiopic] {
            let core = BasicCalendar::with_iso_weeks(FixedMonthRules::new(kind));
            // 1970-09-11 is day 253 after the epoch.
            let new_year = 253 * MILLIS_PER_DAY;
            let year = core.year(new_year);
            assert_eq!(core.year_millis(year), new_year);
            assert_eq!(core.month_of_year(new_year - 1), 13);
            assert_eq!(core.day_of_month(new_year - 1), 5);
            assert_eq!(core.month_of_year(new_year), 1);
        }
    }

    #[test]
    fn leap_years_have_six_epagomenal_days() {
        let core = BasicCalendar::with_iso_weeks(FixedMonthRules::new(FixedMonthKind::Coptic));
        assert!(core.is_leap_year(1687 + 3 - 1687 % 4));
        assert_eq!(core.days_in_year(1691), 366);
        assert_eq!(core.days_in_year_month(1691, 13), 6);
        assert_eq!(core.days_in_year_month(1690, 13), 5);
        for year in [-3, -1, 0, 1, 1686, 1687, 1690, 1691] {
            let length = core.year_millis(year + 1) - core.year_millis(year);
            assert_eq!(length, core.days_in_year(year) as i64 * MILLIS_PER_DAY, "year {year}");
        }
    }
}
