//! Table-driven lunisolar calendars.
//!
//! Month lengths are not computed from a formula but read from an explicit
//! table, one entry per year: twelve regular month lengths plus an optional
//! intercalary month. Years outside the table extrapolate as twelve
//! alternating 30- and 29-day months, which keeps boundary arithmetic
//! (week counts of the following year, for instance) well defined; the
//! supported range is still the table's.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tempora_common::{Error, Result};

use crate::basic::{BasicCalendar, BasicChronology, CalendarRules, EraStyle};
use crate::cache::{CalendarSystem, ChronologyCache};
use crate::chronology::Chronology;
use crate::zone::TimeZone;
use crate::MILLIS_PER_DAY;

const REGULAR_MONTHS: usize = 12;
const EXTRAPOLATED_YEAR_DAYS: i64 = 354;
const MAX_START_DAY: u64 = 100_000_000;

/// An intercalary month inserted after regular month `after`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IntercalaryMonth {
    pub after: u8,
    pub length: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunisolarYear {
    /// Lengths of the twelve regular months.
    pub months: Vec<u8>,
    #[serde(default)]
    pub intercalary: Option<IntercalaryMonth>,
}

impl LunisolarYear {
    fn month_lengths(&self) -> impl Iterator<Item = i32> + '_ {
        let split = self.intercalary.map_or(REGULAR_MONTHS, |leap| leap.after as usize);
        let (before, after) = self.months.split_at(split.min(self.months.len()));
        before
            .iter()
            .map(|&days| days as i32)
            .chain(self.intercalary.map(|leap| leap.length as i32))
            .chain(after.iter().map(|&days| days as i32))
    }
}

/// The table a lunisolar calendar is built from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunisolarTable {
    pub name: String,
    /// Year number of the first entry.
    pub first_year: i32,
    /// Days from 1970-01-01 to the first day of `first_year`.
    pub first_year_start_day: i64,
    pub years: Vec<LunisolarYear>,
}

impl LunisolarTable {
    pub fn last_year(&self) -> i32 {
        self.first_year + self.years.len() as i32 - 1
    }

    fn validate(&self) -> Result<()> {
        if self.years.is_empty() {
            return Err(Error::invalid_arg("years", "lunisolar table is empty"));
        }
        if self.first_year.checked_add(self.years.len() as i32).is_none() {
            return Err(Error::invalid_arg(
                "first_year",
                "table runs past the last representable year",
            ));
        }
        if self.first_year_start_day.unsigned_abs() > MAX_START_DAY {
            return Err(Error::invalid_arg(
                "first_year_start_day",
                format!("{} days from the epoch is out of range", self.first_year_start_day),
            ));
        }
        for (i, year) in self.years.iter().enumerate() {
            let number = self.first_year + i as i32;
            if year.months.len() != REGULAR_MONTHS {
                return Err(Error::invalid_arg(
                    "months",
                    format!("year {number} lists {} months instead of 12", year.months.len()),
                ));
            }
            if let Some(leap) = year.intercalary {
                if !(1..=REGULAR_MONTHS as u8).contains(&leap.after) {
                    return Err(Error::invalid_arg(
                        "intercalary",
                        format!("year {number} inserts a month after month {}", leap.after),
                    ));
                }
            }
            if let Some(days) = year.month_lengths().find(|days| !(1..=31).contains(days)) {
                return Err(Error::invalid_arg(
                    "months",
                    format!("year {number} has a month of {days} days"),
                ));
            }
        }
        Ok(())
    }
}

/// Rules over a validated table, with every per-year prefix sum
/// precomputed.
#[derive(Debug)]
pub struct LunisolarRules {
    table: Arc<LunisolarTable>,
    /// Day number of the first day of each table year, plus the day after
    /// the last one.
    year_starts: Vec<i64>,
    /// Per table year, days before each month, plus the year length.
    month_starts: Vec<Vec<i32>>,
    max_month_lengths: [i32; REGULAR_MONTHS + 1],
    max_year_days: i32,
    average_year: i64,
    average_month: i64,
}

impl LunisolarRules {
    pub fn new(table: Arc<LunisolarTable>) -> Result<LunisolarRules> {
        table.validate()?;
        let mut year_starts = Vec::with_capacity(table.years.len() + 1);
        let mut month_starts = Vec::with_capacity(table.years.len());
        let mut max_month_lengths = [0; REGULAR_MONTHS + 1];
        let mut day = table.first_year_start_day;
        let mut total_months = 0i64;
        for year in &table.years {
            year_starts.push(day);
            let mut starts = vec![0];
            for (i, length) in year.month_lengths().enumerate() {
                max_month_lengths[i] = max_month_lengths[i].max(length);
                starts.push(starts[i] + length);
            }
            total_months += (starts.len() - 1) as i64;
            day += *starts.last().unwrap_or(&0) as i64;
            month_starts.push(starts);
        }
        year_starts.push(day);
        let total_days = day - table.first_year_start_day;
        let max_year_days = month_starts
            .iter()
            .filter_map(|starts| starts.last().copied())
            .max()
            .unwrap_or(EXTRAPOLATED_YEAR_DAYS as i32);
        log::debug!(
            "lunisolar table {}: years {}..={}",
            table.name,
            table.first_year,
            table.last_year()
        );
        Ok(LunisolarRules {
            average_year: total_days * MILLIS_PER_DAY / table.years.len() as i64,
            average_month: total_days * MILLIS_PER_DAY / total_months,
            table,
            year_starts,
            month_starts,
            max_month_lengths,
            max_year_days,
        })
    }

    pub fn table(&self) -> &Arc<LunisolarTable> {
        &self.table
    }

    fn index(&self, year: i32) -> Option<usize> {
        let index = year as i64 - self.table.first_year as i64;
        (0..self.table.years.len() as i64)
            .contains(&index)
            .then_some(index as usize)
    }

    fn month_starts(&self, year: i32) -> Option<&[i32]> {
        self.index(year).map(|i| self.month_starts[i].as_slice())
    }

    fn extrapolated_month_length(month: i32) -> i32 {
        if month % 2 == 1 { 30 } else { 29 }
    }

    fn extrapolated_month_start(month: i32) -> i32 {
        let index = month - 1;
        (index / 2) * 59 + (index % 2) * 30
    }

    fn start_day(&self, year: i32) -> i64 {
        let first = self.table.first_year as i64;
        let last = self.table.last_year() as i64;
        let year = year as i64;
        if year < first {
            self.table.first_year_start_day - (first - year) * EXTRAPOLATED_YEAR_DAYS
        } else if year > last {
            self.year_starts[self.table.years.len()] + (year - last - 1) * EXTRAPOLATED_YEAR_DAYS
        } else {
            self.year_starts[(year - first) as usize]
        }
    }
}

impl CalendarRules for LunisolarRules {
    fn name(&self) -> &str {
        &self.table.name
    }

    fn min_year(&self) -> i32 {
        self.table.first_year
    }

    fn max_year(&self) -> i32 {
        self.table.last_year()
    }

    /// A year is leap when the table gives it an intercalary month.
    fn is_leap_year(&self, year: i32) -> bool {
        self.months_in_year(year) > REGULAR_MONTHS as i32
    }

    fn max_month(&self) -> i32 {
        REGULAR_MONTHS as i32 + 1
    }

    fn months_in_year(&self, year: i32) -> i32 {
        self.month_starts(year)
            .map_or(REGULAR_MONTHS as i32, |starts| starts.len() as i32 - 1)
    }

    fn months_vary(&self) -> bool {
        true
    }

    fn days_in_year_month(&self, year: i32, month: i32) -> i32 {
        match self.month_starts(year) {
            Some(starts) => {
                let m = (month.max(1) as usize).min(starts.len() - 1);
                starts[m] - starts[m - 1]
            }
            None => Self::extrapolated_month_length(month),
        }
    }

    fn days_in_month_max(&self, month: i32) -> i32 {
        let index = (month.clamp(1, REGULAR_MONTHS as i32 + 1) - 1) as usize;
        self.max_month_lengths[index].max(Self::extrapolated_month_length(month))
    }

    fn days_in_month_max_overall(&self) -> i32 {
        self.max_month_lengths.iter().copied().max().unwrap_or(30).max(30)
    }

    fn days_in_year(&self, year: i32) -> i32 {
        self.month_starts(year)
            .and_then(|starts| starts.last().copied())
            .unwrap_or(EXTRAPOLATED_YEAR_DAYS as i32)
    }

    fn days_in_year_max(&self) -> i32 {
        self.max_year_days
    }

    fn first_day_of_year_millis(&self, year: i32) -> i64 {
        self.start_day(year) * MILLIS_PER_DAY
    }

    fn average_millis_per_year(&self) -> i64 {
        self.average_year
    }

    fn average_millis_per_month(&self) -> i64 {
        self.average_month
    }

    fn approx_millis_at_epoch_div2(&self) -> i64 {
        let first = self.table.first_year as i64;
        (first * self.average_year - self.table.first_year_start_day * MILLIS_PER_DAY) / 2
    }

    fn month_of_year(&self, millis_of_year: i64, year: i32) -> i32 {
        let day = (millis_of_year / MILLIS_PER_DAY) as i32;
        match self.month_starts(year) {
            Some(starts) => {
                let month = starts.partition_point(|&start| start <= day) as i32;
                month.clamp(1, starts.len() as i32 - 1)
            }
            None => (day * 2 / 59 + 1).min(REGULAR_MONTHS as i32),
        }
    }

    fn millis_to_month_start(&self, year: i32, month: i32) -> i64 {
        let days = match self.month_starts(year) {
            Some(starts) => starts[((month.max(1) - 1) as usize).min(starts.len() - 1)],
            None => Self::extrapolated_month_start(month),
        };
        days as i64 * MILLIS_PER_DAY
    }

    fn is_leap_month(&self, year: i32, month: i32) -> bool {
        self.index(year)
            .and_then(|i| self.table.years[i].intercalary)
            .is_some_and(|leap| leap.after as i32 + 1 == month)
    }

    fn era_style(&self) -> EraStyle {
        EraStyle::Single
    }
}

pub fn chronology(
    table: Arc<LunisolarTable>,
    min_days_in_first_week: i32,
) -> Result<BasicChronology> {
    let rules = LunisolarRules::new(table.clone())?;
    BasicChronology::new(
        CalendarSystem::Lunisolar {
            table,
            min_days_in_first_week,
        },
        BasicCalendar::new(rules, min_days_in_first_week)?,
    )
}

pub fn instance(
    table: Arc<LunisolarTable>,
    zone: Arc<dyn TimeZone>,
) -> Result<Arc<dyn Chronology>> {
    ChronologyCache::global().calendar(
        CalendarSystem::Lunisolar {
            table,
            min_days_in_first_week: 4,
        },
        zone,
    )
}

#[cfg(test)]
mod tests {
    use tempora_common::ErrorKind;

    use super::*;

    fn table() -> LunisolarTable {
        let plain = LunisolarYear {
            months: vec![30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29],
            intercalary: None,
        };
        let leap = LunisolarYear {
            months: vec![29, 30, 29, 30, 29, 30, 29, 30, 29, 30, 29, 30],
            intercalary: Some(IntercalaryMonth { after: 4, length: 29 }),
        };
        LunisolarTable {
            name: "Test".into(),
            first_year: 100,
            first_year_start_day: -10,
            years: vec![plain.clone(), leap, plain],
        }
    }

    #[test]
    fn leap_status_comes_from_month_count() {
        let rules = LunisolarRules::new(Arc::new(table())).unwrap();
        assert!(!rules.is_leap_year(100));
        assert!(rules.is_leap_year(101));
        assert_eq!(rules.months_in_year(101), 13);
        assert_eq!(rules.days_in_year(101), 383);
        assert_eq!(rules.days_in_year_month(101, 5), 29);
        assert!(rules.is_leap_month(101, 5));
        assert_eq!(rules.days_in_year_month(101, 6), 29);
        assert_eq!(rules.days_in_year_month(101, 13), 30);
    }

    #[test]
    fn year_starts_accumulate() {
        let rules = LunisolarRules::new(Arc::new(table())).unwrap();
        assert_eq!(rules.first_day_of_year_millis(100), -10 * MILLIS_PER_DAY);
        assert_eq!(rules.first_day_of_year_millis(101), 344 * MILLIS_PER_DAY);
        assert_eq!(rules.first_day_of_year_millis(102), 727 * MILLIS_PER_DAY);
        assert_eq!(rules.first_day_of_year_millis(103), 1081 * MILLIS_PER_DAY);
        assert_eq!(rules.first_day_of_year_millis(99), -364 * MILLIS_PER_DAY);
    }

    #[test]
    fn month_lookup_scans_the_table() {
        let rules = LunisolarRules::new(Arc::new(table())).unwrap();
        assert_eq!(rules.month_of_year(0, 101), 1);
        assert_eq!(rules.month_of_year(117 * MILLIS_PER_DAY, 101), 4);
        assert_eq!(rules.month_of_year(118 * MILLIS_PER_DAY, 101), 5);
        assert_eq!(rules.month_of_year(382 * MILLIS_PER_DAY, 101), 13);
        assert_eq!(rules.millis_to_month_start(101, 5), 118 * MILLIS_PER_DAY);
    }

    #[test]
    fn core_walks_varying_months() {
        let core = BasicCalendar::with_iso_weeks(LunisolarRules::new(Arc::new(table())).unwrap());
        let start = core.year_month_day_millis(100, 12, 15);
        let later = core.add_months(start, 2).unwrap();
        assert_eq!(core.year(later), 101);
        assert_eq!(core.month_of_year(later), 2);
        let later = core.add_months(start, 14).unwrap();
        assert_eq!(core.year(later), 102);
        assert_eq!(core.month_of_year(later), 1);
        assert_eq!(core.year(start), 100);
    }

    #[test]
    fn instants_outside_the_table_cannot_move_years() {
        let core = BasicCalendar::with_iso_weeks(LunisolarRules::new(Arc::new(table())).unwrap());
        let before = -20 * MILLIS_PER_DAY;
        let after = 1100 * MILLIS_PER_DAY;
        for instant in [before, after] {
            let err = core.set_year(instant, 101).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::YearOutOfRange { .. }), "{err}");
            assert!(core.add_months(instant, 1).is_err());
        }
        let inside = core.year_month_day_millis(100, 3, 4);
        let moved = core.set_year(inside, 102).unwrap();
        assert_eq!(moved, core.year_month_day_millis(102, 3, 4));
    }

    #[test]
    fn invalid_tables_are_rejected() {
        let mut bad = table();
        bad.years[0].months.pop();
        assert!(LunisolarRules::new(Arc::new(bad)).is_err());
        let mut bad = table();
        bad.years[1].intercalary = Some(IntercalaryMonth { after: 0, length: 29 });
        assert!(LunisolarRules::new(Arc::new(bad)).is_err());
        let mut bad = table();
        bad.years.clear();
        assert!(LunisolarRules::new(Arc::new(bad)).is_err());
    }
}
