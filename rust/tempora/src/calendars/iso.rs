//! ISO-8601: the Gregorian calendar with ISO weeks and zero-based
//! century fields, where year 2000 is year 0 of century 20.

use std::sync::Arc;

use tempora_common::Result;

use super::gregorian::{self, GregorianRules};
use crate::basic::{BasicCalendar, BasicChronology};
use crate::cache::{CalendarSystem, ChronologyCache};
use crate::chronology::Chronology;
use crate::field::utils::verify_value_bounds;
use crate::field::{DateTimeField, DividedDateTimeField, DurationField, RemainderDateTimeField};
use crate::field_type::DateTimeFieldType;
use crate::zone::TimeZone;
use crate::MILLIS_PER_DAY;

pub fn chronology() -> Result<BasicChronology> {
    BasicChronology::with_overrides(
        CalendarSystem::Iso,
        BasicCalendar::with_iso_weeks(GregorianRules),
        |_, slots| {
            use DateTimeFieldType as T;
            let (Some(year), Some(weekyear)) = (slots.year.clone(), slots.weekyear.clone()) else {
                return Ok(());
            };
            let century_of_era = DividedDateTimeField::new(
                Arc::new(UnsignedYearField { year }),
                T::CenturyOfEra,
                100,
            );
            let centuries = century_of_era.duration_field().clone();
            slots.year_of_century = Some(Arc::new(RemainderDateTimeField::from_divided(
                &century_of_era,
                T::YearOfCentury,
            )));
            slots.weekyear_of_century = Some(Arc::new(RemainderDateTimeField::with_range(
                weekyear,
                centuries.clone(),
                T::WeekyearOfCentury,
                100,
            )));
            slots.centuries = Some(centuries);
            slots.century_of_era = Some(Arc::new(century_of_era));
            Ok(())
        },
    )
}

pub fn instance(zone: Arc<dyn TimeZone>) -> Result<Arc<dyn Chronology>> {
    ChronologyCache::global().calendar(CalendarSystem::Iso, zone)
}

pub fn instance_utc() -> Result<Arc<dyn Chronology>> {
    instance(crate::zone::utc())
}

/// Magnitude of the signed year, so that centuries group symmetrically
/// around year zero.
#[derive(Debug)]
struct UnsignedYearField {
    year: Arc<dyn DateTimeField>,
}

impl DateTimeField for UnsignedYearField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::YearOfEra
    }

    fn get(&self, instant: i64) -> Result<i32> {
        Ok(self.year.get(instant)?.abs())
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(self.name(), value as i64, 0, self.max_value() as i64)?;
        let value = if self.year.get(instant)? < 0 { -value } else { value };
        self.year.set(instant, value)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.year.add(instant, value)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.year.difference(minuend, subtrahend)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        self.year.duration_field()
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        None
    }

    fn min_value(&self) -> i32 {
        0
    }

    fn max_value(&self) -> i32 {
        self.year.max_value()
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        self.year.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.year.round_ceiling(instant)
    }
}

/// Renders a local instant as `yyyy-MM-ddTHH:mm:ss.SSS` in the Gregorian
/// calendar, for messages.
pub fn render_local(local: i64) -> String {
    let core = &*gregorian::CORE;
    let year = core.year(local);
    let month = core.month_of_year_in(local, year);
    let day = core.day_of_month_in(local, year, month);
    let time = local.rem_euclid(MILLIS_PER_DAY);
    format!(
        "{}-{:02}-{:02}T{:02}:{:02}:{:02}.{:03}",
        render_year(year),
        month,
        day,
        time / 3_600_000,
        time / 60_000 % 60,
        time / 1000 % 60,
        time % 1000
    )
}

fn render_year(year: i32) -> String {
    if year < 0 {
        format!("-{:04}", -(year as i64))
    } else {
        format!("{year:04}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render() {
        assert_eq!(render_local(0), "1970-01-01T00:00:00.000");
        assert_eq!(render_local(-1), "1969-12-31T23:59:59.999");
        assert_eq!(render_local(951_782_400_000 + 3_723_004), "2000-02-29T01:02:03.004");
        let year_minus_one = gregorian::CORE.year_millis(-1);
        assert_eq!(render_local(year_minus_one), "-0001-01-01T00:00:00.000");
    }

    #[test]
    fn centuries_are_zero_based() {
        let iso = chronology().unwrap();
        let fields = crate::chronology::Chronology::fields(&iso);
        let t = iso.core().year_month_day_millis(2000, 6, 1);
        assert_eq!(fields.century_of_era.get(t).unwrap(), 20);
        assert_eq!(fields.year_of_century.get(t).unwrap(), 0);
        assert_eq!(fields.year_of_era.get(t).unwrap(), 2000);
        let t = iso.core().year_month_day_millis(1999, 6, 1);
        assert_eq!(fields.century_of_era.get(t).unwrap(), 19);
        assert_eq!(fields.year_of_century.get(t).unwrap(), 99);
        let t = iso.core().year_month_day_millis(-150, 6, 1);
        assert_eq!(fields.century_of_era.get(t).unwrap(), 1);
        assert_eq!(fields.year_of_century.get(t).unwrap(), 50);
        let t = fields.year_of_century.set(t, 7).unwrap();
        assert_eq!(fields.year.get(t).unwrap(), -107);
    }
}
