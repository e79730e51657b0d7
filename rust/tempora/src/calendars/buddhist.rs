//! The Thai Buddhist calendar: the GJ calendar with years counted from
//! 543 BCE in a single era.

use std::sync::Arc;

use tempora_common::Result;

use crate::assembly::{Assembly, Fields};
use crate::basic::SingleEraField;
use crate::cache::{CalendarSystem, ChronologyCache, ChronologyKey};
use crate::chronology::Chronology;
use crate::decorators::cutover::DEFAULT_CUTOVER;
use crate::field::{
    DateTimeField, DelegatedDateTimeField, DividedDateTimeField, OffsetDateTimeField,
    RemainderDateTimeField, SkipUndoDateTimeField, UnsupportedDurationField,
};
use crate::field_type::{DateTimeFieldType, DurationFieldType};
use crate::zone::{self, TimeZone};

/// Years between the Buddhist and Christian eras.
pub const BUDDHIST_OFFSET: i32 = 543;

#[derive(Debug)]
pub struct BuddhistChronology {
    key: ChronologyKey,
    zone: Arc<dyn TimeZone>,
    assembly: Assembly,
}

impl BuddhistChronology {
    /// Assembles the UTC instance over the shared UTC GJ chronology.
    pub fn new(cache: &ChronologyCache) -> Result<BuddhistChronology> {
        let base = cache.calendar_utc(CalendarSystem::Gj {
            cutover: DEFAULT_CUTOVER,
            min_days_in_first_week: 4,
        })?;
        let assembly = Assembly::new(Some(base), |slots| {
            use DateTimeFieldType as T;

            let (Some(year), Some(weekyear)) = (slots.year.clone(), slots.weekyear.clone()) else {
                return Ok(());
            };
            let eras = UnsupportedDurationField::shared(DurationFieldType::Eras);

            let year: Arc<dyn DateTimeField> = Arc::new(OffsetDateTimeField::new(
                Arc::new(SkipUndoDateTimeField::new(year, 0)),
                T::Year,
                BUDDHIST_OFFSET,
            ));
            let year_of_era: Arc<dyn DateTimeField> = Arc::new(
                DelegatedDateTimeField::with_type(year.clone(), T::YearOfEra)
                    .with_range(Some(eras.clone())),
            );
            let weekyear: Arc<dyn DateTimeField> = Arc::new(OffsetDateTimeField::new(
                Arc::new(SkipUndoDateTimeField::new(weekyear, 0)),
                T::Weekyear,
                BUDDHIST_OFFSET,
            ));
            let century_of_era = DividedDateTimeField::with_range(
                Arc::new(OffsetDateTimeField::new(year_of_era.clone(), T::YearOfEra, 99)),
                Some(eras.clone()),
                T::CenturyOfEra,
                100,
            );
            let centuries = century_of_era.duration_field().clone();
            let year_of_century = OffsetDateTimeField::new(
                Arc::new(RemainderDateTimeField::from_divided(&century_of_era, T::YearOfCentury)),
                T::YearOfCentury,
                1,
            );
            let weekyear_of_century = OffsetDateTimeField::new(
                Arc::new(RemainderDateTimeField::with_range(
                    weekyear.clone(),
                    centuries.clone(),
                    T::WeekyearOfCentury,
                    100,
                )),
                T::WeekyearOfCentury,
                1,
            );

            slots.eras = Some(eras);
            slots.year = Some(year);
            slots.year_of_era = Some(year_of_era);
            slots.weekyear = Some(weekyear);
            slots.century_of_era = Some(Arc::new(century_of_era));
            slots.centuries = Some(centuries);
            slots.year_of_century = Some(Arc::new(year_of_century));
            slots.weekyear_of_century = Some(Arc::new(weekyear_of_century));
            slots.era = Some(SingleEraField::shared());
            Ok(())
        })?;
        let zone = zone::utc();
        let key = ChronologyKey::calendar(CalendarSystem::Buddhist, zone.id());
        log::debug!("assembled {key}");
        Ok(BuddhistChronology {
            key,
            zone,
            assembly,
        })
    }
}

impl Chronology for BuddhistChronology {
    fn key(&self) -> &ChronologyKey {
        &self.key
    }

    fn zone(&self) -> &Arc<dyn TimeZone> {
        &self.zone
    }

    fn fields(&self) -> &Fields {
        self.assembly.fields()
    }

    fn base(&self) -> Option<&Arc<dyn Chronology>> {
        self.assembly.base()
    }

    fn date_time_millis(&self, year: i32, month: i32, day: i32, millis_of_day: i32) -> Result<i64> {
        self.assembly
            .date_time_millis(year, month, day, millis_of_day)
    }

    fn date_time_millis_hms(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        self.assembly
            .date_time_millis_hms(year, month, day, hour, minute, second, millis)
    }

    fn date_time_millis_at(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        self.assembly
            .date_time_millis_at(instant, hour, minute, second, millis)
    }

    fn with_zone(
        &self,
        cache: &ChronologyCache,
        zone: Arc<dyn TimeZone>,
    ) -> Result<Arc<dyn Chronology>> {
        cache.calendar(CalendarSystem::Buddhist, zone)
    }
}

pub fn instance(zone: Arc<dyn TimeZone>) -> Result<Arc<dyn Chronology>> {
    ChronologyCache::global().calendar(CalendarSystem::Buddhist, zone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::{BASE_MILLIS_OF_DAY, BASE_TIME_FIELDS};

    #[test]
    fn years_are_offset() {
        let cache = ChronologyCache::new();
        let buddhist = BuddhistChronology::new(&cache).unwrap();
        let t = buddhist.date_time_millis(2543, 1, 1, 0).unwrap();
        assert_eq!(t, 946_684_800_000);
        let fields = buddhist.fields();
        assert_eq!(fields.year.get(t).unwrap(), 2543);
        assert_eq!(fields.year_of_era.get(t).unwrap(), 2543);
        assert_eq!(fields.era.get(t).unwrap(), 1);
        assert_eq!(fields.century_of_era.get(t).unwrap(), 26);
        assert_eq!(fields.year_of_century.get(t).unwrap(), 43);
        assert!(!fields.eras.is_supported());
        let flags = buddhist.assembly.base_flags();
        assert_eq!(flags, BASE_TIME_FIELDS | BASE_MILLIS_OF_DAY);
    }

    #[test]
    fn gj_year_zero_is_restored() {
        let cache = ChronologyCache::new();
        let buddhist = BuddhistChronology::new(&cache).unwrap();
        // 1 BCE is Buddhist 543.
        let t = buddhist.date_time_millis(543, 6, 1, 0).unwrap();
        let base = buddhist.base().unwrap();
        assert_eq!(base.fields().year.get(t).unwrap(), -1);
    }
}
