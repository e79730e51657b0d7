use std::sync::Arc;

use tempora_common::Result;

use super::BasicCalendar;
use super::fields::{
    DayField, DayKind, MonthOps, SingleEraField, TIME_FIELDS, TwoEraField, WeekOfWeekyearField,
    WeekyearOps, YearOfEraField, YearOps,
};
use super::rules::EraStyle;
use crate::assembly::{Assembly, FieldSlots, Fields};
use crate::cache::{CalendarSystem, ChronologyCache, ChronologyKey};
use crate::chronology::{self, Chronology};
use crate::field::{
    DateTimeField, DividedDateTimeField, ImpreciseDateTimeField, OffsetDateTimeField,
    RemainderDateTimeField, SkipDateTimeField,
};
use crate::field_type::DateTimeFieldType;
use crate::zone::{self, TimeZone};
use crate::MILLIS_PER_DAY;

/// A UTC chronology whose fields all derive from one [`BasicCalendar`].
#[derive(Debug)]
pub struct BasicChronology {
    system: CalendarSystem,
    key: ChronologyKey,
    core: Arc<BasicCalendar>,
    zone: Arc<dyn TimeZone>,
    assembly: Assembly,
}

impl BasicChronology {
    pub fn new(system: CalendarSystem, core: BasicCalendar) -> Result<BasicChronology> {
        Self::with_overrides(system, core, |_, _| Ok(()))
    }

    /// Builds the standard field set, then lets `customize` replace
    /// individual slots. Replacements must leave the year, month and day
    /// fields alone: construction goes straight to the core.
    pub fn with_overrides(
        system: CalendarSystem,
        core: BasicCalendar,
        customize: impl FnOnce(&Arc<BasicCalendar>, &mut FieldSlots) -> Result<()>,
    ) -> Result<BasicChronology> {
        let core = Arc::new(core);
        let assembly = Assembly::new(None, |slots| {
            assemble(&core, slots);
            customize(&core, slots)
        })?;
        let zone = zone::utc();
        let key = ChronologyKey::calendar(system.clone(), zone.id());
        log::debug!(
            "assembled {key} (min days in first week {})",
            core.min_days_in_first_week()
        );
        Ok(BasicChronology {
            system,
            key,
            core,
            zone,
            assembly,
        })
    }

    pub fn core(&self) -> &Arc<BasicCalendar> {
        &self.core
    }

    pub fn system(&self) -> &CalendarSystem {
        &self.system
    }
}

/// Fills `slots` with every field of a calendar built over `core`.
fn assemble(core: &Arc<BasicCalendar>, slots: &mut FieldSlots) {
    use DateTimeFieldType as T;

    let time = &*TIME_FIELDS;
    time.install(slots);

    let year = ImpreciseDateTimeField::shared(Arc::new(YearOps::new(core.clone())), None);
    let years = year.duration_field().clone();
    let month =
        ImpreciseDateTimeField::shared(Arc::new(MonthOps::new(core.clone())), Some(years.clone()));
    let months = month.duration_field().clone();
    let weekyear = ImpreciseDateTimeField::shared(Arc::new(WeekyearOps::new(core.clone())), None);
    let weekyears = weekyear.duration_field().clone();

    let year_of_era = YearOfEraField::shared(year.clone(), core.clone());
    let century_of_era = DividedDateTimeField::new(
        Arc::new(OffsetDateTimeField::new(year_of_era.clone(), T::YearOfEra, 99)),
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

    slots.era = Some(match core.rules().era_style() {
        EraStyle::BeforeAndCommon => TwoEraField::shared(core.clone()),
        EraStyle::Single => SingleEraField::shared(),
    });
    slots.day_of_week = Some(DayField::shared(core.clone(), DayKind::OfWeek, time.weeks.clone()));
    slots.day_of_month = Some(DayField::shared(core.clone(), DayKind::OfMonth, months.clone()));
    slots.day_of_year = Some(DayField::shared(core.clone(), DayKind::OfYear, years.clone()));
    slots.week_of_weekyear = Some(WeekOfWeekyearField::shared(core.clone(), weekyears.clone()));

    let (year, weekyear): (Arc<dyn DateTimeField>, Arc<dyn DateTimeField>) =
        if core.rules().skips_year_zero() {
            (
                Arc::new(SkipDateTimeField::new(year, 0)),
                Arc::new(SkipDateTimeField::new(weekyear, 0)),
            )
        } else {
            (year, weekyear)
        };

    slots.years = Some(years);
    slots.months = Some(months);
    slots.weekyears = Some(weekyears);
    slots.centuries = Some(centuries);
    slots.year = Some(year);
    slots.year_of_era = Some(year_of_era);
    slots.century_of_era = Some(Arc::new(century_of_era));
    slots.year_of_century = Some(Arc::new(year_of_century));
    slots.month_of_year = Some(month);
    slots.weekyear = Some(weekyear);
    slots.weekyear_of_century = Some(Arc::new(weekyear_of_century));
}

impl Chronology for BasicChronology {
    fn key(&self) -> &ChronologyKey {
        &self.key
    }

    fn zone(&self) -> &Arc<dyn TimeZone> {
        &self.zone
    }

    fn fields(&self) -> &Fields {
        self.assembly.fields()
    }

    fn date_time_millis(&self, year: i32, month: i32, day: i32, millis_of_day: i32) -> Result<i64> {
        self.core.date_time_millis(year, month, day, millis_of_day)
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
        let millis_of_day = chronology::millis_of_day(hour, minute, second, millis)?;
        self.core.date_time_millis(year, month, day, millis_of_day)
    }

    fn date_time_millis_at(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        let millis_of_day = chronology::millis_of_day(hour, minute, second, millis)?;
        Ok(instant.div_euclid(MILLIS_PER_DAY) * MILLIS_PER_DAY + millis_of_day as i64)
    }

    fn with_zone(
        &self,
        cache: &ChronologyCache,
        zone: Arc<dyn TimeZone>,
    ) -> Result<Arc<dyn Chronology>> {
        cache.calendar(self.system.clone(), zone)
    }
}
