//! Binds a UTC chronology to a time zone.
//!
//! Every supported field of the base is wrapped once. Fields whose unit is
//! shorter than half a day shift by the offset at the input instant, work in
//! that frame, and shift back by the same amount. Longer units convert the
//! instant to local wall time, work there, and convert back with the zone's
//! local-to-UTC rule.

use std::sync::Arc;

use ahash::AHashMap;
use tempora_common::{Error, Result};

use crate::assembly::{Assembly, Fields};
use crate::cache::{ChronologyCache, ChronologyKey};
use crate::calendars::iso::render_local;
use crate::chronology::Chronology;
use crate::field::{DateTimeField, DurationField};
use crate::field_type::{DateTimeFieldType, DurationFieldType};
use crate::text::SymbolProvider;
use crate::zone::{self, TimeZone};
use crate::MILLIS_PER_HOUR;

fn use_time_arithmetic(duration: &dyn DurationField) -> bool {
    duration.unit_millis() < MILLIS_PER_HOUR * 12
}

/// Offset at `instant`, checked so that adding it cannot overflow.
fn offset_to_add(zone: &dyn TimeZone, instant: i64) -> Result<i64> {
    let offset = zone.offset_at(instant) as i64;
    instant
        .checked_add(offset)
        .map(|_| offset)
        .ok_or_else(|| Error::overflow("adding time zone offset"))
}

/// Shifts a local result back to UTC by `offset`. The ends of the timeline,
/// where era rounding lands, are the same in every zone.
fn shift_back(local: i64, offset: i64) -> Result<i64> {
    if is_unbounded(local) {
        return Ok(local);
    }
    local
        .checked_sub(offset)
        .ok_or_else(|| Error::overflow("subtracting time zone offset"))
}

fn is_unbounded(instant: i64) -> bool {
    instant == i64::MIN || instant == i64::MAX
}

fn offset_from_local_to_subtract(zone: &dyn TimeZone, local: i64) -> Result<i64> {
    let offset = zone.offset_from_local(local) as i64;
    local
        .checked_sub(offset)
        .map(|_| offset)
        .ok_or_else(|| Error::overflow("subtracting time zone offset"))
}

#[derive(Debug)]
pub struct ZonedDurationField {
    inner: Arc<dyn DurationField>,
    zone: Arc<dyn TimeZone>,
    time_arithmetic: bool,
}

impl ZonedDurationField {
    pub fn new(inner: Arc<dyn DurationField>, zone: Arc<dyn TimeZone>) -> ZonedDurationField {
        let time_arithmetic = use_time_arithmetic(&*inner);
        ZonedDurationField {
            inner,
            zone,
            time_arithmetic,
        }
    }
}

impl DurationField for ZonedDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.inner.field_type()
    }

    fn is_precise(&self) -> bool {
        if self.time_arithmetic {
            self.inner.is_precise()
        } else {
            self.inner.is_precise() && self.zone.is_fixed()
        }
    }

    fn unit_millis(&self) -> i64 {
        self.inner.unit_millis()
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        let offset = offset_to_add(&*self.zone, instant)?;
        let local = self.inner.add(instant + offset, value)?;
        let back = if self.time_arithmetic {
            offset
        } else {
            offset_from_local_to_subtract(&*self.zone, local)?
        };
        local
            .checked_sub(back)
            .ok_or_else(|| Error::overflow("subtracting time zone offset"))
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        let offset = offset_to_add(&*self.zone, subtrahend)?;
        let minuend_offset = if self.time_arithmetic {
            offset
        } else {
            offset_to_add(&*self.zone, minuend)?
        };
        let minuend = minuend
            .checked_add(minuend_offset)
            .ok_or_else(|| Error::overflow("adding time zone offset"))?;
        self.inner.difference(minuend, subtrahend + offset)
    }
}

#[derive(Debug)]
pub struct ZonedDateTimeField {
    inner: Arc<dyn DateTimeField>,
    zone: Arc<dyn TimeZone>,
    duration: Arc<dyn DurationField>,
    range: Option<Arc<dyn DurationField>>,
    leap: Option<Arc<dyn DurationField>>,
    time_arithmetic: bool,
}

impl ZonedDateTimeField {
    pub fn new(
        inner: Arc<dyn DateTimeField>,
        zone: Arc<dyn TimeZone>,
        duration: Arc<dyn DurationField>,
        range: Option<Arc<dyn DurationField>>,
        leap: Option<Arc<dyn DurationField>>,
    ) -> ZonedDateTimeField {
        let time_arithmetic = use_time_arithmetic(&*duration);
        ZonedDateTimeField {
            inner,
            zone,
            duration,
            range,
            leap,
            time_arithmetic,
        }
    }

    fn to_local(&self, instant: i64) -> Result<i64> {
        zone::convert_utc_to_local(&*self.zone, instant)
    }

    /// Runs `op` on local time and converts the result back near `instant`.
    fn in_local(&self, instant: i64, op: impl FnOnce(i64) -> Result<i64>) -> Result<i64> {
        if self.time_arithmetic {
            let offset = offset_to_add(&*self.zone, instant)?;
            shift_back(op(instant + offset)?, offset)
        } else {
            let local = op(self.to_local(instant)?)?;
            if is_unbounded(local) {
                return Ok(local);
            }
            zone::convert_local_to_utc_near(&*self.zone, local, false, instant)
        }
    }
}

impl DateTimeField for ZonedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.inner.field_type()
    }

    fn is_lenient(&self) -> bool {
        self.inner.is_lenient()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        self.inner.get(self.to_local(instant)?)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        let local = self.inner.set(self.to_local(instant)?, value)?;
        let result = zone::convert_local_to_utc_near(&*self.zone, local, false, instant)?;
        if self.get(result)? != value {
            return Err(Error::illegal_instant(self.zone.id(), render_local(local)));
        }
        Ok(result)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.in_local(instant, |local| self.inner.add(local, value))
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> Result<i64> {
        self.in_local(instant, |local| self.inner.add_wrap_field(local, value))
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        let offset = offset_to_add(&*self.zone, subtrahend)?;
        let minuend_offset = if self.time_arithmetic {
            offset
        } else {
            offset_to_add(&*self.zone, minuend)?
        };
        let minuend = minuend
            .checked_add(minuend_offset)
            .ok_or_else(|| Error::overflow("adding time zone offset"))?;
        self.inner.difference(minuend, subtrahend + offset)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &self.duration
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.range.as_ref()
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.leap.as_ref()
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        self.inner.is_leap(self.to_local(instant)?)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        self.inner.leap_amount(self.to_local(instant)?)
    }

    fn min_value(&self) -> i32 {
        self.inner.min_value()
    }

    fn max_value(&self) -> i32 {
        self.inner.max_value()
    }

    fn min_value_at(&self, instant: i64) -> Result<i32> {
        self.inner.min_value_at(self.to_local(instant)?)
    }

    fn max_value_at(&self, instant: i64) -> Result<i32> {
        self.inner.max_value_at(self.to_local(instant)?)
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        self.in_local(instant, |local| self.inner.round_floor(local))
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.in_local(instant, |local| self.inner.round_ceiling(local))
    }

    fn round_half_floor(&self, instant: i64) -> Result<i64> {
        self.in_local(instant, |local| self.inner.round_half_floor(local))
    }

    fn round_half_ceiling(&self, instant: i64) -> Result<i64> {
        self.in_local(instant, |local| self.inner.round_half_ceiling(local))
    }

    fn round_half_even(&self, instant: i64) -> Result<i64> {
        self.in_local(instant, |local| self.inner.round_half_even(local))
    }

    fn remainder(&self, instant: i64) -> Result<i64> {
        self.inner.remainder(self.to_local(instant)?)
    }

    fn get_as_text(
        &self,
        instant: i64,
        symbols: &dyn SymbolProvider,
        locale: &str,
    ) -> Result<String> {
        self.inner
            .get_as_text(self.to_local(instant)?, symbols, locale)
    }

    fn get_as_short_text(
        &self,
        instant: i64,
        symbols: &dyn SymbolProvider,
        locale: &str,
    ) -> Result<String> {
        self.inner
            .get_as_short_text(self.to_local(instant)?, symbols, locale)
    }
}

/// Wraps each distinct field once, so fields that shared a duration field
/// in the base still share the zoned one.
struct Converter {
    zone: Arc<dyn TimeZone>,
    durations: AHashMap<usize, Arc<dyn DurationField>>,
    fields: AHashMap<usize, Arc<dyn DateTimeField>>,
}

fn address<T: ?Sized>(field: &Arc<T>) -> usize {
    Arc::as_ptr(field) as *const () as usize
}

impl Converter {
    fn duration(&mut self, field: &Arc<dyn DurationField>) -> Arc<dyn DurationField> {
        if !field.is_supported() {
            return field.clone();
        }
        self.durations
            .entry(address(field))
            .or_insert_with(|| Arc::new(ZonedDurationField::new(field.clone(), self.zone.clone())))
            .clone()
    }

    fn field(&mut self, field: &Arc<dyn DateTimeField>) -> Arc<dyn DateTimeField> {
        if !field.is_supported() {
            return field.clone();
        }
        if let Some(converted) = self.fields.get(&address(field)) {
            return converted.clone();
        }
        let duration = self.duration(field.duration_field());
        let range = field.range_duration_field().map(|range| self.duration(range));
        let leap = field.leap_duration_field().map(|leap| self.duration(leap));
        let converted: Arc<dyn DateTimeField> = Arc::new(ZonedDateTimeField::new(
            field.clone(),
            self.zone.clone(),
            duration,
            range,
            leap,
        ));
        self.fields.insert(address(field), converted.clone());
        converted
    }
}

/// A UTC chronology viewed in another zone.
#[derive(Debug)]
pub struct ZonedChronology {
    key: ChronologyKey,
    zone: Arc<dyn TimeZone>,
    assembly: Assembly,
}

impl ZonedChronology {
    /// Wraps `base`, which must be a UTC calendar chronology.
    pub fn new(base: Arc<dyn Chronology>, zone: Arc<dyn TimeZone>) -> Result<ZonedChronology> {
        if !zone::is_utc(&**base.zone()) {
            return Err(Error::invalid_arg(
                "base",
                format!("{} is not a UTC chronology", base.key()),
            ));
        }
        let Some(system) = base.key().system() else {
            return Err(Error::invalid_arg(
                "base",
                format!("{} is not a calendar chronology", base.key()),
            ));
        };
        let key = ChronologyKey::calendar(system.clone(), zone.id());
        let mut converter = Converter {
            zone: zone.clone(),
            durations: AHashMap::new(),
            fields: AHashMap::new(),
        };
        let assembly = Assembly::new(Some(base), |slots| {
            slots.map_durations(|field| converter.duration(field));
            slots.map_fields(|field| converter.field(field));
            Ok(())
        })?;
        log::debug!("assembled {key}");
        Ok(ZonedChronology {
            key,
            zone,
            assembly,
        })
    }

    fn base_chronology(&self) -> Result<&Arc<dyn Chronology>> {
        self.assembly
            .base()
            .ok_or_else(|| Error::invalid_arg("base", "zoned chronology without a base"))
    }

    /// Converts a local instant produced by the base to UTC, failing when it
    /// falls in a transition gap.
    fn local_to_utc(&self, local: i64) -> Result<i64> {
        if local == i64::MAX || local == i64::MIN {
            return Ok(local);
        }
        let offset = self.zone.offset_from_local(local);
        let utc = local.saturating_sub(offset as i64);
        if self.zone.offset_at(utc) != offset {
            return Err(Error::illegal_instant(self.zone.id(), render_local(local)));
        }
        Ok(utc)
    }
}

impl Chronology for ZonedChronology {
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
        let local = self
            .base_chronology()?
            .date_time_millis(year, month, day, millis_of_day)?;
        self.local_to_utc(local)
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
        let local = self
            .base_chronology()?
            .date_time_millis_hms(year, month, day, hour, minute, second, millis)?;
        self.local_to_utc(local)
    }

    fn date_time_millis_at(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        let local = zone::convert_utc_to_local(&*self.zone, instant)?;
        let local = self
            .base_chronology()?
            .date_time_millis_at(local, hour, minute, second, millis)?;
        self.local_to_utc(local)
    }

    fn with_zone(
        &self,
        cache: &ChronologyCache,
        zone: Arc<dyn TimeZone>,
    ) -> Result<Arc<dyn Chronology>> {
        self.base_chronology()?.with_zone(cache, zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CalendarSystem;
    use crate::zone::FixedOffsetZone;
    use crate::MILLIS_PER_DAY;

    /// +1h until `TRANSITION`, +2h after: local 01:00..02:00 on day 100
    /// does not exist.
    #[derive(Debug)]
    struct Spring;

    const TRANSITION: i64 = 100 * MILLIS_PER_DAY;

    impl TimeZone for Spring {
        fn id(&self) -> &str {
            "Test/Spring"
        }

        fn offset_at(&self, instant: i64) -> i32 {
            if instant < TRANSITION { 3_600_000 } else { 7_200_000 }
        }

        fn next_transition(&self, instant: i64) -> i64 {
            if instant < TRANSITION { TRANSITION } else { instant }
        }

        fn previous_transition(&self, instant: i64) -> i64 {
            if instant > TRANSITION { TRANSITION - 1 } else { instant }
        }
    }

    fn iso(cache: &ChronologyCache) -> Arc<dyn Chronology> {
        cache.calendar_utc(CalendarSystem::Iso).unwrap()
    }

    #[test]
    fn fixed_offset_reads_local_fields() {
        let cache = ChronologyCache::new();
        let zone: Arc<dyn TimeZone> = Arc::new(FixedOffsetZone::new(5 * 3_600_000).unwrap());
        let zoned = ZonedChronology::new(iso(&cache), zone).unwrap();
        assert_eq!(zoned.fields().hour_of_day.get(0).unwrap(), 5);
        let t = zoned.date_time_millis(1970, 1, 1, 5 * 3_600_000).unwrap();
        assert_eq!(t, 0);
        assert!(zoned.fields().days.is_precise());
        assert_eq!(zoned.key().to_string(), "ISOChronology[+05:00]");
    }

    #[test]
    fn shared_duration_fields_stay_shared() {
        let cache = ChronologyCache::new();
        let zoned = ZonedChronology::new(iso(&cache), Arc::new(Spring)).unwrap();
        let fields = zoned.fields();
        assert!(crate::field::same_duration_field(
            fields.month_of_year.duration_field(),
            &fields.months
        ));
        assert!(!fields.days.is_precise());
        assert!(fields.hours.is_precise());
    }

    #[test]
    fn gap_rejects_construction_and_set() {
        let cache = ChronologyCache::new();
        let zoned = ZonedChronology::new(iso(&cache), Arc::new(Spring)).unwrap();
        // Day 100 is 1970-04-11.
        let err = zoned.date_time_millis_hms(1970, 4, 11, 1, 30, 0, 0).unwrap_err();
        assert!(err.to_string().contains("Test/Spring"), "{err}");
        assert!(err.to_string().contains("1970-04-11T01:30:00.000"), "{err}");
        let morning = zoned.date_time_millis_hms(1970, 4, 11, 0, 30, 0, 0).unwrap();
        assert!(zoned.fields().hour_of_day.set(morning, 1).is_err());
        let three = zoned.fields().hour_of_day.set(morning, 3).unwrap();
        assert_eq!(zoned.fields().hour_of_day.get(three).unwrap(), 3);
    }

    #[test]
    fn hours_use_time_arithmetic_across_gap() {
        let cache = ChronologyCache::new();
        let zoned = ZonedChronology::new(iso(&cache), Arc::new(Spring)).unwrap();
        let fields = zoned.fields();
        let before = TRANSITION - 30 * 60_000;
        let after = fields.hours.add(before, 1).unwrap();
        assert_eq!(after - before, 3_600_000);
        assert_eq!(fields.hour_of_day.get(after).unwrap(), 2);
        // A day later keeps the wall-clock time.
        let next_day = fields.days.add(before, 1).unwrap();
        assert_eq!(next_day - before, MILLIS_PER_DAY - 3_600_000);
        assert_eq!(
            fields.millis_of_day.get(next_day).unwrap(),
            fields.millis_of_day.get(before).unwrap()
        );
        assert_eq!(fields.days.difference(next_day, before).unwrap(), 1);
    }

    #[test]
    fn round_trip_outside_gap() {
        let cache = ChronologyCache::new();
        let zoned = ZonedChronology::new(iso(&cache), Arc::new(Spring)).unwrap();
        let fields = zoned.fields();
        let mut t = TRANSITION - 3 * MILLIS_PER_DAY;
        while t < TRANSITION + 3 * MILLIS_PER_DAY {
            let rebuilt = zoned
                .date_time_millis(
                    fields.year.get(t).unwrap(),
                    fields.month_of_year.get(t).unwrap(),
                    fields.day_of_month.get(t).unwrap(),
                    fields.millis_of_day.get(t).unwrap(),
                )
                .unwrap();
            assert_eq!(rebuilt, t);
            t += 1_234_567;
        }
    }

    #[test]
    fn era_rounding_reaches_the_ends_of_time() {
        let cache = ChronologyCache::new();
        let coptic = cache
            .calendar_utc(CalendarSystem::Coptic { min_days_in_first_week: 4 })
            .unwrap();
        let east: Arc<dyn TimeZone> = Arc::new(FixedOffsetZone::new(3_600_000).unwrap());
        let zoned = ZonedChronology::new(coptic, east).unwrap();
        let era = &zoned.fields().era;
        assert_eq!(era.round_floor(0).unwrap(), i64::MIN);
        assert_eq!(era.round_ceiling(0).unwrap(), i64::MAX);
        assert_eq!(era.round_half_floor(0).unwrap(), i64::MIN);
        assert_eq!(era.round_half_even(0).unwrap(), i64::MIN);
        assert!(era.remainder(0).is_err());

        let west: Arc<dyn TimeZone> = Arc::new(FixedOffsetZone::new(-3_600_000).unwrap());
        let zoned = ZonedChronology::new(iso(&cache), west).unwrap();
        let era = &zoned.fields().era;
        assert_eq!(era.round_ceiling(0).unwrap(), i64::MAX);
        // AD starts at local midnight of 0001-01-01, one hour later in UTC.
        let ad = zoned.date_time_millis(1, 1, 1, 0).unwrap();
        assert_eq!(era.round_floor(0).unwrap(), ad);
        assert_eq!(era.round_half_ceiling(0).unwrap(), ad);
        let bc = zoned.date_time_millis(-5, 6, 1, 0).unwrap();
        assert_eq!(era.round_floor(bc).unwrap(), i64::MIN);
        assert_eq!(era.round_ceiling(bc).unwrap(), ad);
    }

    #[test]
    fn rejects_zoned_base() {
        let cache = ChronologyCache::new();
        let zone: Arc<dyn TimeZone> = Arc::new(FixedOffsetZone::new(3_600_000).unwrap());
        let zoned: Arc<dyn Chronology> =
            Arc::new(ZonedChronology::new(iso(&cache), zone.clone()).unwrap());
        assert!(ZonedChronology::new(zoned, zone).is_err());
    }
}
