//! Restricts a chronology to instants in `[lower, upper)`.
//!
//! Every field operation checks the instants it is given and, for the
//! operations that produce an instant, the instant it returns.

use std::sync::Arc;

use ahash::AHashMap;
use tempora_common::{Bound, BoundsCheck, Error, Result};

use crate::assembly::{Assembly, Fields};
use crate::cache::{ChronologyCache, ChronologyKey};
use crate::chronology::Chronology;
use crate::field::{DateTimeField, DurationField};
use crate::field_type::{DateTimeFieldType, DurationFieldType};
use crate::text::SymbolProvider;
use crate::zone::TimeZone;

/// Inclusive lower and exclusive upper instant; either may be open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Limits {
    pub lower: Option<i64>,
    pub upper: Option<i64>,
}

impl Limits {
    pub fn check(&self, field: &str, instant: i64, check: BoundsCheck) -> Result<()> {
        if let Some(lower) = self.lower.filter(|&lower| instant < lower) {
            return Err(Error::bounds(Bound::Lower, check, field, instant, lower));
        }
        if let Some(upper) = self.upper.filter(|&upper| instant >= upper) {
            return Err(Error::bounds(Bound::Upper, check, field, instant, upper));
        }
        Ok(())
    }

    pub fn contains(&self, instant: i64) -> bool {
        self.lower.is_none_or(|lower| instant >= lower)
            && self.upper.is_none_or(|upper| instant < upper)
    }
}

#[derive(Debug)]
pub struct LimitDurationField {
    inner: Arc<dyn DurationField>,
    limits: Limits,
}

impl LimitDurationField {
    pub fn new(inner: Arc<dyn DurationField>, limits: Limits) -> LimitDurationField {
        LimitDurationField { inner, limits }
    }
}

impl DurationField for LimitDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.inner.field_type()
    }

    fn is_precise(&self) -> bool {
        self.inner.is_precise()
    }

    fn unit_millis(&self) -> i64 {
        self.inner.unit_millis()
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.limits.check(self.name(), instant, BoundsCheck::Input)?;
        let result = self.inner.add(instant, value)?;
        self.limits.check(self.name(), result, BoundsCheck::Result)?;
        Ok(result)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.limits.check(self.name(), minuend, BoundsCheck::Input)?;
        self.limits.check(self.name(), subtrahend, BoundsCheck::Input)?;
        self.inner.difference(minuend, subtrahend)
    }
}

#[derive(Debug)]
pub struct LimitDateTimeField {
    inner: Arc<dyn DateTimeField>,
    limits: Limits,
    duration: Arc<dyn DurationField>,
    range: Option<Arc<dyn DurationField>>,
    leap: Option<Arc<dyn DurationField>>,
}

impl LimitDateTimeField {
    fn input(&self, instant: i64) -> Result<i64> {
        self.limits
            .check(self.inner.name(), instant, BoundsCheck::Input)?;
        Ok(instant)
    }

    fn result(&self, instant: i64) -> Result<i64> {
        self.limits
            .check(self.inner.name(), instant, BoundsCheck::Result)?;
        Ok(instant)
    }
}

impl DateTimeField for LimitDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.inner.field_type()
    }

    fn is_lenient(&self) -> bool {
        self.inner.is_lenient()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        self.inner.get(self.input(instant)?)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        self.result(self.inner.set(self.input(instant)?, value)?)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.result(self.inner.add(self.input(instant)?, value)?)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> Result<i64> {
        self.result(self.inner.add_wrap_field(self.input(instant)?, value)?)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.inner
            .difference(self.input(minuend)?, self.input(subtrahend)?)
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
        self.inner.is_leap(self.input(instant)?)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        self.inner.leap_amount(self.input(instant)?)
    }

    fn min_value(&self) -> i32 {
        self.inner.min_value()
    }

    fn max_value(&self) -> i32 {
        self.inner.max_value()
    }

    fn min_value_at(&self, instant: i64) -> Result<i32> {
        self.inner.min_value_at(self.input(instant)?)
    }

    fn max_value_at(&self, instant: i64) -> Result<i32> {
        self.inner.max_value_at(self.input(instant)?)
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        self.result(self.inner.round_floor(self.input(instant)?)?)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.result(self.inner.round_ceiling(self.input(instant)?)?)
    }

    fn round_half_floor(&self, instant: i64) -> Result<i64> {
        self.result(self.inner.round_half_floor(self.input(instant)?)?)
    }

    fn round_half_ceiling(&self, instant: i64) -> Result<i64> {
        self.result(self.inner.round_half_ceiling(self.input(instant)?)?)
    }

    fn round_half_even(&self, instant: i64) -> Result<i64> {
        self.result(self.inner.round_half_even(self.input(instant)?)?)
    }

    fn remainder(&self, instant: i64) -> Result<i64> {
        self.inner.remainder(self.input(instant)?)
    }

    fn get_as_text(
        &self,
        instant: i64,
        symbols: &dyn SymbolProvider,
        locale: &str,
    ) -> Result<String> {
        self.inner
            .get_as_text(self.input(instant)?, symbols, locale)
    }

    fn get_as_short_text(
        &self,
        instant: i64,
        symbols: &dyn SymbolProvider,
        locale: &str,
    ) -> Result<String> {
        self.inner
            .get_as_short_text(self.input(instant)?, symbols, locale)
    }

    fn max_text_length(&self, symbols: &dyn SymbolProvider, locale: &str) -> usize {
        self.inner.max_text_length(symbols, locale)
    }
}

/// Wraps each distinct field once, keeping shared duration fields shared.
struct Converter {
    limits: Limits,
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
        let limits = self.limits;
        self.durations
            .entry(address(field))
            .or_insert_with(|| Arc::new(LimitDurationField::new(field.clone(), limits)))
            .clone()
    }

    fn field(&mut self, field: &Arc<dyn DateTimeField>) -> Arc<dyn DateTimeField> {
        if !field.is_supported() {
            return field.clone();
        }
        if let Some(converted) = self.fields.get(&address(field)) {
            return converted.clone();
        }
        let converted: Arc<dyn DateTimeField> = Arc::new(LimitDateTimeField {
            inner: field.clone(),
            limits: self.limits,
            duration: self.duration(field.duration_field()),
            range: field.range_duration_field().map(|range| self.duration(range)),
            leap: field.leap_duration_field().map(|leap| self.duration(leap)),
        });
        self.fields.insert(address(field), converted.clone());
        converted
    }
}

#[derive(Debug)]
pub struct LimitChronology {
    key: ChronologyKey,
    base: Arc<dyn Chronology>,
    limits: Limits,
    assembly: Assembly,
}

impl LimitChronology {
    /// Wraps `base`. Fails unless `lower < upper` when both are given.
    pub fn new(
        base: Arc<dyn Chronology>,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Result<LimitChronology> {
        if let (Some(lower), Some(upper)) = (lower, upper) {
            if lower >= upper {
                return Err(Error::invalid_arg(
                    "lower",
                    format!("lower limit {lower} must come before upper limit {upper}"),
                ));
            }
        }
        let limits = Limits { lower, upper };
        let key = ChronologyKey::Limit {
            base: Box::new(base.key().clone()),
            lower,
            upper,
        };
        let mut converter = Converter {
            limits,
            durations: AHashMap::new(),
            fields: AHashMap::new(),
        };
        let assembly = Assembly::new(Some(base.clone()), |slots| {
            slots.map_durations(|field| converter.duration(field));
            slots.map_fields(|field| converter.field(field));
            Ok(())
        })?;
        log::debug!("assembled {key}");
        Ok(LimitChronology {
            key,
            base,
            limits,
            assembly,
        })
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    fn checked(&self, instant: i64) -> Result<i64> {
        self.limits
            .check("dateTime", instant, BoundsCheck::Result)?;
        Ok(instant)
    }
}

impl Chronology for LimitChronology {
    fn key(&self) -> &ChronologyKey {
        &self.key
    }

    fn zone(&self) -> &Arc<dyn TimeZone> {
        self.base.zone()
    }

    fn fields(&self) -> &Fields {
        self.assembly.fields()
    }

    fn base(&self) -> Option<&Arc<dyn Chronology>> {
        Some(&self.base)
    }

    fn date_time_millis(&self, year: i32, month: i32, day: i32, millis_of_day: i32) -> Result<i64> {
        self.checked(
            self.base
                .date_time_millis(year, month, day, millis_of_day)?,
        )
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
        self.checked(
            self.base
                .date_time_millis_hms(year, month, day, hour, minute, second, millis)?,
        )
    }

    fn date_time_millis_at(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        self.limits
            .check("dateTime", instant, BoundsCheck::Input)?;
        self.checked(
            self.base
                .date_time_millis_at(instant, hour, minute, second, millis)?,
        )
    }

    /// Limits are absolute instants and carry over unchanged.
    fn with_zone(
        &self,
        cache: &ChronologyCache,
        zone: Arc<dyn TimeZone>,
    ) -> Result<Arc<dyn Chronology>> {
        let base = self.base.with_zone(cache, zone)?;
        cache.limit(base, self.limits.lower, self.limits.upper)
    }
}
