//! The [`Chronology`] trait: one calendar system's complete set of fields.

use std::fmt;
use std::sync::Arc;

use tempora_common::Result;

use crate::assembly::Fields;
use crate::cache::{ChronologyCache, ChronologyKey};
use crate::field::utils::verify_value_bounds;
use crate::field::{DateTimeField, DurationField};
use crate::field_type::{DateTimeFieldType, DurationFieldType};
use crate::zone::{self, TimeZone};

/// An immutable bundle of every duration and date-time field of a calendar
/// system, optionally bound to a time zone.
///
/// Chronologies are built once per [`ChronologyKey`] and shared through a
/// [`ChronologyCache`]. Decorators (zone, cutover, limit, strict, lenient)
/// are chronologies wrapping another chronology.
pub trait Chronology: Send + Sync + fmt::Debug {
    fn key(&self) -> &ChronologyKey;

    fn name(&self) -> String {
        self.key().to_string()
    }

    fn zone(&self) -> &Arc<dyn TimeZone>;

    fn fields(&self) -> &Fields;

    /// The chronology this one was assembled over, if any.
    fn base(&self) -> Option<&Arc<dyn Chronology>> {
        None
    }

    /// Instant of the given date at `millis_of_day` past local midnight.
    fn date_time_millis(&self, year: i32, month: i32, day: i32, millis_of_day: i32) -> Result<i64>;

    #[allow(clippy::too_many_arguments)]
    fn date_time_millis_hms(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64>;

    /// Instant on the same day as `instant` with the time of day replaced.
    fn date_time_millis_at(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64>;

    /// The same calendar system in another zone.
    fn with_zone(
        &self,
        cache: &ChronologyCache,
        zone: Arc<dyn TimeZone>,
    ) -> Result<Arc<dyn Chronology>>;

    fn with_utc(&self, cache: &ChronologyCache) -> Result<Arc<dyn Chronology>> {
        self.with_zone(cache, zone::utc())
    }

    fn field(&self, field_type: DateTimeFieldType) -> &Arc<dyn DateTimeField> {
        self.fields().field(field_type)
    }

    fn duration(&self, duration_type: DurationFieldType) -> &Arc<dyn DurationField> {
        self.fields().duration(duration_type)
    }
}

impl fmt::Display for dyn Chronology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Returns `true` when both handles point at the same chronology instance.
pub fn same_chronology(a: &Arc<dyn Chronology>, b: &Arc<dyn Chronology>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Builds an instant by setting year, month, day and millis-of-day one field
/// at a time, starting from zero.
pub fn date_time_millis_by_fields(
    fields: &Fields,
    year: i32,
    month: i32,
    day: i32,
    millis_of_day: i32,
) -> Result<i64> {
    let instant = fields.year.set(0, year)?;
    let instant = fields.month_of_year.set(instant, month)?;
    let instant = fields.day_of_month.set(instant, day)?;
    fields.millis_of_day.set(instant, millis_of_day)
}

#[allow(clippy::too_many_arguments)]
pub fn date_time_millis_hms_by_fields(
    fields: &Fields,
    year: i32,
    month: i32,
    day: i32,
    hour: i32,
    minute: i32,
    second: i32,
    millis: i32,
) -> Result<i64> {
    let instant = fields.year.set(0, year)?;
    let instant = fields.month_of_year.set(instant, month)?;
    let instant = fields.day_of_month.set(instant, day)?;
    time_by_fields(fields, instant, hour, minute, second, millis)
}

/// Replaces the time of day of `instant` one field at a time.
pub fn time_by_fields(
    fields: &Fields,
    instant: i64,
    hour: i32,
    minute: i32,
    second: i32,
    millis: i32,
) -> Result<i64> {
    let instant = fields.hour_of_day.set(instant, hour)?;
    let instant = fields.minute_of_hour.set(instant, minute)?;
    let instant = fields.second_of_minute.set(instant, second)?;
    fields.millis_of_second.set(instant, millis)
}

/// Validates a wall-clock time and returns its millis-of-day.
pub fn millis_of_day(hour: i32, minute: i32, second: i32, millis: i32) -> Result<i32> {
    verify_value_bounds(DateTimeFieldType::HourOfDay.name(), hour as i64, 0, 23)?;
    verify_value_bounds(DateTimeFieldType::MinuteOfHour.name(), minute as i64, 0, 59)?;
    verify_value_bounds(DateTimeFieldType::SecondOfMinute.name(), second as i64, 0, 59)?;
    verify_value_bounds(DateTimeFieldType::MillisOfSecond.name(), millis as i64, 0, 999)?;
    Ok(hour * 3_600_000 + minute * 60_000 + second * 1000 + millis)
}
