//! Fields computed from a [`BasicCalendar`], plus the shared precise time
//! fields every calendar uses.

use std::sync::{Arc, LazyLock};

use tempora_common::Result;

use super::BasicCalendar;
use crate::assembly::FieldSlots;
use crate::field::utils::{
    ceiling_to_unit, floor_to_unit, safe_add, safe_to_int, verify_field_bounds,
    verify_value_bounds,
};
use crate::field::{
    DateTimeField, DurationField, FieldOps, MillisDurationField, PreciseDateTimeField,
    PreciseDurationField, ScaledDurationField, UnsupportedDurationField, ZeroIsMaxDateTimeField,
    walk_difference,
};
use crate::field_type::{DateTimeFieldType, DurationFieldType};
use crate::{MILLIS_PER_DAY, MILLIS_PER_HOUR, MILLIS_PER_MINUTE, MILLIS_PER_SECOND, MILLIS_PER_WEEK};

/// Precise duration and time-of-day fields, identical for every calendar.
pub(crate) struct TimeFields {
    pub millis: Arc<dyn DurationField>,
    pub seconds: Arc<dyn DurationField>,
    pub minutes: Arc<dyn DurationField>,
    pub hours: Arc<dyn DurationField>,
    pub halfdays: Arc<dyn DurationField>,
    pub days: Arc<dyn DurationField>,
    pub weeks: Arc<dyn DurationField>,
    millis_of_second: Arc<dyn DateTimeField>,
    millis_of_day: Arc<dyn DateTimeField>,
    second_of_minute: Arc<dyn DateTimeField>,
    second_of_day: Arc<dyn DateTimeField>,
    minute_of_hour: Arc<dyn DateTimeField>,
    minute_of_day: Arc<dyn DateTimeField>,
    hour_of_day: Arc<dyn DateTimeField>,
    hour_of_halfday: Arc<dyn DateTimeField>,
    clockhour_of_day: Arc<dyn DateTimeField>,
    clockhour_of_halfday: Arc<dyn DateTimeField>,
    halfday_of_day: Arc<dyn DateTimeField>,
}

pub(crate) static TIME_FIELDS: LazyLock<TimeFields> = LazyLock::new(TimeFields::new);

impl TimeFields {
    fn new() -> TimeFields {
        use DateTimeFieldType as T;

        let millis = MillisDurationField::instance();
        let seconds = PreciseDurationField::shared(DurationFieldType::Seconds, MILLIS_PER_SECOND);
        let minutes = PreciseDurationField::shared(DurationFieldType::Minutes, MILLIS_PER_MINUTE);
        let hours = PreciseDurationField::shared(DurationFieldType::Hours, MILLIS_PER_HOUR);
        let halfdays = ScaledDurationField::shared(hours.clone(), DurationFieldType::Halfdays, 12);
        let days = PreciseDurationField::shared(DurationFieldType::Days, MILLIS_PER_DAY);
        let weeks = ScaledDurationField::shared(days.clone(), DurationFieldType::Weeks, 7);

        let hour_of_day = PreciseDateTimeField::shared(T::HourOfDay, hours.clone(), days.clone());
        let hour_of_halfday =
            PreciseDateTimeField::shared(T::HourOfHalfday, hours.clone(), halfdays.clone());
        TimeFields {
            millis_of_second: PreciseDateTimeField::shared(
                T::MillisOfSecond,
                millis.clone(),
                seconds.clone(),
            ),
            millis_of_day: PreciseDateTimeField::shared(
                T::MillisOfDay,
                millis.clone(),
                days.clone(),
            ),
            second_of_minute: PreciseDateTimeField::shared(
                T::SecondOfMinute,
                seconds.clone(),
                minutes.clone(),
            ),
            second_of_day: PreciseDateTimeField::shared(
                T::SecondOfDay,
                seconds.clone(),
                days.clone(),
            ),
            minute_of_hour: PreciseDateTimeField::shared(
                T::MinuteOfHour,
                minutes.clone(),
                hours.clone(),
            ),
            minute_of_day: PreciseDateTimeField::shared(
                T::MinuteOfDay,
                minutes.clone(),
                days.clone(),
            ),
            clockhour_of_day: Arc::new(ZeroIsMaxDateTimeField::new(
                hour_of_day.clone(),
                T::ClockhourOfDay,
            )),
            clockhour_of_halfday: Arc::new(ZeroIsMaxDateTimeField::new(
                hour_of_halfday.clone(),
                T::ClockhourOfHalfday,
            )),
            halfday_of_day: PreciseDateTimeField::shared(
                T::HalfdayOfDay,
                halfdays.clone(),
                days.clone(),
            ),
            hour_of_day,
            hour_of_halfday,
            millis,
            seconds,
            minutes,
            hours,
            halfdays,
            days,
            weeks,
        }
    }

    /// Stores every time field into `slots`.
    pub fn install(&self, slots: &mut FieldSlots) {
        slots.millis = Some(self.millis.clone());
        slots.seconds = Some(self.seconds.clone());
        slots.minutes = Some(self.minutes.clone());
        slots.hours = Some(self.hours.clone());
        slots.halfdays = Some(self.halfdays.clone());
        slots.days = Some(self.days.clone());
        slots.weeks = Some(self.weeks.clone());
        slots.millis_of_second = Some(self.millis_of_second.clone());
        slots.millis_of_day = Some(self.millis_of_day.clone());
        slots.second_of_minute = Some(self.second_of_minute.clone());
        slots.second_of_day = Some(self.second_of_day.clone());
        slots.minute_of_hour = Some(self.minute_of_hour.clone());
        slots.minute_of_day = Some(self.minute_of_day.clone());
        slots.hour_of_day = Some(self.hour_of_day.clone());
        slots.hour_of_halfday = Some(self.hour_of_halfday.clone());
        slots.clockhour_of_day = Some(self.clockhour_of_day.clone());
        slots.clockhour_of_halfday = Some(self.clockhour_of_halfday.clone());
        slots.halfday_of_day = Some(self.halfday_of_day.clone());
    }
}

impl std::fmt::Debug for TimeFields {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimeFields").finish_non_exhaustive()
    }
}

/// The arithmetic `year` field.
#[derive(Debug)]
pub(crate) struct YearOps {
    core: Arc<BasicCalendar>,
}

impl YearOps {
    pub fn new(core: Arc<BasicCalendar>) -> YearOps {
        YearOps { core }
    }
}

impl FieldOps for YearOps {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Year
    }

    fn average_unit_millis(&self) -> i64 {
        self.core.rules().average_millis_per_year()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        self.core.checked_year(instant)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(
            DateTimeFieldType::Year.name(),
            value as i64,
            self.core.min_year() as i64,
            self.core.max_year() as i64,
        )?;
        self.core.set_year(instant, value)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        if value == 0 {
            return Ok(instant);
        }
        let year = self.core.checked_year(instant)?;
        let year = self.core.verify_year(safe_add(year as i64, value)?)?;
        self.core.set_year(instant, year)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        if minuend < subtrahend {
            Ok(-self.core.year_difference(subtrahend, minuend)?)
        } else {
            self.core.year_difference(minuend, subtrahend)
        }
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        Ok(self.core.year_millis(self.core.year(instant)))
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        let year = self.core.year(instant);
        let floor = self.core.year_millis(year);
        if floor == instant {
            Ok(instant)
        } else {
            Ok(self.core.year_millis(self.core.verify_year(year as i64 + 1)?))
        }
    }

    fn min_value(&self) -> i32 {
        self.core.min_year()
    }

    fn max_value(&self) -> i32 {
        self.core.max_year()
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        Ok(self.core.is_leap_year(self.core.year(instant)))
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        Ok(self.is_leap(instant)? as i32)
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        Some(&TIME_FIELDS.days)
    }
}

/// The `monthOfYear` field.
#[derive(Debug)]
pub(crate) struct MonthOps {
    core: Arc<BasicCalendar>,
}

impl MonthOps {
    pub fn new(core: Arc<BasicCalendar>) -> MonthOps {
        MonthOps { core }
    }
}

impl FieldOps for MonthOps {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::MonthOfYear
    }

    fn average_unit_millis(&self) -> i64 {
        self.core.rules().average_millis_per_month()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        Ok(self.core.month_of_year(instant))
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        let year = self.core.year(instant);
        verify_value_bounds(
            DateTimeFieldType::MonthOfYear.name(),
            value as i64,
            1,
            self.core.months_in_year(year) as i64,
        )?;
        let month = self.core.month_of_year_in(instant, year);
        let day = self
            .core
            .day_of_month_in(instant, year, month)
            .min(self.core.days_in_year_month(year, value));
        let time = self.core.millis_of_day(instant) as i64;
        Ok(self.core.year_month_day_millis(year, value, day) + time)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.core.add_months(instant, value)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        if self.core.rules().months_vary() {
            walk_difference(self, minuend, subtrahend)
        } else if minuend < subtrahend {
            Ok(-self.core.month_difference(subtrahend, minuend))
        } else {
            Ok(self.core.month_difference(minuend, subtrahend))
        }
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        let year = self.core.year(instant);
        let month = self.core.month_of_year_in(instant, year);
        Ok(self.core.year_month_millis(year, month))
    }

    fn min_value(&self) -> i32 {
        1
    }

    fn max_value(&self) -> i32 {
        self.core.rules().max_month()
    }

    fn max_value_at(&self, instant: i64) -> Result<i32> {
        Ok(self.core.months_in_year(self.core.year(instant)))
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        let year = self.core.year(instant);
        let month = self.core.month_of_year_in(instant, year);
        Ok(self.core.rules().is_leap_month(year, month))
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        Ok(self.is_leap(instant)? as i32)
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        Some(&TIME_FIELDS.days)
    }
}

/// Remainder of a weekyear at or past this point means the instant lies in
/// week 53.
const WEEK_53: i64 = 52 * MILLIS_PER_WEEK;

/// The ISO-style `weekyear` field.
#[derive(Debug)]
pub(crate) struct WeekyearOps {
    core: Arc<BasicCalendar>,
}

impl WeekyearOps {
    pub fn new(core: Arc<BasicCalendar>) -> WeekyearOps {
        WeekyearOps { core }
    }
}

impl FieldOps for WeekyearOps {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Weekyear
    }

    fn average_unit_millis(&self) -> i64 {
        self.core.rules().average_millis_per_year()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        self.core.verify_year(self.core.weekyear(instant) as i64)
    }

    /// Moves to `value`, keeping the week number (clamped to the target's
    /// week count), day of week and time of day.
    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(
            DateTimeFieldType::Weekyear.name(),
            value as i64,
            self.core.min_year() as i64,
            self.core.max_year() as i64,
        )?;
        let this_weekyear = self.core.weekyear(instant);
        if this_weekyear == value {
            return Ok(instant);
        }
        let this_dow = self.core.day_of_week(instant);
        let max_weeks = self
            .core
            .weeks_in_year(this_weekyear)
            .min(self.core.weeks_in_year(value));
        let target_week = self.core.week_of_weekyear(instant).min(max_weeks);

        let mut work = self.core.set_year(instant, value)?;
        let work_weekyear = self.core.weekyear(work);
        if work_weekyear < value {
            work += MILLIS_PER_WEEK;
        } else if work_weekyear > value {
            work -= MILLIS_PER_WEEK;
        }
        let current_week = self.core.week_of_weekyear(work);
        work += (target_week - current_week) as i64 * MILLIS_PER_WEEK;
        let dow = self.core.day_of_week(work);
        Ok(work + (this_dow - dow) as i64 * MILLIS_PER_DAY)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        if value == 0 {
            return Ok(instant);
        }
        let weekyear = self.get(instant)?;
        self.set(instant, safe_to_int(safe_add(weekyear as i64, value)?)?)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        if minuend < subtrahend {
            return Ok(-self.difference(subtrahend, minuend)?);
        }
        let minuend_weekyear = self.core.weekyear(minuend);
        let subtrahend_weekyear = self.core.weekyear(subtrahend);
        let minuend_rem = minuend - self.round_floor(minuend)?;
        let mut subtrahend_rem = subtrahend - self.round_floor(subtrahend)?;

        // Balance leap weeks between years.
        if subtrahend_rem >= WEEK_53 && self.core.weeks_in_year(minuend_weekyear) <= 52 {
            subtrahend_rem -= MILLIS_PER_WEEK;
        }
        let mut diff = minuend_weekyear as i64 - subtrahend_weekyear as i64;
        if minuend_rem < subtrahend_rem {
            diff -= 1;
        }
        Ok(diff)
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        let week_start = week_floor(instant);
        let week = self.core.week_of_weekyear(week_start);
        Ok(week_start - (week as i64 - 1) * MILLIS_PER_WEEK)
    }

    fn min_value(&self) -> i32 {
        self.core.min_year()
    }

    fn max_value(&self) -> i32 {
        self.core.max_year()
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        Ok(self.core.weeks_in_year(self.core.weekyear(instant)) > 52)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        Ok(self.core.weeks_in_year(self.core.weekyear(instant)) - 52)
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        Some(&TIME_FIELDS.weeks)
    }
}

/// Monday of the week containing `instant`; the epoch is a Thursday.
fn week_floor(instant: i64) -> i64 {
    floor_to_unit(instant.saturating_add(3 * MILLIS_PER_DAY), MILLIS_PER_WEEK)
        - 3 * MILLIS_PER_DAY
}

fn week_ceiling(instant: i64) -> i64 {
    ceiling_to_unit(instant.saturating_sub(4 * MILLIS_PER_DAY), MILLIS_PER_WEEK)
        + 4 * MILLIS_PER_DAY
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DayKind {
    OfWeek,
    OfMonth,
    OfYear,
}

/// Day-valued fields: every unit is one day, only the range varies.
#[derive(Debug)]
pub(crate) struct DayField {
    core: Arc<BasicCalendar>,
    kind: DayKind,
    range: Arc<dyn DurationField>,
}

impl DayField {
    pub fn shared(
        core: Arc<BasicCalendar>,
        kind: DayKind,
        range: Arc<dyn DurationField>,
    ) -> Arc<dyn DateTimeField> {
        Arc::new(DayField { core, kind, range })
    }
}

impl DateTimeField for DayField {
    fn field_type(&self) -> DateTimeFieldType {
        match self.kind {
            DayKind::OfWeek => DateTimeFieldType::DayOfWeek,
            DayKind::OfMonth => DateTimeFieldType::DayOfMonth,
            DayKind::OfYear => DateTimeFieldType::DayOfYear,
        }
    }

    fn get(&self, instant: i64) -> Result<i32> {
        Ok(match self.kind {
            DayKind::OfWeek => self.core.day_of_week(instant),
            DayKind::OfMonth => self.core.day_of_month(instant),
            DayKind::OfYear => self.core.day_of_year(instant),
        })
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_field_bounds(self, instant, value)?;
        let current = self.get(instant)?;
        Ok(instant + (value - current) as i64 * MILLIS_PER_DAY)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &TIME_FIELDS.days
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        Some(&self.range)
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        match self.kind {
            DayKind::OfWeek => None,
            _ => Some(&TIME_FIELDS.days),
        }
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        let year = self.core.year(instant);
        Ok(match self.kind {
            DayKind::OfWeek => false,
            DayKind::OfMonth => {
                let month = self.core.month_of_year_in(instant, year);
                let day = self.core.day_of_month_in(instant, year, month);
                self.core.rules().is_leap_day(year, month, day)
            }
            DayKind::OfYear => {
                self.core.is_leap_year(year)
                    && self.core.day_of_year_in(instant, year) == self.core.days_in_year(year)
            }
        })
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        Ok(self.is_leap(instant)? as i32)
    }

    fn min_value(&self) -> i32 {
        1
    }

    fn max_value(&self) -> i32 {
        match self.kind {
            DayKind::OfWeek => 7,
            DayKind::OfMonth => self.core.rules().days_in_month_max_overall(),
            DayKind::OfYear => self.core.rules().days_in_year_max(),
        }
    }

    fn max_value_at(&self, instant: i64) -> Result<i32> {
        Ok(match self.kind {
            DayKind::OfWeek => 7,
            DayKind::OfMonth => self.core.days_in_month_max_at(instant),
            DayKind::OfYear => self.core.days_in_year(self.core.year(instant)),
        })
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        Ok(floor_to_unit(instant, MILLIS_PER_DAY))
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        Ok(ceiling_to_unit(instant, MILLIS_PER_DAY))
    }

    fn remainder(&self, instant: i64) -> Result<i64> {
        Ok(instant.rem_euclid(MILLIS_PER_DAY))
    }
}

/// The `weekOfWeekyear` field. Weeks start on Monday.
#[derive(Debug)]
pub(crate) struct WeekOfWeekyearField {
    core: Arc<BasicCalendar>,
    range: Arc<dyn DurationField>,
}

impl WeekOfWeekyearField {
    pub fn shared(
        core: Arc<BasicCalendar>,
        weekyears: Arc<dyn DurationField>,
    ) -> Arc<dyn DateTimeField> {
        Arc::new(WeekOfWeekyearField {
            core,
            range: weekyears,
        })
    }
}

impl DateTimeField for WeekOfWeekyearField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::WeekOfWeekyear
    }

    fn get(&self, instant: i64) -> Result<i32> {
        Ok(self.core.week_of_weekyear(instant))
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_field_bounds(self, instant, value)?;
        let current = self.get(instant)?;
        Ok(instant + (value - current) as i64 * MILLIS_PER_WEEK)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &TIME_FIELDS.weeks
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        Some(&self.range)
    }

    fn min_value(&self) -> i32 {
        1
    }

    fn max_value(&self) -> i32 {
        53
    }

    fn max_value_at(&self, instant: i64) -> Result<i32> {
        Ok(self.core.weeks_in_year(self.core.weekyear(instant)))
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        Ok(week_floor(instant))
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        Ok(week_ceiling(instant))
    }

    fn remainder(&self, instant: i64) -> Result<i64> {
        Ok(instant - week_floor(instant))
    }
}

/// Two-valued era: 0 for arithmetic years up to zero, 1 from year 1.
#[derive(Debug)]
pub(crate) struct TwoEraField {
    core: Arc<BasicCalendar>,
    eras: Arc<dyn DurationField>,
}

impl TwoEraField {
    pub fn shared(core: Arc<BasicCalendar>) -> Arc<dyn DateTimeField> {
        Arc::new(TwoEraField {
            core,
            eras: UnsupportedDurationField::shared(DurationFieldType::Eras),
        })
    }

    fn era_start(&self) -> i64 {
        self.core.year_millis(1)
    }
}

impl DateTimeField for TwoEraField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Era
    }

    fn get(&self, instant: i64) -> Result<i32> {
        Ok(if self.core.year(instant) <= 0 { 0 } else { 1 })
    }

    /// Mirrors the year across the era boundary, keeping the year of era.
    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(DateTimeFieldType::Era.name(), value as i64, 0, 1)?;
        if self.get(instant)? == value {
            return Ok(instant);
        }
        let year = self.core.year(instant);
        self.core.set_year(instant, 1 - year)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &self.eras
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        None
    }

    fn min_value(&self) -> i32 {
        0
    }

    fn max_value(&self) -> i32 {
        1
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        Ok(if self.get(instant)? == 1 {
            self.era_start()
        } else {
            i64::MIN
        })
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        if self.get(instant)? == 0 {
            Ok(self.era_start())
        } else if instant == self.era_start() {
            Ok(instant)
        } else {
            Ok(i64::MAX)
        }
    }

    fn round_half_floor(&self, instant: i64) -> Result<i64> {
        self.round_floor(instant)
    }

    fn round_half_ceiling(&self, instant: i64) -> Result<i64> {
        self.round_floor(instant)
    }

    fn round_half_even(&self, instant: i64) -> Result<i64> {
        self.round_floor(instant)
    }
}

/// Era of a calendar with one era covering every year.
#[derive(Debug)]
pub(crate) struct SingleEraField {
    eras: Arc<dyn DurationField>,
}

impl SingleEraField {
    pub fn shared() -> Arc<dyn DateTimeField> {
        Arc::new(SingleEraField {
            eras: UnsupportedDurationField::shared(DurationFieldType::Eras),
        })
    }
}

impl DateTimeField for SingleEraField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::Era
    }

    fn get(&self, _instant: i64) -> Result<i32> {
        Ok(1)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(DateTimeFieldType::Era.name(), value as i64, 1, 1)?;
        Ok(instant)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &self.eras
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        None
    }

    fn min_value(&self) -> i32 {
        1
    }

    fn max_value(&self) -> i32 {
        1
    }

    fn round_floor(&self, _instant: i64) -> Result<i64> {
        Ok(i64::MIN)
    }

    fn round_ceiling(&self, _instant: i64) -> Result<i64> {
        Ok(i64::MAX)
    }

    fn round_half_floor(&self, _instant: i64) -> Result<i64> {
        Ok(i64::MIN)
    }

    fn round_half_ceiling(&self, _instant: i64) -> Result<i64> {
        Ok(i64::MIN)
    }

    fn round_half_even(&self, _instant: i64) -> Result<i64> {
        Ok(i64::MIN)
    }
}

/// Year within era over an arithmetic year field: years up to zero count
/// backwards from 1.
#[derive(Debug)]
pub(crate) struct YearOfEraField {
    year: Arc<dyn DateTimeField>,
    core: Arc<BasicCalendar>,
}

impl YearOfEraField {
    pub fn shared(
        year: Arc<dyn DateTimeField>,
        core: Arc<BasicCalendar>,
    ) -> Arc<dyn DateTimeField> {
        Arc::new(YearOfEraField { year, core })
    }
}

impl DateTimeField for YearOfEraField {
    fn field_type(&self) -> DateTimeFieldType {
        DateTimeFieldType::YearOfEra
    }

    fn get(&self, instant: i64) -> Result<i32> {
        let year = self.year.get(instant)?;
        Ok(if year <= 0 { 1 - year } else { year })
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(
            DateTimeFieldType::YearOfEra.name(),
            value as i64,
            1,
            self.max_value() as i64,
        )?;
        let value = if self.core.year(instant) <= 0 {
            1 - value
        } else {
            value
        };
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
        1
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_rounding_is_monday_based() {
        // 1970-01-05 was a Monday.
        let monday = 4 * MILLIS_PER_DAY;
        assert_eq!(week_floor(monday), monday);
        assert_eq!(week_floor(monday - 1), monday - MILLIS_PER_WEEK);
        assert_eq!(week_floor(0), monday - MILLIS_PER_WEEK);
        assert_eq!(week_ceiling(monday), monday);
        assert_eq!(week_ceiling(monday + 1), monday + MILLIS_PER_WEEK);
        assert_eq!(week_ceiling(0), monday);
    }

    #[test]
    fn time_fields_share_units() {
        let time = &*TIME_FIELDS;
        assert_eq!(time.halfdays.unit_millis(), 12 * MILLIS_PER_HOUR);
        assert_eq!(time.weeks.unit_millis(), MILLIS_PER_WEEK);
        assert_eq!(time.clockhour_of_day.get(0).unwrap(), 24);
        assert_eq!(time.clockhour_of_halfday.get(13 * MILLIS_PER_HOUR).unwrap(), 1);
        assert_eq!(time.halfday_of_day.get(13 * MILLIS_PER_HOUR).unwrap(), 1);
        assert_eq!(time.minute_of_day.get(-1).unwrap(), 1439);
    }
}
