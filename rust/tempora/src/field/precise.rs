use std::sync::Arc;

use tempora_common::Result;

use super::utils::{ceiling_to_unit, floor_to_unit, verify_value_bounds};
use super::{DateTimeField, DurationField};
use crate::field_type::DateTimeFieldType;

/// A field whose unit and range are both precise, such as `minuteOfHour`
/// (one minute within one hour) or `millisOfDay`.
///
/// Values run from zero to `range / unit - 1` and every instant maps onto
/// them with floor semantics, so negative instants count down from the
/// maximum.
#[derive(Debug)]
pub struct PreciseDateTimeField {
    field_type: DateTimeFieldType,
    unit_field: Arc<dyn DurationField>,
    range_field: Arc<dyn DurationField>,
    unit: i64,
    range: i64,
}

impl PreciseDateTimeField {
    pub fn new(
        field_type: DateTimeFieldType,
        unit_field: Arc<dyn DurationField>,
        range_field: Arc<dyn DurationField>,
    ) -> PreciseDateTimeField {
        debug_assert!(unit_field.is_precise() && range_field.is_precise());
        let unit = unit_field.unit_millis();
        let range = range_field.unit_millis() / unit;
        debug_assert!(range >= 2);
        PreciseDateTimeField {
            field_type,
            unit_field,
            range_field,
            unit,
            range,
        }
    }

    pub fn shared(
        field_type: DateTimeFieldType,
        unit_field: Arc<dyn DurationField>,
        range_field: Arc<dyn DurationField>,
    ) -> Arc<dyn DateTimeField> {
        Arc::new(Self::new(field_type, unit_field, range_field))
    }

    /// Number of values in one range cycle.
    pub fn range(&self) -> i64 {
        self.range
    }

    pub fn unit(&self) -> i64 {
        self.unit
    }

    fn value(&self, instant: i64) -> i64 {
        if instant >= 0 {
            (instant / self.unit) % self.range
        } else {
            self.range - 1 + ((instant + 1) / self.unit) % self.range
        }
    }
}

impl DateTimeField for PreciseDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field_type
    }

    fn get(&self, instant: i64) -> Result<i32> {
        Ok(self.value(instant) as i32)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(self.name(), value as i64, 0, self.range - 1)?;
        Ok(instant + (value as i64 - self.value(instant)) * self.unit)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> Result<i64> {
        let current = self.value(instant);
        let wrapped = (current + value as i64).rem_euclid(self.range);
        Ok(instant + (wrapped - current) * self.unit)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &self.unit_field
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        Some(&self.range_field)
    }

    fn min_value(&self) -> i32 {
        0
    }

    fn max_value(&self) -> i32 {
        (self.range - 1) as i32
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        Ok(floor_to_unit(instant, self.unit))
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        Ok(ceiling_to_unit(instant, self.unit))
    }

    fn remainder(&self, instant: i64) -> Result<i64> {
        Ok(instant.rem_euclid(self.unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::PreciseDurationField;
    use crate::field_type::DurationFieldType;
    use crate::{MILLIS_PER_HOUR, MILLIS_PER_MINUTE};

    fn minute_of_hour() -> PreciseDateTimeField {
        PreciseDateTimeField::new(
            DateTimeFieldType::MinuteOfHour,
            PreciseDurationField::shared(DurationFieldType::Minutes, MILLIS_PER_MINUTE),
            PreciseDurationField::shared(DurationFieldType::Hours, MILLIS_PER_HOUR),
        )
    }

    #[test]
    fn get_counts_down_before_epoch() {
        let f = minute_of_hour();
        assert_eq!(f.get(0).unwrap(), 0);
        assert_eq!(f.get(-1).unwrap(), 59);
        assert_eq!(f.get(-MILLIS_PER_MINUTE).unwrap(), 59);
        assert_eq!(f.get(-MILLIS_PER_MINUTE - 1).unwrap(), 58);
        assert_eq!(f.get(61 * MILLIS_PER_MINUTE).unwrap(), 1);
    }

    #[test]
    fn set_and_bounds() {
        let f = minute_of_hour();
        let t = f.set(5 * MILLIS_PER_MINUTE + 17, 42).unwrap();
        assert_eq!(f.get(t).unwrap(), 42);
        assert_eq!(t % MILLIS_PER_MINUTE, 17);
        assert!(f.set(0, 60).is_err());
        assert!(f.set(0, -1).is_err());
    }

    #[test]
    fn rounding_is_floor_based() {
        let f = minute_of_hour();
        assert_eq!(f.round_floor(-1).unwrap(), -MILLIS_PER_MINUTE);
        assert_eq!(f.round_floor(-MILLIS_PER_MINUTE).unwrap(), -MILLIS_PER_MINUTE);
        assert_eq!(f.round_ceiling(-1).unwrap(), 0);
        assert_eq!(f.round_ceiling(1).unwrap(), MILLIS_PER_MINUTE);
        assert_eq!(f.round_ceiling(0).unwrap(), 0);
        assert_eq!(f.remainder(-1).unwrap(), MILLIS_PER_MINUTE - 1);
        assert_eq!(f.round_half_even(30_000).unwrap(), 0);
        assert_eq!(f.round_half_even(90_000).unwrap(), 2 * MILLIS_PER_MINUTE);
        assert_eq!(f.round_half_ceiling(30_000).unwrap(), MILLIS_PER_MINUTE);
        assert_eq!(f.round_half_floor(30_000).unwrap(), 0);
    }

    #[test]
    fn wrap_does_not_carry() {
        let f = minute_of_hour();
        let t = f.add_wrap_field(58 * MILLIS_PER_MINUTE, 3).unwrap();
        assert_eq!(t, MILLIS_PER_MINUTE);
        let t = f.add_wrap_field(MILLIS_PER_MINUTE, -3).unwrap();
        assert_eq!(t, 58 * MILLIS_PER_MINUTE);
    }
}
