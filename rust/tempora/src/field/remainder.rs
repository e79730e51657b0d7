use std::sync::Arc;

use tempora_common::Result;

use super::divided::{floor_div, floor_rem};
use super::utils::{verify_value_bounds, wrap_add};
use super::{DateTimeField, DividedDateTimeField, DurationField, ScaledDurationField};
use crate::field_type::DateTimeFieldType;

/// The zero-based position of a wrapped field's value within groups of
/// `divisor`, e.g. `yearOfCentury` over `yearOfEra`.
#[derive(Debug)]
pub struct RemainderDateTimeField {
    inner: Arc<dyn DateTimeField>,
    field_type: DateTimeFieldType,
    divisor: i32,
    range: Arc<dyn DurationField>,
}

impl RemainderDateTimeField {
    /// Builds the counterpart of a divided field, so that the two together
    /// reconstruct the original value.
    pub fn from_divided(divided: &DividedDateTimeField, field_type: DateTimeFieldType) -> Self {
        RemainderDateTimeField {
            inner: divided.wrapped().clone(),
            field_type,
            divisor: divided.divisor(),
            range: divided.duration_field().clone(),
        }
    }

    pub fn new(inner: Arc<dyn DateTimeField>, field_type: DateTimeFieldType, divisor: i32) -> Self {
        debug_assert!(divisor >= 2);
        let range_type = field_type
            .range_duration_type()
            .unwrap_or_else(|| inner.duration_field().field_type());
        let range =
            ScaledDurationField::shared(inner.duration_field().clone(), range_type, divisor as i64);
        RemainderDateTimeField {
            inner,
            field_type,
            divisor,
            range,
        }
    }

    pub fn with_range(
        inner: Arc<dyn DateTimeField>,
        range: Arc<dyn DurationField>,
        field_type: DateTimeFieldType,
        divisor: i32,
    ) -> Self {
        RemainderDateTimeField {
            inner,
            field_type,
            divisor,
            range,
        }
    }
}

impl DateTimeField for RemainderDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field_type
    }

    fn get(&self, instant: i64) -> Result<i32> {
        Ok(floor_rem(self.inner.get(instant)?, self.divisor))
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(self.name(), value as i64, 0, self.divisor as i64 - 1)?;
        let group = floor_div(self.inner.get(instant)?, self.divisor);
        self.inner.set(instant, group * self.divisor + value)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.inner.add(instant, value)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> Result<i64> {
        let current = self.get(instant)?;
        self.set(instant, wrap_add(current, value, 0, self.divisor - 1))
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.inner.difference(minuend, subtrahend)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        self.inner.duration_field()
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        Some(&self.range)
    }

    fn min_value(&self) -> i32 {
        0
    }

    fn max_value(&self) -> i32 {
        self.divisor - 1
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        self.inner.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.inner.round_ceiling(instant)
    }

    fn remainder(&self, instant: i64) -> Result<i64> {
        self.inner.remainder(instant)
    }
}
