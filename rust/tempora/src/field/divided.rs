use std::sync::Arc;

use tempora_common::Result;

use super::utils::{safe_multiply, verify_value_bounds, wrap_add};
use super::{DateTimeField, DurationField, ScaledDurationField};
use crate::field_type::DateTimeFieldType;

/// Groups the values of a wrapped field by a divisor, e.g. `centuryOfEra`
/// over `yearOfEra`. Division floors, so negative values group downward.
#[derive(Debug)]
pub struct DividedDateTimeField {
    inner: Arc<dyn DateTimeField>,
    field_type: DateTimeFieldType,
    divisor: i32,
    duration: Arc<dyn DurationField>,
    range: Option<Arc<dyn DurationField>>,
    min: i32,
    max: i32,
}

impl DividedDateTimeField {
    pub fn new(inner: Arc<dyn DateTimeField>, field_type: DateTimeFieldType, divisor: i32) -> Self {
        let range = inner.range_duration_field().cloned();
        Self::with_range(inner, range, field_type, divisor)
    }

    pub fn with_range(
        inner: Arc<dyn DateTimeField>,
        range: Option<Arc<dyn DurationField>>,
        field_type: DateTimeFieldType,
        divisor: i32,
    ) -> Self {
        debug_assert!(divisor >= 2);
        let duration = ScaledDurationField::shared(
            inner.duration_field().clone(),
            field_type.duration_type(),
            divisor as i64,
        );
        let min = floor_div(inner.min_value(), divisor);
        let max = floor_div(inner.max_value(), divisor);
        DividedDateTimeField {
            inner,
            field_type,
            divisor,
            duration,
            range,
            min,
            max,
        }
    }

    pub fn divisor(&self) -> i32 {
        self.divisor
    }

    pub fn wrapped(&self) -> &Arc<dyn DateTimeField> {
        &self.inner
    }

    fn remainder_of(&self, value: i32) -> i32 {
        floor_rem(value, self.divisor)
    }
}

pub(crate) fn floor_div(value: i32, divisor: i32) -> i32 {
    if value >= 0 {
        value / divisor
    } else {
        (value + 1) / divisor - 1
    }
}

pub(crate) fn floor_rem(value: i32, divisor: i32) -> i32 {
    if value >= 0 {
        value % divisor
    } else {
        (divisor - 1) + (value + 1) % divisor
    }
}

impl DateTimeField for DividedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field_type
    }

    fn get(&self, instant: i64) -> Result<i32> {
        Ok(floor_div(self.inner.get(instant)?, self.divisor))
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(self.name(), value as i64, self.min as i64, self.max as i64)?;
        let remainder = self.remainder_of(self.inner.get(instant)?);
        self.inner.set(instant, value * self.divisor + remainder)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.inner
            .add(instant, safe_multiply(value, self.divisor as i64)?)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> Result<i64> {
        let current = self.get(instant)?;
        self.set(instant, wrap_add(current, value, self.min, self.max))
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        Ok(self.inner.difference(minuend, subtrahend)? / self.divisor as i64)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &self.duration
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.range.as_ref()
    }

    fn min_value(&self) -> i32 {
        self.min
    }

    fn max_value(&self) -> i32 {
        self.max
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        let start = self.inner.set(instant, self.get(instant)? * self.divisor)?;
        self.inner.round_floor(start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floor_division() {
        assert_eq!(floor_div(199, 100), 1);
        assert_eq!(floor_div(0, 100), 0);
        assert_eq!(floor_div(-1, 100), -1);
        assert_eq!(floor_div(-100, 100), -1);
        assert_eq!(floor_div(-101, 100), -2);
        assert_eq!(floor_rem(-1, 100), 99);
        assert_eq!(floor_rem(-100, 100), 0);
        assert_eq!(floor_rem(250, 100), 50);
    }
}
