use std::sync::Arc;

use tempora_common::{Error, Result};

use super::utils::{verify_value_bounds, wrap_add};
use super::{DateTimeField, DurationField};
use crate::field_type::DateTimeFieldType;

/// Shifts every value of a wrapped field by a constant.
#[derive(Debug)]
pub struct OffsetDateTimeField {
    inner: Arc<dyn DateTimeField>,
    field_type: DateTimeFieldType,
    offset: i32,
    min: i32,
    max: i32,
}

impl OffsetDateTimeField {
    pub fn new(inner: Arc<dyn DateTimeField>, field_type: DateTimeFieldType, offset: i32) -> Self {
        Self::bounded(inner, field_type, offset, i32::MIN, i32::MAX)
    }

    /// Like [`new`](Self::new), additionally narrowing the shifted bounds to
    /// `[min, max]`.
    pub fn bounded(
        inner: Arc<dyn DateTimeField>,
        field_type: DateTimeFieldType,
        offset: i32,
        min: i32,
        max: i32,
    ) -> Self {
        debug_assert!(offset != 0);
        let min = min.max(inner.min_value().saturating_add(offset));
        let max = max.min(inner.max_value().saturating_add(offset));
        OffsetDateTimeField {
            inner,
            field_type,
            offset,
            min,
            max,
        }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

impl DateTimeField for OffsetDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field_type
    }

    fn get(&self, instant: i64) -> Result<i32> {
        Ok(self.inner.get(instant)? + self.offset)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(self.name(), value as i64, self.min as i64, self.max as i64)?;
        self.inner.set(instant, value - self.offset)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        let result = self.inner.add(instant, value)?;
        let shifted = self.get(result)?;
        if shifted < self.min || shifted > self.max {
            return Err(Error::illegal_value(
                self.name(),
                shifted as i64,
                Some(self.min as i64),
                Some(self.max as i64),
            ));
        }
        Ok(result)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> Result<i64> {
        let current = self.get(instant)?;
        self.set(instant, wrap_add(current, value, self.min, self.max))
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.inner.difference(minuend, subtrahend)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        self.inner.duration_field()
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.inner.range_duration_field()
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.inner.leap_duration_field()
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        self.inner.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        self.inner.leap_amount(instant)
    }

    fn min_value(&self) -> i32 {
        self.min
    }

    fn max_value(&self) -> i32 {
        self.max
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
