use std::sync::Arc;

use tempora_common::{Error, Result};

use super::utils::verify_value_bounds;
use super::{DateTimeField, DurationField};
use crate::field_type::DateTimeFieldType;

/// Removes one value from a wrapped field's numbering: values at or below
/// `skip` shift down by one, so the skipped value never appears. Used for
/// year numbering without a year zero.
#[derive(Debug)]
pub struct SkipDateTimeField {
    inner: Arc<dyn DateTimeField>,
    skip: i32,
    min: i32,
}

impl SkipDateTimeField {
    pub fn new(inner: Arc<dyn DateTimeField>, skip: i32) -> Self {
        let inner_min = inner.min_value();
        let min = if inner_min < skip {
            inner_min - 1
        } else if inner_min == skip {
            skip + 1
        } else {
            inner_min
        };
        SkipDateTimeField { inner, skip, min }
    }
}

impl DateTimeField for SkipDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.inner.field_type()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        let value = self.inner.get(instant)?;
        Ok(if value <= self.skip { value - 1 } else { value })
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(self.name(), value as i64, self.min as i64, self.max_value() as i64)?;
        let mut value = value;
        if value <= self.skip {
            if value == self.skip {
                return Err(Error::illegal_value(self.name(), value as i64, None, None));
            }
            value += 1;
        }
        self.inner.set(instant, value)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.inner.add(instant, value)
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
        self.inner.max_value()
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        self.inner.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.inner.round_ceiling(instant)
    }
}

/// Restores the skipped value hidden by a [`SkipDateTimeField`]-style
/// numbering: values below `skip` shift up by one.
#[derive(Debug)]
pub struct SkipUndoDateTimeField {
    inner: Arc<dyn DateTimeField>,
    skip: i32,
    min: i32,
}

impl SkipUndoDateTimeField {
    pub fn new(inner: Arc<dyn DateTimeField>, skip: i32) -> Self {
        let inner_min = inner.min_value();
        let min = if inner_min < skip {
            inner_min + 1
        } else if inner_min == skip + 1 {
            skip
        } else {
            inner_min
        };
        SkipUndoDateTimeField { inner, skip, min }
    }
}

impl DateTimeField for SkipUndoDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.inner.field_type()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        let value = self.inner.get(instant)?;
        Ok(if value < self.skip { value + 1 } else { value })
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_value_bounds(self.name(), value as i64, self.min as i64, self.max_value() as i64)?;
        let value = if value <= self.skip { value - 1 } else { value };
        self.inner.set(instant, value)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.inner.add(instant, value)
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
        self.inner.max_value()
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        self.inner.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.inner.round_ceiling(instant)
    }
}
