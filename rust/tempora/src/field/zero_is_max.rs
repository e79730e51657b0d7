use std::sync::Arc;

use tempora_common::Result;

use super::utils::verify_value_bounds;
use super::{DateTimeField, DurationField};
use crate::field_type::DateTimeFieldType;

/// Presents a zero-based field as one-based with zero shown as the maximum,
/// the way clock hours run 1..=12 over `hourOfHalfday`.
#[derive(Debug)]
pub struct ZeroIsMaxDateTimeField {
    inner: Arc<dyn DateTimeField>,
    field_type: DateTimeFieldType,
}

impl ZeroIsMaxDateTimeField {
    pub fn new(inner: Arc<dyn DateTimeField>, field_type: DateTimeFieldType) -> Self {
        debug_assert_eq!(inner.min_value(), 0);
        ZeroIsMaxDateTimeField { inner, field_type }
    }
}

impl DateTimeField for ZeroIsMaxDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field_type
    }

    fn get(&self, instant: i64) -> Result<i32> {
        let value = self.inner.get(instant)?;
        Ok(if value == 0 { self.max_value() } else { value })
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        let max = self.max_value();
        verify_value_bounds(self.name(), value as i64, 1, max as i64)?;
        self.inner.set(instant, if value == max { 0 } else { value })
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.inner.add(instant, value)
    }

    fn add_wrap_field(&self, instant: i64, value: i32) -> Result<i64> {
        self.inner.add_wrap_field(instant, value)
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

    fn min_value(&self) -> i32 {
        1
    }

    fn max_value(&self) -> i32 {
        self.inner.max_value() + 1
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
