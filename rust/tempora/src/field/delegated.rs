use std::sync::Arc;

use tempora_common::Result;

use super::{DateTimeField, DurationField};
use crate::field_type::DateTimeFieldType;

/// Forwards every operation to a wrapped field, optionally presenting it
/// under another type or with other duration fields.
#[derive(Debug)]
pub struct DelegatedDateTimeField {
    inner: Arc<dyn DateTimeField>,
    field_type: DateTimeFieldType,
    duration: Arc<dyn DurationField>,
    range: Option<Arc<dyn DurationField>>,
}

impl DelegatedDateTimeField {
    pub fn new(inner: Arc<dyn DateTimeField>) -> Self {
        let field_type = inner.field_type();
        Self::with_type(inner, field_type)
    }

    pub fn with_type(inner: Arc<dyn DateTimeField>, field_type: DateTimeFieldType) -> Self {
        let duration = inner.duration_field().clone();
        let range = inner.range_duration_field().cloned();
        DelegatedDateTimeField {
            inner,
            field_type,
            duration,
            range,
        }
    }

    pub fn with_range(mut self, range: Option<Arc<dyn DurationField>>) -> Self {
        self.range = range;
        self
    }

    pub fn with_duration(mut self, duration: Arc<dyn DurationField>) -> Self {
        self.duration = duration;
        self
    }

    pub fn wrapped(&self) -> &Arc<dyn DateTimeField> {
        &self.inner
    }
}

impl DateTimeField for DelegatedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field_type
    }

    fn is_supported(&self) -> bool {
        self.inner.is_supported()
    }

    fn is_lenient(&self) -> bool {
        self.inner.is_lenient()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        self.inner.get(instant)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        self.inner.set(instant, value)
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
        &self.duration
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.range.as_ref()
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
        self.inner.min_value()
    }

    fn max_value(&self) -> i32 {
        self.inner.max_value()
    }

    fn min_value_at(&self, instant: i64) -> Result<i32> {
        self.inner.min_value_at(instant)
    }

    fn max_value_at(&self, instant: i64) -> Result<i32> {
        self.inner.max_value_at(instant)
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
