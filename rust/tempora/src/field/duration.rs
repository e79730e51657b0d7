use std::sync::{Arc, LazyLock};

use tempora_common::Result;

use super::utils::{safe_add, safe_multiply, safe_subtract};
use super::DurationField;
use crate::field_type::DurationFieldType;

/// The millisecond unit itself.
#[derive(Debug)]
pub struct MillisDurationField;

static MILLIS: LazyLock<Arc<dyn DurationField>> =
    LazyLock::new(|| Arc::new(MillisDurationField) as Arc<dyn DurationField>);

impl MillisDurationField {
    /// The shared instance.
    pub fn instance() -> Arc<dyn DurationField> {
        MILLIS.clone()
    }
}

impl DurationField for MillisDurationField {
    fn field_type(&self) -> DurationFieldType {
        DurationFieldType::Millis
    }

    fn is_precise(&self) -> bool {
        true
    }

    fn unit_millis(&self) -> i64 {
        1
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        safe_add(instant, value)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        safe_subtract(minuend, subtrahend)
    }

    fn millis_at(&self, value: i64, _instant: i64) -> Result<i64> {
        Ok(value)
    }
}

/// A duration of a fixed number of milliseconds.
#[derive(Debug)]
pub struct PreciseDurationField {
    field_type: DurationFieldType,
    unit: i64,
}

impl PreciseDurationField {
    pub fn new(field_type: DurationFieldType, unit: i64) -> PreciseDurationField {
        PreciseDurationField { field_type, unit }
    }

    pub fn shared(field_type: DurationFieldType, unit: i64) -> Arc<dyn DurationField> {
        Arc::new(Self::new(field_type, unit))
    }
}

impl DurationField for PreciseDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.field_type
    }

    fn is_precise(&self) -> bool {
        true
    }

    fn unit_millis(&self) -> i64 {
        self.unit
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        safe_add(instant, safe_multiply(value, self.unit)?)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        Ok(safe_subtract(minuend, subtrahend)? / self.unit)
    }

    fn millis_at(&self, value: i64, _instant: i64) -> Result<i64> {
        safe_multiply(value, self.unit)
    }
}

/// Multiplies every amount of a wrapped duration by a constant, e.g. weeks
/// over days or centuries over years.
#[derive(Debug)]
pub struct ScaledDurationField {
    field_type: DurationFieldType,
    inner: Arc<dyn DurationField>,
    scalar: i64,
}

impl ScaledDurationField {
    pub fn new(
        inner: Arc<dyn DurationField>,
        field_type: DurationFieldType,
        scalar: i64,
    ) -> ScaledDurationField {
        ScaledDurationField {
            field_type,
            inner,
            scalar,
        }
    }

    pub fn shared(
        inner: Arc<dyn DurationField>,
        field_type: DurationFieldType,
        scalar: i64,
    ) -> Arc<dyn DurationField> {
        Arc::new(Self::new(inner, field_type, scalar))
    }

    pub fn scalar(&self) -> i64 {
        self.scalar
    }
}

impl DurationField for ScaledDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.field_type
    }

    fn is_supported(&self) -> bool {
        self.inner.is_supported()
    }

    fn is_precise(&self) -> bool {
        self.inner.is_precise()
    }

    fn unit_millis(&self) -> i64 {
        self.inner.unit_millis().saturating_mul(self.scalar)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.inner.add(instant, safe_multiply(value, self.scalar)?)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        Ok(self.inner.difference(minuend, subtrahend)? / self.scalar)
    }

    fn millis_at(&self, value: i64, instant: i64) -> Result<i64> {
        self.inner.millis_at(safe_multiply(value, self.scalar)?, instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MILLIS_PER_DAY;

    #[test]
    fn precise_difference_truncates_toward_zero() {
        let days = PreciseDurationField::new(DurationFieldType::Days, MILLIS_PER_DAY);
        assert_eq!(days.difference(MILLIS_PER_DAY * 3 - 1, 0).unwrap(), 2);
        assert_eq!(days.difference(0, MILLIS_PER_DAY * 3 - 1).unwrap(), -2);
        assert_eq!(days.add(10, 2).unwrap(), 10 + 2 * MILLIS_PER_DAY);
        assert!(days.add(0, i64::MAX).is_err());
    }

    #[test]
    fn scaled_weeks() {
        let days = PreciseDurationField::shared(DurationFieldType::Days, MILLIS_PER_DAY);
        let weeks = ScaledDurationField::new(days, DurationFieldType::Weeks, 7);
        assert!(weeks.is_precise());
        assert_eq!(weeks.unit_millis(), 7 * MILLIS_PER_DAY);
        assert_eq!(weeks.add(0, 2).unwrap(), 14 * MILLIS_PER_DAY);
        assert_eq!(weeks.difference(20 * MILLIS_PER_DAY, 0).unwrap(), 2);
    }

    #[test]
    fn millis_instance_is_shared() {
        let a = MillisDurationField::instance();
        let b = MillisDurationField::instance();
        assert!(crate::field::same_duration_field(&a, &b));
        assert_eq!(a.millis_at(42, 7).unwrap(), 42);
    }
}
