use std::fmt;
use std::sync::Arc;

use tempora_common::Result;

use super::utils::safe_subtract;
use super::{DateTimeField, DurationField};
use crate::field_type::{DateTimeFieldType, DurationFieldType};

/// The arithmetic behind a field whose unit has no fixed length (months,
/// years, weekyears).
///
/// An imprecise duration cannot compute `add` or `difference` on its own:
/// it has to ask the date-time field it belongs to. Both halves therefore
/// share one `FieldOps` value; see [`ImpreciseDateTimeField`] and
/// [`LinkedDurationField`].
pub trait FieldOps: Send + Sync + fmt::Debug {
    fn field_type(&self) -> DateTimeFieldType;

    fn duration_type(&self) -> DurationFieldType {
        self.field_type().duration_type()
    }

    /// Average unit length, used only to seed estimates.
    fn average_unit_millis(&self) -> i64;

    fn get(&self, instant: i64) -> Result<i32>;

    fn set(&self, instant: i64, value: i32) -> Result<i64>;

    fn add(&self, instant: i64, value: i64) -> Result<i64>;

    /// Whole units between the instants, truncated toward zero.
    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        walk_difference(self, minuend, subtrahend)
    }

    fn round_floor(&self, instant: i64) -> Result<i64>;

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        let floor = self.round_floor(instant)?;
        if floor == instant {
            Ok(instant)
        } else {
            self.add(floor, 1)
        }
    }

    fn min_value(&self) -> i32;

    fn max_value(&self) -> i32;

    fn min_value_at(&self, _instant: i64) -> Result<i32> {
        Ok(self.min_value())
    }

    fn max_value_at(&self, _instant: i64) -> Result<i32> {
        Ok(self.max_value())
    }

    fn is_leap(&self, _instant: i64) -> Result<bool> {
        Ok(false)
    }

    fn leap_amount(&self, _instant: i64) -> Result<i32> {
        Ok(0)
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        None
    }
}

/// Whole units of `ops` between the instants, truncated toward zero:
/// estimated from the average unit length, then walked to the exact count.
pub fn walk_difference<F: FieldOps + ?Sized>(
    ops: &F,
    minuend: i64,
    subtrahend: i64,
) -> Result<i64> {
    if minuend < subtrahend {
        return Ok(-walk_difference(ops, subtrahend, minuend)?);
    }
    let mut diff = safe_subtract(minuend, subtrahend)? / ops.average_unit_millis();
    if ops.add(subtrahend, diff)? < minuend {
        loop {
            diff += 1;
            if ops.add(subtrahend, diff)? > minuend {
                break;
            }
        }
        diff -= 1;
    } else {
        while ops.add(subtrahend, diff)? > minuend {
            diff -= 1;
        }
    }
    Ok(diff)
}

/// Duration half of an imprecise field: every operation is answered by the
/// owning field's [`FieldOps`].
#[derive(Debug)]
pub struct LinkedDurationField {
    ops: Arc<dyn FieldOps>,
}

impl LinkedDurationField {
    pub fn new(ops: Arc<dyn FieldOps>) -> LinkedDurationField {
        LinkedDurationField { ops }
    }
}

impl DurationField for LinkedDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.ops.duration_type()
    }

    fn is_precise(&self) -> bool {
        false
    }

    fn unit_millis(&self) -> i64 {
        self.ops.average_unit_millis()
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.ops.add(instant, value)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.ops.difference(minuend, subtrahend)
    }
}

/// Date-time half of an imprecise field.
#[derive(Debug)]
pub struct ImpreciseDateTimeField {
    ops: Arc<dyn FieldOps>,
    duration: Arc<dyn DurationField>,
    range: Option<Arc<dyn DurationField>>,
}

impl ImpreciseDateTimeField {
    /// Builds the field and its linked duration field.
    pub fn new(ops: Arc<dyn FieldOps>, range: Option<Arc<dyn DurationField>>) -> Self {
        let duration: Arc<dyn DurationField> = Arc::new(LinkedDurationField::new(ops.clone()));
        ImpreciseDateTimeField {
            ops,
            duration,
            range,
        }
    }

    /// Builds the field around an existing duration field, for a field that
    /// shares its unit with another one.
    pub fn with_duration(
        ops: Arc<dyn FieldOps>,
        duration: Arc<dyn DurationField>,
        range: Option<Arc<dyn DurationField>>,
    ) -> Self {
        ImpreciseDateTimeField {
            ops,
            duration,
            range,
        }
    }

    pub fn shared(
        ops: Arc<dyn FieldOps>,
        range: Option<Arc<dyn DurationField>>,
    ) -> Arc<dyn DateTimeField> {
        Arc::new(Self::new(ops, range))
    }

    pub fn ops(&self) -> &Arc<dyn FieldOps> {
        &self.ops
    }
}

impl DateTimeField for ImpreciseDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.ops.field_type()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        self.ops.get(instant)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        self.ops.set(instant, value)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.ops.add(instant, value)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.ops.difference(minuend, subtrahend)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &self.duration
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.range.as_ref()
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.ops.leap_duration_field()
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        self.ops.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        self.ops.leap_amount(instant)
    }

    fn min_value(&self) -> i32 {
        self.ops.min_value()
    }

    fn max_value(&self) -> i32 {
        self.ops.max_value()
    }

    fn min_value_at(&self, instant: i64) -> Result<i32> {
        self.ops.min_value_at(instant)
    }

    fn max_value_at(&self, instant: i64) -> Result<i32> {
        self.ops.max_value_at(instant)
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        self.ops.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.ops.round_ceiling(instant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::utils::{safe_add, safe_multiply, safe_to_int, verify_value_bounds};

    /// Ten-millisecond "decades" that pretend to be imprecise.
    #[derive(Debug)]
    struct Decades;

    impl FieldOps for Decades {
        fn field_type(&self) -> DateTimeFieldType {
            DateTimeFieldType::Year
        }

        fn average_unit_millis(&self) -> i64 {
            9
        }

        fn get(&self, instant: i64) -> Result<i32> {
            safe_to_int(instant.div_euclid(10))
        }

        fn set(&self, instant: i64, value: i32) -> Result<i64> {
            verify_value_bounds("year", value as i64, -1000, 1000)?;
            Ok(value as i64 * 10 + instant.rem_euclid(10))
        }

        fn add(&self, instant: i64, value: i64) -> Result<i64> {
            safe_add(instant, safe_multiply(value, 10)?)
        }

        fn round_floor(&self, instant: i64) -> Result<i64> {
            Ok(instant - instant.rem_euclid(10))
        }

        fn min_value(&self) -> i32 {
            -1000
        }

        fn max_value(&self) -> i32 {
            1000
        }
    }

    #[test]
    fn linked_duration_delegates_to_field() {
        let field = ImpreciseDateTimeField::new(Arc::new(Decades), None);
        let duration = field.duration_field().clone();
        assert!(!duration.is_precise());
        assert_eq!(duration.field_type(), DurationFieldType::Years);
        assert_eq!(duration.add(3, 2).unwrap(), 23);
        assert_eq!(duration.difference(95, 3).unwrap(), 9);
        assert_eq!(duration.difference(3, 95).unwrap(), -9);
        assert_eq!(field.round_ceiling(11).unwrap(), 20);
        assert_eq!(field.round_ceiling(10).unwrap(), 10);
    }

    #[test]
    fn estimate_corrects_both_ways() {
        let ops = Decades;
        for (a, b) in [(0, 0), (1000, 0), (999, 0), (1009, -1), (-55, -1000)] {
            let expected = (a - b) / 10;
            assert_eq!(ops.difference(a, b).unwrap(), expected, "{a} {b}");
        }
    }
}
