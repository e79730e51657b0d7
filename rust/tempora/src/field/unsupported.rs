use std::sync::Arc;

use tempora_common::{Error, Result};

use super::{DateTimeField, DurationField};
use crate::field_type::{DateTimeFieldType, DurationFieldType};

/// A duration the chronology does not define. Every operation fails.
#[derive(Debug)]
pub struct UnsupportedDurationField {
    field_type: DurationFieldType,
}

impl UnsupportedDurationField {
    pub fn shared(field_type: DurationFieldType) -> Arc<dyn DurationField> {
        Arc::new(UnsupportedDurationField { field_type })
    }
}

impl DurationField for UnsupportedDurationField {
    fn field_type(&self) -> DurationFieldType {
        self.field_type
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn is_precise(&self) -> bool {
        true
    }

    fn unit_millis(&self) -> i64 {
        0
    }

    fn add(&self, _instant: i64, _value: i64) -> Result<i64> {
        Err(Error::unsupported(self.name()))
    }

    fn difference(&self, _minuend: i64, _subtrahend: i64) -> Result<i64> {
        Err(Error::unsupported(self.name()))
    }

    fn millis_at(&self, _value: i64, _instant: i64) -> Result<i64> {
        Err(Error::unsupported(self.name()))
    }
}

/// A calendar component the chronology does not define. Every operation
/// except the bounds accessors fails.
#[derive(Debug)]
pub struct UnsupportedDateTimeField {
    field_type: DateTimeFieldType,
    duration: Arc<dyn DurationField>,
}

impl UnsupportedDateTimeField {
    pub fn shared(
        field_type: DateTimeFieldType,
        duration: Arc<dyn DurationField>,
    ) -> Arc<dyn DateTimeField> {
        Arc::new(UnsupportedDateTimeField {
            field_type,
            duration,
        })
    }

    fn fail<T>(&self) -> Result<T> {
        Err(Error::unsupported(self.name()))
    }
}

impl DateTimeField for UnsupportedDateTimeField {
    fn field_type(&self) -> DateTimeFieldType {
        self.field_type
    }

    fn is_supported(&self) -> bool {
        false
    }

    fn get(&self, _instant: i64) -> Result<i32> {
        self.fail()
    }

    fn set(&self, _instant: i64, _value: i32) -> Result<i64> {
        self.fail()
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.duration.add(instant, value)
    }

    fn add_wrap_field(&self, _instant: i64, _value: i32) -> Result<i64> {
        self.fail()
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.duration.difference(minuend, subtrahend)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &self.duration
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        None
    }

    fn is_leap(&self, _instant: i64) -> Result<bool> {
        self.fail()
    }

    fn leap_amount(&self, _instant: i64) -> Result<i32> {
        self.fail()
    }

    fn min_value(&self) -> i32 {
        0
    }

    fn max_value(&self) -> i32 {
        0
    }

    fn min_value_at(&self, _instant: i64) -> Result<i32> {
        self.fail()
    }

    fn max_value_at(&self, _instant: i64) -> Result<i32> {
        self.fail()
    }

    fn round_floor(&self, _instant: i64) -> Result<i64> {
        self.fail()
    }

    fn round_ceiling(&self, _instant: i64) -> Result<i64> {
        self.fail()
    }

    fn remainder(&self, _instant: i64) -> Result<i64> {
        self.fail()
    }

    fn set_text(
        &self,
        _instant: i64,
        _text: &str,
        _symbols: &dyn crate::text::SymbolProvider,
        _locale: &str,
    ) -> Result<i64> {
        self.fail()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempora_common::ErrorKind;

    #[test]
    fn every_operation_fails() {
        let duration = UnsupportedDurationField::shared(DurationFieldType::Eras);
        let field = UnsupportedDateTimeField::shared(DateTimeFieldType::Era, duration);
        assert!(!field.is_supported());
        assert!(!field.duration_field().is_supported());
        let err = field.get(0).unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UnsupportedField {
                name: "era".to_string()
            }
        );
        assert!(field.set(0, 1).is_err());
        assert!(field.round_floor(0).is_err());
        assert_eq!(
            field.add(0, 1).unwrap_err().to_string(),
            "eras field is unsupported"
        );
        assert_eq!(field.min_value(), 0);
    }
}
