//! Locale-symbol collaborator contract.
//!
//! Text rendering of field values (month names, day names, era names) is
//! supplied by the caller. The arithmetic never consults a provider; only the
//! `*_text` operations on [`DateTimeField`](crate::field::DateTimeField) do.

use crate::field_type::DateTimeFieldType;

/// Supplies the textual form of field values for a locale.
pub trait SymbolProvider: Send + Sync {
    /// Returns the full text for `value` of `field` in `locale`.
    fn text_for(&self, field: DateTimeFieldType, value: i32, locale: &str) -> String;

    /// Returns the abbreviated text for `value` of `field` in `locale`.
    fn short_text_for(&self, field: DateTimeFieldType, value: i32, locale: &str) -> String {
        self.text_for(field, value, locale)
    }

    /// Returns the longest text this provider produces for `field` in `locale`.
    fn max_text_length(&self, field: DateTimeFieldType, locale: &str) -> usize;

    /// Parses `text` back into a value of `field`, or `None` if it is not recognized.
    fn value_for(&self, field: DateTimeFieldType, text: &str, locale: &str) -> Option<i32>;
}

/// Renders every value as its decimal number, for any locale.
#[derive(Debug, Default, Clone, Copy)]
pub struct NumericSymbols;

impl SymbolProvider for NumericSymbols {
    fn text_for(&self, _field: DateTimeFieldType, value: i32, _locale: &str) -> String {
        value.to_string()
    }

    fn max_text_length(&self, field: DateTimeFieldType, _locale: &str) -> usize {
        match field {
            DateTimeFieldType::Year | DateTimeFieldType::Weekyear => 10,
            DateTimeFieldType::YearOfEra | DateTimeFieldType::CenturyOfEra => 9,
            DateTimeFieldType::MillisOfDay => 8,
            DateTimeFieldType::SecondOfDay => 5,
            DateTimeFieldType::MinuteOfDay | DateTimeFieldType::DayOfYear => 4,
            DateTimeFieldType::MillisOfSecond | DateTimeFieldType::YearOfCentury => 3,
            DateTimeFieldType::Era
            | DateTimeFieldType::DayOfWeek
            | DateTimeFieldType::HalfdayOfDay => 1,
            _ => 2,
        }
    }

    fn value_for(&self, _field: DateTimeFieldType, text: &str, _locale: &str) -> Option<i32> {
        text.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_round_trip() {
        let s = NumericSymbols;
        assert_eq!(s.text_for(DateTimeFieldType::MonthOfYear, 7, "en"), "7");
        assert_eq!(s.value_for(DateTimeFieldType::MonthOfYear, " 7 ", "en"), Some(7));
        assert_eq!(s.value_for(DateTimeFieldType::MonthOfYear, "July", "en"), None);
        assert_eq!(s.max_text_length(DateTimeFieldType::MonthOfYear, "en"), 2);
    }
}
