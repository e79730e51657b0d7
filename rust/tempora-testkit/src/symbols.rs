//! English field names.

use tempora::text::NumericSymbols;
use tempora::{DateTimeFieldType, SymbolProvider};

static MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

static DAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

static ERAS: [&str; 2] = ["BC", "AD"];

static HALFDAYS: [&str; 2] = ["AM", "PM"];

/// English names for months (1-12), days of week (1 = Monday), eras
/// (0 = BC) and halfdays; every other field renders as a number.
///
/// The locale argument is ignored. Months 13 and beyond, as found in
/// calendars with an epagomenal or intercalary month, render as numbers.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishSymbols;

impl EnglishSymbols {
    fn names(field: DateTimeFieldType) -> Option<(&'static [&'static str], i32)> {
        match field {
            DateTimeFieldType::MonthOfYear => Some((&MONTHS[..], 1)),
            DateTimeFieldType::DayOfWeek => Some((&DAYS[..], 1)),
            DateTimeFieldType::Era => Some((&ERAS[..], 0)),
            DateTimeFieldType::HalfdayOfDay => Some((&HALFDAYS[..], 0)),
            _ => None,
        }
    }

    fn name(field: DateTimeFieldType, value: i32) -> Option<&'static str> {
        let (names, first) = Self::names(field)?;
        let index = usize::try_from(value.checked_sub(first)?).ok()?;
        names.get(index).copied()
    }
}

impl SymbolProvider for EnglishSymbols {
    fn text_for(&self, field: DateTimeFieldType, value: i32, locale: &str) -> String {
        match Self::name(field, value) {
            Some(name) => name.to_string(),
            None => NumericSymbols.text_for(field, value, locale),
        }
    }

    fn short_text_for(&self, field: DateTimeFieldType, value: i32, locale: &str) -> String {
        match Self::name(field, value) {
            Some(name) if name.len() > 3 => name[..3].to_string(),
            Some(name) => name.to_string(),
            None => NumericSymbols.text_for(field, value, locale),
        }
    }

    fn max_text_length(&self, field: DateTimeFieldType, locale: &str) -> usize {
        match Self::names(field) {
            Some((names, _)) => names.iter().map(|name| name.len()).max().unwrap_or(0),
            None => NumericSymbols.max_text_length(field, locale),
        }
    }

    fn value_for(&self, field: DateTimeFieldType, text: &str, locale: &str) -> Option<i32> {
        let text = text.trim();
        let Some((names, first)) = Self::names(field) else {
            return NumericSymbols.value_for(field, text, locale);
        };
        names
            .iter()
            .position(|name| {
                let prefix = text.len() >= 3 && name.len() >= text.len();
                name.eq_ignore_ascii_case(text)
                    || (prefix && name[..text.len()].eq_ignore_ascii_case(text))
            })
            .map(|index| index as i32 + first)
            .or_else(|| NumericSymbols.value_for(field, text, locale))
    }
}
