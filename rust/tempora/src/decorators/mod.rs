//! Chronologies that wrap another chronology and adjust its fields:
//! historical cutover, time zone, instant limits, strict and lenient `set`.

pub mod cutover;
pub mod lenient;
pub mod limit;
pub mod strict;
pub mod zoned;

pub use cutover::{CutoverField, DEFAULT_CUTOVER, GjChronology};
pub use lenient::{LenientChronology, LenientDateTimeField};
pub use limit::{LimitChronology, LimitDateTimeField, LimitDurationField};
pub use strict::{StrictChronology, StrictDateTimeField};
pub use zoned::{ZonedChronology, ZonedDateTimeField, ZonedDurationField};

/// Forwards every [`DateTimeField`](crate::field::DateTimeField) method
/// except `set` and `is_lenient` to `self.$inner`.
macro_rules! forward_to_inner {
    ($inner:ident) => {
        fn field_type(&self) -> $crate::field_type::DateTimeFieldType {
            self.$inner.field_type()
        }

        fn is_supported(&self) -> bool {
            self.$inner.is_supported()
        }

        fn get(&self, instant: i64) -> tempora_common::Result<i32> {
            self.$inner.get(instant)
        }

        fn add(&self, instant: i64, value: i64) -> tempora_common::Result<i64> {
            self.$inner.add(instant, value)
        }

        fn difference(&self, minuend: i64, subtrahend: i64) -> tempora_common::Result<i64> {
            self.$inner.difference(minuend, subtrahend)
        }

        fn duration_field(&self) -> &std::sync::Arc<dyn $crate::field::DurationField> {
            self.$inner.duration_field()
        }

        fn range_duration_field(
            &self,
        ) -> Option<&std::sync::Arc<dyn $crate::field::DurationField>> {
            self.$inner.range_duration_field()
        }

        fn leap_duration_field(&self) -> Option<&std::sync::Arc<dyn $crate::field::DurationField>> {
            self.$inner.leap_duration_field()
        }

        fn is_leap(&self, instant: i64) -> tempora_common::Result<bool> {
            self.$inner.is_leap(instant)
        }

        fn leap_amount(&self, instant: i64) -> tempora_common::Result<i32> {
            self.$inner.leap_amount(instant)
        }

        fn min_value(&self) -> i32 {
            self.$inner.min_value()
        }

        fn max_value(&self) -> i32 {
            self.$inner.max_value()
        }

        fn min_value_at(&self, instant: i64) -> tempora_common::Result<i32> {
            self.$inner.min_value_at(instant)
        }

        fn max_value_at(&self, instant: i64) -> tempora_common::Result<i32> {
            self.$inner.max_value_at(instant)
        }

        fn round_floor(&self, instant: i64) -> tempora_common::Result<i64> {
            self.$inner.round_floor(instant)
        }

        fn round_ceiling(&self, instant: i64) -> tempora_common::Result<i64> {
            self.$inner.round_ceiling(instant)
        }

        fn remainder(&self, instant: i64) -> tempora_common::Result<i64> {
            self.$inner.remainder(instant)
        }

        fn get_as_text(
            &self,
            instant: i64,
            symbols: &dyn $crate::text::SymbolProvider,
            locale: &str,
        ) -> tempora_common::Result<String> {
            self.$inner.get_as_text(instant, symbols, locale)
        }

        fn get_as_short_text(
            &self,
            instant: i64,
            symbols: &dyn $crate::text::SymbolProvider,
            locale: &str,
        ) -> tempora_common::Result<String> {
            self.$inner.get_as_short_text(instant, symbols, locale)
        }

        fn max_text_length(
            &self,
            symbols: &dyn $crate::text::SymbolProvider,
            locale: &str,
        ) -> usize {
            self.$inner.max_text_length(symbols, locale)
        }
    };
}

pub(crate) use forward_to_inner;

/// Implements the construct-from-fields and navigation methods of
/// [`Chronology`](crate::chronology::Chronology) for a decorator holding an
/// `assembly`, a `key` and a `zone`.
macro_rules! assembled_chronology {
    () => {
        fn key(&self) -> &$crate::cache::ChronologyKey {
            &self.key
        }

        fn zone(&self) -> &std::sync::Arc<dyn $crate::zone::TimeZone> {
            self.base.zone()
        }

        fn fields(&self) -> &$crate::assembly::Fields {
            self.assembly.fields()
        }

        fn base(&self) -> Option<&std::sync::Arc<dyn $crate::chronology::Chronology>> {
            Some(&self.base)
        }

        fn date_time_millis(
            &self,
            year: i32,
            month: i32,
            day: i32,
            millis_of_day: i32,
        ) -> tempora_common::Result<i64> {
            self.assembly
                .date_time_millis(year, month, day, millis_of_day)
        }

        fn date_time_millis_hms(
            &self,
            year: i32,
            month: i32,
            day: i32,
            hour: i32,
            minute: i32,
            second: i32,
            millis: i32,
        ) -> tempora_common::Result<i64> {
            self.assembly
                .date_time_millis_hms(year, month, day, hour, minute, second, millis)
        }

        fn date_time_millis_at(
            &self,
            instant: i64,
            hour: i32,
            minute: i32,
            second: i32,
            millis: i32,
        ) -> tempora_common::Result<i64> {
            self.assembly
                .date_time_millis_at(instant, hour, minute, second, millis)
        }
    };
}

pub(crate) use assembled_chronology;
