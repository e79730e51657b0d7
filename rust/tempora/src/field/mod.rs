//! Field primitives: duration fields (units of elapsed time) and date-time
//! fields (calendar components), plus the generic adapters that build one
//! field out of another.
//!
//! Every operation takes and returns instants as `i64` milliseconds since
//! 1970-01-01T00:00:00Z. Fields never mutate; `set` and `add` return a new
//! instant.

use std::cmp::Ordering;
use std::fmt;
use std::sync::Arc;

use tempora_common::{Error, Result};

use crate::field_type::{DateTimeFieldType, DurationFieldType};
use crate::text::SymbolProvider;

mod delegated;
mod divided;
mod duration;
mod imprecise;
mod offset;
mod precise;
mod remainder;
mod skip;
mod unsupported;
pub mod utils;
mod zero_is_max;

pub use delegated::DelegatedDateTimeField;
pub use divided::DividedDateTimeField;
pub use duration::{MillisDurationField, PreciseDurationField, ScaledDurationField};
pub use imprecise::{FieldOps, ImpreciseDateTimeField, LinkedDurationField, walk_difference};
pub use offset::OffsetDateTimeField;
pub use precise::PreciseDateTimeField;
pub use remainder::RemainderDateTimeField;
pub use skip::{SkipDateTimeField, SkipUndoDateTimeField};
pub use unsupported::{UnsupportedDateTimeField, UnsupportedDurationField};
pub use zero_is_max::ZeroIsMaxDateTimeField;

/// A unit of elapsed time that can be added to instants and measured
/// between them.
///
/// A *precise* field has a constant length in milliseconds. An *imprecise*
/// field (months, years, ...) has a length that depends on the instant it is
/// applied to; it delegates to the date-time field that owns it and its
/// [`unit_millis`](Self::unit_millis) is only an average.
pub trait DurationField: Send + Sync + fmt::Debug {
    fn field_type(&self) -> DurationFieldType;

    fn name(&self) -> &'static str {
        self.field_type().name()
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn is_precise(&self) -> bool;

    /// Exact unit length when precise, average length otherwise. Never
    /// multiply by this value unless [`is_precise`](Self::is_precise) holds.
    fn unit_millis(&self) -> i64;

    fn add(&self, instant: i64, value: i64) -> Result<i64>;

    /// Returns the whole number of units between `subtrahend` and `minuend`,
    /// truncated toward zero.
    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64>;

    /// Returns the length in milliseconds of `value` units applied at `instant`.
    fn millis_at(&self, value: i64, instant: i64) -> Result<i64> {
        let end = self.add(instant, value)?;
        utils::safe_subtract(end, instant)
    }
}

/// A single calendar component bound to one chronology.
///
/// Implementations provide the value accessors; rounding, wrapping and
/// text operations have defaults built on top of them.
pub trait DateTimeField: Send + Sync + fmt::Debug {
    fn field_type(&self) -> DateTimeFieldType;

    fn name(&self) -> &'static str {
        self.field_type().name()
    }

    fn is_supported(&self) -> bool {
        true
    }

    fn is_lenient(&self) -> bool {
        false
    }

    fn get(&self, instant: i64) -> Result<i32>;

    /// Returns an instant whose value of this field is exactly `value`,
    /// keeping the other fields as close to `instant` as the rules allow.
    fn set(&self, instant: i64, value: i32) -> Result<i64>;

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.duration_field().add(instant, value)
    }

    /// Adds `value` to this field only, wrapping within its bounds and never
    /// carrying into larger fields.
    fn add_wrap_field(&self, instant: i64, value: i32) -> Result<i64> {
        let current = self.get(instant)?;
        let wrapped = utils::wrapped_value(
            current as i64 + value as i64,
            self.min_value_at(instant)?,
            self.max_value_at(instant)?,
        );
        self.set(instant, wrapped)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.duration_field().difference(minuend, subtrahend)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField>;

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>>;

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        None
    }

    fn is_leap(&self, _instant: i64) -> Result<bool> {
        Ok(false)
    }

    fn leap_amount(&self, _instant: i64) -> Result<i32> {
        Ok(0)
    }

    fn min_value(&self) -> i32;

    fn max_value(&self) -> i32;

    fn min_value_at(&self, _instant: i64) -> Result<i32> {
        Ok(self.min_value())
    }

    fn max_value_at(&self, _instant: i64) -> Result<i32> {
        Ok(self.max_value())
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

    fn round_half_floor(&self, instant: i64) -> Result<i64> {
        let floor = self.round_floor(instant)?;
        let ceiling = self.round_ceiling(instant)?;
        if half_distances(instant, floor, ceiling).is_le() {
            Ok(floor)
        } else {
            Ok(ceiling)
        }
    }

    fn round_half_ceiling(&self, instant: i64) -> Result<i64> {
        let floor = self.round_floor(instant)?;
        let ceiling = self.round_ceiling(instant)?;
        if half_distances(instant, floor, ceiling).is_ge() {
            Ok(ceiling)
        } else {
            Ok(floor)
        }
    }

    fn round_half_even(&self, instant: i64) -> Result<i64> {
        let floor = self.round_floor(instant)?;
        let ceiling = self.round_ceiling(instant)?;
        match half_distances(instant, floor, ceiling) {
            Ordering::Less => Ok(floor),
            Ordering::Greater => Ok(ceiling),
            Ordering::Equal if self.get(ceiling)? & 1 == 0 => Ok(ceiling),
            Ordering::Equal => Ok(floor),
        }
    }

    fn remainder(&self, instant: i64) -> Result<i64> {
        utils::safe_subtract(instant, self.round_floor(instant)?)
    }

    fn get_as_text(
        &self,
        instant: i64,
        symbols: &dyn SymbolProvider,
        locale: &str,
    ) -> Result<String> {
        Ok(symbols.text_for(self.field_type(), self.get(instant)?, locale))
    }

    fn get_as_short_text(
        &self,
        instant: i64,
        symbols: &dyn SymbolProvider,
        locale: &str,
    ) -> Result<String> {
        Ok(symbols.short_text_for(self.field_type(), self.get(instant)?, locale))
    }

    fn set_text(
        &self,
        instant: i64,
        text: &str,
        symbols: &dyn SymbolProvider,
        locale: &str,
    ) -> Result<i64> {
        let value = symbols
            .value_for(self.field_type(), text, locale)
            .ok_or_else(|| Error::illegal_text(self.name(), text))?;
        self.set(instant, value)
    }

    fn max_text_length(&self, symbols: &dyn SymbolProvider, locale: &str) -> usize {
        symbols.max_text_length(self.field_type(), locale)
    }
}

/// Returns `true` when both handles point at the same field instance.
pub fn same_duration_field(a: &Arc<dyn DurationField>, b: &Arc<dyn DurationField>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Returns `true` when both handles point at the same field instance.
pub fn same_date_time_field(a: &Arc<dyn DateTimeField>, b: &Arc<dyn DateTimeField>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Compares the distance from `floor` to `instant` with the distance from
/// `instant` to `ceiling`. Unbounded rounding (eras) returns the ends of the
/// timeline, so the distances can exceed `i64`.
fn half_distances(instant: i64, floor: i64, ceiling: i64) -> Ordering {
    let from_floor = instant as i128 - floor as i128;
    let to_ceiling = ceiling as i128 - instant as i128;
    from_floor.cmp(&to_ceiling)
}
