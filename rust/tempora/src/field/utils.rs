//! Checked arithmetic and bounds helpers shared by every field.

use tempora_common::{Error, Result};

use super::DateTimeField;

#[inline]
pub fn safe_add(a: i64, b: i64) -> Result<i64> {
    a.checked_add(b)
        .ok_or_else(|| Error::overflow(format!("{a} + {b}")))
}

#[inline]
pub fn safe_subtract(a: i64, b: i64) -> Result<i64> {
    a.checked_sub(b)
        .ok_or_else(|| Error::overflow(format!("{a} - {b}")))
}

#[inline]
pub fn safe_multiply(a: i64, b: i64) -> Result<i64> {
    a.checked_mul(b)
        .ok_or_else(|| Error::overflow(format!("{a} * {b}")))
}

#[inline]
pub fn safe_to_int(value: i64) -> Result<i32> {
    i32::try_from(value).map_err(|_| Error::overflow(format!("{value} as i32")))
}

/// Adds an `i64` amount to an `i32` field value, failing if the sum leaves
/// the `i32` range.
#[inline]
pub fn safe_add_int(value: i32, amount: i64) -> Result<i32> {
    safe_to_int(safe_add(value as i64, amount)?)
}

/// Fails with an illegal-value error unless `lower <= value <= upper`.
#[inline]
pub fn verify_value_bounds(field: &str, value: i64, lower: i64, upper: i64) -> Result<()> {
    if value < lower || value > upper {
        Err(Error::illegal_value(field, value, Some(lower), Some(upper)))
    } else {
        Ok(())
    }
}

/// Checks `value` against the bounds `field` reports for `instant`.
pub fn verify_field_bounds(field: &dyn DateTimeField, instant: i64, value: i32) -> Result<()> {
    verify_value_bounds(
        field.name(),
        value as i64,
        field.min_value_at(instant)? as i64,
        field.max_value_at(instant)? as i64,
    )
}

/// Wraps `value` into `[min, max]`, treating the range as cyclic.
pub fn wrapped_value(value: i64, min: i32, max: i32) -> i32 {
    let (min, max) = (min as i64, max as i64);
    if min >= max {
        return min as i32;
    }
    let span = max - min + 1;
    (min + (value - min).rem_euclid(span)) as i32
}

/// Returns `value` increased by `wrap` in `[min, max]`, the operation
/// `add_wrap_field` performs on a single value.
pub fn wrap_add(value: i32, wrap: i32, min: i32, max: i32) -> i32 {
    wrapped_value(value as i64 + wrap as i64, min, max)
}

/// Largest multiple of `unit` not after `instant`.
#[inline]
pub fn floor_to_unit(instant: i64, unit: i64) -> i64 {
    if instant >= 0 {
        instant - instant % unit
    } else {
        let shifted = instant + 1;
        shifted - shifted % unit - unit
    }
}

/// Smallest multiple of `unit` not before `instant`.
#[inline]
pub fn ceiling_to_unit(instant: i64, unit: i64) -> i64 {
    if instant > 0 {
        let shifted = instant - 1;
        shifted - shifted % unit + unit
    } else {
        instant - instant % unit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapping() {
        assert_eq!(wrapped_value(13, 1, 12), 1);
        assert_eq!(wrapped_value(0, 1, 12), 12);
        assert_eq!(wrapped_value(-1, 0, 59), 59);
        assert_eq!(wrapped_value(-61, 0, 59), 59);
        assert_eq!(wrap_add(23, 2, 0, 23), 1);
        assert_eq!(wrap_add(5, 0, 5, 5), 5);
    }

    #[test]
    fn checked_arithmetic() {
        assert_eq!(safe_add(1, 2).unwrap(), 3);
        assert!(safe_add(i64::MAX, 1).is_err());
        assert!(safe_subtract(i64::MIN, 1).is_err());
        assert!(safe_multiply(i64::MAX / 2, 3).is_err());
        assert_eq!(safe_to_int(-5).unwrap(), -5);
        assert!(safe_to_int(i64::from(i32::MAX) + 1).is_err());
        assert!(safe_add_int(i32::MAX, 1).is_err());
    }

    #[test]
    fn unit_rounding() {
        assert_eq!(floor_to_unit(25, 10), 20);
        assert_eq!(floor_to_unit(-1, 10), -10);
        assert_eq!(floor_to_unit(-10, 10), -10);
        assert_eq!(ceiling_to_unit(-1, 10), 0);
        assert_eq!(ceiling_to_unit(-11, 10), -10);
        assert_eq!(ceiling_to_unit(1, 10), 10);
        assert_eq!(ceiling_to_unit(10, 10), 10);
    }

    #[test]
    fn value_bounds() {
        assert!(verify_value_bounds("hourOfDay", 23, 0, 23).is_ok());
        let err = verify_value_bounds("hourOfDay", 24, 0, 23).unwrap_err();
        assert_eq!(
            err.to_string(),
            "value 24 for hourOfDay must be in the range [0, 23]"
        );
    }
}
