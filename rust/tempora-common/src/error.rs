use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(transparent)]
pub struct Error(Box<ErrorKind>);

/// Identifies which side of a bounded range was violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Lower,
    Upper,
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Lower => f.write_str("lower"),
            Bound::Upper => f.write_str("upper"),
        }
    }
}

/// Identifies whether a bounds check was applied to the instant passed in,
/// or to the instant produced by the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundsCheck {
    Input,
    Result,
}

impl std::fmt::Display for BoundsCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundsCheck::Input => f.write_str("input"),
            BoundsCheck::Result => f.write_str("resulting"),
        }
    }
}

impl Error {
    pub fn kind(&self) -> &ErrorKind {
        self.0.as_ref()
    }

    pub fn into_kind(self) -> ErrorKind {
        *self.0
    }

    pub fn illegal_value(
        field: impl Into<String>,
        value: i64,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Error {
        Error(
            ErrorKind::IllegalFieldValue {
                field: field.into(),
                value,
                lower,
                upper,
            }
            .into(),
        )
    }

    pub fn illegal_text(field: impl Into<String>, text: impl Into<String>) -> Error {
        Error(
            ErrorKind::IllegalFieldText {
                field: field.into(),
                text: text.into(),
            }
            .into(),
        )
    }

    pub fn nonexistent_date(
        chronology: impl Into<String>,
        year: i32,
        month: i32,
        day: i32,
    ) -> Error {
        Error(
            ErrorKind::NonexistentDate {
                chronology: chronology.into(),
                year,
                month,
                day,
            }
            .into(),
        )
    }

    pub fn illegal_instant(zone: impl Into<String>, local: impl Into<String>) -> Error {
        Error(
            ErrorKind::IllegalInstant {
                zone: zone.into(),
                local: local.into(),
            }
            .into(),
        )
    }

    pub fn year_out_of_range(
        chronology: impl Into<String>,
        year: i64,
        min: i32,
        max: i32,
    ) -> Error {
        Error(
            ErrorKind::YearOutOfRange {
                chronology: chronology.into(),
                year,
                min,
                max,
            }
            .into(),
        )
    }

    pub fn bounds(
        bound: Bound,
        check: BoundsCheck,
        field: impl Into<String>,
        instant: i64,
        limit: i64,
    ) -> Error {
        Error(
            ErrorKind::BoundsViolation {
                bound,
                check,
                field: field.into(),
                instant,
                limit,
            }
            .into(),
        )
    }

    pub fn unsupported(name: impl Into<String>) -> Error {
        Error(ErrorKind::UnsupportedField { name: name.into() }.into())
    }

    pub fn overflow(operation: impl Into<String>) -> Error {
        Error(
            ErrorKind::ArithmeticOverflow {
                operation: operation.into(),
            }
            .into(),
        )
    }

    pub fn invalid_arg(name: impl Into<String>, message: impl Into<String>) -> Error {
        Error(
            ErrorKind::InvalidArgument {
                name: name.into(),
                message: message.into(),
            }
            .into(),
        )
    }

    /// Returns `true` for the errors raised when a field value, text or date
    /// is rejected by the calendar rules in effect.
    pub fn is_illegal_value(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::IllegalFieldValue { .. }
                | ErrorKind::IllegalFieldText { .. }
                | ErrorKind::NonexistentDate { .. }
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("value {value} for {field} must be in the range [{}, {}]",
        lower.map(|v| v.to_string()).unwrap_or_else(|| "?".into()),
        upper.map(|v| v.to_string()).unwrap_or_else(|| "?".into()))]
    IllegalFieldValue {
        field: String,
        value: i64,
        lower: Option<i64>,
        upper: Option<i64>,
    },

    #[error("value '{text}' for {field} is not supported")]
    IllegalFieldText { field: String, text: String },

    #[error("date {year:04}-{month:02}-{day:02} does not exist in {chronology}")]
    NonexistentDate {
        chronology: String,
        year: i32,
        month: i32,
        day: i32,
    },

    #[error("illegal instant due to time zone offset transition: {local} ({zone})")]
    IllegalInstant { zone: String, local: String },

    #[error("year {year} is outside the supported range [{min}, {max}] of {chronology}")]
    YearOutOfRange {
        chronology: String,
        year: i64,
        min: i32,
        max: i32,
    },

    #[error("the {check} instant {instant} of {field} is outside the {bound} limit {limit}")]
    BoundsViolation {
        bound: Bound,
        check: BoundsCheck,
        field: String,
        instant: i64,
        limit: i64,
    },

    #[error("{name} field is unsupported")]
    UnsupportedField { name: String },

    #[error("arithmetic overflow in {operation}")]
    ArithmeticOverflow { operation: String },

    #[error("invalid argument {name}: {message}")]
    InvalidArgument { name: String, message: String },
}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error(kind.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn illegal_value_message() {
        let err = Error::illegal_value("dayOfMonth", 31, Some(1), Some(28));
        assert_eq!(
            err.to_string(),
            "value 31 for dayOfMonth must be in the range [1, 28]"
        );
        assert!(err.is_illegal_value());
    }

    #[test]
    fn illegal_value_without_bounds() {
        let err = Error::illegal_value("year", 0, None, None);
        assert_eq!(err.to_string(), "value 0 for year must be in the range [?, ?]");
    }

    #[test]
    fn bounds_message_names_side_and_check() {
        let err = Error::bounds(Bound::Lower, BoundsCheck::Result, "year", -5, 0);
        assert_eq!(
            err.to_string(),
            "the resulting instant -5 of year is outside the lower limit 0"
        );
        assert!(!err.is_illegal_value());
    }

    #[test]
    fn into_kind() {
        let err = Error::unsupported("eras");
        assert_eq!(
            err.into_kind(),
            ErrorKind::UnsupportedField {
                name: "eras".to_string()
            }
        );
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync + std::error::Error>() {}
        assert_impl::<Error>();
    }
}
