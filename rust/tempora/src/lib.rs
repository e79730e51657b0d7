//! Calendar-system arithmetic over millisecond instants.
//!
//! An instant is an `i64` count of milliseconds since 1970-01-01T00:00:00Z.
//! A [`Chronology`] bundles one field per calendar component (year, month of
//! year, hour of day, ...) and per duration unit, each converting between
//! instants and values under one calendar system's rules.
//!
//! Calendar systems are built from a small rule contract
//! ([`basic::CalendarRules`]) by a shared arithmetic core, and are composed
//! with decorators for a historical cutover, a time zone, instant limits and
//! strict or lenient `set`. Instances are cached per identity in a
//! [`ChronologyCache`].
//!
//! ```
//! use tempora::calendars::iso;
//!
//! let iso = iso::instance_utc().unwrap();
//! let t = iso.date_time_millis(2004, 1, 1, 0).unwrap();
//! assert_eq!(iso.fields().week_of_weekyear.get(t).unwrap(), 1);
//! ```

pub mod assembly;
pub mod basic;
pub mod cache;
pub mod calendars;
pub mod chronology;
pub mod config;
pub mod decorators;
pub mod field;
pub mod field_type;
pub mod text;
pub mod zone;

pub use assembly::Fields;
pub use cache::{CalendarSystem, ChronologyCache, ChronologyKey};
pub use chronology::Chronology;
pub use config::ChronologyConfig;
pub use field::{DateTimeField, DurationField};
pub use field_type::{DateTimeFieldType, DurationFieldType};
pub use text::SymbolProvider;
pub use zone::{FixedOffsetZone, TimeZone};

pub const MILLIS_PER_SECOND: i64 = 1000;
pub const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
pub const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
pub const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;
pub const MILLIS_PER_WEEK: i64 = 7 * MILLIS_PER_DAY;
