//! Concrete calendar systems.
//!
//! Each module defines a [`CalendarRules`](crate::basic::CalendarRules)
//! implementation (or, for Buddhist, an assembly over another chronology)
//! and helpers that fetch the shared instance from the global
//! [`ChronologyCache`](crate::cache::ChronologyCache).

pub mod buddhist;
pub mod fixed_month;
pub mod gregorian;
pub mod islamic;
pub mod iso;
pub mod julian;
pub mod lunisolar;
mod months;

pub use buddhist::BuddhistChronology;
pub use fixed_month::{FixedMonthKind, FixedMonthRules};
pub use gregorian::GregorianRules;
pub use islamic::{IslamicRules, LeapYearPattern};
pub use julian::JulianRules;
pub use lunisolar::{IntercalaryMonth, LunisolarRules, LunisolarTable, LunisolarYear};
