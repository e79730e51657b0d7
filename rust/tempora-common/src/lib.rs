//! Core definitions shared by all tempora-* crates: the error type and the
//! result alias used across the calendar arithmetic.

pub mod error;
pub mod result;

pub use error::{Bound, BoundsCheck, Error, ErrorKind};
pub use result::Result;
