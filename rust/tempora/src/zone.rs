//! Time-zone collaborator contract.
//!
//! Rule lookup (a tz database) is supplied by the caller through
//! [`TimeZone`]. This module provides the conversions every chronology
//! needs on top of `offset_at`, plus fixed-offset zones and UTC.

use std::fmt;
use std::sync::{Arc, LazyLock};

use tempora_common::{Error, Result};

use crate::calendars::iso::render_local;
use crate::MILLIS_PER_HOUR;

/// Offsets from UTC for a region, in milliseconds.
pub trait TimeZone: Send + Sync + fmt::Debug {
    /// Identifier used in cache keys and error messages. Two zones with the
    /// same id must report the same offsets.
    fn id(&self) -> &str;

    /// Offset to add to `instant` (UTC) to obtain local wall time.
    fn offset_at(&self, instant: i64) -> i32;

    /// First transition strictly after `instant`, or `instant` itself if
    /// there is none.
    fn next_transition(&self, instant: i64) -> i64 {
        instant
    }

    /// The millisecond just before the last transition preceding
    /// `instant`, or `instant` itself if there is none.
    fn previous_transition(&self, instant: i64) -> i64 {
        instant
    }

    fn is_fixed(&self) -> bool {
        false
    }

    /// Offset to subtract from a local wall-clock instant to obtain UTC.
    ///
    /// In an overlap the earlier (pre-transition) offset wins. In a gap the
    /// offset in effect before the gap is returned, which moves the local
    /// time forward past the gap.
    fn offset_from_local(&self, local: i64) -> i32 {
        let offset_local = self.offset_at(local);
        let adjusted = local.saturating_sub(offset_local as i64);
        let offset_adjusted = self.offset_at(adjusted);
        if offset_local != offset_adjusted {
            if offset_local < offset_adjusted {
                let next_local = next_or_max(self, local.saturating_sub(offset_local as i64));
                let next_adjusted = next_or_max(self, local.saturating_sub(offset_adjusted as i64));
                if next_local != next_adjusted {
                    return offset_local;
                }
            }
        } else if offset_local >= 0 {
            let prev = self.previous_transition(adjusted);
            if prev < adjusted {
                let offset_prev = self.offset_at(prev);
                let diff = offset_prev as i64 - offset_local as i64;
                if adjusted - prev <= diff {
                    return offset_prev;
                }
            }
        }
        offset_adjusted
    }
}

fn next_or_max<Z: TimeZone + ?Sized>(zone: &Z, instant: i64) -> i64 {
    let next = zone.next_transition(instant);
    if next == instant {
        i64::MAX
    } else {
        next
    }
}

/// Shifts a UTC instant into the zone's local wall time.
pub fn convert_utc_to_local(zone: &dyn TimeZone, instant: i64) -> Result<i64> {
    let offset = zone.offset_at(instant) as i64;
    instant
        .checked_add(offset)
        .ok_or_else(|| Error::overflow("UTC to local conversion"))
}

/// Converts a local wall-clock instant to UTC.
///
/// With `strict`, a local time inside a transition gap fails with an
/// illegal-instant error. Otherwise the gap resolves the way
/// [`TimeZone::offset_from_local`] does for negative offsets, and to the
/// later offset for positive ones.
pub fn convert_local_to_utc(zone: &dyn TimeZone, local: i64, strict: bool) -> Result<i64> {
    let offset_local = zone.offset_at(local);
    let mut offset = zone.offset_at(local.saturating_sub(offset_local as i64));
    if offset_local != offset && (strict || offset_local < 0) {
        let next_local = next_or_max(zone, local.saturating_sub(offset_local as i64));
        let next_adjusted = next_or_max(zone, local.saturating_sub(offset as i64));
        if next_local != next_adjusted {
            if strict {
                return Err(Error::illegal_instant(zone.id(), render_local(local)));
            }
            offset = offset_local;
        }
    }
    local
        .checked_sub(offset as i64)
        .ok_or_else(|| Error::overflow("local to UTC conversion"))
}

/// Converts a local wall-clock instant to UTC, preferring the offset in
/// effect at `original` (a UTC instant) when it still applies. Used after
/// arithmetic on local time so that an overlap keeps the side it started on.
pub fn convert_local_to_utc_near(
    zone: &dyn TimeZone,
    local: i64,
    strict: bool,
    original: i64,
) -> Result<i64> {
    let offset_original = zone.offset_at(original);
    if let Some(utc) = local.checked_sub(offset_original as i64) {
        if zone.offset_at(utc) == offset_original {
            return Ok(utc);
        }
    }
    convert_local_to_utc(zone, local, strict)
}

/// Returns `true` when `local` names a wall-clock time skipped by a
/// transition.
pub fn is_local_gap(zone: &dyn TimeZone, local: i64) -> bool {
    if zone.is_fixed() {
        return false;
    }
    convert_local_to_utc(zone, local, true).is_err()
}

/// A zone with one constant offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedOffsetZone {
    id: String,
    offset: i32,
}

impl FixedOffsetZone {
    /// Builds a zone named after its offset, e.g. `+05:30`. A zero offset is
    /// named `UTC`.
    pub fn new(offset_millis: i32) -> Result<FixedOffsetZone> {
        if (offset_millis as i64).abs() >= 24 * MILLIS_PER_HOUR {
            return Err(Error::invalid_arg(
                "offset_millis",
                format!("{offset_millis} is not within one day"),
            ));
        }
        Ok(FixedOffsetZone {
            id: offset_id(offset_millis),
            offset: offset_millis,
        })
    }

    pub fn with_id(id: impl Into<String>, offset_millis: i32) -> FixedOffsetZone {
        FixedOffsetZone {
            id: id.into(),
            offset: offset_millis,
        }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }
}

fn offset_id(offset_millis: i32) -> String {
    if offset_millis == 0 {
        return "UTC".to_string();
    }
    let sign = if offset_millis < 0 { '-' } else { '+' };
    let total = (offset_millis as i64).abs();
    let hours = total / MILLIS_PER_HOUR;
    let minutes = total % MILLIS_PER_HOUR / 60_000;
    let seconds = total % 60_000 / 1000;
    let millis = total % 1000;
    let mut id = format!("{sign}{hours:02}:{minutes:02}");
    if seconds != 0 || millis != 0 {
        id.push_str(&format!(":{seconds:02}"));
        if millis != 0 {
            id.push_str(&format!(".{millis:03}"));
        }
    }
    id
}

impl TimeZone for FixedOffsetZone {
    fn id(&self) -> &str {
        &self.id
    }

    fn offset_at(&self, _instant: i64) -> i32 {
        self.offset
    }

    fn is_fixed(&self) -> bool {
        true
    }

    fn offset_from_local(&self, _local: i64) -> i32 {
        self.offset
    }
}

static UTC: LazyLock<Arc<dyn TimeZone>> =
    LazyLock::new(|| Arc::new(FixedOffsetZone::with_id("UTC", 0)) as Arc<dyn TimeZone>);

/// The shared UTC zone.
pub fn utc() -> Arc<dyn TimeZone> {
    UTC.clone()
}

/// Returns `true` when `zone` is UTC: fixed with a zero offset.
pub fn is_utc(zone: &dyn TimeZone) -> bool {
    zone.is_fixed() && zone.offset_at(0) == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Offset +1h until 1000h, +2h after: a one-hour gap at local 1001h.
    #[derive(Debug)]
    struct SpringForward;

    const TRANSITION: i64 = 1000 * MILLIS_PER_HOUR;

    impl TimeZone for SpringForward {
        fn id(&self) -> &str {
            "Test/Spring"
        }

        fn offset_at(&self, instant: i64) -> i32 {
            if instant < TRANSITION {
                MILLIS_PER_HOUR as i32
            } else {
                2 * MILLIS_PER_HOUR as i32
            }
        }

        fn next_transition(&self, instant: i64) -> i64 {
            if instant < TRANSITION {
                TRANSITION
            } else {
                instant
            }
        }

        fn previous_transition(&self, instant: i64) -> i64 {
            if instant > TRANSITION {
                TRANSITION - 1
            } else {
                instant
            }
        }
    }

    #[test]
    fn fixed_offset_ids() {
        assert_eq!(FixedOffsetZone::new(0).unwrap().id(), "UTC");
        assert_eq!(FixedOffsetZone::new(19_800_000).unwrap().id(), "+05:30");
        assert_eq!(FixedOffsetZone::new(-3_600_000).unwrap().id(), "-01:00");
        assert!(FixedOffsetZone::new(86_400_000).is_err());
        assert!(is_utc(utc().as_ref()));
    }

    #[test]
    fn gap_is_rejected_when_strict() {
        let zone = SpringForward;
        let in_gap = TRANSITION + MILLIS_PER_HOUR + 30 * 60_000;
        assert!(is_local_gap(&zone, in_gap));
        let err = convert_local_to_utc(&zone, in_gap, true).unwrap_err();
        assert!(err.to_string().contains("Test/Spring"), "{err}");
        let lenient = convert_local_to_utc(&zone, in_gap, false).unwrap();
        // Resolved with the pre-gap offset, landing after the gap.
        assert_eq!(lenient, in_gap - MILLIS_PER_HOUR);
        assert_eq!(convert_utc_to_local(&zone, lenient).unwrap(), in_gap + MILLIS_PER_HOUR);
    }

    #[test]
    fn round_trip_outside_gap() {
        let zone = SpringForward;
        for utc in [0, TRANSITION - 1, TRANSITION, TRANSITION + 5 * MILLIS_PER_HOUR] {
            let local = convert_utc_to_local(&zone, utc).unwrap();
            assert!(!is_local_gap(&zone, local));
            assert_eq!(convert_local_to_utc(&zone, local, true).unwrap(), utc);
            assert_eq!(local - zone.offset_from_local(local) as i64, utc);
        }
    }
}
