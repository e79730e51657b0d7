//! A daylight-saving zone driven by an explicit transition list.

use std::sync::Arc;

use tempora::calendars::iso;
use tempora::{MILLIS_PER_DAY, MILLIS_PER_HOUR, TimeZone};
use tempora_common::{Error, Result};

/// A zone whose offset changes at listed instants.
///
/// Before the first transition the `initial` offset applies; each
/// transition `(instant, offset)` switches to `offset` from `instant` on.
#[derive(Debug, Clone)]
pub struct DstZone {
    id: String,
    initial: i32,
    transitions: Vec<(i64, i32)>,
}

impl DstZone {
    pub fn new(id: impl Into<String>, initial: i32, mut transitions: Vec<(i64, i32)>) -> DstZone {
        transitions.sort_by_key(|&(at, _)| at);
        transitions.dedup_by_key(|&mut (at, _)| at);
        DstZone {
            id: id.into(),
            initial,
            transitions,
        }
    }

    /// Central-European style rules for `first_year..=last_year`: standard
    /// offset +1h, summer offset +2h from the last Sunday of March to the
    /// last Sunday of October, both switching at 01:00 UTC.
    pub fn central_european(first_year: i32, last_year: i32) -> Result<DstZone> {
        let iso = iso::instance_utc()?;
        let last_sunday = |year: i32, month: i32, day: i32| -> Result<i64> {
            let end = iso.date_time_millis(year, month, day, 0)?;
            let day_of_week = iso.fields().day_of_week.get(end)? as i64;
            Ok(end - (day_of_week % 7) * MILLIS_PER_DAY + MILLIS_PER_HOUR)
        };
        let standard = MILLIS_PER_HOUR as i32;
        let summer = 2 * MILLIS_PER_HOUR as i32;
        let mut transitions = Vec::new();
        for year in first_year..=last_year {
            transitions.push((last_sunday(year, 3, 31)?, summer));
            transitions.push((last_sunday(year, 10, 31)?, standard));
        }
        Ok(DstZone::new("Test/Central", standard, transitions))
    }

    /// Builds a zone from a list and checks that consecutive offsets differ.
    pub fn checked(
        id: impl Into<String>,
        initial: i32,
        transitions: Vec<(i64, i32)>,
    ) -> Result<DstZone> {
        let zone = DstZone::new(id, initial, transitions);
        let mut previous = zone.initial;
        for &(at, offset) in &zone.transitions {
            if offset == previous {
                return Err(Error::invalid_arg(
                    "transitions",
                    format!("transition at {at} keeps offset {offset}"),
                ));
            }
            previous = offset;
        }
        Ok(zone)
    }

    pub fn shared(self) -> Arc<dyn TimeZone> {
        Arc::new(self)
    }

    pub fn transitions(&self) -> &[(i64, i32)] {
        &self.transitions
    }

    /// Index of the first transition strictly after `instant`.
    fn upcoming(&self, instant: i64) -> usize {
        self.transitions.partition_point(|&(at, _)| at <= instant)
    }
}

impl TimeZone for DstZone {
    fn id(&self) -> &str {
        &self.id
    }

    fn offset_at(&self, instant: i64) -> i32 {
        match self.upcoming(instant) {
            0 => self.initial,
            n => self.transitions[n - 1].1,
        }
    }

    fn next_transition(&self, instant: i64) -> i64 {
        self.transitions
            .get(self.upcoming(instant))
            .map_or(instant, |&(at, _)| at)
    }

    fn previous_transition(&self, instant: i64) -> i64 {
        let before = self.transitions.partition_point(|&(at, _)| at < instant);
        match before {
            0 => instant,
            n => self.transitions[n - 1].0 - 1,
        }
    }
}
