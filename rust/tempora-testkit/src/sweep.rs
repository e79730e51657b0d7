//! Seeded sweeps over instants and calendar dates.
//!
//! Every helper takes an explicit seed so failures reproduce.

use std::ops::RangeInclusive;

use tempora::Chronology;
use tempora_common::Result;

/// Seed used by the crate's property tests unless a test needs its own.
pub const DEFAULT_SEED: u64 = 0x7e3a_2004_1582_1015;

/// `count` instants drawn uniformly from `range`, plus both range ends.
pub fn instants(seed: u64, count: usize, range: RangeInclusive<i64>) -> Vec<i64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut result = Vec::with_capacity(count + 2);
    result.push(*range.start());
    result.push(*range.end());
    result.extend((0..count).map(|_| rng.i64(range.clone())));
    result
}

/// `(year, month, day)` of `count` random days in `years`, read back
/// through `chronology` so every date is valid in that calendar.
pub fn dates(
    chronology: &dyn Chronology,
    seed: u64,
    count: usize,
    years: RangeInclusive<i32>,
) -> Result<Vec<(i32, i32, i32)>> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let fields = chronology.fields();
    let mut result = Vec::with_capacity(count);
    for _ in 0..count {
        let year = rng.i32(years.clone());
        let start = chronology.date_time_millis(year, 1, 1, 0)?;
        let days = fields.days.difference(fields.years.add(start, 1)?, start)?;
        let instant = fields.days.add(start, rng.i64(0..days))?;
        result.push((
            fields.year.get(instant)?,
            fields.month_of_year.get(instant)?,
            fields.day_of_month.get(instant)?,
        ));
    }
    Ok(result)
}

/// Amounts for add and difference sweeps.
pub fn amounts(seed: u64, count: usize, range: RangeInclusive<i64>) -> Vec<i64> {
    let mut rng = fastrand::Rng::with_seed(seed);
    (0..count).map(|_| rng.i64(range.clone())).collect()
}
