use std::sync::atomic::{AtomicU64, Ordering};

use crate::MILLIS_PER_DAY;

const CACHE_SIZE: usize = 1 << 10;
const CACHE_MASK: i32 = CACHE_SIZE as i32 - 1;

const DAY_BITS: u32 = 41;
const TAG_BITS: u32 = 22;
const DAY_MASK: u64 = (1 << DAY_BITS) - 1;
const TAG_MASK: u64 = (1 << TAG_BITS) - 1;
const VALID: u64 = 1 << 63;

/// Direct-mapped cache of first-of-year instants, indexed by `year & 1023`.
///
/// Each slot is one atomic word packing a valid bit, the high bits of the
/// year (the tag) and the day number of January 1st. A miss recomputes and
/// overwrites the slot; concurrent writers store identical words, so no
/// lock is taken.
pub struct YearInfoCache {
    slots: Box<[AtomicU64]>,
}

impl YearInfoCache {
    pub fn new() -> YearInfoCache {
        YearInfoCache {
            slots: (0..CACHE_SIZE).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    /// Returns the first instant of `year`, computing it with `compute` on a
    /// miss.
    pub fn get_or_compute(&self, year: i32, compute: impl FnOnce(i32) -> i64) -> i64 {
        let slot = &self.slots[(year & CACHE_MASK) as usize];
        let tag = tag_of(year);
        let word = slot.load(Ordering::Relaxed);
        if word & VALID != 0 && (word >> DAY_BITS) & TAG_MASK == tag {
            return unpack_days(word) * MILLIS_PER_DAY;
        }
        log::trace!("year info cache miss for year {year}");
        let millis = compute(year);
        if millis % MILLIS_PER_DAY == 0 {
            let days = millis / MILLIS_PER_DAY;
            if fits_in_day_bits(days) {
                slot.store(VALID | (tag << DAY_BITS) | (days as u64 & DAY_MASK), Ordering::Relaxed);
            }
        }
        millis
    }
}

impl Default for YearInfoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for YearInfoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YearInfoCache")
            .field("size", &self.slots.len())
            .finish()
    }
}

fn tag_of(year: i32) -> u64 {
    ((year >> 10) as u64) & TAG_MASK
}

fn fits_in_day_bits(days: i64) -> bool {
    let limit = 1i64 << (DAY_BITS - 1);
    (-limit..limit).contains(&days)
}

fn unpack_days(word: u64) -> i64 {
    let shift = 64 - DAY_BITS;
    (((word & DAY_MASK) << shift) as i64) >> shift
}
