//! Chronology identity and the shared instance cache.
//!
//! A chronology is identified by a [`ChronologyKey`]: its calendar system
//! with parameters and zone id, or a decorator over another key. The
//! [`ChronologyCache`] builds each key at most once per cache and hands out
//! the same `Arc` afterwards.

use std::fmt;
use std::sync::{Arc, LazyLock, PoisonError, RwLock};

use tempora_common::Result;

use crate::calendars::iso::render_local;
use crate::calendars::lunisolar::LunisolarTable;
use crate::calendars::{self, BuddhistChronology, FixedMonthKind, LeapYearPattern};
use crate::chronology::Chronology;
use crate::decorators::cutover::{DEFAULT_CUTOVER, GjChronology};
use crate::decorators::{LenientChronology, LimitChronology, StrictChronology, ZonedChronology};
use crate::zone::{self, TimeZone};

/// A calendar system and the parameters that change its arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CalendarSystem {
    Iso,
    Gregorian { min_days_in_first_week: i32 },
    Julian { min_days_in_first_week: i32 },
    Gj { cutover: i64, min_days_in_first_week: i32 },
    Coptic { min_days_in_first_week: i32 },
    Ethiopic { min_days_in_first_week: i32 },
    Islamic { leap_years: LeapYearPattern },
    Buddhist,
    Lunisolar {
        table: Arc<LunisolarTable>,
        min_days_in_first_week: i32,
    },
}

impl CalendarSystem {
    pub fn chronology_name(&self) -> String {
        match self {
            CalendarSystem::Iso => "ISOChronology".to_string(),
            CalendarSystem::Gregorian { .. } => "GregorianChronology".to_string(),
            CalendarSystem::Julian { .. } => "JulianChronology".to_string(),
            CalendarSystem::Gj { .. } => "GJChronology".to_string(),
            CalendarSystem::Coptic { .. } => "CopticChronology".to_string(),
            CalendarSystem::Ethiopic { .. } => "EthiopicChronology".to_string(),
            CalendarSystem::Islamic { .. } => "IslamicChronology".to_string(),
            CalendarSystem::Buddhist => "BuddhistChronology".to_string(),
            CalendarSystem::Lunisolar { table, .. } => format!("{}Chronology", table.name),
        }
    }

    /// Builds the UTC chronology. Systems layered over another calendar
    /// fetch it from `cache`.
    fn build_utc(&self, cache: &ChronologyCache) -> Result<Arc<dyn Chronology>> {
        Ok(match self {
            CalendarSystem::Iso => Arc::new(calendars::iso::chronology()?),
            CalendarSystem::Gregorian {
                min_days_in_first_week,
            } => Arc::new(calendars::gregorian::chronology(*min_days_in_first_week)?),
            CalendarSystem::Julian {
                min_days_in_first_week,
            } => Arc::new(calendars::julian::chronology(*min_days_in_first_week)?),
            CalendarSystem::Gj {
                cutover,
                min_days_in_first_week,
            } => Arc::new(GjChronology::new(cache, *cutover, *min_days_in_first_week)?),
            CalendarSystem::Coptic {
                min_days_in_first_week,
            } => Arc::new(calendars::fixed_month::chronology(
                FixedMonthKind::Coptic,
                *min_days_in_first_week,
            )?),
            CalendarSystem::Ethiopic {
                min_days_in_first_week,
            } => Arc::new(calendars::fixed_month::chronology(
                FixedMonthKind::Ethiopic,
                *min_days_in_first_week,
            )?),
            CalendarSystem::Islamic { leap_years } => {
                Arc::new(calendars::islamic::chronology(*leap_years)?)
            }
            CalendarSystem::Buddhist => Arc::new(BuddhistChronology::new(cache)?),
            CalendarSystem::Lunisolar {
                table,
                min_days_in_first_week,
            } => Arc::new(calendars::lunisolar::chronology(
                table.clone(),
                *min_days_in_first_week,
            )?),
        })
    }

    fn fmt_parameters(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CalendarSystem::Iso | CalendarSystem::Buddhist => Ok(()),
            CalendarSystem::Gregorian {
                min_days_in_first_week,
            }
            | CalendarSystem::Julian {
                min_days_in_first_week,
            }
            | CalendarSystem::Coptic {
                min_days_in_first_week,
            }
            | CalendarSystem::Ethiopic {
                min_days_in_first_week,
            }
            | CalendarSystem::Lunisolar {
                min_days_in_first_week,
                ..
            } => {
                if *min_days_in_first_week != 4 {
                    write!(f, ",mdfw={min_days_in_first_week}")?;
                }
                Ok(())
            }
            CalendarSystem::Gj {
                cutover,
                min_days_in_first_week,
            } => {
                if *cutover != DEFAULT_CUTOVER {
                    write!(f, ",cutover={}", render_local(*cutover))?;
                }
                if *min_days_in_first_week != 4 {
                    write!(f, ",mdfw={min_days_in_first_week}")?;
                }
                Ok(())
            }
            CalendarSystem::Islamic { leap_years } => {
                if *leap_years != LeapYearPattern::default() {
                    write!(f, ",{}", leap_years.name())?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for CalendarSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.chronology_name())
    }
}

/// Identity of a cached chronology.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ChronologyKey {
    Calendar {
        system: CalendarSystem,
        zone: String,
    },
    Limit {
        base: Box<ChronologyKey>,
        lower: Option<i64>,
        upper: Option<i64>,
    },
    Strict(Box<ChronologyKey>),
    Lenient(Box<ChronologyKey>),
}

impl ChronologyKey {
    pub fn calendar(system: CalendarSystem, zone_id: &str) -> ChronologyKey {
        ChronologyKey::Calendar {
            system,
            zone: zone_id.to_string(),
        }
    }

    /// The calendar system, for keys that are not decorators.
    pub fn system(&self) -> Option<&CalendarSystem> {
        match self {
            ChronologyKey::Calendar { system, .. } => Some(system),
            _ => None,
        }
    }
}

impl fmt::Display for ChronologyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChronologyKey::Calendar { system, zone } => {
                write!(f, "{}[{zone}", system.chronology_name())?;
                system.fmt_parameters(f)?;
                f.write_str("]")
            }
            ChronologyKey::Limit { base, lower, upper } => {
                let limit =
                    |value: &Option<i64>| value.map_or("NoLimit".to_string(), |v| v.to_string());
                write!(f, "LimitChronology[{base}, {}, {}]", limit(lower), limit(upper))
            }
            ChronologyKey::Strict(base) => write!(f, "StrictChronology[{base}]"),
            ChronologyKey::Lenient(base) => write!(f, "LenientChronology[{base}]"),
        }
    }
}

/// Shared chronology instances keyed by identity.
///
/// Construction happens outside the lock, so a chronology may build the
/// chronologies it layers over through the same cache. When two threads
/// race on one key both build it and the first insertion wins; the loser's
/// instance is dropped.
#[derive(Debug, Default)]
pub struct ChronologyCache {
    entries: RwLock<ahash::HashMap<ChronologyKey, Arc<dyn Chronology>>>,
}

static GLOBAL: LazyLock<ChronologyCache> = LazyLock::new(ChronologyCache::new);

impl ChronologyCache {
    pub fn new() -> ChronologyCache {
        ChronologyCache::default()
    }

    /// The process-wide cache behind the `instance` helpers.
    pub fn global() -> &'static ChronologyCache {
        &GLOBAL
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, key: &ChronologyKey) -> Option<Arc<dyn Chronology>> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    /// Returns the chronology cached under `key`, building and inserting it
    /// with `build` on a miss.
    pub fn get_or_insert_with(
        &self,
        key: ChronologyKey,
        build: impl FnOnce() -> Result<Arc<dyn Chronology>>,
    ) -> Result<Arc<dyn Chronology>> {
        if let Some(existing) = self.get(&key) {
            return Ok(existing);
        }
        let built = build()?;
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(key).or_insert_with_key(|key| {
            log::debug!("cached {key}");
            built
        });
        Ok(entry.clone())
    }

    /// The calendar system in `zone`: the UTC instance itself for UTC,
    /// otherwise a zoned chronology over it.
    pub fn calendar(
        &self,
        system: CalendarSystem,
        zone: Arc<dyn TimeZone>,
    ) -> Result<Arc<dyn Chronology>> {
        if zone::is_utc(&*zone) {
            return self.calendar_utc(system);
        }
        let key = ChronologyKey::calendar(system.clone(), zone.id());
        self.get_or_insert_with(key, || {
            let base = self.calendar_utc(system)?;
            Ok(Arc::new(ZonedChronology::new(base, zone)?))
        })
    }

    pub fn calendar_utc(&self, system: CalendarSystem) -> Result<Arc<dyn Chronology>> {
        let key = ChronologyKey::calendar(system.clone(), zone::utc().id());
        self.get_or_insert_with(key, || system.build_utc(self))
    }

    /// `base` restricted to `[lower, upper)`.
    pub fn limit(
        &self,
        base: Arc<dyn Chronology>,
        lower: Option<i64>,
        upper: Option<i64>,
    ) -> Result<Arc<dyn Chronology>> {
        let key = ChronologyKey::Limit {
            base: Box::new(base.key().clone()),
            lower,
            upper,
        };
        self.get_or_insert_with(key, || Ok(Arc::new(LimitChronology::new(base, lower, upper)?)))
    }

    pub fn strict(&self, base: Arc<dyn Chronology>) -> Result<Arc<dyn Chronology>> {
        if matches!(base.key(), ChronologyKey::Strict(_)) {
            return Ok(base);
        }
        let key = ChronologyKey::Strict(Box::new(base.key().clone()));
        self.get_or_insert_with(key, || Ok(Arc::new(StrictChronology::new(base)?)))
    }

    pub fn lenient(&self, base: Arc<dyn Chronology>) -> Result<Arc<dyn Chronology>> {
        if matches!(base.key(), ChronologyKey::Lenient(_)) {
            return Ok(base);
        }
        let key = ChronologyKey::Lenient(Box::new(base.key().clone()));
        self.get_or_insert_with(key, || Ok(Arc::new(LenientChronology::new(self, base)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chronology::same_chronology;
    use crate::zone::FixedOffsetZone;

    #[test]
    fn instances_are_shared() {
        let cache = ChronologyCache::new();
        let a = cache.calendar_utc(CalendarSystem::Iso).unwrap();
        let b = cache.calendar(CalendarSystem::Iso, zone::utc()).unwrap();
        assert!(same_chronology(&a, &b));
        assert_eq!(cache.len(), 1);

        let zone: Arc<dyn TimeZone> = Arc::new(FixedOffsetZone::new(3_600_000).unwrap());
        let zoned = cache.calendar(CalendarSystem::Iso, zone.clone()).unwrap();
        let again = cache.calendar(CalendarSystem::Iso, zone.clone()).unwrap();
        assert!(same_chronology(&zoned, &again));
        assert!(same_chronology(zoned.base().unwrap(), &a));
        assert_eq!(cache.len(), 2);

        let back = zoned.with_utc(&cache).unwrap();
        assert!(same_chronology(&back, &a));
    }

    #[test]
    fn parameters_are_part_of_identity() {
        let cache = ChronologyCache::new();
        let iso_weeks = cache
            .calendar_utc(CalendarSystem::Gregorian {
                min_days_in_first_week: 4,
            })
            .unwrap();
        let us_weeks = cache
            .calendar_utc(CalendarSystem::Gregorian {
                min_days_in_first_week: 1,
            })
            .unwrap();
        assert!(!same_chronology(&iso_weeks, &us_weeks));
        assert_eq!(iso_weeks.key().to_string(), "GregorianChronology[UTC]");
        assert_eq!(us_weeks.key().to_string(), "GregorianChronology[UTC,mdfw=1]");
        assert!(
            cache
                .calendar_utc(CalendarSystem::Julian {
                    min_days_in_first_week: 0
                })
                .is_err()
        );
    }

    #[test]
    fn layered_systems_reuse_their_base() {
        let cache = ChronologyCache::new();
        let buddhist = cache.calendar_utc(CalendarSystem::Buddhist).unwrap();
        let gj = cache
            .calendar_utc(CalendarSystem::Gj {
                cutover: DEFAULT_CUTOVER,
                min_days_in_first_week: 4,
            })
            .unwrap();
        assert!(same_chronology(buddhist.base().unwrap(), &gj));
        // Buddhist, GJ, Julian and Gregorian.
        assert_eq!(cache.len(), 4);
        assert_eq!(gj.key().to_string(), "GJChronology[UTC]");
    }

    #[test]
    fn decorators_are_cached_and_idempotent() {
        let cache = ChronologyCache::new();
        let iso = cache.calendar_utc(CalendarSystem::Iso).unwrap();
        let strict = cache.strict(iso.clone()).unwrap();
        assert!(same_chronology(&strict, &cache.strict(iso.clone()).unwrap()));
        assert!(same_chronology(&strict, &cache.strict(strict.clone()).unwrap()));
        let lenient = cache.lenient(iso.clone()).unwrap();
        assert_eq!(lenient.key().to_string(), "LenientChronology[ISOChronology[UTC]]");
        let limit = cache.limit(iso.clone(), Some(0), Some(1_000)).unwrap();
        assert!(same_chronology(
            &limit,
            &cache.limit(iso, Some(0), Some(1_000)).unwrap()
        ));

        let zone: Arc<dyn TimeZone> = Arc::new(FixedOffsetZone::new(-7_200_000).unwrap());
        let zoned_limit = limit.with_zone(&cache, zone).unwrap();
        assert_eq!(
            zoned_limit.key().to_string(),
            "LimitChronology[ISOChronology[-02:00], 0, 1000]"
        );
    }

    #[test]
    fn concurrent_lookups_agree() {
        let cache = ChronologyCache::new();
        let instances: Vec<Arc<dyn Chronology>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        cache
                            .calendar_utc(CalendarSystem::Coptic {
                                min_days_in_first_week: 4,
                            })
                            .unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for instance in &instances[1..] {
            assert!(same_chronology(&instances[0], instance));
        }
        assert_eq!(cache.len(), 1);
    }
}
