//! Declarative chronology descriptions.
//!
//! A [`ChronologyConfig`] names a calendar system, its parameters, a fixed
//! zone and optional decorators, and resolves to the cached chronology:
//!
//! ```json
//! { "kind": "gj", "zone": 60, "lower": 0, "strict": true }
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tempora_common::{Error, Result};

use crate::cache::{CalendarSystem, ChronologyCache};
use crate::calendars::{LeapYearPattern, LunisolarTable};
use crate::chronology::Chronology;
use crate::decorators::DEFAULT_CUTOVER;
use crate::zone::{self, FixedOffsetZone, TimeZone};
use crate::MILLIS_PER_MINUTE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarKind {
    Iso,
    Gregorian,
    Julian,
    Gj,
    Coptic,
    Ethiopic,
    Islamic,
    Buddhist,
    Lunisolar,
}

/// `"utc"` or a fixed offset in minutes east of UTC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ZoneConfig {
    OffsetMinutes(i32),
    Id(String),
}

impl Default for ZoneConfig {
    fn default() -> Self {
        ZoneConfig::Id("utc".to_string())
    }
}

impl ZoneConfig {
    pub fn to_zone(&self) -> Result<Arc<dyn TimeZone>> {
        match self {
            ZoneConfig::OffsetMinutes(0) => Ok(zone::utc()),
            ZoneConfig::OffsetMinutes(minutes) => {
                let millis = i32::try_from(*minutes as i64 * MILLIS_PER_MINUTE).map_err(|_| {
                    Error::invalid_arg("zone", format!("offset of {minutes} minutes"))
                })?;
                Ok(Arc::new(FixedOffsetZone::new(millis)?))
            }
            ZoneConfig::Id(id) if id.eq_ignore_ascii_case("utc") => Ok(zone::utc()),
            ZoneConfig::Id(id) => Err(Error::invalid_arg(
                "zone",
                format!("unknown zone '{id}'; expected \"utc\" or an offset in minutes"),
            )),
        }
    }
}

fn default_min_days_in_first_week() -> i32 {
    4
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChronologyConfig {
    pub kind: CalendarKind,
    #[serde(default)]
    pub zone: ZoneConfig,
    #[serde(default = "default_min_days_in_first_week")]
    pub min_days_in_first_week: i32,
    /// GJ only; defaults to 1582-10-15.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cutover: Option<i64>,
    /// Islamic only.
    #[serde(default)]
    pub leap_years: LeapYearPattern,
    /// Required for the lunisolar kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Arc<LunisolarTable>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lower: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub upper: Option<i64>,
    #[serde(default)]
    pub strict: bool,
    #[serde(default)]
    pub lenient: bool,
}

impl ChronologyConfig {
    pub fn new(kind: CalendarKind) -> ChronologyConfig {
        ChronologyConfig {
            kind,
            zone: ZoneConfig::default(),
            min_days_in_first_week: default_min_days_in_first_week(),
            cutover: None,
            leap_years: LeapYearPattern::default(),
            table: None,
            lower: None,
            upper: None,
            strict: false,
            lenient: false,
        }
    }

    pub fn from_json(json: &str) -> Result<ChronologyConfig> {
        serde_json::from_str(json).map_err(|e| Error::invalid_arg("config", e.to_string()))
    }

    pub fn system(&self) -> Result<CalendarSystem> {
        if self.cutover.is_some() && self.kind != CalendarKind::Gj {
            return Err(Error::invalid_arg(
                "cutover",
                "only the gj calendar takes a cutover",
            ));
        }
        let min_days_in_first_week = self.min_days_in_first_week;
        Ok(match self.kind {
            CalendarKind::Iso => CalendarSystem::Iso,
            CalendarKind::Gregorian => CalendarSystem::Gregorian {
                min_days_in_first_week,
            },
            CalendarKind::Julian => CalendarSystem::Julian {
                min_days_in_first_week,
            },
            CalendarKind::Gj => CalendarSystem::Gj {
                cutover: self.cutover.unwrap_or(DEFAULT_CUTOVER),
                min_days_in_first_week,
            },
            CalendarKind::Coptic => CalendarSystem::Coptic {
                min_days_in_first_week,
            },
            CalendarKind::Ethiopic => CalendarSystem::Ethiopic {
                min_days_in_first_week,
            },
            CalendarKind::Islamic => CalendarSystem::Islamic {
                leap_years: self.leap_years,
            },
            CalendarKind::Buddhist => CalendarSystem::Buddhist,
            CalendarKind::Lunisolar => CalendarSystem::Lunisolar {
                table: self.table.clone().ok_or_else(|| {
                    Error::invalid_arg("table", "lunisolar calendar needs a table")
                })?,
                min_days_in_first_week,
            },
        })
    }

    /// Resolves the description through `cache`: calendar in zone, then
    /// strict or lenient `set`, then limits.
    pub fn build(&self, cache: &ChronologyCache) -> Result<Arc<dyn Chronology>> {
        if self.strict && self.lenient {
            return Err(Error::invalid_arg(
                "strict",
                "a chronology cannot be both strict and lenient",
            ));
        }
        let mut chronology = cache.calendar(self.system()?, self.zone.to_zone()?)?;
        if self.strict {
            chronology = cache.strict(chronology)?;
        }
        if self.lenient {
            chronology = cache.lenient(chronology)?;
        }
        // Outermost, so construction from fields is checked only on its result.
        if self.lower.is_some() || self.upper.is_some() {
            chronology = cache.limit(chronology, self.lower, self.upper)?;
        }
        log::debug!("built {} from config", chronology.key());
        Ok(chronology)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ChronologyConfig::from_json(r#"{ "kind": "iso" }"#).unwrap();
        assert_eq!(config, ChronologyConfig::new(CalendarKind::Iso));
        let cache = ChronologyCache::new();
        let chronology = config.build(&cache).unwrap();
        assert_eq!(chronology.key().to_string(), "ISOChronology[UTC]");
    }

    #[test]
    fn decorated() {
        let json = r#"{
            "kind": "gj",
            "zone": 90,
            "lower": 0,
            "strict": true
        }"#;
        let config = ChronologyConfig::from_json(json).unwrap();
        let cache = ChronologyCache::new();
        let chronology = config.build(&cache).unwrap();
        assert_eq!(
            chronology.key().to_string(),
            "LimitChronology[StrictChronology[GJChronology[+01:30]], 0, NoLimit]"
        );
        assert!(chronology.date_time_millis(1969, 12, 31, 0).is_err());
    }

    #[test]
    fn islamic_pattern() {
        let json = r#"{ "kind": "islamic", "leap_years": "indian" }"#;
        let config = ChronologyConfig::from_json(json).unwrap();
        assert_eq!(config.leap_years, LeapYearPattern::Indian);
        let chronology = config.build(&ChronologyCache::new()).unwrap();
        assert_eq!(chronology.key().to_string(), "IslamicChronology[UTC,Indian]");
    }

    #[test]
    fn rejects_bad_input() {
        let cache = ChronologyCache::new();
        assert!(ChronologyConfig::from_json(r#"{ "kind": "mayan" }"#).is_err());
        assert!(ChronologyConfig::from_json(r#"{ "kind": "iso", "colour": 1 }"#).is_err());
        let mut config = ChronologyConfig::new(CalendarKind::Iso);
        config.zone = ZoneConfig::Id("Europe/Paris".into());
        assert!(config.build(&cache).is_err());
        let mut config = ChronologyConfig::new(CalendarKind::Julian);
        config.cutover = Some(0);
        assert!(config.build(&cache).is_err());
        let mut config = ChronologyConfig::new(CalendarKind::Iso);
        config.strict = true;
        config.lenient = true;
        assert!(config.build(&cache).is_err());
        assert!(ChronologyConfig::new(CalendarKind::Lunisolar).build(&cache).is_err());
    }

    #[test]
    fn round_trips_through_json() {
        let mut config = ChronologyConfig::new(CalendarKind::Coptic);
        config.zone = ZoneConfig::OffsetMinutes(-300);
        config.upper = Some(1_000_000);
        config.lenient = true;
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(ChronologyConfig::from_json(&json).unwrap(), config);
    }
}
