//! A chronology whose `set` accepts any value and rolls the excess over into
//! larger fields: day 32 of January is 1 February.

use std::sync::Arc;

use tempora_common::Result;

use crate::assembly::Assembly;
use crate::cache::{ChronologyCache, ChronologyKey};
use crate::chronology::Chronology;
use crate::field::DateTimeField;
use crate::zone::{self, TimeZone};

/// Turns `set` into an `add` of the difference, computed on local time so
/// that a zoned base rolls over by wall-clock units.
#[derive(Debug)]
pub struct LenientDateTimeField {
    inner: Arc<dyn DateTimeField>,
    /// The same field of the base's UTC chronology.
    local: Arc<dyn DateTimeField>,
    zone: Arc<dyn TimeZone>,
}

impl DateTimeField for LenientDateTimeField {
    super::forward_to_inner!(inner);

    fn is_lenient(&self) -> bool {
        true
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        let difference = value as i64 - self.inner.get(instant)? as i64;
        let local = zone::convert_utc_to_local(&*self.zone, instant)?;
        let local = self.local.add(local, difference)?;
        zone::convert_local_to_utc_near(&*self.zone, local, false, instant)
    }
}

#[derive(Debug)]
pub struct LenientChronology {
    key: ChronologyKey,
    base: Arc<dyn Chronology>,
    assembly: Assembly,
}

impl LenientChronology {
    pub fn new(cache: &ChronologyCache, base: Arc<dyn Chronology>) -> Result<LenientChronology> {
        let key = ChronologyKey::Lenient(Box::new(base.key().clone()));
        let utc = base.with_utc(cache)?;
        let zone = base.zone().clone();
        let assembly = Assembly::new(Some(base.clone()), |slots| {
            slots.map_fields(|field| {
                if !field.is_supported() {
                    return field.clone();
                }
                Arc::new(LenientDateTimeField {
                    inner: field.clone(),
                    local: utc.field(field.field_type()).clone(),
                    zone: zone.clone(),
                })
            });
            Ok(())
        })?;
        log::debug!("assembled {key}");
        Ok(LenientChronology {
            key,
            base,
            assembly,
        })
    }
}

impl Chronology for LenientChronology {
    super::assembled_chronology!();

    fn with_zone(
        &self,
        cache: &ChronologyCache,
        zone: Arc<dyn TimeZone>,
    ) -> Result<Arc<dyn Chronology>> {
        let base = self.base.with_zone(cache, zone)?;
        cache.lenient(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CalendarSystem;

    #[test]
    fn out_of_range_values_roll_over() {
        let cache = ChronologyCache::new();
        let iso = cache.calendar_utc(CalendarSystem::Iso).unwrap();
        let lenient = LenientChronology::new(&cache, iso.clone()).unwrap();
        let fields = lenient.fields();
        assert!(fields.day_of_month.is_lenient());
        let jan = iso.date_time_millis(2001, 1, 10, 0).unwrap();
        let rolled = fields.day_of_month.set(jan, 32).unwrap();
        assert_eq!(rolled, iso.date_time_millis(2001, 2, 1, 0).unwrap());
        let back = fields.day_of_month.set(jan, 0).unwrap();
        assert_eq!(back, iso.date_time_millis(2000, 12, 31, 0).unwrap());
        let t = lenient.date_time_millis(2001, 13, 1, 0).unwrap();
        assert_eq!(t, iso.date_time_millis(2002, 1, 1, 0).unwrap());
        let t = lenient.date_time_millis_hms(2001, 1, 1, 25, 0, 0, 0).unwrap();
        assert_eq!(t, iso.date_time_millis_hms(2001, 1, 2, 1, 0, 0, 0).unwrap());
    }
}
