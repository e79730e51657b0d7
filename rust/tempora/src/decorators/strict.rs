//! A chronology whose `set` rejects every value outside the bounds that
//! apply at the instant, even where the base field would roll it over.

use std::sync::Arc;

use tempora_common::Result;

use crate::assembly::Assembly;
use crate::cache::{ChronologyCache, ChronologyKey};
use crate::chronology::Chronology;
use crate::field::DateTimeField;
use crate::field::utils::verify_field_bounds;
use crate::zone::TimeZone;

#[derive(Debug)]
pub struct StrictDateTimeField {
    inner: Arc<dyn DateTimeField>,
}

impl StrictDateTimeField {
    /// Wraps `field` unless it is unsupported.
    pub fn wrap(field: &Arc<dyn DateTimeField>) -> Arc<dyn DateTimeField> {
        if !field.is_supported() {
            return field.clone();
        }
        Arc::new(StrictDateTimeField {
            inner: field.clone(),
        })
    }
}

impl DateTimeField for StrictDateTimeField {
    super::forward_to_inner!(inner);

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        verify_field_bounds(self, instant, value)?;
        self.inner.set(instant, value)
    }
}

#[derive(Debug)]
pub struct StrictChronology {
    key: ChronologyKey,
    base: Arc<dyn Chronology>,
    assembly: Assembly,
}

impl StrictChronology {
    pub fn new(base: Arc<dyn Chronology>) -> Result<StrictChronology> {
        let key = ChronologyKey::Strict(Box::new(base.key().clone()));
        let assembly = Assembly::new(Some(base.clone()), |slots| {
            slots.map_fields(StrictDateTimeField::wrap);
            Ok(())
        })?;
        log::debug!("assembled {key}");
        Ok(StrictChronology {
            key,
            base,
            assembly,
        })
    }
}

impl Chronology for StrictChronology {
    super::assembled_chronology!();

    fn with_zone(
        &self,
        cache: &ChronologyCache,
        zone: Arc<dyn TimeZone>,
    ) -> Result<Arc<dyn Chronology>> {
        let base = self.base.with_zone(cache, zone)?;
        cache.strict(base)
    }
}
