//! Override-or-inherit field assembly.
//!
//! A chronology is built by filling a [`FieldSlots`] value: every slot
//! starts out holding the base chronology's field (when the base supports
//! it) or nothing, the calendar overrides the slots it defines, and
//! [`FieldSlots::resolve`] turns whatever is still empty into unsupported
//! fields. Resolution happens once, at construction.

use std::sync::Arc;

use tempora_common::Result;

use crate::chronology::{self, Chronology};
use crate::field::{
    DateTimeField, DurationField, UnsupportedDateTimeField, UnsupportedDurationField,
    same_date_time_field,
};
use crate::field_type::{DateTimeFieldType, DurationFieldType};

macro_rules! field_set {
    (
        durations { $($d:ident => $dt:ident),* $(,)? }
        fields { $($f:ident => $ft:ident),* $(,)? }
    ) => {
        /// Mutable field container used while assembling a chronology.
        #[derive(Debug, Clone, Default)]
        pub struct FieldSlots {
            $(pub $d: Option<Arc<dyn DurationField>>,)*
            $(pub $f: Option<Arc<dyn DateTimeField>>,)*
        }

        /// The resolved fields of a chronology, one per kind.
        #[derive(Debug, Clone)]
        pub struct Fields {
            $(pub $d: Arc<dyn DurationField>,)*
            $(pub $f: Arc<dyn DateTimeField>,)*
        }

        impl FieldSlots {
            /// Slots pre-populated with every supported field of `base`.
            pub fn from_base(base: &Fields) -> FieldSlots {
                let mut slots = FieldSlots::default();
                $(if base.$d.is_supported() { slots.$d = Some(base.$d.clone()); })*
                $(if base.$f.is_supported() { slots.$f = Some(base.$f.clone()); })*
                slots
            }

            /// Fills every empty slot with an unsupported field.
            pub fn resolve(self) -> Fields {
                $(
                    let $d = self.$d.unwrap_or_else(|| {
                        UnsupportedDurationField::shared(DurationFieldType::$dt)
                    });
                )*
                let duration_of = |t: DurationFieldType| -> Arc<dyn DurationField> {
                    match t {
                        $(DurationFieldType::$dt => $d.clone(),)*
                    }
                };
                $(
                    let $f = self.$f.unwrap_or_else(|| {
                        UnsupportedDateTimeField::shared(
                            DateTimeFieldType::$ft,
                            duration_of(DateTimeFieldType::$ft.duration_type()),
                        )
                    });
                )*
                Fields {
                    $($d,)*
                    $($f,)*
                }
            }

            /// Replaces every present duration slot with `convert(slot)`.
            pub fn map_durations(
                &mut self,
                mut convert: impl FnMut(&Arc<dyn DurationField>) -> Arc<dyn DurationField>,
            ) {
                $(if let Some(field) = self.$d.take() { self.$d = Some(convert(&field)); })*
            }

            /// Replaces every present date-time slot with `convert(slot)`.
            pub fn map_fields(
                &mut self,
                mut convert: impl FnMut(&Arc<dyn DateTimeField>) -> Arc<dyn DateTimeField>,
            ) {
                $(if let Some(field) = self.$f.take() { self.$f = Some(convert(&field)); })*
            }
        }

        impl Fields {
            pub fn duration(&self, duration_type: DurationFieldType) -> &Arc<dyn DurationField> {
                match duration_type {
                    $(DurationFieldType::$dt => &self.$d,)*
                }
            }

            pub fn field(&self, field_type: DateTimeFieldType) -> &Arc<dyn DateTimeField> {
                match field_type {
                    $(DateTimeFieldType::$ft => &self.$f,)*
                }
            }
        }
    };
}

field_set! {
    durations {
        millis => Millis,
        seconds => Seconds,
        minutes => Minutes,
        hours => Hours,
        halfdays => Halfdays,
        days => Days,
        weeks => Weeks,
        weekyears => Weekyears,
        months => Months,
        years => Years,
        centuries => Centuries,
        eras => Eras,
    }
    fields {
        millis_of_second => MillisOfSecond,
        millis_of_day => MillisOfDay,
        second_of_minute => SecondOfMinute,
        second_of_day => SecondOfDay,
        minute_of_hour => MinuteOfHour,
        minute_of_day => MinuteOfDay,
        hour_of_day => HourOfDay,
        clockhour_of_day => ClockhourOfDay,
        hour_of_halfday => HourOfHalfday,
        clockhour_of_halfday => ClockhourOfHalfday,
        halfday_of_day => HalfdayOfDay,
        day_of_week => DayOfWeek,
        day_of_month => DayOfMonth,
        day_of_year => DayOfYear,
        week_of_weekyear => WeekOfWeekyear,
        weekyear => Weekyear,
        weekyear_of_century => WeekyearOfCentury,
        month_of_year => MonthOfYear,
        year => Year,
        year_of_era => YearOfEra,
        year_of_century => YearOfCentury,
        century_of_era => CenturyOfEra,
        era => Era,
    }
}

/// Time-of-day fields (hour, minute, second, millis) are the base's.
pub const BASE_TIME_FIELDS: u8 = 1;
/// `millisOfDay` is the base's.
pub const BASE_MILLIS_OF_DAY: u8 = 2;
/// Date fields (year, month, day of month) are the base's.
pub const BASE_DATE_FIELDS: u8 = 4;

impl Fields {
    /// Records which groups of fields are identical, by reference, to the
    /// corresponding fields of `base`.
    pub fn base_flags(&self, base: &Fields) -> u8 {
        let mut flags = 0;
        if same_date_time_field(&self.hour_of_day, &base.hour_of_day)
            && same_date_time_field(&self.minute_of_hour, &base.minute_of_hour)
            && same_date_time_field(&self.second_of_minute, &base.second_of_minute)
            && same_date_time_field(&self.millis_of_second, &base.millis_of_second)
        {
            flags |= BASE_TIME_FIELDS;
        }
        if same_date_time_field(&self.millis_of_day, &base.millis_of_day) {
            flags |= BASE_MILLIS_OF_DAY;
        }
        if same_date_time_field(&self.year, &base.year)
            && same_date_time_field(&self.month_of_year, &base.month_of_year)
            && same_date_time_field(&self.day_of_month, &base.day_of_month)
        {
            flags |= BASE_DATE_FIELDS;
        }
        flags
    }
}

/// Resolved fields plus the base they were assembled over.
///
/// The construct-from-fields operations short-circuit to the base when
/// every field they touch is inherited unchanged, and otherwise set the
/// fields one at a time.
#[derive(Debug)]
pub struct Assembly {
    fields: Fields,
    base: Option<Arc<dyn Chronology>>,
    base_flags: u8,
}

impl Assembly {
    /// Runs `assemble` over slots pre-populated from `base` and resolves the
    /// result.
    pub fn new(
        base: Option<Arc<dyn Chronology>>,
        assemble: impl FnOnce(&mut FieldSlots) -> Result<()>,
    ) -> Result<Assembly> {
        let mut slots = match &base {
            Some(base) => FieldSlots::from_base(base.fields()),
            None => FieldSlots::default(),
        };
        assemble(&mut slots)?;
        let fields = slots.resolve();
        let base_flags = base
            .as_ref()
            .map_or(0, |base| fields.base_flags(base.fields()));
        Ok(Assembly {
            fields,
            base,
            base_flags,
        })
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn base(&self) -> Option<&Arc<dyn Chronology>> {
        self.base.as_ref()
    }

    pub fn base_flags(&self) -> u8 {
        self.base_flags
    }

    fn inherited(&self, flags: u8) -> Option<&Arc<dyn Chronology>> {
        self.base
            .as_ref()
            .filter(|_| self.base_flags & flags == flags)
    }

    pub fn date_time_millis(
        &self,
        year: i32,
        month: i32,
        day: i32,
        millis_of_day: i32,
    ) -> Result<i64> {
        match self.inherited(BASE_DATE_FIELDS | BASE_MILLIS_OF_DAY) {
            Some(base) => base.date_time_millis(year, month, day, millis_of_day),
            None => chronology::date_time_millis_by_fields(
                &self.fields,
                year,
                month,
                day,
                millis_of_day,
            ),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn date_time_millis_hms(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        match self.inherited(BASE_DATE_FIELDS | BASE_TIME_FIELDS) {
            Some(base) => {
                base.date_time_millis_hms(year, month, day, hour, minute, second, millis)
            }
            None => chronology::date_time_millis_hms_by_fields(
                &self.fields,
                year,
                month,
                day,
                hour,
                minute,
                second,
                millis,
            ),
        }
    }

    pub fn date_time_millis_at(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        match self.inherited(BASE_TIME_FIELDS) {
            Some(base) => base.date_time_millis_at(instant, hour, minute, second, millis),
            None => {
                chronology::time_by_fields(&self.fields, instant, hour, minute, second, millis)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::MillisDurationField;

    #[test]
    fn empty_slots_resolve_to_unsupported() {
        let mut slots = FieldSlots::default();
        slots.millis = Some(MillisDurationField::instance());
        let fields = slots.resolve();
        assert!(fields.millis.is_supported());
        assert!(!fields.years.is_supported());
        assert!(!fields.year.is_supported());
        assert_eq!(fields.year.duration_field().field_type(), DurationFieldType::Years);
        assert_eq!(fields.field(DateTimeFieldType::Era).field_type(), DateTimeFieldType::Era);
    }

    #[test]
    fn unsupported_fields_are_not_inherited() {
        let base = FieldSlots::default().resolve();
        let slots = FieldSlots::from_base(&base);
        assert!(slots.year.is_none());
        assert!(slots.millis.is_none());
    }
}
