//! The GJ chronology: Julian rules before a cutover instant, Gregorian rules
//! from it onwards.
//!
//! Fields that read the same under both rule sets are shared with the
//! Gregorian chronology. The rest are wrapped in a [`CutoverField`], which
//! routes each call to the side the instant falls on and translates results
//! that land across the boundary by re-deriving the date under the other
//! rules.

use std::sync::Arc;

use tempora_common::{Error, Result};

use crate::assembly::{Assembly, FieldSlots, Fields};
use crate::cache::{CalendarSystem, ChronologyCache, ChronologyKey};
use crate::chronology::Chronology;
use crate::field::{DateTimeField, DurationField, FieldOps, ImpreciseDateTimeField};
use crate::field_type::DateTimeFieldType;
use crate::text::SymbolProvider;
use crate::zone::{self, TimeZone};

/// 1582-10-15T00:00:00Z, the first day of the Gregorian calendar.
pub const DEFAULT_CUTOVER: i64 = -12_219_292_800_000;

/// The two rule sets and the translation between them.
#[derive(Debug)]
struct Cutover {
    julian: Arc<dyn Chronology>,
    gregorian: Arc<dyn Chronology>,
    instant: i64,
    /// Gregorian minus Julian reading of the cutover instant.
    gap: i64,
}

impl Cutover {
    fn julian_to_gregorian(&self, instant: i64, by_weekyear: bool) -> Result<i64> {
        if by_weekyear {
            convert_by_weekyear(instant, &*self.julian, &*self.gregorian)
        } else {
            convert_by_year(instant, &*self.julian, &*self.gregorian)
        }
    }

    fn gregorian_to_julian(&self, instant: i64, by_weekyear: bool) -> Result<i64> {
        if by_weekyear {
            convert_by_weekyear(instant, &*self.gregorian, &*self.julian)
        } else {
            convert_by_year(instant, &*self.gregorian, &*self.julian)
        }
    }
}

/// Re-reads the year, month, day and time of `instant` under `from` and
/// builds the same values under `to`.
fn convert_by_year(instant: i64, from: &dyn Chronology, to: &dyn Chronology) -> Result<i64> {
    let fields = from.fields();
    to.date_time_millis(
        fields.year.get(instant)?,
        fields.month_of_year.get(instant)?,
        fields.day_of_month.get(instant)?,
        fields.millis_of_day.get(instant)?,
    )
}

fn convert_by_weekyear(instant: i64, from: &dyn Chronology, to: &dyn Chronology) -> Result<i64> {
    let (source, target) = (from.fields(), to.fields());
    let converted = target.weekyear.set(0, source.weekyear.get(instant)?)?;
    let converted = target
        .week_of_weekyear
        .set(converted, source.week_of_weekyear.get(instant)?)?;
    let converted = target
        .day_of_week
        .set(converted, source.day_of_week.get(instant)?)?;
    target
        .millis_of_day
        .set(converted, source.millis_of_day.get(instant)?)
}

/// Routing shared by the precise and imprecise cutover fields.
#[derive(Debug, Clone)]
struct Sides {
    cutover: Arc<Cutover>,
    julian: Arc<dyn DateTimeField>,
    gregorian: Arc<dyn DateTimeField>,
    /// Where this field switches sides; later than the chronology's cutover
    /// for fields that must keep counting through the cutover year.
    at: i64,
    by_weekyear: bool,
}

impl Sides {
    fn side(&self, instant: i64) -> &Arc<dyn DateTimeField> {
        if instant >= self.at {
            &self.gregorian
        } else {
            &self.julian
        }
    }

    fn get(&self, instant: i64) -> Result<i32> {
        self.side(instant).get(instant)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        let gap = self.cutover.gap;
        if instant >= self.at {
            let mut result = self.gregorian.set(instant, value)?;
            if result < self.at {
                // Only translate when the gap was crossed completely.
                if result.saturating_add(gap) < self.at {
                    result = self.cutover.gregorian_to_julian(result, self.by_weekyear)?;
                }
                self.verify(result, value)?;
            }
            Ok(result)
        } else {
            let mut result = self.julian.set(instant, value)?;
            if result >= self.at {
                if result.saturating_sub(gap) >= self.at {
                    result = self.cutover.julian_to_gregorian(result, self.by_weekyear)?;
                }
                self.verify(result, value)?;
            }
            Ok(result)
        }
    }

    fn verify(&self, result: i64, value: i32) -> Result<()> {
        if self.get(result)? != value {
            return Err(Error::illegal_value(
                self.gregorian.name(),
                value as i64,
                None,
                None,
            ));
        }
        Ok(())
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        if instant >= self.at {
            let floor = self.gregorian.round_floor(instant)?;
            if floor < self.at && floor.saturating_add(self.cutover.gap) < self.at {
                return self.cutover.gregorian_to_julian(floor, self.by_weekyear);
            }
            Ok(floor)
        } else {
            self.julian.round_floor(instant)
        }
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        if instant >= self.at {
            self.gregorian.round_ceiling(instant)
        } else {
            let ceiling = self.julian.round_ceiling(instant)?;
            if ceiling >= self.at && ceiling.saturating_sub(self.cutover.gap) >= self.at {
                return self.cutover.julian_to_gregorian(ceiling, self.by_weekyear);
            }
            Ok(ceiling)
        }
    }

    fn min_value(&self) -> i32 {
        self.julian.min_value().min(self.gregorian.min_value())
    }

    fn max_value(&self) -> i32 {
        self.julian.max_value().max(self.gregorian.max_value())
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        self.side(instant).is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        self.side(instant).leap_amount(instant)
    }
}

/// A cutover field whose unit is the Gregorian one (days, eras, time units).
#[derive(Debug)]
pub struct CutoverField {
    sides: Sides,
    duration: Arc<dyn DurationField>,
    range: Option<Arc<dyn DurationField>>,
}

impl CutoverField {
    fn new(sides: Sides) -> CutoverField {
        let duration = sides.gregorian.duration_field().clone();
        let range = sides
            .gregorian
            .range_duration_field()
            .or(sides.julian.range_duration_field())
            .cloned();
        CutoverField {
            sides,
            duration,
            range,
        }
    }

    fn with_range(mut self, range: Arc<dyn DurationField>) -> CutoverField {
        self.range = Some(range);
        self
    }
}

impl DateTimeField for CutoverField {
    fn field_type(&self) -> DateTimeFieldType {
        self.sides.gregorian.field_type()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        self.sides.get(instant)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        self.sides.set(instant, value)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        self.sides.gregorian.add(instant, value)
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        self.sides.gregorian.difference(minuend, subtrahend)
    }

    fn duration_field(&self) -> &Arc<dyn DurationField> {
        &self.duration
    }

    fn range_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.range.as_ref()
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.sides.gregorian.leap_duration_field()
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        self.sides.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        self.sides.leap_amount(instant)
    }

    fn min_value(&self) -> i32 {
        self.sides.min_value()
    }

    fn max_value(&self) -> i32 {
        self.sides.max_value()
    }

    fn min_value_at(&self, instant: i64) -> Result<i32> {
        let sides = &self.sides;
        if instant < sides.at {
            return sides.julian.min_value_at(instant);
        }
        let min = sides.gregorian.min_value_at(instant)?;
        // The minimum may fall on the Julian side; the first Gregorian
        // value is the real one.
        if sides.gregorian.set(instant, min)? < sides.at {
            return sides.gregorian.get(sides.at);
        }
        Ok(min)
    }

    fn max_value_at(&self, instant: i64) -> Result<i32> {
        let sides = &self.sides;
        if instant >= sides.at {
            return sides.gregorian.max_value_at(instant);
        }
        let max = sides.julian.max_value_at(instant)?;
        if sides.julian.set(instant, max)? >= sides.at {
            return sides.julian.get(sides.julian.add(sides.at, -1)?);
        }
        Ok(max)
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        self.sides.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.sides.round_ceiling(instant)
    }

    fn get_as_text(
        &self,
        instant: i64,
        symbols: &dyn SymbolProvider,
        locale: &str,
    ) -> Result<String> {
        self.sides.side(instant).get_as_text(instant, symbols, locale)
    }

    fn get_as_short_text(
        &self,
        instant: i64,
        symbols: &dyn SymbolProvider,
        locale: &str,
    ) -> Result<String> {
        self.sides
            .side(instant)
            .get_as_short_text(instant, symbols, locale)
    }
}

/// Arithmetic of a cutover field with an imprecise unit. `add` and
/// `difference` must translate across the boundary too, so the unit is a
/// linked duration over these ops.
#[derive(Debug)]
struct ImpreciseCutoverOps {
    sides: Sides,
}

impl FieldOps for ImpreciseCutoverOps {
    fn field_type(&self) -> DateTimeFieldType {
        self.sides.gregorian.field_type()
    }

    fn average_unit_millis(&self) -> i64 {
        self.sides.gregorian.duration_field().unit_millis()
    }

    fn get(&self, instant: i64) -> Result<i32> {
        self.sides.get(instant)
    }

    fn set(&self, instant: i64, value: i32) -> Result<i64> {
        self.sides.set(instant, value)
    }

    fn add(&self, instant: i64, value: i64) -> Result<i64> {
        let sides = &self.sides;
        let cutover = &sides.cutover;
        if instant >= sides.at {
            let mut result = sides.gregorian.add(instant, value)?;
            if result < sides.at && result.saturating_add(cutover.gap) < sides.at {
                // Gregorian year zero is Julian year -1.
                let gregorian = cutover.gregorian.fields();
                let (year, unit) = if sides.by_weekyear {
                    (&gregorian.weekyear, &gregorian.weekyears)
                } else {
                    (&gregorian.year, &gregorian.years)
                };
                if year.get(result)? <= 0 {
                    result = unit.add(result, -1)?;
                }
                result = cutover.gregorian_to_julian(result, sides.by_weekyear)?;
            }
            Ok(result)
        } else {
            let result = sides.julian.add(instant, value)?;
            if result >= sides.at && result.saturating_sub(cutover.gap) >= sides.at {
                return cutover.julian_to_gregorian(result, sides.by_weekyear);
            }
            Ok(result)
        }
    }

    fn difference(&self, minuend: i64, subtrahend: i64) -> Result<i64> {
        let sides = &self.sides;
        match (minuend >= sides.at, subtrahend >= sides.at) {
            (true, true) => sides.gregorian.difference(minuend, subtrahend),
            (false, false) => sides.julian.difference(minuend, subtrahend),
            // The subtrahend's side decides the rules; bring the minuend over.
            (true, false) => {
                let minuend = sides.cutover.gregorian_to_julian(minuend, sides.by_weekyear)?;
                sides.julian.difference(minuend, subtrahend)
            }
            (false, true) => {
                let minuend = sides.cutover.julian_to_gregorian(minuend, sides.by_weekyear)?;
                sides.gregorian.difference(minuend, subtrahend)
            }
        }
    }

    fn round_floor(&self, instant: i64) -> Result<i64> {
        self.sides.round_floor(instant)
    }

    fn round_ceiling(&self, instant: i64) -> Result<i64> {
        self.sides.round_ceiling(instant)
    }

    fn min_value(&self) -> i32 {
        self.sides.min_value()
    }

    fn max_value(&self) -> i32 {
        self.sides.max_value()
    }

    fn min_value_at(&self, instant: i64) -> Result<i32> {
        self.sides.side(instant).min_value_at(instant)
    }

    fn max_value_at(&self, instant: i64) -> Result<i32> {
        self.sides.side(instant).max_value_at(instant)
    }

    fn is_leap(&self, instant: i64) -> Result<bool> {
        self.sides.is_leap(instant)
    }

    fn leap_amount(&self, instant: i64) -> Result<i32> {
        self.sides.leap_amount(instant)
    }

    fn leap_duration_field(&self) -> Option<&Arc<dyn DurationField>> {
        self.sides.gregorian.leap_duration_field()
    }
}

/// Wraps `sides` as an imprecise field. Without `duration`, the field gets
/// its own linked duration.
fn imprecise_field(
    sides: Sides,
    duration: Option<Arc<dyn DurationField>>,
) -> Arc<dyn DateTimeField> {
    let range = sides
        .gregorian
        .range_duration_field()
        .or(sides.julian.range_duration_field())
        .cloned();
    let ops: Arc<dyn FieldOps> = Arc::new(ImpreciseCutoverOps { sides });
    match duration {
        Some(duration) => Arc::new(ImpreciseDateTimeField::with_duration(ops, duration, range)),
        None => ImpreciseDateTimeField::shared(ops, range),
    }
}

/// Julian before the cutover, Gregorian after it.
#[derive(Debug)]
pub struct GjChronology {
    key: ChronologyKey,
    zone: Arc<dyn TimeZone>,
    cutover: Arc<Cutover>,
    min_days_in_first_week: i32,
    assembly: Assembly,
}

impl GjChronology {
    /// Assembles the UTC instance. Both rule sets use the same
    /// `min_days_in_first_week`. The cutover may not precede 0200-03-01,
    /// before which the Julian calendar runs ahead of the Gregorian one.
    pub fn new(
        cache: &ChronologyCache,
        cutover: i64,
        min_days_in_first_week: i32,
    ) -> Result<GjChronology> {
        let julian = cache.calendar_utc(CalendarSystem::Julian {
            min_days_in_first_week,
        })?;
        let gregorian = cache.calendar_utc(CalendarSystem::Gregorian {
            min_days_in_first_week,
        })?;
        let gap = cutover - convert_by_year(cutover, &*julian, &*gregorian)?;
        if gap < 0 {
            return Err(Error::invalid_arg(
                "cutover",
                format!("{cutover} precedes the point where Julian and Gregorian dates agree"),
            ));
        }
        let cutover = Arc::new(Cutover {
            julian,
            gregorian,
            instant: cutover,
            gap,
        });
        let assembly = Assembly::new(None, |slots| assemble(&cutover, slots))?;
        let zone = zone::utc();
        let key = ChronologyKey::calendar(
            CalendarSystem::Gj {
                cutover: cutover.instant,
                min_days_in_first_week,
            },
            zone.id(),
        );
        log::debug!("assembled {key} (gap {} ms)", cutover.gap);
        Ok(GjChronology {
            key,
            zone,
            cutover,
            min_days_in_first_week,
            assembly,
        })
    }

    pub fn cutover(&self) -> i64 {
        self.cutover.instant
    }

    /// Length of the calendar gap skipped at the cutover.
    pub fn gap(&self) -> i64 {
        self.cutover.gap
    }

    pub fn julian(&self) -> &Arc<dyn Chronology> {
        &self.cutover.julian
    }

    pub fn gregorian(&self) -> &Arc<dyn Chronology> {
        &self.cutover.gregorian
    }

    /// Gregorian first; dates before the cutover are re-read as Julian and
    /// fail if the Julian reading lands on or after it.
    fn resolve(
        &self,
        year: i32,
        month: i32,
        day: i32,
        build: impl Fn(&dyn Chronology, i32) -> Result<i64>,
    ) -> Result<i64> {
        let cutover = &self.cutover;
        let instant = match build(&*cutover.gregorian, day) {
            Ok(instant) => instant,
            // 29 February may exist only under Julian rules.
            Err(err) if err.is_illegal_value() && month == 2 && day == 29 => {
                let instant = build(&*cutover.gregorian, 28)?;
                if instant >= cutover.instant {
                    return Err(err);
                }
                instant
            }
            Err(err) => return Err(err),
        };
        if instant >= cutover.instant {
            return Ok(instant);
        }
        let instant = build(&*cutover.julian, day)?;
        if instant >= cutover.instant {
            return Err(Error::nonexistent_date(self.key.to_string(), year, month, day));
        }
        Ok(instant)
    }
}

fn assemble(cutover: &Arc<Cutover>, slots: &mut FieldSlots) -> Result<()> {
    let julian = cutover.julian.fields();
    let gregorian = cutover.gregorian.fields();
    *slots = FieldSlots::from_base(gregorian);

    let sides = |pick: fn(&Fields) -> &Arc<dyn DateTimeField>, at: i64, by_weekyear: bool| Sides {
        cutover: cutover.clone(),
        julian: pick(julian).clone(),
        gregorian: pick(gregorian).clone(),
        at,
        by_weekyear,
    };
    let precise = |pick: fn(&Fields) -> &Arc<dyn DateTimeField>| -> Option<Arc<dyn DateTimeField>> {
        Some(Arc::new(CutoverField::new(sides(pick, cutover.instant, false))))
    };

    // Time fields agree on both sides unless the cutover splits a day.
    if gregorian.millis_of_day.get(cutover.instant)? != 0 {
        slots.millis_of_second = precise(|f| &f.millis_of_second);
        slots.millis_of_day = precise(|f| &f.millis_of_day);
        slots.second_of_minute = precise(|f| &f.second_of_minute);
        slots.second_of_day = precise(|f| &f.second_of_day);
        slots.minute_of_hour = precise(|f| &f.minute_of_hour);
        slots.minute_of_day = precise(|f| &f.minute_of_day);
        slots.hour_of_day = precise(|f| &f.hour_of_day);
        slots.hour_of_halfday = precise(|f| &f.hour_of_halfday);
        slots.clockhour_of_day = precise(|f| &f.clockhour_of_day);
        slots.clockhour_of_halfday = precise(|f| &f.clockhour_of_halfday);
        slots.halfday_of_day = precise(|f| &f.halfday_of_day);
    }

    slots.era = precise(|f| &f.era);

    // Day of year and week of weekyear keep counting Julian-style until the
    // end of the cutover (week)year so the sequence has no hole.
    let year_end = gregorian.year.round_ceiling(cutover.instant)?;
    slots.day_of_year = Some(Arc::new(CutoverField::new(sides(
        |f| &f.day_of_year,
        year_end,
        false,
    ))));
    let weekyear_end = gregorian.weekyear.round_ceiling(cutover.instant)?;
    slots.week_of_weekyear = Some(Arc::new(CutoverField::new(sides(
        |f| &f.week_of_weekyear,
        weekyear_end,
        true,
    ))));

    let year = imprecise_field(sides(|f| &f.year, cutover.instant, false), None);
    let years = year.duration_field().clone();
    slots.year_of_era = Some(imprecise_field(
        sides(|f| &f.year_of_era, cutover.instant, false),
        Some(years.clone()),
    ));
    slots.year_of_century = Some(imprecise_field(
        sides(|f| &f.year_of_century, cutover.instant, false),
        Some(years.clone()),
    ));
    let century_of_era =
        imprecise_field(sides(|f| &f.century_of_era, cutover.instant, false), None);
    slots.centuries = Some(century_of_era.duration_field().clone());
    slots.century_of_era = Some(century_of_era);
    let month = imprecise_field(sides(|f| &f.month_of_year, cutover.instant, false), None);
    let months = month.duration_field().clone();
    slots.month_of_year = Some(month);
    let weekyear = imprecise_field(sides(|f| &f.weekyear, cutover.instant, true), None);
    let weekyears = weekyear.duration_field().clone();
    slots.weekyear_of_century = Some(imprecise_field(
        sides(|f| &f.weekyear_of_century, cutover.instant, false),
        Some(weekyears.clone()),
    ));
    slots.weekyear = Some(weekyear);
    slots.weekyears = Some(weekyears);
    slots.year = Some(year);
    slots.years = Some(years);

    slots.day_of_month = Some(Arc::new(
        CutoverField::new(sides(|f| &f.day_of_month, cutover.instant, false))
            .with_range(months.clone()),
    ));
    slots.months = Some(months);
    Ok(())
}

impl Chronology for GjChronology {
    fn key(&self) -> &ChronologyKey {
        &self.key
    }

    fn zone(&self) -> &Arc<dyn TimeZone> {
        &self.zone
    }

    fn fields(&self) -> &Fields {
        self.assembly.fields()
    }

    fn date_time_millis(&self, year: i32, month: i32, day: i32, millis_of_day: i32) -> Result<i64> {
        self.resolve(year, month, day, |chronology, day| {
            chronology.date_time_millis(year, month, day, millis_of_day)
        })
    }

    fn date_time_millis_hms(
        &self,
        year: i32,
        month: i32,
        day: i32,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        self.resolve(year, month, day, |chronology, day| {
            chronology.date_time_millis_hms(year, month, day, hour, minute, second, millis)
        })
    }

    fn date_time_millis_at(
        &self,
        instant: i64,
        hour: i32,
        minute: i32,
        second: i32,
        millis: i32,
    ) -> Result<i64> {
        self.assembly
            .date_time_millis_at(instant, hour, minute, second, millis)
    }

    fn with_zone(
        &self,
        cache: &ChronologyCache,
        zone: Arc<dyn TimeZone>,
    ) -> Result<Arc<dyn Chronology>> {
        cache.calendar(
            CalendarSystem::Gj {
                cutover: self.cutover.instant,
                min_days_in_first_week: self.min_days_in_first_week,
            },
            zone,
        )
    }
}

/// The GJ chronology with the 1582 cutover and ISO weeks.
pub fn instance(zone: Arc<dyn TimeZone>) -> Result<Arc<dyn Chronology>> {
    ChronologyCache::global().calendar(
        CalendarSystem::Gj {
            cutover: DEFAULT_CUTOVER,
            min_days_in_first_week: 4,
        },
        zone,
    )
}

pub fn instance_with(
    zone: Arc<dyn TimeZone>,
    cutover: i64,
    min_days_in_first_week: i32,
) -> Result<Arc<dyn Chronology>> {
    ChronologyCache::global().calendar(
        CalendarSystem::Gj {
            cutover,
            min_days_in_first_week,
        },
        zone,
    )
}
