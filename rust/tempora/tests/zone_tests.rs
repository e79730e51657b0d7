use std::sync::Arc;

use tempora::zone::{self, FixedOffsetZone};
use tempora::{CalendarSystem, Chronology, ChronologyCache, MILLIS_PER_HOUR, TimeZone};
use tempora_common::ErrorKind;
use tempora_testkit::sweep::{self, DEFAULT_SEED};
use tempora_testkit::zone::DstZone;

fn central() -> Arc<dyn TimeZone> {
    DstZone::central_european(1995, 2015).unwrap().shared()
}

fn local_fields(chronology: &dyn Chronology, instant: i64) -> [i32; 7] {
    let f = chronology.fields();
    [
        f.year.get(instant).unwrap(),
        f.month_of_year.get(instant).unwrap(),
        f.day_of_month.get(instant).unwrap(),
        f.hour_of_day.get(instant).unwrap(),
        f.minute_of_hour.get(instant).unwrap(),
        f.second_of_minute.get(instant).unwrap(),
        f.millis_of_second.get(instant).unwrap(),
    ]
}

#[test]
fn test_local_fields_survive_a_round_trip() {
    let cache = ChronologyCache::new();
    let zone = central();
    for system in [
        CalendarSystem::Iso,
        CalendarSystem::Julian { min_days_in_first_week: 4 },
        CalendarSystem::Coptic { min_days_in_first_week: 4 },
        CalendarSystem::Buddhist,
    ] {
        let chronology = cache.calendar(system, zone.clone()).unwrap();
        let utc = chronology.with_utc(&cache).unwrap();
        // 1996 through 2014.
        let range = 820_454_400_000..=1_420_070_400_000;
        for instant in sweep::instants(DEFAULT_SEED, 1_000, range) {
            let [y, mo, d, h, mi, s, ms] = local_fields(&*chronology, instant);
            let rebuilt = chronology.date_time_millis_hms(y, mo, d, h, mi, s, ms).unwrap();
            assert_eq!(
                local_fields(&*chronology, rebuilt),
                [y, mo, d, h, mi, s, ms],
                "{} at {instant}",
                chronology.key()
            );
            let offset = zone.offset_at(instant) as i64;
            assert_eq!(local_fields(&*utc, instant + offset), [y, mo, d, h, mi, s, ms]);
        }
    }
}

#[test]
fn test_local_time_in_gap_is_rejected() {
    let cache = ChronologyCache::new();
    let iso = cache.calendar(CalendarSystem::Iso, central()).unwrap();
    for minute in [0, 30, 59] {
        let err = iso.date_time_millis_hms(2004, 3, 28, 2, minute, 0, 0).unwrap_err();
        assert!(
            matches!(err.kind(), ErrorKind::IllegalInstant { zone, .. } if zone == "Test/Central"),
            "{err}"
        );
    }
    let before = iso.date_time_millis_hms(2004, 3, 28, 1, 59, 59, 999).unwrap();
    let after = iso.date_time_millis_hms(2004, 3, 28, 3, 0, 0, 0).unwrap();
    assert_eq!(after - before, 1);

    let half_past_one = iso.date_time_millis_hms(2004, 3, 28, 1, 30, 0, 0).unwrap();
    let err = iso.fields().hour_of_day.set(half_past_one, 2).unwrap_err();
    assert!(matches!(err.kind(), ErrorKind::IllegalInstant { .. }), "{err}");
    let later = iso.fields().hours.add(half_past_one, 1).unwrap();
    assert_eq!(iso.fields().hour_of_day.get(later).unwrap(), 3);
    assert_eq!(iso.fields().minute_of_hour.get(later).unwrap(), 30);
}

#[test]
fn test_overlap_resolves_to_the_earlier_offset() {
    let cache = ChronologyCache::new();
    let zone = central();
    let iso = cache.calendar(CalendarSystem::Iso, zone.clone()).unwrap();
    let utc = cache.calendar_utc(CalendarSystem::Iso).unwrap();
    let t = iso.date_time_millis_hms(2004, 10, 31, 2, 30, 0, 0).unwrap();
    assert_eq!(t, utc.date_time_millis_hms(2004, 10, 31, 0, 30, 0, 0).unwrap());
    assert_eq!(zone.offset_at(t), 2 * MILLIS_PER_HOUR as i32);
    let second = t + MILLIS_PER_HOUR;
    assert_eq!(iso.fields().hour_of_day.get(second).unwrap(), 2);
    assert_eq!(zone.offset_at(second), MILLIS_PER_HOUR as i32);
}

#[test]
fn test_day_arithmetic_keeps_wall_time_across_transitions() {
    let cache = ChronologyCache::new();
    let iso = cache.calendar(CalendarSystem::Iso, central()).unwrap();
    let fields = iso.fields();
    let saturday = iso.date_time_millis_hms(2004, 3, 27, 12, 0, 0, 0).unwrap();
    let sunday = fields.days.add(saturday, 1).unwrap();
    assert_eq!(sunday - saturday, 23 * MILLIS_PER_HOUR);
    assert_eq!(fields.hour_of_day.get(sunday).unwrap(), 12);
    assert_eq!(fields.days.difference(sunday, saturday).unwrap(), 1);
    assert!(!fields.days.is_precise());
    assert!(fields.hours.is_precise());

    let start = fields.day_of_month.round_floor(sunday).unwrap();
    assert_eq!(iso.fields().hour_of_day.get(start).unwrap(), 0);
    let end = fields.day_of_month.round_ceiling(sunday).unwrap();
    assert_eq!(end - start, 23 * MILLIS_PER_HOUR);
}

#[test]
fn test_zone_navigation() {
    let cache = ChronologyCache::new();
    let zone = central();
    let utc = cache.calendar_utc(CalendarSystem::Iso).unwrap();
    let zoned = utc.with_zone(&cache, zone.clone()).unwrap();
    assert_eq!(zoned.key().to_string(), "ISOChronology[Test/Central]");
    assert_eq!(zoned.zone().id(), "Test/Central");
    let back = zoned.with_utc(&cache).unwrap();
    assert!(Arc::ptr_eq(&back, &utc));
    let again = cache.calendar(CalendarSystem::Iso, zone).unwrap();
    assert!(Arc::ptr_eq(&again, &zoned));

    let fixed: Arc<dyn TimeZone> = Arc::new(FixedOffsetZone::new(0).unwrap());
    let same = utc.with_zone(&cache, fixed).unwrap();
    assert!(Arc::ptr_eq(&same, &utc));
}

#[test]
fn test_conversion_helpers() {
    let zone = central();
    let local = cache_iso().date_time_millis_hms(2004, 3, 28, 2, 30, 0, 0).unwrap();
    assert!(zone::is_local_gap(&*zone, local));
    assert!(zone::convert_local_to_utc(&*zone, local, true).is_err());
    let lenient = zone::convert_local_to_utc(&*zone, local, false).unwrap();
    assert_eq!(zone::convert_utc_to_local(&*zone, lenient).unwrap(), local + MILLIS_PER_HOUR);
    let noon = cache_iso().date_time_millis_hms(2004, 7, 1, 12, 0, 0, 0).unwrap();
    assert!(!zone::is_local_gap(&*zone, noon));
    let instant = zone::convert_local_to_utc(&*zone, noon, true).unwrap();
    assert_eq!(noon - instant, 2 * MILLIS_PER_HOUR);
}

#[test]
fn test_era_rounding_in_offset_zones() {
    let cache = ChronologyCache::new();
    let east: Arc<dyn TimeZone> = Arc::new(FixedOffsetZone::new(MILLIS_PER_HOUR as i32).unwrap());
    let west: Arc<dyn TimeZone> = Arc::new(FixedOffsetZone::new(-MILLIS_PER_HOUR as i32).unwrap());

    let coptic = cache
        .calendar(CalendarSystem::Coptic { min_days_in_first_week: 4 }, east.clone())
        .unwrap();
    let era = &coptic.fields().era;
    assert_eq!(era.round_floor(0).unwrap(), i64::MIN);
    assert_eq!(era.round_ceiling(0).unwrap(), i64::MAX);
    assert_eq!(era.round_half_floor(0).unwrap(), i64::MIN);
    assert_eq!(era.round_half_ceiling(0).unwrap(), i64::MIN);

    let gj = cache
        .calendar(
            CalendarSystem::Gj {
                cutover: tempora::decorators::DEFAULT_CUTOVER,
                min_days_in_first_week: 4,
            },
            west,
        )
        .unwrap();
    let era = &gj.fields().era;
    assert_eq!(era.round_ceiling(0).unwrap(), i64::MAX);
    let floor = era.round_floor(0).unwrap();
    assert_eq!(era.get(floor).unwrap(), 1);
    assert_eq!(era.get(floor - 1).unwrap(), 0);
    assert_eq!(gj.fields().hour_of_day.get(floor).unwrap(), 0);

    for system in [CalendarSystem::Iso, CalendarSystem::Buddhist] {
        let chronology = cache.calendar(system, central()).unwrap();
        let era = &chronology.fields().era;
        let summer = 1_090_000_000_000;
        assert!(era.round_floor(summer).is_ok(), "{}", chronology.key());
        assert_eq!(era.round_ceiling(summer).unwrap(), i64::MAX, "{}", chronology.key());
    }
}

fn cache_iso() -> Arc<dyn Chronology> {
    ChronologyCache::global().calendar_utc(CalendarSystem::Iso).unwrap()
}
