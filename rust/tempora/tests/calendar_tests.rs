use std::ops::RangeInclusive;
use std::sync::Arc;

use tempora::calendars::{LeapYearPattern, gregorian, julian};
use tempora::{CalendarSystem, Chronology, ChronologyCache, MILLIS_PER_DAY};
use tempora_common::ErrorKind;
use tempora_testkit::lunisolar::{SAMPLE_FIRST_YEAR, SAMPLE_START_DAY, sample_table};
use tempora_testkit::sweep::{self, DEFAULT_SEED};

const YEARS_3000: i64 = 3000 * 365 * MILLIS_PER_DAY;

fn calendars(cache: &ChronologyCache) -> Vec<(Arc<dyn Chronology>, RangeInclusive<i64>)> {
    let wide = -YEARS_3000..=YEARS_3000;
    // Year 1 AH falls in 622 CE.
    let hijri = -460_000 * MILLIS_PER_DAY..=YEARS_3000;
    // Inside the 38 years of the sample table.
    let table = SAMPLE_START_DAY * MILLIS_PER_DAY..=(SAMPLE_START_DAY + 13_500) * MILLIS_PER_DAY;
    let systems = [
        (CalendarSystem::Iso, wide.clone()),
        (CalendarSystem::Gregorian { min_days_in_first_week: 4 }, wide.clone()),
        (CalendarSystem::Gregorian { min_days_in_first_week: 1 }, wide.clone()),
        (CalendarSystem::Julian { min_days_in_first_week: 4 }, wide.clone()),
        (
            CalendarSystem::Gj {
                cutover: tempora::decorators::DEFAULT_CUTOVER,
                min_days_in_first_week: 4,
            },
            wide.clone(),
        ),
        (CalendarSystem::Coptic { min_days_in_first_week: 4 }, wide.clone()),
        (CalendarSystem::Ethiopic { min_days_in_first_week: 4 }, wide.clone()),
        (CalendarSystem::Islamic { leap_years: LeapYearPattern::Base16 }, hijri.clone()),
        (CalendarSystem::Islamic { leap_years: LeapYearPattern::HabashAlHasib }, hijri),
        (CalendarSystem::Buddhist, wide),
        (
            CalendarSystem::Lunisolar {
                table: sample_table(),
                min_days_in_first_week: 4,
            },
            table,
        ),
    ];
    systems
        .into_iter()
        .map(|(system, range)| (cache.calendar_utc(system).unwrap(), range))
        .collect()
}

#[test]
fn test_fields_round_trip_to_instant() {
    let cache = ChronologyCache::new();
    for (chronology, range) in calendars(&cache) {
        let fields = chronology.fields();
        for instant in sweep::instants(DEFAULT_SEED, 2_000, range) {
            let year = fields.year.get(instant).unwrap();
            let month = fields.month_of_year.get(instant).unwrap();
            let day = fields.day_of_month.get(instant).unwrap();
            let millis = fields.millis_of_day.get(instant).unwrap();
            let rebuilt = chronology.date_time_millis(year, month, day, millis).unwrap();
            assert_eq!(
                rebuilt, instant,
                "{} {year}-{month}-{day} +{millis}",
                chronology.key()
            );
        }
    }
}

#[test]
fn test_hms_construction_matches_millis_of_day() {
    let cache = ChronologyCache::new();
    for (chronology, _) in calendars(&cache) {
        let fields = chronology.fields();
        let start = fields.year.round_floor(SAMPLE_START_DAY * MILLIS_PER_DAY).unwrap();
        let year = fields.year.get(start).unwrap();
        let a = chronology.date_time_millis(year, 2, 3, 45_296_789).unwrap();
        let b = chronology.date_time_millis_hms(year, 2, 3, 12, 34, 56, 789).unwrap();
        assert_eq!(a, b, "{}", chronology.key());
        let c = chronology.date_time_millis_at(a + 5_000_000, 12, 34, 56, 789).unwrap();
        assert_eq!(a, c, "{}", chronology.key());
        assert!(chronology.date_time_millis_hms(year, 2, 3, 24, 0, 0, 0).is_err());
    }
}

fn days_in_year(chronology: &dyn Chronology, year: i32) -> i64 {
    let fields = chronology.fields();
    let start = chronology.date_time_millis(year, 1, 1, 0).unwrap();
    let end = fields.years.add(start, 1).unwrap();
    fields.days.difference(end, start).unwrap()
}

#[test]
fn test_leap_years_match_year_lengths() {
    let cache = ChronologyCache::new();
    let cases: [(CalendarSystem, fn(i32) -> bool, i64, RangeInclusive<i32>); 4] = [
        (
            CalendarSystem::Gregorian { min_days_in_first_week: 4 },
            gregorian::is_leap_year,
            365,
            -500..=2500,
        ),
        (
            CalendarSystem::Julian { min_days_in_first_week: 4 },
            julian::is_leap_year,
            365,
            1..=2500,
        ),
        (
            CalendarSystem::Coptic { min_days_in_first_week: 4 },
            |y| y.rem_euclid(4) == 3,
            365,
            1..=2500,
        ),
        (
            CalendarSystem::Islamic { leap_years: LeapYearPattern::Indian },
            |y| LeapYearPattern::Indian.is_leap_year(y),
            354,
            1..=1500,
        ),
    ];
    for (system, is_leap, common, years) in cases {
        let chronology = cache.calendar_utc(system).unwrap();
        let fields = chronology.fields();
        for year in years {
            let leap = is_leap(year);
            let days = days_in_year(&*chronology, year);
            assert_eq!(days, common + leap as i64, "{} year {year}", chronology.key());
            let mid = chronology.date_time_millis(year, 3, 1, 0).unwrap();
            assert_eq!(fields.year.is_leap(mid).unwrap(), leap, "{} year {year}", chronology.key());
            assert_eq!(fields.year.leap_amount(mid).unwrap(), leap as i32);
        }
    }
}

#[test]
fn test_thirteenth_month_tracks_leap_years() {
    let cache = ChronologyCache::new();
    for system in [
        CalendarSystem::Coptic { min_days_in_first_week: 4 },
        CalendarSystem::Ethiopic { min_days_in_first_week: 4 },
    ] {
        let chronology = cache.calendar_utc(system).unwrap();
        let fields = chronology.fields();
        for year in 1700..1720 {
            let epagomenal = chronology.date_time_millis(year, 13, 1, 0).unwrap();
            let length = fields.day_of_month.max_value_at(epagomenal).unwrap();
            let leap = fields.year.is_leap(epagomenal).unwrap();
            assert_eq!(length, if leap { 6 } else { 5 }, "{} year {year}", chronology.key());
        }
    }
}

#[test]
fn test_lunisolar_leap_years_come_from_the_table() {
    let cache = ChronologyCache::new();
    let table = sample_table();
    let chronology = cache
        .calendar_utc(CalendarSystem::Lunisolar {
            table: table.clone(),
            min_days_in_first_week: 4,
        })
        .unwrap();
    let fields = chronology.fields();
    for (i, entry) in table.years.iter().enumerate() {
        let year = SAMPLE_FIRST_YEAR + i as i32;
        let start = chronology.date_time_millis(year, 1, 1, 0).unwrap();
        let expected: i64 = entry.months.iter().map(|&d| d as i64).sum::<i64>()
            + entry.intercalary.map_or(0, |m| m.length as i64);
        assert_eq!(days_in_year(&*chronology, year), expected, "year {year}");
        assert_eq!(fields.year.is_leap(start).unwrap(), entry.intercalary.is_some());
        let months = fields.month_of_year.max_value_at(start).unwrap();
        assert_eq!(months, if entry.intercalary.is_some() { 13 } else { 12 });
    }
}

#[test]
fn test_fields_advance_monotonically() {
    let cache = ChronologyCache::new();
    for (chronology, range) in calendars(&cache) {
        let fields = chronology.fields();
        let start = (*range.start()).max(-1000 * MILLIS_PER_DAY);
        let start = fields.year.round_floor(start).unwrap();
        let mut prev = (
            fields.year.get(start).unwrap(),
            fields.day_of_year.get(start).unwrap(),
            fields.day_of_month.get(start).unwrap(),
        );
        let mut instant = start;
        for _ in 0..(4 * 366) {
            instant = fields.days.add(instant, 1).unwrap();
            let next = (
                fields.year.get(instant).unwrap(),
                fields.day_of_year.get(instant).unwrap(),
                fields.day_of_month.get(instant).unwrap(),
            );
            let key = chronology.key();
            if next.0 == prev.0 {
                assert!(next.1 == prev.1 + 1, "{key}: day of year {prev:?} -> {next:?}");
            } else {
                assert!(next.0 > prev.0 && next.1 == 1, "{key}: year {prev:?} -> {next:?}");
            }
            assert!(next.2 > prev.2 || next.2 == 1, "{key}: day of month {prev:?} -> {next:?}");
            prev = next;
        }
    }
}

#[test]
fn test_gj_fields_advance_across_the_cutover() {
    let cache = ChronologyCache::new();
    let gj = cache
        .calendar_utc(CalendarSystem::Gj {
            cutover: tempora::decorators::DEFAULT_CUTOVER,
            min_days_in_first_week: 4,
        })
        .unwrap();
    let fields = gj.fields();
    let mut instant = gj.date_time_millis(1582, 9, 1, 0).unwrap();
    let mut prev = fields.day_of_month.get(instant).unwrap();
    for _ in 0..90 {
        instant = fields.days.add(instant, 1).unwrap();
        let next = fields.day_of_month.get(instant).unwrap();
        assert!(next > prev || next == 1, "{prev} -> {next}");
        prev = next;
    }
}

#[test]
fn test_year_range_extremes() {
    let cache = ChronologyCache::new();
    for (chronology, range) in calendars(&cache) {
        let key = chronology.key().to_string();
        let year = &chronology.fields().year;
        let (min, max) = (year.min_value(), year.max_value());
        let mut extremes = vec![max];
        // Cutover years (GJ, and Buddhist on top of it) advertise the
        // Gregorian minimum, which the Julian side cannot reach.
        if !key.starts_with("GJChronology") && !key.starts_with("BuddhistChronology") {
            extremes.push(min);
        }
        // 1970 sits on the Gregorian side of the cutover.
        let origin = if range.contains(&0) { 0 } else { *range.start() };
        for value in extremes {
            let start = chronology
                .date_time_millis(value, 1, 1, 0)
                .unwrap_or_else(|err| panic!("{key} {value}: {err}"));
            assert_eq!(year.get(start).unwrap(), value, "{key}");
            let moved = year
                .set(origin, value)
                .unwrap_or_else(|err| panic!("{key} {value}: {err}"));
            assert_eq!(year.get(moved).unwrap(), value, "{key}");
        }
        assert!(year.set(origin, max + 1).is_err(), "{key}");
        assert!(chronology.date_time_millis(max + 1, 1, 1, 0).is_err(), "{key}");
        assert!(year.set(origin, min - 1).is_err(), "{key}");
    }
}

#[test]
fn test_julian_reaches_its_last_year() {
    let cache = ChronologyCache::new();
    let julian = cache
        .calendar_utc(CalendarSystem::Julian { min_days_in_first_week: 4 })
        .unwrap();
    let fields = julian.fields();
    // The epoch is 1969-12-19 in the Julian calendar.
    let moved = fields.year.set(0, julian::MAX_YEAR).unwrap();
    assert_eq!(moved, julian.date_time_millis(julian::MAX_YEAR, 12, 19, 0).unwrap());
    let last = julian
        .date_time_millis(julian::MAX_YEAR, 12, 31, (MILLIS_PER_DAY - 1) as i32)
        .unwrap();
    assert_eq!(fields.year.get(last).unwrap(), julian::MAX_YEAR);
    assert_eq!(fields.day_of_year.get(last).unwrap(), 366);
}

#[test]
fn test_table_calendar_rejects_instants_outside_its_years() {
    let cache = ChronologyCache::new();
    let lunisolar = cache
        .calendar_utc(CalendarSystem::Lunisolar {
            table: sample_table(),
            min_days_in_first_week: 4,
        })
        .unwrap();
    let year = &lunisolar.fields().year;
    let last = year.max_value();
    for instant in [0, (SAMPLE_START_DAY + 20_000) * MILLIS_PER_DAY] {
        for value in [SAMPLE_FIRST_YEAR, last] {
            let err = year.set(instant, value).unwrap_err();
            assert!(matches!(err.kind(), ErrorKind::YearOutOfRange { .. }), "{err}");
        }
        assert!(year.get(instant).is_err());
        assert!(lunisolar.fields().months.add(instant, 1).is_err());
    }
    let inside = SAMPLE_START_DAY * MILLIS_PER_DAY;
    let moved = year.set(inside, last).unwrap();
    assert_eq!(year.get(moved).unwrap(), last);
}
