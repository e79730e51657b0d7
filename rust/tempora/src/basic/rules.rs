use std::fmt;

/// How the era field of a calendar is numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraStyle {
    /// Two eras: 0 before year 1, 1 from year 1 on (BCE/CE).
    BeforeAndCommon,
    /// A single era with value 1 covering every year.
    Single,
}

/// The per-calendar contract the generic arithmetic core is built on.
///
/// Implementations describe one calendar's year and month structure; the
/// core in [`BasicCalendar`](super::BasicCalendar) derives every field from
/// these answers. Years here are the calendar's arithmetic years, which may
/// include a year zero even when the public numbering skips it.
pub trait CalendarRules: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    fn min_year(&self) -> i32;

    fn max_year(&self) -> i32;

    fn is_leap_year(&self, year: i32) -> bool;

    /// Largest month number in any year.
    fn max_month(&self) -> i32 {
        12
    }

    fn months_in_year(&self, _year: i32) -> i32 {
        self.max_month()
    }

    /// `true` when the month count differs between years.
    fn months_vary(&self) -> bool {
        false
    }

    fn days_in_year_month(&self, year: i32, month: i32) -> i32;

    /// Longest length of `month` across all years.
    fn days_in_month_max(&self, month: i32) -> i32;

    fn days_in_month_max_overall(&self) -> i32 {
        31
    }

    fn days_in_year(&self, year: i32) -> i32 {
        if self.is_leap_year(year) { 366 } else { 365 }
    }

    fn days_in_year_max(&self) -> i32 {
        366
    }

    /// First instant of `year`, computed without caching.
    fn first_day_of_year_millis(&self, year: i32) -> i64;

    fn average_millis_per_year(&self) -> i64;

    fn average_millis_per_year_div2(&self) -> i64 {
        self.average_millis_per_year() / 2
    }

    fn average_millis_per_month(&self) -> i64;

    /// `(year_at_epoch * average_millis_per_year + millis_of_year_at_epoch) / 2`,
    /// the seed of the year estimate.
    fn approx_millis_at_epoch_div2(&self) -> i64;

    /// Month containing `millis_of_year`, the offset from the start of `year`.
    fn month_of_year(&self, millis_of_year: i64, year: i32) -> i32;

    /// Offset from the start of `year` to the start of `month`.
    fn millis_to_month_start(&self, year: i32, month: i32) -> i64;

    /// `true` when `month` of `year` is a leap month (longer than usual or
    /// intercalated).
    fn is_leap_month(&self, year: i32, month: i32) -> bool;

    fn is_leap_day(&self, year: i32, month: i32, day: i32) -> bool {
        self.is_leap_month(year, month) && day == self.days_in_year_month(year, month)
    }

    fn era_style(&self) -> EraStyle {
        EraStyle::BeforeAndCommon
    }

    /// `true` when the public year numbering has no year zero: arithmetic
    /// year 0 is presented as -1.
    fn skips_year_zero(&self) -> bool {
        false
    }
}
