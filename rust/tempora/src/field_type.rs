//! Identifiers for duration units and calendar components.

use std::fmt;

/// A unit of elapsed time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DurationFieldType {
    Eras,
    Centuries,
    Weekyears,
    Years,
    Months,
    Weeks,
    Days,
    Halfdays,
    Hours,
    Minutes,
    Seconds,
    Millis,
}

impl DurationFieldType {
    pub const ALL: [DurationFieldType; 12] = [
        DurationFieldType::Eras,
        DurationFieldType::Centuries,
        DurationFieldType::Weekyears,
        DurationFieldType::Years,
        DurationFieldType::Months,
        DurationFieldType::Weeks,
        DurationFieldType::Days,
        DurationFieldType::Halfdays,
        DurationFieldType::Hours,
        DurationFieldType::Minutes,
        DurationFieldType::Seconds,
        DurationFieldType::Millis,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            DurationFieldType::Eras => "eras",
            DurationFieldType::Centuries => "centuries",
            DurationFieldType::Weekyears => "weekyears",
            DurationFieldType::Years => "years",
            DurationFieldType::Months => "months",
            DurationFieldType::Weeks => "weeks",
            DurationFieldType::Days => "days",
            DurationFieldType::Halfdays => "halfdays",
            DurationFieldType::Hours => "hours",
            DurationFieldType::Minutes => "minutes",
            DurationFieldType::Seconds => "seconds",
            DurationFieldType::Millis => "millis",
        }
    }
}

impl fmt::Display for DurationFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single calendar component, such as the month of the year or the hour of the day.
///
/// Each component is measured in the unit returned by [`duration_type`](Self::duration_type)
/// and repeats within the unit returned by [`range_duration_type`](Self::range_duration_type).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DateTimeFieldType {
    Era,
    YearOfEra,
    CenturyOfEra,
    YearOfCentury,
    Year,
    DayOfYear,
    MonthOfYear,
    DayOfMonth,
    WeekyearOfCentury,
    Weekyear,
    WeekOfWeekyear,
    DayOfWeek,
    HalfdayOfDay,
    HourOfHalfday,
    ClockhourOfHalfday,
    ClockhourOfDay,
    HourOfDay,
    MinuteOfDay,
    MinuteOfHour,
    SecondOfDay,
    SecondOfMinute,
    MillisOfDay,
    MillisOfSecond,
}

impl DateTimeFieldType {
    pub const ALL: [DateTimeFieldType; 23] = [
        DateTimeFieldType::Era,
        DateTimeFieldType::YearOfEra,
        DateTimeFieldType::CenturyOfEra,
        DateTimeFieldType::YearOfCentury,
        DateTimeFieldType::Year,
        DateTimeFieldType::DayOfYear,
        DateTimeFieldType::MonthOfYear,
        DateTimeFieldType::DayOfMonth,
        DateTimeFieldType::WeekyearOfCentury,
        DateTimeFieldType::Weekyear,
        DateTimeFieldType::WeekOfWeekyear,
        DateTimeFieldType::DayOfWeek,
        DateTimeFieldType::HalfdayOfDay,
        DateTimeFieldType::HourOfHalfday,
        DateTimeFieldType::ClockhourOfHalfday,
        DateTimeFieldType::ClockhourOfDay,
        DateTimeFieldType::HourOfDay,
        DateTimeFieldType::MinuteOfDay,
        DateTimeFieldType::MinuteOfHour,
        DateTimeFieldType::SecondOfDay,
        DateTimeFieldType::SecondOfMinute,
        DateTimeFieldType::MillisOfDay,
        DateTimeFieldType::MillisOfSecond,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            DateTimeFieldType::Era => "era",
            DateTimeFieldType::YearOfEra => "yearOfEra",
            DateTimeFieldType::CenturyOfEra => "centuryOfEra",
            DateTimeFieldType::YearOfCentury => "yearOfCentury",
            DateTimeFieldType::Year => "year",
            DateTimeFieldType::DayOfYear => "dayOfYear",
            DateTimeFieldType::MonthOfYear => "monthOfYear",
            DateTimeFieldType::DayOfMonth => "dayOfMonth",
            DateTimeFieldType::WeekyearOfCentury => "weekyearOfCentury",
            DateTimeFieldType::Weekyear => "weekyear",
            DateTimeFieldType::WeekOfWeekyear => "weekOfWeekyear",
            DateTimeFieldType::DayOfWeek => "dayOfWeek",
            DateTimeFieldType::HalfdayOfDay => "halfdayOfDay",
            DateTimeFieldType::HourOfHalfday => "hourOfHalfday",
            DateTimeFieldType::ClockhourOfHalfday => "clockhourOfHalfday",
            DateTimeFieldType::ClockhourOfDay => "clockhourOfDay",
            DateTimeFieldType::HourOfDay => "hourOfDay",
            DateTimeFieldType::MinuteOfDay => "minuteOfDay",
            DateTimeFieldType::MinuteOfHour => "minuteOfHour",
            DateTimeFieldType::SecondOfDay => "secondOfDay",
            DateTimeFieldType::SecondOfMinute => "secondOfMinute",
            DateTimeFieldType::MillisOfDay => "millisOfDay",
            DateTimeFieldType::MillisOfSecond => "millisOfSecond",
        }
    }

    /// The unit this component counts in.
    pub const fn duration_type(self) -> DurationFieldType {
        use DateTimeFieldType::*;
        match self {
            Era => DurationFieldType::Eras,
            YearOfEra | YearOfCentury | Year => DurationFieldType::Years,
            CenturyOfEra => DurationFieldType::Centuries,
            DayOfYear | DayOfMonth | DayOfWeek => DurationFieldType::Days,
            MonthOfYear => DurationFieldType::Months,
            WeekyearOfCentury | Weekyear => DurationFieldType::Weekyears,
            WeekOfWeekyear => DurationFieldType::Weeks,
            HalfdayOfDay => DurationFieldType::Halfdays,
            HourOfHalfday | ClockhourOfHalfday | ClockhourOfDay | HourOfDay => {
                DurationFieldType::Hours
            }
            MinuteOfDay | MinuteOfHour => DurationFieldType::Minutes,
            SecondOfDay | SecondOfMinute => DurationFieldType::Seconds,
            MillisOfDay | MillisOfSecond => DurationFieldType::Millis,
        }
    }

    /// The unit of the next-larger component, or `None` for the unbounded ones
    /// (era, year, weekyear).
    pub const fn range_duration_type(self) -> Option<DurationFieldType> {
        use DateTimeFieldType::*;
        match self {
            Era | Year | Weekyear => None,
            YearOfEra | CenturyOfEra => Some(DurationFieldType::Eras),
            YearOfCentury | WeekyearOfCentury => Some(DurationFieldType::Centuries),
            DayOfYear | MonthOfYear => Some(DurationFieldType::Years),
            DayOfMonth => Some(DurationFieldType::Months),
            WeekOfWeekyear => Some(DurationFieldType::Weekyears),
            DayOfWeek => Some(DurationFieldType::Weeks),
            HalfdayOfDay | ClockhourOfDay | HourOfDay | MinuteOfDay | SecondOfDay
            | MillisOfDay => Some(DurationFieldType::Days),
            HourOfHalfday | ClockhourOfHalfday => Some(DurationFieldType::Halfdays),
            MinuteOfHour => Some(DurationFieldType::Hours),
            SecondOfMinute => Some(DurationFieldType::Minutes),
            MillisOfSecond => Some(DurationFieldType::Seconds),
        }
    }
}

impl fmt::Display for DateTimeFieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = DateTimeFieldType::ALL.iter().map(|t| t.name()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), DateTimeFieldType::ALL.len());
    }

    #[test]
    fn range_is_coarser_than_unit() {
        for t in DateTimeFieldType::ALL {
            if let Some(range) = t.range_duration_type() {
                // The enum is declared from coarsest to finest unit.
                assert!(range < t.duration_type(), "{t}: {range} vs {}", t.duration_type());
            }
        }
    }

    #[test]
    fn display() {
        assert_eq!(DateTimeFieldType::ClockhourOfHalfday.to_string(), "clockhourOfHalfday");
        assert_eq!(DurationFieldType::Weekyears.to_string(), "weekyears");
    }
}
