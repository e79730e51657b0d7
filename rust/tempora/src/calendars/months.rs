//! Month structure shared by the Gregorian and Julian rule sets.

use crate::MILLIS_PER_DAY;

const DAYS_IN_MONTH: [i32; 12] = [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];
const DAYS_IN_MONTH_LEAP: [i32; 12] = [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31];

/// Days before the first of each month.
const DAYS_BEFORE_MONTH: [i32; 12] = [0, 31, 59, 90, 120, 151, 181, 212, 243, 273, 304, 334];
const DAYS_BEFORE_MONTH_LEAP: [i32; 12] = [0, 31, 60, 91, 121, 152, 182, 213, 244, 274, 305, 335];

fn index(month: i32) -> usize {
    (month.clamp(1, 12) - 1) as usize
}

pub(crate) fn days_in_month(month: i32, leap: bool) -> i32 {
    if leap {
        DAYS_IN_MONTH_LEAP[index(month)]
    } else {
        DAYS_IN_MONTH[index(month)]
    }
}

pub(crate) fn days_in_month_max(month: i32) -> i32 {
    DAYS_IN_MONTH_LEAP[index(month)]
}

pub(crate) fn millis_to_month_start(month: i32, leap: bool) -> i64 {
    let days = if leap {
        DAYS_BEFORE_MONTH_LEAP[index(month)]
    } else {
        DAYS_BEFORE_MONTH[index(month)]
    };
    days as i64 * MILLIS_PER_DAY
}

pub(crate) fn month_of_year(millis_of_year: i64, leap: bool) -> i32 {
    let day = (millis_of_year / MILLIS_PER_DAY) as i32;
    let table = if leap {
        &DAYS_BEFORE_MONTH_LEAP
    } else {
        &DAYS_BEFORE_MONTH
    };
    table.partition_point(|&start| start <= day) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_boundaries() {
        assert_eq!(month_of_year(0, false), 1);
        assert_eq!(month_of_year(30 * MILLIS_PER_DAY, false), 1);
        assert_eq!(month_of_year(31 * MILLIS_PER_DAY, false), 2);
        assert_eq!(month_of_year(59 * MILLIS_PER_DAY, false), 3);
        assert_eq!(month_of_year(59 * MILLIS_PER_DAY, true), 2);
        assert_eq!(month_of_year(365 * MILLIS_PER_DAY - 1, true), 12);
        assert_eq!(millis_to_month_start(3, true), 60 * MILLIS_PER_DAY);
        assert_eq!(days_in_month(2, true), 29);
        assert_eq!(days_in_month_max(2), 29);
    }
}
