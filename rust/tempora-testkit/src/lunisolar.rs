//! A small lunisolar table for tests.

use std::sync::Arc;

use tempora::calendars::{IntercalaryMonth, LunisolarTable, LunisolarYear};

/// Leap positions within a 19-year cycle.
const LEAP_YEARS: [usize; 7] = [2, 5, 7, 10, 13, 15, 18];

/// Days from the epoch to 2000-01-01, where the sample table starts.
pub const SAMPLE_START_DAY: i64 = 10_957;

pub const SAMPLE_FIRST_YEAR: i32 = 5000;

/// Two 19-year cycles named "Sample", starting at year 5000 on
/// 2000-01-01. Leap years insert a 29-day month after month 6; months
/// otherwise alternate 30 and 29 days, with month 12 lengthened to 30
/// in every third year.
pub fn sample_table() -> Arc<LunisolarTable> {
    let years = (0..38)
        .map(|i| {
            let mut months: Vec<u8> = (0..12).map(|m| if m % 2 == 0 { 30 } else { 29 }).collect();
            if i % 3 == 0 {
                months[11] = 30;
            }
            let intercalary = LEAP_YEARS
                .contains(&(i % 19))
                .then_some(IntercalaryMonth { after: 6, length: 29 });
            LunisolarYear { months, intercalary }
        })
        .collect();
    Arc::new(LunisolarTable {
        name: "Sample".to_string(),
        first_year: SAMPLE_FIRST_YEAR,
        first_year_start_day: SAMPLE_START_DAY,
        years,
    })
}
