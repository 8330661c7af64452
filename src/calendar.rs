use chrono::{Datelike, NaiveDate};

/// Holiday lookup injected into the aggregation run. Kept as a trait so
/// tests can swap in a fixed calendar.
pub trait HolidayCalendar {
    fn is_holiday(&self, date: NaiveDate) -> bool;
}

/// Italian national holidays:
/// * New Year's Day (Jan 1)
/// * Epiphany (Jan 6)
/// * Easter Monday
/// * Liberation Day (Apr 25)
/// * Labour Day (May 1)
/// * Republic Day (Jun 2)
/// * Assumption Day (Aug 15)
/// * All Saints' Day (Nov 1)
/// * Immaculate Conception (Dec 8)
/// * Christmas Day (Dec 25)
/// * St. Stephen's Day (Dec 26)
///
/// Sundays are not part of this set; the band classifier handles them from
/// the weekday directly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ItalianHolidays;

impl HolidayCalendar for ItalianHolidays {
    fn is_holiday(&self, date: NaiveDate) -> bool {
        let m = date.month();
        let d = date.day();
        matches!(
            (m, d),
            (1, 1)
                | (1, 6)
                | (4, 25)
                | (5, 1)
                | (6, 2)
                | (8, 15)
                | (11, 1)
                | (12, 8)
                | (12, 25)
                | (12, 26)
        ) || date == easter_monday(date.year())
    }
}

/// Anonymous Gregorian computus, then one day forward.
fn easter_monday(year: i32) -> NaiveDate {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = (h + l - 7 * m + 114) % 31 + 1;
    let sunday = NaiveDate::from_ymd_opt(year, month as u32, day as u32).unwrap();
    sunday.succ_opt().unwrap()
}
