use crate::models::Band;
use chrono::{Datelike, NaiveDate, Weekday};

/// Classify one hourly quote into its tariff band.
///
/// F1 = Mon-Fri 8-19
/// F2 = Mon-Fri 7-8, Mon-Fri 19-23, Sat 7-23
/// F3 = Mon-Sat 0-7, Mon-Sat 23-24, Sundays, holidays
///
/// `hour` must already be adjusted to 0-23 (the sheet encodes 1-24).
pub fn band_for(date: NaiveDate, is_holiday: bool, hour: u32) -> Band {
    debug_assert!(hour < 24);
    match date.weekday() {
        _ if is_holiday => Band::F3,
        Weekday::Sun => Band::F3,
        Weekday::Sat => {
            if (7..23).contains(&hour) {
                Band::F2
            } else {
                Band::F3
            }
        }
        _ => {
            if hour == 7 || (19..23).contains(&hour) {
                Band::F2
            } else if hour == 23 || hour < 7 {
                Band::F3
            } else {
                Band::F1
            }
        }
    }
}
