use crate::calendar::HolidayCalendar;
use crate::classifier::band_for;
use crate::models::{DateRange, HourlyRecord, MonthBucket, SummaryRow};
use crate::report;
use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use log::debug;

/// Streaming fold over one contiguous date range: classifies each hourly
/// record into its band, accumulates per-band prices for the open month,
/// and emits one summary row per month on rollover and at end of stream.
pub struct MonthlyAggregator<'a> {
    calendar: &'a dyn HolidayCalendar,
    range: DateRange,
}

impl<'a> MonthlyAggregator<'a> {
    pub fn new(calendar: &'a dyn HolidayCalendar, range: DateRange) -> Self {
        Self { calendar, range }
    }

    /// Consume the record stream in order and return one row per calendar
    /// month that had at least one record inside the range. A malformed
    /// record aborts the whole run; a stream that ends before the range
    /// does is not an error.
    pub fn run(
        &self,
        records: impl IntoIterator<Item = Result<HourlyRecord>>,
    ) -> Result<Vec<SummaryRow>> {
        let mut rows = Vec::new();
        let mut current: Option<(i32, u32)> = None;
        let mut bucket = MonthBucket::default();
        // Holiday lookup cache, one date deep: the sheet carries 24 rows
        // per day, no point querying the calendar per hour.
        let mut cached: Option<(NaiveDate, bool)> = None;

        for record in records {
            let record = record?;

            let festivo = match cached {
                Some((date, festivo)) if date == record.date => festivo,
                _ => {
                    let festivo = self.calendar.is_holiday(record.date);
                    cached = Some((record.date, festivo));
                    festivo
                }
            };

            if !self.range.contains(record.date) {
                continue;
            }

            let month = (record.date.year(), record.date.month());
            if current != Some(month) {
                if let Some((year, month)) = current {
                    if !bucket.is_empty() {
                        debug!("flushing {:02}/{} ({} records)", month, year, bucket.monoorario.len());
                        rows.push(report::summarize(year, month, &bucket)?);
                    }
                }
                bucket = MonthBucket::default();
                current = Some(month);
            }

            bucket.push(band_for(record.date, festivo, record.hour), record.price);
        }

        // The last open month is flushed by end-of-stream, not rollover.
        if let Some((year, month)) = current {
            if !bucket.is_empty() {
                debug!("flushing {:02}/{} ({} records)", month, year, bucket.monoorario.len());
                rows.push(report::summarize(year, month, &bucket)?);
            }
        }

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct NoHolidays;

    impl HolidayCalendar for NoHolidays {
        fn is_holiday(&self, _date: NaiveDate) -> bool {
            false
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange { start, end }
    }

    /// 24 hourly records at a flat price for one day.
    fn full_day(d: NaiveDate, price: f64) -> Vec<Result<HourlyRecord>> {
        (0..24)
            .map(|hour| Ok(HourlyRecord { date: d, hour, price }))
            .collect()
    }

    #[test]
    fn one_month_one_row() {
        let aggregator = MonthlyAggregator::new(&NoHolidays, range(date(2024, 1, 1), date(2024, 2, 1)));
        let rows = aggregator.run(full_day(date(2024, 1, 8), 0.1)).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mese, "01/2024");
        assert_eq!(rows[0].mo, "0.100000");
    }

    #[test]
    fn month_rollover_flushes_before_the_new_month_accumulates() {
        let mut records = full_day(date(2024, 1, 8), 0.1);
        records.extend(full_day(date(2024, 1, 9), 0.1));
        // First February day lands in a fresh bucket.
        records.extend(full_day(date(2024, 2, 5), 0.3));

        let aggregator = MonthlyAggregator::new(&NoHolidays, range(date(2024, 1, 1), date(2024, 3, 1)));
        let rows = aggregator.run(records).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].mese, "01/2024");
        assert_eq!(rows[0].mo, "0.100000");
        assert_eq!(rows[1].mese, "02/2024");
        assert_eq!(rows[1].mo, "0.300000");
    }

    #[test]
    fn start_date_is_included_end_date_is_excluded() {
        let mut records = full_day(date(2024, 1, 1), 0.1);
        // Exactly on the exclusive end: must not contribute.
        records.extend(full_day(date(2024, 2, 1), 9.9));

        let aggregator = MonthlyAggregator::new(&NoHolidays, range(date(2024, 1, 1), date(2024, 2, 1)));
        let rows = aggregator.run(records).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mese, "01/2024");
        assert_eq!(rows[0].mo, "0.100000");
    }

    #[test]
    fn records_before_the_range_are_skipped() {
        let mut records = full_day(date(2023, 12, 29), 9.9);
        records.extend(full_day(date(2024, 1, 8), 0.1));

        let aggregator = MonthlyAggregator::new(&NoHolidays, range(date(2024, 1, 1), date(2024, 2, 1)));
        let rows = aggregator.run(records).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].mese, "01/2024");
    }

    #[test]
    fn empty_stream_emits_no_rows() {
        let aggregator = MonthlyAggregator::new(&NoHolidays, range(date(2024, 1, 1), date(2024, 2, 1)));
        let rows = aggregator.run(Vec::new()).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn separate_invocations_do_not_interfere() {
        let r = range(date(2024, 1, 1), date(2024, 3, 1));

        let first = MonthlyAggregator::new(&NoHolidays, r)
            .run(full_day(date(2024, 1, 8), 0.1))
            .unwrap();
        let second = MonthlyAggregator::new(&NoHolidays, r)
            .run(full_day(date(2024, 2, 5), 0.3))
            .unwrap();

        assert_eq!(first.len(), 1);
        assert_eq!(second.len(), 1);
        assert_eq!(first[0].mese, "01/2024");
        assert_eq!(second[0].mese, "02/2024");
        assert_eq!(second[0].mo, "0.300000");
    }

    #[test]
    fn holidays_route_weekday_hours_to_f3() {
        struct Epiphany;
        impl HolidayCalendar for Epiphany {
            fn is_holiday(&self, date: NaiveDate) -> bool {
                date.month() == 1 && date.day() == 6
            }
        }

        // 2025-01-06 is a Monday holiday: every hour goes to F3, so F3 sees
        // the 0.2 prices and F1/F2 only the 0.1 ones from the 7th.
        let mut records = full_day(date(2025, 1, 6), 0.2);
        records.extend(full_day(date(2025, 1, 7), 0.1));

        let aggregator = MonthlyAggregator::new(&Epiphany, range(date(2025, 1, 1), date(2025, 2, 1)));
        let rows = aggregator.run(records).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].f1, "0.100000");
        assert_eq!(rows[0].f2, "0.100000");
        // F3 mix: 24 holiday hours at 0.2 plus 8 night hours at 0.1.
        // (24*0.2 + 8*0.1) / 32 = 0.175
        assert_eq!(rows[0].f3, "0.175000");
    }

    #[test]
    fn malformed_record_aborts_the_run() {
        let records = vec![
            Ok(HourlyRecord { date: date(2024, 1, 8), hour: 0, price: 0.1 }),
            Err(anyhow!("unparseable price")),
        ];
        let aggregator = MonthlyAggregator::new(&NoHolidays, range(date(2024, 1, 1), date(2024, 2, 1)));
        assert!(aggregator.run(records).is_err());
    }
}
