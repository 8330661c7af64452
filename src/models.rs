use chrono::NaiveDate;
use serde::Serialize;

/// One hourly day-ahead market quote. The hour is zero-based (0-23); the
/// source sheet encodes 1-24 and the loader adjusts it before records get
/// this far. Price is in €/kWh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hour: u32,
    pub price: f64,
}

/// Regulatory time-of-use tariff band.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    F1,
    F2,
    F3,
}

/// Date window for one aggregation run: inclusive start, exclusive end.
#[derive(Debug, Clone, Copy)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }

    /// Intersect the range with a single calendar year. The driver fetches
    /// one GME archive per year, so the first and last years of a multi-year
    /// request get clipped to the caller's exact bounds.
    pub fn clip_to_year(&self, year: i32) -> DateRange {
        let jan1 = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let next_jan1 = NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap();
        DateRange {
            start: self.start.max(jan1),
            end: self.end.min(next_jan1),
        }
    }
}

/// Price accumulators for the month currently being folded. Exactly one
/// bucket is open at a time; it is replaced wholesale on month rollover.
#[derive(Debug, Default)]
pub struct MonthBucket {
    pub monoorario: Vec<f64>,
    pub f1: Vec<f64>,
    pub f2: Vec<f64>,
    pub f3: Vec<f64>,
}

impl MonthBucket {
    /// Every price lands in its band collection and in monoorario.
    pub fn push(&mut self, band: Band, price: f64) {
        match band {
            Band::F1 => self.f1.push(price),
            Band::F2 => self.f2.push(price),
            Band::F3 => self.f3.push(price),
        }
        self.monoorario.push(price);
    }

    pub fn is_empty(&self) -> bool {
        self.monoorario.is_empty()
    }
}

/// One output line of the monthly report. Values are pre-formatted to six
/// decimal places so CSV and console output stay byte-identical.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Mese")]
    pub mese: String,
    #[serde(rename = "MO")]
    pub mo: String,
    #[serde(rename = "F1")]
    pub f1: String,
    #[serde(rename = "F2")]
    pub f2: String,
    #[serde(rename = "F3")]
    pub f3: String,
    #[serde(rename = "F23")]
    pub f23: String,
}
