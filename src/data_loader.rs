use crate::models::HourlyRecord;
use anyhow::{bail, Context, Result};
use calamine::{Data, Range, Reader, Xlsx};
use chrono::NaiveDate;
use std::io::Cursor;

/// Worksheet name used by GME for the hourly PUN series.
const PRICE_SHEET: &str = "Prezzi-Prices";

/// The hourly price worksheet: one row per (date, hour), sorted. Column 1 is
/// the date as YYYYMMDD, column 2 the 1-24 hour, column 3 the price in €/MWh.
pub struct PriceSheet {
    range: Range<Data>,
}

impl PriceSheet {
    pub fn from_xlsx_bytes(bytes: Vec<u8>) -> Result<Self> {
        let mut workbook = Xlsx::new(Cursor::new(bytes))
            .context("the archive does not contain a valid Excel file")?;
        let range = workbook
            .worksheet_range(PRICE_SHEET)
            .with_context(|| format!("worksheet '{PRICE_SHEET}' not found in the Excel file"))?;
        Ok(Self { range })
    }

    /// Hourly records in sheet order, hour adjusted to 0-23 and price
    /// converted to €/kWh. The first row is a header; an empty date cell
    /// terminates the stream. Malformed cells abort the run.
    pub fn records(&self) -> impl Iterator<Item = Result<HourlyRecord>> + '_ {
        self.range
            .rows()
            .skip(1)
            .take_while(|row| !matches!(row.first(), None | Some(Data::Empty)))
            .map(parse_row)
    }
}

fn parse_row(row: &[Data]) -> Result<HourlyRecord> {
    let date = parse_date(row.first())?;
    let hour = parse_hour(row.get(1))?;
    let price = parse_price(row.get(2))?;
    Ok(HourlyRecord {
        date,
        hour,
        // €/MWh -> €/kWh
        price: price / 1000.0,
    })
}

fn parse_date(cell: Option<&Data>) -> Result<NaiveDate> {
    let text = match cell {
        Some(Data::String(s)) => s.trim().to_string(),
        Some(Data::Float(f)) => format!("{}", *f as i64),
        Some(Data::Int(i)) => i.to_string(),
        other => bail!("unparseable date cell: {other:?}"),
    };
    NaiveDate::parse_from_str(&text, "%Y%m%d")
        .with_context(|| format!("unparseable date '{text}' (expected YYYYMMDD)"))
}

fn parse_hour(cell: Option<&Data>) -> Result<u32> {
    let raw = match cell {
        Some(Data::Int(i)) => *i,
        Some(Data::Float(f)) => *f as i64,
        Some(Data::String(s)) => s
            .trim()
            .parse::<i64>()
            .with_context(|| format!("unparseable hour '{s}'"))?,
        other => bail!("unparseable hour cell: {other:?}"),
    };
    if !(1..=24).contains(&raw) {
        bail!("hour {raw} out of range 1-24");
    }
    Ok(raw as u32 - 1)
}

fn parse_price(cell: Option<&Data>) -> Result<f64> {
    match cell {
        Some(Data::Float(f)) => Ok(*f),
        Some(Data::Int(i)) => Ok(*i as f64),
        Some(Data::String(s)) => s
            .trim()
            .parse::<f64>()
            .with_context(|| format!("unparseable price '{s}'")),
        other => bail!("unparseable price cell: {other:?}"),
    }
}
