use crate::models::{MonthBucket, SummaryRow};
use anyhow::{bail, Result};
use std::path::Path;

/// Regulatory weights for the F23 composite rate. Fixed by ARERA, not
/// derived from record counts.
const F2_WEIGHT: f64 = 0.46;
const F3_WEIGHT: f64 = 0.54;

fn mean(values: &[f64], band: &str) -> Result<f64> {
    if values.is_empty() {
        bail!("no {band} prices accumulated for the month");
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Round to 5 decimals, ties to even. The report prints 6 decimals, so the
/// last printed digit is a rounding artifact and must be reproduced as-is.
fn round5(value: f64) -> f64 {
    (value * 1e5).round_ties_even() / 1e5
}

fn fmt_mean(values: &[f64], band: &str) -> Result<String> {
    Ok(format!("{:.6}", round5(mean(values, band)?)))
}

/// Build the six-column summary row for one finished month.
pub fn summarize(year: i32, month: u32, bucket: &MonthBucket) -> Result<SummaryRow> {
    let f23 = round5(mean(&bucket.f2, "F2")?) * F2_WEIGHT + round5(mean(&bucket.f3, "F3")?) * F3_WEIGHT;
    Ok(SummaryRow {
        mese: format!("{month:02}/{year}"),
        mo: fmt_mean(&bucket.monoorario, "MO")?,
        f1: fmt_mean(&bucket.f1, "F1")?,
        f2: fmt_mean(&bucket.f2, "F2")?,
        f3: fmt_mean(&bucket.f3, "F3")?,
        f23: format!("{f23:.6}"),
    })
}

pub fn write_csv(path: &Path, rows: &[SummaryRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn print_table(rows: &[SummaryRow]) {
    println!("Mese\tMO\tF1\tF2\tF3\tF23");
    for row in rows {
        println!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            row.mese, row.mo, row.f1, row.f2, row.f3, row.f23
        );
    }
}
