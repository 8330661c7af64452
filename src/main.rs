use anyhow::{bail, Context, Result};
use chrono::{Datelike, Duration, NaiveDate};
use clap::Parser;
use log::info;
use pun_calculator::{downloader, report, DateRange, ItalianHolidays, MonthlyAggregator, PriceSheet};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pun_calculator")]
#[command(about = "Monthly PUN averages by tariff band (F1/F2/F3) from GME day-ahead data")]
struct Args {
    /// Start month (YYYY-MM)
    start_date: String,

    /// End month (YYYY-MM), inclusive
    end_date: String,

    /// Write the report to a CSV file instead of stdout
    #[arg(long)]
    csv: bool,
}

fn parse_month(text: &str) -> Result<(i32, u32)> {
    let (year, month) = text
        .split_once('-')
        .with_context(|| format!("'{text}' is not in YYYY-MM format"))?;
    let year: i32 = year.parse().with_context(|| format!("invalid year in '{text}'"))?;
    let month: u32 = month.parse().with_context(|| format!("invalid month in '{text}'"))?;
    if !(1..=12).contains(&month) {
        bail!("month {month} out of range 1-12");
    }
    Ok((year, month))
}

/// Turn the start/end year-months into an inclusive-start, exclusive-end
/// date window covering both whole months.
fn parse_date_range(start: &str, end: &str) -> Result<DateRange> {
    let (start_year, start_month) = parse_month(start)?;
    let (end_year, end_month) = parse_month(end)?;

    let start = NaiveDate::from_ymd_opt(start_year, start_month, 1).context("invalid start month")?;
    let end = if end_month == 12 {
        NaiveDate::from_ymd_opt(end_year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(end_year, end_month + 1, 1)
    }
    .context("invalid end month")?;

    if start >= end {
        bail!("start month {start_year}-{start_month:02} is after end month {end_year}-{end_month:02}");
    }
    Ok(DateRange { start, end })
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let range = parse_date_range(&args.start_date, &args.end_date)
        .context("invalid date range")?;

    let calendar = ItalianHolidays;
    let last_day = range.end - Duration::days(1);
    let mut rows = Vec::new();

    // One GME archive per calendar year, processed in increasing order.
    for year in range.start.year()..=last_day.year() {
        println!("Download {year} data...");
        let xlsx = downloader::download_year_archive(year)?;
        println!("Extracting...");
        let sheet = PriceSheet::from_xlsx_bytes(xlsx)?;
        println!("Processing...");

        let year_range = range.clip_to_year(year);
        let aggregator = MonthlyAggregator::new(&calendar, year_range);
        let year_rows = aggregator.run(sheet.records())?;
        info!("{} month(s) summarized for {year}", year_rows.len());
        rows.extend(year_rows);
    }

    println!();

    if args.csv {
        let path = PathBuf::from(format!("output_{}_{}.csv", range.start, range.end));
        report::write_csv(&path, &rows)?;
        println!("Report written to {}", path.display());
    } else {
        report::print_table(&rows);
    }

    Ok(())
}
