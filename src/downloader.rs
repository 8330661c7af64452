use anyhow::{bail, Context, Result};
use chrono::{Datelike, Utc};
use log::info;
use std::io::{Cursor, Read};
use zip::ZipArchive;

/// GME publishes one zip per calendar year with the day-ahead (MGP) history.
fn archive_url(year: i32) -> String {
    format!(
        "https://www.mercatoelettrico.org/it-it/Home/Esiti/Elettricita/MGP/Statistiche/DatiStorici/moduleId/10874/controller/GmeDatiStoriciItem/action/DownloadFile?fileName=Anno{year}.zip"
    )
}

/// Download the year archive and return the raw bytes of the Excel file
/// inside it. Historical data starts in 2016.
pub fn download_year_archive(year: i32) -> Result<Vec<u8>> {
    let current = Utc::now().year();
    if year < 2016 || year > current {
        bail!("invalid year {year}: expected a year between 2016 and {current}");
    }

    let url = archive_url(year);
    info!("downloading {url}");
    let response = reqwest::blocking::get(&url)
        .and_then(|r| r.error_for_status())
        .context("MercatoElettrico.org is unreachable")?;
    let bytes = response
        .bytes()
        .context("failed to read the archive body")?;

    extract_xlsx(&bytes)
}

/// Pull the first `.xlsx` member out of the zip archive.
pub fn extract_xlsx(bytes: &[u8]) -> Result<Vec<u8>> {
    let mut archive =
        ZipArchive::new(Cursor::new(bytes)).context("the downloaded file is not a valid zip archive")?;

    let name = archive
        .file_names()
        .find(|n| n.to_ascii_lowercase().ends_with(".xlsx"))
        .map(String::from);
    let Some(name) = name else {
        bail!("no Excel file found in the downloaded archive");
    };

    let mut file = archive.by_name(&name)?;
    let mut buf = Vec::with_capacity(file.size() as usize);
    file.read_to_end(&mut buf)?;
    Ok(buf)
}
