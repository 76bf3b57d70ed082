use chrono::{DateTime, Datelike, Local, TimeZone};
use std::path::{Path, PathBuf};

use crate::error::{ProcessingError, Result};
use crate::utils::constants::{
    SOURCE_COUNTRY, SOURCE_FILE_EXTENSION, SOURCE_FILE_PREFIX, SOURCE_FIRST_YEAR,
    SOURCE_LAST_YEAR, SOURCE_SERIES_TYPE, SOURCE_URL_BASE,
};

/// Remote endpoint serving the weekly series of one province
///
/// # Examples
/// ```
/// use vhi_analyzer::utils::source_url;
///
/// let url = source_url(12);
/// assert!(url.contains("provinceID=12"));
/// assert!(url.ends_with("type=Mean"));
/// ```
pub fn source_url(region_id: u32) -> String {
    format!(
        "{}?country={}&provinceID={}&year1={}&year2={}&type={}",
        SOURCE_URL_BASE,
        SOURCE_COUNTRY,
        region_id,
        SOURCE_FIRST_YEAR,
        SOURCE_LAST_YEAR,
        SOURCE_SERIES_TYPE
    )
}

/// File name a fetcher saves a region under: vhi_{id}_{YYYY-MM-DD_HH-MM-SS}.csv
pub fn snapshot_file_name<Tz: TimeZone>(region_id: u32, fetched_at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!(
        "{}{}_{}{}",
        SOURCE_FILE_PREFIX,
        region_id,
        fetched_at.format("%Y-%m-%d_%H-%M-%S"),
        SOURCE_FILE_EXTENSION
    )
}

/// Extract the region id from a source file name (e.g. vhi_12_2024-03-01_10-00-00.csv -> 12)
pub fn extract_region_id(path: &Path) -> Result<u32> {
    let filename = path
        .file_name()
        .and_then(|f| f.to_str())
        .ok_or_else(|| ProcessingError::InvalidFormat("Invalid file path".to_string()))?;

    let id_part = filename
        .strip_prefix(SOURCE_FILE_PREFIX)
        .and_then(|rest| rest.strip_suffix(SOURCE_FILE_EXTENSION))
        .and_then(|stem| stem.split('_').next())
        .ok_or_else(|| {
            ProcessingError::InvalidFormat(format!(
                "Filename does not match expected pattern: {}",
                filename
            ))
        })?;

    id_part.parse::<u32>().map_err(|_| {
        ProcessingError::InvalidFormat(format!(
            "Could not extract region ID from filename: {}",
            filename
        ))
    })
}

/// Whether a file name looks like a downloaded region source
pub fn is_source_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|f| f.to_str())
        .map(|name| name.starts_with(SOURCE_FILE_PREFIX) && name.ends_with(SOURCE_FILE_EXTENSION))
        .unwrap_or(false)
}

/// Generate default Parquet filename with format: vhi-clean-{YYMMDD}.parquet
pub fn generate_default_parquet_filename() -> PathBuf {
    let now = Local::now();
    let year = now.year() % 100;
    let month = now.month();
    let day = now.day();

    let filename = format!("vhi-clean-{:02}{:02}{:02}.parquet", year, month, day);
    PathBuf::from("output").join(filename)
}
