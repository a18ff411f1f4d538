//! Append-only CSV price log
//!
//! One header row, then one row per run. Rows are never rewritten or
//! deduplicated, so running twice on the same day records the date twice.

use anyhow::Context;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::Path;
use tracing::{debug, info};

use crate::error::{Result, TrackerError};
use crate::pricing::ExtractedPrices;

/// Column names of the price log, in file order
pub const CSV_HEADER: [&str; 4] = ["Date", "Price_USD", "Price_CNY", "Price_AUD"];

/// One row of the price log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRecord {
    #[serde(rename = "Date")]
    pub date: NaiveDate,
    #[serde(rename = "Price_USD")]
    pub price_usd: Option<Decimal>,
    #[serde(rename = "Price_CNY")]
    pub price_cny: Option<Decimal>,
    #[serde(rename = "Price_AUD")]
    pub price_aud: Option<Decimal>,
}

impl PriceRecord {
    pub fn new(date: NaiveDate, prices: ExtractedPrices) -> Self {
        Self {
            date,
            price_usd: prices.usd,
            price_cny: prices.cny,
            price_aud: prices.aud,
        }
    }
}

/// Append a record to the CSV log at `csv_path`.
///
/// Creates the parent directory when needed and writes the header row only
/// when the file did not exist right before opening it. There is no locking:
/// a single writer per file is assumed.
pub fn append_record(csv_path: &Path, record: &PriceRecord) -> Result<()> {
    if let Some(parent) = csv_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| TrackerError::FileSystem(e.to_string()))
            .with_context(|| format!("failed to create directory {:?}", parent))?;
    }

    let new_file = !csv_path.exists();

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(csv_path)
        .map_err(|e| TrackerError::FileSystem(e.to_string()))
        .with_context(|| format!("failed to open price log {:?}", csv_path))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);

    if new_file {
        debug!("Creating new price log with header: {:?}", csv_path);
        writer
            .write_record(CSV_HEADER)
            .map_err(|e| TrackerError::FileSystem(e.to_string()))?;
    }

    writer
        .serialize(record)
        .map_err(|e| TrackerError::FileSystem(e.to_string()))
        .with_context(|| format!("failed to write row to {:?}", csv_path))?;
    writer
        .flush()
        .map_err(|e| TrackerError::FileSystem(e.to_string()))
        .with_context(|| format!("failed to flush price log {:?}", csv_path))?;

    info!("Recorded prices for {} in {:?}", record.date, csv_path);
    Ok(())
}

/// Read every row of the price log back, header excluded.
pub fn read_records(csv_path: &Path) -> Result<Vec<PriceRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .from_path(csv_path)
        .with_context(|| format!("failed to open price log {:?}", csv_path))?;

    let mut records = Vec::new();
    for (idx, result) in reader.deserialize::<PriceRecord>().enumerate() {
        let record =
            result.with_context(|| format!("invalid row {} in {:?}", idx + 2, csv_path))?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn record(day: u32, usd: Option<Decimal>, cny: Option<Decimal>) -> PriceRecord {
        PriceRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            price_usd: usd,
            price_cny: cny,
            price_aud: usd.map(|u| u * dec!(1.54)),
        }
    }

    #[test]
    fn test_new_file_gets_header_and_row() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prices.csv");

        append_record(&path, &record(1, Some(dec!(40.00)), None)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["Date,Price_USD,Price_CNY,Price_AUD", "2025-03-01,40.00,,61.6000"]);
    }

    #[test]
    fn test_appends_without_repeating_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prices.csv");

        for day in 1..=3 {
            append_record(&path, &record(day, Some(dec!(40)), Some(dec!(299)))).unwrap();
        }

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 4);
        assert_eq!(content.matches("Date,Price_USD").count(), 1);
    }

    #[test]
    fn test_same_date_is_not_deduplicated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prices.csv");
        let row = record(7, Some(dec!(40)), None);

        append_record(&path, &row).unwrap();
        append_record(&path, &row).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records, vec![row.clone(), row]);
    }

    #[test]
    fn test_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("nested").join("prices.csv");

        append_record(&path, &record(2, None, Some(dec!(399)))).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_missing_prices_are_empty_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prices.csv");
        let row = PriceRecord {
            date: NaiveDate::from_ymd_opt(2025, 3, 4).unwrap(),
            price_usd: None,
            price_cny: Some(dec!(399)),
            price_aud: None,
        };

        append_record(&path, &row).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.ends_with("2025-03-04,,399,\n"));
        assert_eq!(read_records(&path).unwrap(), vec![row]);
    }

    #[test]
    fn test_existing_file_is_appended_not_truncated() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prices.csv");
        fs::write(&path, "Date,Price_USD,Price_CNY,Price_AUD\n2024-12-31,50,,77\n").unwrap();

        append_record(&path, &record(1, Some(dec!(45)), None)).unwrap();

        let records = read_records(&path).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].price_usd, Some(dec!(50)));
        assert_eq!(records[1].price_usd, Some(dec!(45)));
    }

    #[test]
    fn test_unwritable_target_is_file_system_error() {
        let dir = TempDir::new().unwrap();
        // A directory where the file should be
        let path = dir.path().join("prices.csv");
        fs::create_dir(&path).unwrap();

        let err = append_record(&path, &record(1, Some(dec!(40)), None)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::FileSystem(_))
        ));
    }
}
