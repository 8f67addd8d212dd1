//! Load historical revenue from CSV exports

use super::{HistoricalDataset, RevenueRecord};
use crate::error::{ForecastError, ForecastResult};
use chrono::NaiveDate;
use csv::Reader;
use log::debug;
use std::path::Path;

/// Default location of the shipped history file
pub const DEFAULT_HISTORY_PATH: &str = "data/history/revenue_history.csv";

/// Raw CSV row: `date,amount,client_id`
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    date: String,
    amount: f64,
    #[serde(default)]
    client_id: Option<String>,
}

impl CsvRow {
    fn to_record(self) -> ForecastResult<RevenueRecord> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|e| ForecastError::Parse(format!("bad date '{}': {}", self.date, e)))?;

        if !self.amount.is_finite() {
            return Err(ForecastError::Parse(format!("non-finite amount on {}", date)));
        }

        let client_id = self
            .client_id
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());

        Ok(RevenueRecord {
            date,
            amount: self.amount,
            client_id,
        })
    }
}

/// Load a history file
pub fn load_history<P: AsRef<Path>>(path: P) -> ForecastResult<HistoricalDataset> {
    let path = path.as_ref();
    let reader = Reader::from_path(path)?;
    let dataset = read_records(reader)?;
    debug!("loaded {} revenue records from {}", dataset.len(), path.display());
    Ok(dataset)
}

/// Load history from any reader (e.g., an uploaded buffer)
pub fn load_history_from_reader<R: std::io::Read>(reader: R) -> ForecastResult<HistoricalDataset> {
    read_records(Reader::from_reader(reader))
}

/// Load the shipped demo history
pub fn load_default_history() -> ForecastResult<HistoricalDataset> {
    load_history(DEFAULT_HISTORY_PATH)
}

fn read_records<R: std::io::Read>(mut reader: Reader<R>) -> ForecastResult<HistoricalDataset> {
    let mut records = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.to_record()?);
    }

    Ok(HistoricalDataset::new(records))
}
