//! CSV file data adapter.
//!
//! Reads pre-enriched daily files named `<CODE>_<MARKET>.csv`. Columns are
//! located by header name, and a file missing required columns is rejected
//! with every absent column named in one error. Row order is preserved
//! as-is; out-of-order input is the preflight validator's job to reject,
//! not this adapter's to repair.

use crate::domain::error::KumosimError;
use crate::domain::ohlcv::OhlcvBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::fs;
use std::path::PathBuf;

pub const REQUIRED_COLUMNS: [&str; 11] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Stochastic_K",
    "Stochastic_D",
    "ADX",
    "SMA",
    "Average_True_Range",
];

pub struct CsvAdapter {
    base_path: PathBuf,
}

/// Header positions of the required columns, resolved once per file.
struct ColumnMap {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
    stoch_k: usize,
    stoch_d: usize,
    adx: usize,
    sma: usize,
    atr: usize,
}

impl ColumnMap {
    fn resolve(
        headers: &csv::StringRecord,
        source_name: &str,
    ) -> Result<Self, KumosimError> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);

        let missing: Vec<String> = REQUIRED_COLUMNS
            .iter()
            .filter(|name| find(name).is_none())
            .map(|name| name.to_string())
            .collect();
        if !missing.is_empty() {
            return Err(KumosimError::Schema {
                source_name: source_name.to_string(),
                missing,
            });
        }

        // All columns confirmed present above.
        let at = |name: &str| find(name).unwrap_or(0);
        Ok(ColumnMap {
            date: at("Date"),
            open: at("Open"),
            high: at("High"),
            low: at("Low"),
            close: at("Close"),
            volume: at("Volume"),
            stoch_k: at("Stochastic_K"),
            stoch_d: at("Stochastic_D"),
            adx: at("ADX"),
            sma: at("SMA"),
            atr: at("Average_True_Range"),
        })
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, code: &str, market: &str) -> PathBuf {
        self.base_path.join(format!("{}_{}.csv", code, market))
    }

    fn read_all(&self, code: &str, market: &str) -> Result<Vec<OhlcvBar>, KumosimError> {
        let path = self.csv_path(code, market);
        let source_name = format!("{}_{}.csv", code, market);
        let content = fs::read_to_string(&path).map_err(|e| KumosimError::DataSource {
            reason: format!("failed to read {}: {}", path.display(), e),
        })?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr.headers().map_err(|e| KumosimError::DataSource {
            reason: format!("failed to read header of {}: {}", source_name, e),
        })?;
        let columns = ColumnMap::resolve(headers, &source_name)?;

        let mut bars = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| KumosimError::DataSource {
                reason: format!("CSV parse error in {}: {}", source_name, e),
            })?;
            bars.push(parse_bar(&record, &columns, code, market, &source_name)?);
        }
        Ok(bars)
    }
}

fn field<'a>(
    record: &'a csv::StringRecord,
    index: usize,
    name: &str,
    source_name: &str,
) -> Result<&'a str, KumosimError> {
    record.get(index).ok_or_else(|| KumosimError::DataSource {
        reason: format!("{}: row is missing the {} field", source_name, name),
    })
}

fn parse_num(
    record: &csv::StringRecord,
    index: usize,
    name: &str,
    source_name: &str,
) -> Result<f64, KumosimError> {
    let raw = field(record, index, name, source_name)?.trim();
    // Enrichment columns may carry blanks in the warm-up window.
    if raw.is_empty() {
        return Ok(f64::NAN);
    }
    raw.parse().map_err(|e| KumosimError::DataSource {
        reason: format!("{}: invalid {} value {:?}: {}", source_name, name, raw, e),
    })
}

fn parse_bar(
    record: &csv::StringRecord,
    columns: &ColumnMap,
    code: &str,
    market: &str,
    source_name: &str,
) -> Result<OhlcvBar, KumosimError> {
    let date_str = field(record, columns.date, "Date", source_name)?.trim();
    let date =
        NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| KumosimError::DataSource {
            reason: format!("{}: invalid date {:?}: {}", source_name, date_str, e),
        })?;

    Ok(OhlcvBar {
        code: code.to_string(),
        market: market.to_string(),
        date,
        open: parse_num(record, columns.open, "Open", source_name)?,
        high: parse_num(record, columns.high, "High", source_name)?,
        low: parse_num(record, columns.low, "Low", source_name)?,
        close: parse_num(record, columns.close, "Close", source_name)?,
        volume: parse_num(record, columns.volume, "Volume", source_name)?,
        stoch_k: parse_num(record, columns.stoch_k, "Stochastic_K", source_name)?,
        stoch_d: parse_num(record, columns.stoch_d, "Stochastic_D", source_name)?,
        adx: parse_num(record, columns.adx, "ADX", source_name)?,
        sma: parse_num(record, columns.sma, "SMA", source_name)?,
        atr: parse_num(record, columns.atr, "Average_True_Range", source_name)?,
    })
}

impl DataPort for CsvAdapter {
    fn fetch_bars(
        &self,
        code: &str,
        market: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<OhlcvBar>, KumosimError> {
        let bars = self.read_all(code, market)?;
        Ok(bars
            .into_iter()
            .filter(|b| b.date >= start_date && b.date <= end_date)
            .collect())
    }

    fn list_symbols(&self, market: &str) -> Result<Vec<String>, KumosimError> {
        let entries = fs::read_dir(&self.base_path).map_err(|e| KumosimError::DataSource {
            reason: format!(
                "failed to read directory {}: {}",
                self.base_path.display(),
                e
            ),
        })?;

        let suffix = format!("_{}.csv", market);
        let mut symbols = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|e| KumosimError::DataSource {
                reason: format!("directory entry error: {}", e),
            })?;

            let name = entry.file_name();
            let name_str = name.to_string_lossy();

            if name_str.ends_with(&suffix) {
                let code = &name_str[..name_str.len() - suffix.len()];
                symbols.push(code.to_string());
            }
        }

        symbols.sort();
        Ok(symbols)
    }

    fn get_data_range(
        &self,
        code: &str,
        market: &str,
    ) -> Result<Option<(NaiveDate, NaiveDate, usize)>, KumosimError> {
        if !self.csv_path(code, market).exists() {
            return Ok(None);
        }
        let bars = self.read_all(code, market)?;
        let first = bars.iter().map(|b| b.date).min();
        let last = bars.iter().map(|b| b.date).max();
        match (first, last) {
            (Some(first), Some(last)) => Ok(Some((first, last, bars.len()))),
            _ => Ok(None),
        }
    }
}
