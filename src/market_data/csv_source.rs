//! Offline price history read from `<dir>/<TICKER>.csv` (file name case is ignored).
//!
//! Files use the Yahoo download layout (`Date,Open,High,Low,Close,Adj Close,Volume`);
//! only `Date` and `Close` are read and rows must be in chronological order.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::config::PricerConfig;
use crate::error::{PricerError, PricerResult};
use crate::market_data::volatility::{self, ReturnKind};
use crate::market_data::MarketDataProvider;

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    #[allow(dead_code)] // Only read to validate the layout
    date: String,
    #[serde(rename = "Close", deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
}

/// Provider backed by a directory of per-ticker CSV files
#[derive(Debug, Clone)]
pub struct CsvProvider {
    dir: PathBuf,
    rate: f64,
    return_kind: ReturnKind,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>, rate: f64) -> Self {
        Self {
            dir: dir.into(),
            rate,
            return_kind: ReturnKind::default(),
        }
    }

    pub fn from_config(config: &PricerConfig) -> Self {
        Self::new(config.csv.dir.clone(), config.risk_free_rate).with_return_kind(config.return_kind)
    }

    pub fn with_return_kind(mut self, kind: ReturnKind) -> Self {
        self.return_kind = kind;
        self
    }

    /// Locate the ticker's file; the file name match ignores ASCII case.
    fn path_for(&self, ticker: &str) -> Option<PathBuf> {
        let candidates = [
            ticker.to_string(),
            ticker.to_uppercase(),
            ticker.to_lowercase(),
        ];
        if let Some(path) = candidates
            .iter()
            .map(|name| self.dir.join(format!("{}.csv", name)))
            .find(|path| path.is_file())
        {
            return Some(path);
        }

        let wanted = format!("{}.csv", ticker);
        std::fs::read_dir(&self.dir)
            .ok()?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .find(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|name| name.to_str())
                        .is_some_and(|name| name.eq_ignore_ascii_case(&wanted))
            })
    }

    /// All closes in the ticker's file, oldest first. Unparseable close cells are skipped.
    pub fn load_closes(&self, ticker: &str) -> PricerResult<Vec<f64>> {
        let path = self.path_for(ticker).ok_or_else(|| {
            PricerError::data_unavailable(format!(
                "no price history for {} in {}",
                ticker,
                self.dir.display()
            ))
        })?;
        let closes = read_closes(&path)?;
        if closes.is_empty() {
            return Err(PricerError::data_unavailable(format!(
                "price history for {} is empty",
                ticker
            )));
        }
        Ok(closes)
    }
}

fn read_closes(path: &Path) -> PricerResult<Vec<f64>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|e| PricerError::parse(format!("{}: {}", path.display(), e)))?;

    let mut closes = Vec::new();
    let mut skipped = 0usize;
    for result in reader.deserialize() {
        let row: CsvRow =
            result.map_err(|e| PricerError::parse(format!("{}: {}", path.display(), e)))?;
        match row.close {
            Some(close) => closes.push(close),
            None => skipped += 1,
        }
    }
    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "skipped rows without a close");
    }
    Ok(closes)
}

impl MarketDataProvider for CsvProvider {
    fn current_price(&self, ticker: &str) -> PricerResult<f64> {
        let closes = self.load_closes(ticker)?;
        closes
            .last()
            .copied()
            .ok_or_else(|| PricerError::data_unavailable(format!("no closes for {}", ticker)))
    }

    fn historical_volatility(&self, ticker: &str, lookback_days: usize) -> PricerResult<f64> {
        let closes = self.load_closes(ticker)?;
        let window = volatility::trailing_window(&closes, lookback_days);
        volatility::annualized_volatility(ticker, window, self.return_kind)
    }

    fn risk_free_rate(&self) -> PricerResult<f64> {
        Ok(self.rate)
    }
}
