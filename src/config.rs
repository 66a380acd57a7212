use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{PricerError, PricerResult};
use crate::market_data::volatility::{ReturnKind, DEFAULT_LOOKBACK_DAYS, MIN_OBSERVATIONS};

/// Which market-data backend feeds the pricer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Yahoo,
    Csv,
}

/// Yahoo Finance chart API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YahooConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl YahooConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Local price-history directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CsvConfig {
    /// Directory holding one `<TICKER>.csv` file per symbol
    #[serde(default = "default_csv_dir")]
    pub dir: PathBuf,
}

impl Default for CsvConfig {
    fn default() -> Self {
        Self {
            dir: default_csv_dir(),
        }
    }
}

/// Main configuration struct for the pricer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricerConfig {
    /// Static risk-free rate proxy (10y treasury yield)
    #[serde(default = "default_risk_free_rate")]
    pub risk_free_rate: f64,

    /// Trading days of history used for realized volatility
    #[serde(default = "default_lookback_days")]
    pub lookback_days: usize,

    /// Day count used to turn days-to-expiry into years
    #[serde(default = "default_days_per_year")]
    pub days_per_year: f64,

    #[serde(default)]
    pub return_kind: ReturnKind,

    #[serde(default)]
    pub provider: ProviderKind,

    #[serde(default)]
    pub yahoo: YahooConfig,

    #[serde(default)]
    pub csv: CsvConfig,
}

impl Default for PricerConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: default_risk_free_rate(),
            lookback_days: default_lookback_days(),
            days_per_year: default_days_per_year(),
            return_kind: ReturnKind::default(),
            provider: ProviderKind::default(),
            yahoo: YahooConfig::default(),
            csv: CsvConfig::default(),
        }
    }
}

impl PricerConfig {
    /// Parse a TOML document; absent keys take their defaults.
    pub fn from_toml_str(s: &str) -> PricerResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| PricerError::config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> PricerResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            PricerError::config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&raw)
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> PricerResult<Self> {
        match path {
            Some(p) => Self::load(p),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> PricerResult<()> {
        if !self.risk_free_rate.is_finite() {
            return Err(PricerError::config(format!(
                "risk_free_rate must be finite, got {}",
                self.risk_free_rate
            )));
        }
        // lookback returns span lookback + 1 closes
        let min_lookback = MIN_OBSERVATIONS - 1;
        if self.lookback_days < min_lookback {
            return Err(PricerError::config(format!(
                "lookback_days must be at least {}, got {}",
                min_lookback, self.lookback_days
            )));
        }
        if !(self.days_per_year.is_finite() && self.days_per_year > 0.0) {
            return Err(PricerError::config(format!(
                "days_per_year must be positive, got {}",
                self.days_per_year
            )));
        }
        if self.yahoo.timeout_secs == 0 {
            return Err(PricerError::config("yahoo.timeout_secs must be positive"));
        }
        Ok(())
    }
}

fn default_risk_free_rate() -> f64 {
    0.042
}

fn default_lookback_days() -> usize {
    DEFAULT_LOOKBACK_DAYS
}

fn default_days_per_year() -> f64 {
    365.0
}

fn default_base_url() -> String {
    "https://query1.finance.yahoo.com".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_csv_dir() -> PathBuf {
    PathBuf::from("data")
}
