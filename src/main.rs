//! bsm-pricer CLI
//!
//! Prices a European call and put on a ticker from fetched market data.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use bsm_pricer::{
    build_provider, chart, MarketDataProvider, MarketSnapshot, PriceSummary, PricerConfig,
    ProviderKind, ReturnKind,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProviderArg {
    Yahoo,
    Csv,
}

impl From<ProviderArg> for ProviderKind {
    fn from(arg: ProviderArg) -> Self {
        match arg {
            ProviderArg::Yahoo => ProviderKind::Yahoo,
            ProviderArg::Csv => ProviderKind::Csv,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "bsm-pricer")]
#[command(about = "Black-Scholes-Merton European option pricer")]
#[command(version)]
struct Cli {
    /// Underlying symbol, e.g. AAPL
    ticker: String,

    /// Strike price (K)
    #[arg(short = 'k', long)]
    strike: f64,

    /// Calendar days until expiry
    #[arg(short, long, default_value_t = 30)]
    days: u32,

    /// Path to a TOML configuration file
    #[arg(short, long, env = "BSM_PRICER_CONFIG")]
    config: Option<PathBuf>,

    /// Market data backend (overrides config)
    #[arg(long, value_enum)]
    provider: Option<ProviderArg>,

    /// Directory of <TICKER>.csv price histories (overrides config)
    #[arg(long)]
    csv_dir: Option<PathBuf>,

    /// Trading days of history used for volatility (overrides config)
    #[arg(long)]
    lookback: Option<usize>,

    /// Use log returns instead of percentage returns for volatility
    #[arg(long)]
    log_returns: bool,

    /// Risk-free rate as a decimal (skips the configured rate)
    #[arg(long)]
    rate: Option<f64>,

    /// Spot price (skips the price fetch)
    #[arg(long)]
    spot: Option<f64>,

    /// Annualized volatility as a decimal (skips the volatility fetch)
    #[arg(long)]
    vol: Option<f64>,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,

    /// Write a price-vs-strike SVG chart to this path
    #[arg(long)]
    plot: Option<PathBuf>,
}

impl Cli {
    fn apply_overrides(&self, config: &mut PricerConfig) {
        if let Some(provider) = self.provider {
            config.provider = provider.into();
        }
        if let Some(dir) = &self.csv_dir {
            config.csv.dir = dir.clone();
        }
        if let Some(lookback) = self.lookback {
            config.lookback_days = lookback;
        }
        if self.log_returns {
            config.return_kind = ReturnKind::Log;
        }
        if let Some(rate) = self.rate {
            config.risk_free_rate = rate;
        }
    }

    /// Fetch only what was not supplied on the command line.
    fn snapshot(&self, provider: &dyn MarketDataProvider, config: &PricerConfig) -> Result<MarketSnapshot> {
        let ticker = self.ticker.to_uppercase();
        let spot = match self.spot {
            Some(spot) => spot,
            None => provider
                .current_price(&ticker)
                .with_context(|| format!("fetching current price for {}", ticker))?,
        };
        let sigma = match self.vol {
            Some(vol) => vol,
            None => provider
                .historical_volatility(&ticker, config.lookback_days)
                .with_context(|| format!("computing historical volatility for {}", ticker))?,
        };
        let rate = provider
            .risk_free_rate()
            .context("reading risk-free rate")?;
        Ok(MarketSnapshot {
            ticker,
            spot,
            sigma,
            rate,
        })
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let mut config = PricerConfig::load_or_default(cli.config.as_deref())
        .context("loading configuration")?;
    cli.apply_overrides(&mut config);
    config.validate().context("validating configuration")?;

    let provider = build_provider(&config)?;
    let snapshot = cli.snapshot(provider.as_ref(), &config)?;
    let summary = PriceSummary::compute(&snapshot, cli.strike, cli.days, config.days_per_year)
        .context("pricing option")?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!();
        println!("{}", summary);
        println!();
    }

    if let Some(path) = &cli.plot {
        chart::render_price_curve(&summary, path)
            .with_context(|| format!("writing chart to {}", path.display()))?;
        if !cli.json {
            println!("Chart saved to {}", path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bsm_pricer::FixedProvider;

    #[test]
    fn test_cli_parses_overrides() {
        let cli = Cli::try_parse_from([
            "bsm-pricer",
            "aapl",
            "--strike",
            "230",
            "--days",
            "45",
            "--provider",
            "csv",
            "--csv-dir",
            "/tmp/hist",
            "--log-returns",
            "--rate",
            "0.03",
        ])
        .unwrap();
        let mut config = PricerConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(cli.days, 45);
        assert_eq!(config.provider, ProviderKind::Csv);
        assert_eq!(config.csv.dir, PathBuf::from("/tmp/hist"));
        assert_eq!(config.return_kind, ReturnKind::Log);
        assert_eq!(config.risk_free_rate, 0.03);
    }

    #[test]
    fn test_manual_inputs_skip_fetch() {
        let cli = Cli::try_parse_from([
            "bsm-pricer", "msft", "-k", "100", "--spot", "100", "--vol", "0.2",
        ])
        .unwrap();
        // Provider has no series, so any fetch would fail
        let provider = FixedProvider::new(0.05);
        let snapshot = cli.snapshot(&provider, &PricerConfig::default()).unwrap();
        assert_eq!(snapshot.ticker, "MSFT");
        assert_eq!(snapshot.spot, 100.0);
        assert_eq!(snapshot.sigma, 0.2);
        assert_eq!(snapshot.rate, 0.05);
    }

    #[test]
    fn test_missing_strike_is_rejected() {
        assert!(Cli::try_parse_from(["bsm-pricer", "AAPL"]).is_err());
    }
}
