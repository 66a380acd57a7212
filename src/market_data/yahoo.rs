//! Yahoo Finance data fetcher
//!
//! Pulls daily closing prices from Yahoo Finance's unofficial v8 chart API.
//!
//! Note: This is for educational/research purposes. Yahoo Finance
//! data is delayed ~15 minutes and intended for personal use.

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::config::PricerConfig;
use crate::error::{PricerError, PricerResult};
use crate::market_data::volatility::{self, ReturnKind};
use crate::market_data::MarketDataProvider;

/// Trading sessions fetched when only the latest close is needed
const SPOT_SESSIONS: usize = 5;

/// Extra calendar days requested on top of the lookback to cover holidays
const HOLIDAY_BUFFER_DAYS: i64 = 14;

/// Yahoo Finance chart API client
pub struct YahooProvider {
    client: reqwest::blocking::Client,
    base_url: String,
    rate: f64,
    return_kind: ReturnKind,
}

impl YahooProvider {
    pub fn new(config: &PricerConfig) -> PricerResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(config.yahoo.user_agent.as_str())
            .timeout(config.yahoo.timeout())
            .build()
            .map_err(|e| PricerError::network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.yahoo.base_url.trim_end_matches('/').to_string(),
            rate: config.risk_free_rate,
            return_kind: config.return_kind,
        })
    }

    /// Daily closes between `start` and `end`, oldest first.
    pub fn get_closes(
        &self,
        ticker: &str,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> PricerResult<Vec<f64>> {
        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d",
            self.base_url,
            ticker,
            start.timestamp(),
            end.timestamp()
        );
        tracing::debug!(%url, "requesting chart");

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| PricerError::network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| PricerError::network(e.to_string()))?;

        // Yahoo reports unknown symbols as 404 with a JSON error body
        if !status.is_success() && status != reqwest::StatusCode::NOT_FOUND {
            return Err(PricerError::network(format!(
                "chart request for {} failed with HTTP {}",
                ticker, status
            )));
        }

        parse_chart_closes(ticker, &body)
    }

    fn recent_closes(&self, ticker: &str, calendar_days: i64) -> PricerResult<Vec<f64>> {
        let end = Utc::now();
        let start = end - Duration::days(calendar_days);
        self.get_closes(ticker, start, end)
    }
}

impl MarketDataProvider for YahooProvider {
    fn current_price(&self, ticker: &str) -> PricerResult<f64> {
        let closes = self.recent_closes(ticker, calendar_days_for(SPOT_SESSIONS))?;
        closes
            .last()
            .copied()
            .ok_or_else(|| PricerError::data_unavailable(format!("no recent closes for {}", ticker)))
    }

    fn historical_volatility(&self, ticker: &str, lookback_days: usize) -> PricerResult<f64> {
        let calendar_days = calendar_days_for(lookback_days);
        let closes = self.recent_closes(ticker, calendar_days)?;
        let window = volatility::trailing_window(&closes, lookback_days);
        tracing::debug!(
            ticker,
            fetched = closes.len(),
            used = window.len(),
            "computing realized volatility"
        );
        volatility::annualized_volatility(ticker, window, self.return_kind)
    }

    fn risk_free_rate(&self) -> PricerResult<f64> {
        Ok(self.rate)
    }
}

/// Calendar span expected to contain `trading_days` sessions.
fn calendar_days_for(trading_days: usize) -> i64 {
    let trading_days = i64::try_from(trading_days).unwrap_or(i64::MAX / 2);
    trading_days.saturating_mul(365) / 252 + HOLIDAY_BUFFER_DAYS
}

/// Extract the non-null daily closes from a chart API response body.
pub fn parse_chart_closes(ticker: &str, body: &str) -> PricerResult<Vec<f64>> {
    let response: YahooChartResponse = serde_json::from_str(body)
        .map_err(|e| PricerError::parse(format!("Failed to parse chart for {}: {}", ticker, e)))?;

    if let Some(err) = response.chart.error {
        return Err(PricerError::data_unavailable(format!(
            "{}: {} ({})",
            ticker,
            err.description.unwrap_or_default(),
            err.code.unwrap_or_default()
        )));
    }

    let result = response
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or_else(|| PricerError::data_unavailable(format!("No chart data returned for {}", ticker)))?;

    let raw = result
        .indicators
        .quote
        .into_iter()
        .next()
        .map(|q| q.close)
        .unwrap_or_default();

    let total = raw.len();
    let closes: Vec<f64> = raw.into_iter().flatten().collect();
    if closes.len() < total {
        tracing::warn!(
            ticker,
            skipped = total - closes.len(),
            "dropped null closes from chart response"
        );
    }

    if closes.is_empty() {
        return Err(PricerError::data_unavailable(format!(
            "No closing prices returned for {}",
            ticker
        )));
    }
    Ok(closes)
}

// Yahoo Finance API response structures

#[derive(Debug, Deserialize)]
struct YahooChartResponse {
    chart: YahooChart,
}

#[derive(Debug, Deserialize)]
struct YahooChart {
    result: Option<Vec<YahooChartResult>>,
    error: Option<YahooChartError>,
}

#[derive(Debug, Deserialize)]
struct YahooChartError {
    code: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct YahooChartResult {
    indicators: YahooIndicators,
}

#[derive(Debug, Deserialize)]
struct YahooIndicators {
    #[serde(default)]
    quote: Vec<YahooQuoteSeries>,
}

#[derive(Debug, Deserialize)]
struct YahooQuoteSeries {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHART_OK: &str = r#"{
        "chart": {
            "result": [{
                "meta": {"symbol": "AAPL", "currency": "USD", "regularMarketPrice": 231.5},
                "timestamp": [1733148600, 1733235000, 1733321400, 1733407800],
                "indicators": {
                    "quote": [{
                        "open": [229.0, 230.1, null, 231.0],
                        "close": [230.0, 229.5, null, 231.5],
                        "volume": [100, 200, null, 300]
                    }],
                    "adjclose": [{"adjclose": [230.0, 229.5, null, 231.5]}]
                }
            }],
            "error": null
        }
    }"#;

    const CHART_NOT_FOUND: &str = r#"{
        "chart": {
            "result": null,
            "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}
        }
    }"#;

    #[test]
    fn test_parse_chart_skips_null_closes() {
        let closes = parse_chart_closes("AAPL", CHART_OK).unwrap();
        assert_eq!(closes, vec![230.0, 229.5, 231.5]);
    }

    #[test]
    fn test_parse_chart_error_is_data_unavailable() {
        let err = parse_chart_closes("ZZZZ", CHART_NOT_FOUND).unwrap_err();
        match err {
            PricerError::DataUnavailable(msg) => assert!(msg.contains("ZZZZ")),
            other => panic!("expected DataUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_chart_empty_series() {
        let body = r#"{"chart": {"result": [{"indicators": {"quote": [{"close": [null, null]}]}}], "error": null}}"#;
        assert!(matches!(
            parse_chart_closes("EMPTY", body),
            Err(PricerError::DataUnavailable(_))
        ));
    }

    #[test]
    fn test_parse_chart_garbage() {
        assert!(matches!(
            parse_chart_closes("AAPL", "<html>rate limited</html>"),
            Err(PricerError::Parse(_))
        ));
    }

    #[test]
    fn test_calendar_days_cover_lookback() {
        assert_eq!(calendar_days_for(252), 365 + HOLIDAY_BUFFER_DAYS);
        assert!(calendar_days_for(30) >= 30);
    }

    #[test]
    fn test_spot_window_spans_market_closures() {
        // Five sessions plus a week-long closure still lands inside the window
        assert!(calendar_days_for(SPOT_SESSIONS) >= 5 + 7 + 2);
    }

    #[test]
    fn test_provider_uses_configured_rate() {
        let mut config = PricerConfig::default();
        config.risk_free_rate = 0.0375;
        let provider = YahooProvider::new(&config).unwrap();
        assert_eq!(provider.risk_free_rate().unwrap(), 0.0375);
    }

    #[test]
    #[ignore] // Requires network
    fn test_live_quote() {
        let provider = YahooProvider::new(&PricerConfig::default()).unwrap();
        let spot = provider.current_price("AAPL").unwrap();
        assert!(spot > 0.0);
        println!("AAPL close: {}", spot);
    }

    #[test]
    #[ignore] // Requires network
    fn test_live_volatility() {
        let provider = YahooProvider::new(&PricerConfig::default()).unwrap();
        let vol = provider.historical_volatility("AAPL", 252).unwrap();
        assert!(vol > 0.0 && vol < 2.0);
        println!("AAPL 1y realized vol: {:.2}%", vol * 100.0);
    }
}
