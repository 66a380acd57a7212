//! Error types for the pricer and its market-data collaborators.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PricerError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Data unavailable: {0}")]
    DataUnavailable(String),

    #[error(
        "Insufficient data for {ticker}: {available} observations, at least {required} required"
    )]
    InsufficientData {
        ticker: String,
        required: usize,
        available: usize,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type PricerResult<T> = Result<T, PricerError>;

impl PricerError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }

    pub fn insufficient_data(ticker: impl Into<String>, required: usize, available: usize) -> Self {
        Self::InsufficientData {
            ticker: ticker.into(),
            required,
            available,
        }
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
