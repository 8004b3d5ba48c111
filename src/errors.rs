use thiserror::Error;

#[derive(Error, Debug)]
pub enum TickerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request error: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Upstream returned HTTP {0}")]
    StatusError(u16),

    #[error("Config error: {0}")]
    ConfigError(String),

    #[error("Data error: {0}")]
    DataError(String),
}

pub type Result<T> = std::result::Result<T, TickerError>;
