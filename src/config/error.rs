use crate::config::time_step::TimeStepParseError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("end_date cannot be earlier than start_date")]
    DateOrder,
    #[error("Failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),
    #[error("{0}")]
    TimeStep(#[from] TimeStepParseError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid region: {0}")]
    InvalidRegion(String),
    #[error("no region supplied; add a \"region\" polygon to the configuration")]
    MissingRegion,
}
