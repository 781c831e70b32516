//! Error types for civil-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CivilError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Invalid offset: {0}")]
    InvalidOffset(String),

    #[error("Invalid adjustment: {0}")]
    InvalidAdjustment(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),

    #[error("Parse failure at {position}: expected {expected}")]
    ParseFailure { position: usize, expected: String },

    #[error("Unknown zone: {0}")]
    UnknownZone(String),
}

pub type Result<T> = std::result::Result<T, CivilError>;
