//! Error types

use thiserror::Error;

/// Link budget and scenario error type
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LinkError {
    /// Non-physical input, always a scenario construction bug
    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// The accumulator held no SINR samples when the scenario was compared
    #[error("Insufficient data in scenario '{scenario}': no SINR samples recorded")]
    InsufficientData { scenario: String },

    /// Observed SINR outside the allowed tolerance
    #[error(
        "SINR out of tolerance in scenario '{scenario}': expected {expected_db} dB, observed {observed_db} dB (tolerance {tolerance_db} dB)"
    )]
    ToleranceExceeded {
        scenario: String,
        expected_db: f64,
        observed_db: f64,
        tolerance_db: f64,
    },

    /// Observed MCS differs from the reference MCS
    #[error(
        "Wrong MCS index in scenario '{scenario}' at frame {frame_no} subframe {subframe_no}: expected {expected}, observed {observed}"
    )]
    MismatchError {
        scenario: String,
        frame_no: u32,
        subframe_no: u32,
        expected: i32,
        observed: i32,
    },

    /// Suite file could not be read
    #[error("I/O error: {0}")]
    Io(String),

    /// Suite file could not be parsed
    #[error("Config error: {0}")]
    Config(String),
}

impl LinkError {
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        LinkError::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for LinkError {
    fn from(err: std::io::Error) -> Self {
        LinkError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for LinkError {
    fn from(err: toml::de::Error) -> Self {
        LinkError::Config(err.to_string())
    }
}

/// Result type for link budget operations
pub type LinkResult<T> = Result<T, LinkError>;
