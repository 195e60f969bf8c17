use crate::spec_limits::LimitSide;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CpkError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV Parsing Error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration Error: {0}")]
    Config(String),

    #[error("Sample is empty")]
    EmptySample,

    #[error("Invalid specification: USL ({usl}) must be greater than LSL ({lsl})")]
    InvalidSpec { lsl: f64, usl: f64 },

    #[error("Specification has no {0} limit")]
    MissingLimit(LimitSide),

    #[error("At least 2 valid readings are required, found {n}")]
    InsufficientData { n: usize },

    #[error("Capability indices are not finite (near-zero standard deviation)")]
    NonFinite,

    #[error("No variation in data: all readings are identical")]
    NoVariation,

    #[error("No test record matches '{0}'")]
    RecordNotFound(String),
}

pub type CpkResult<T> = Result<T, CpkError>;
