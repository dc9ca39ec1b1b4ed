//! Library error type

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("Unknown model: {id}. Available: {available:?}")]
    UnknownModel { id: String, available: Vec<String> },

    #[error("Unknown hardware: {id}. Available: {available:?}")]
    UnknownHardware { id: String, available: Vec<String> },

    #[error("Unknown quantization: {0}. Use: fp32, fp16, int8, int4")]
    UnknownQuantization(String),

    #[error("{field} must be a positive integer, got {value}")]
    InvalidConfig { field: &'static str, value: usize },

    #[error("Invalid model spec for {id}: {reason}")]
    InvalidModelSpec { id: String, reason: String },

    #[error("Invalid hardware spec for {id}: {reason}")]
    InvalidHardwareSpec { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, CalcError>;
