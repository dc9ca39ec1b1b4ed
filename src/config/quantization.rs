use crate::error::CalcError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Numeric precision used for weights or the KV cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quantization {
    Fp32,
    #[default]
    Fp16,
    Int8,
    Int4,
}

impl Quantization {
    pub const ALL: [Quantization; 4] = [
        Quantization::Fp32,
        Quantization::Fp16,
        Quantization::Int8,
        Quantization::Int4,
    ];

    /// Bytes stored per parameter (or per cached element).
    ///
    /// Multiplied by a parameter count in billions this yields gigabytes
    /// directly. The estimators rely on that convention, so no 1e9/2^30
    /// conversion is applied to weight memory.
    pub fn bytes_per_param(self) -> f64 {
        match self {
            Quantization::Fp32 => 4.0,
            Quantization::Fp16 => 2.0,
            Quantization::Int8 => 1.0,
            Quantization::Int4 => 0.5,
        }
    }

    /// Kernel efficiency multiplier, only used for throughput estimates
    pub fn efficiency(self) -> f64 {
        match self {
            Quantization::Fp32 => 0.8,
            Quantization::Fp16 => 0.9,
            Quantization::Int8 => 0.95,
            Quantization::Int4 => 0.85,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Quantization::Fp32 => "fp32",
            Quantization::Fp16 => "fp16",
            Quantization::Int8 => "int8",
            Quantization::Int4 => "int4",
        }
    }
}

impl fmt::Display for Quantization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Quantization {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fp32" => Ok(Quantization::Fp32),
            "fp16" => Ok(Quantization::Fp16),
            "int8" => Ok(Quantization::Int8),
            "int4" => Ok(Quantization::Int4),
            _ => Err(CalcError::UnknownQuantization(s.to_string())),
        }
    }
}
