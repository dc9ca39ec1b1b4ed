pub mod deployment;
pub mod model;
pub mod quantization;

use crate::error::{CalcError, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use deployment::DeploymentMode;
pub use model::{ModelSpec, AVAILABLE_MODELS};
pub use quantization::Quantization;

/// Workload and deployment settings for one estimate
///
/// Missing keys in a JSON config fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub batch_size: usize,
    /// Prompt length in tokens
    pub sequence_length: usize,
    pub num_gpus: usize,
    pub concurrent_users: usize,
    pub inference_quantization: Quantization,
    pub kv_cache_quantization: Quantization,
    pub enable_offloading: bool,
    pub deployment_mode: DeploymentMode,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_size: 1,
            sequence_length: 2048,
            num_gpus: 1,
            concurrent_users: 1,
            inference_quantization: Quantization::Fp16,
            kv_cache_quantization: Quantization::Fp16,
            enable_offloading: false,
            deployment_mode: DeploymentMode::Local,
        }
    }
}

impl RunConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_sequence_length(mut self, sequence_length: usize) -> Self {
        self.sequence_length = sequence_length;
        self
    }

    pub fn with_num_gpus(mut self, num_gpus: usize) -> Self {
        self.num_gpus = num_gpus;
        self
    }

    pub fn with_concurrent_users(mut self, concurrent_users: usize) -> Self {
        self.concurrent_users = concurrent_users;
        self
    }

    pub fn with_inference_quantization(mut self, quantization: Quantization) -> Self {
        self.inference_quantization = quantization;
        self
    }

    pub fn with_kv_cache_quantization(mut self, quantization: Quantization) -> Self {
        self.kv_cache_quantization = quantization;
        self
    }

    pub fn with_offloading(mut self, enabled: bool) -> Self {
        self.enable_offloading = enabled;
        self
    }

    pub fn with_deployment_mode(mut self, mode: impl Into<DeploymentMode>) -> Self {
        self.deployment_mode = mode.into();
        self
    }

    /// Reject counts that would make the formulas divide by zero
    pub fn validate(&self) -> Result<()> {
        let counts = [
            ("batch_size", self.batch_size),
            ("sequence_length", self.sequence_length),
            ("num_gpus", self.num_gpus),
            ("concurrent_users", self.concurrent_users),
        ];

        for (field, value) in counts {
            if value == 0 {
                return Err(CalcError::InvalidConfig { field, value });
            }
        }
        Ok(())
    }

    /// Load a config from a JSON file, filling in defaults per key
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), json)?;
        Ok(())
    }
}
