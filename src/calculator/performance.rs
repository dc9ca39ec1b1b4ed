//! Throughput and latency estimation
//!
//! Token generation is treated as memory-bandwidth bound: every generated
//! token streams all active weights once. The theoretical ceiling is then
//! derated by batching, model size, quantization and multi-GPU factors.

use crate::config::{ModelSpec, RunConfig};
use crate::error::Result;
use crate::hardware::HardwareSpec;
use serde::{Deserialize, Serialize};

/// Output tokens assumed per request when pricing decode time
pub const OUTPUT_TOKENS_PER_REQUEST: f64 = 50.0;

/// Model size at which no size penalty applies, in billions
const BASELINE_PARAMS: f64 = 7.0;
const MIN_MODEL_EFFICIENCY: f64 = 0.3;
const MULTI_GPU_SCALING: f64 = 0.95;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceEstimate {
    /// Tokens per second for a single request
    pub generation_speed: f64,
    /// Tokens per second across all concurrent users
    pub total_throughput: f64,
    /// Seconds per request, prefill plus decode
    pub latency_per_request: f64,
    pub prefill_latency: f64,
    pub decode_latency: f64,
}

/// Derating multipliers applied to the bandwidth ceiling, each in (0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EfficiencyFactors {
    pub batch: f64,
    pub model: f64,
    pub quantization: f64,
    pub multi_gpu: f64,
}

impl EfficiencyFactors {
    pub fn for_config(model: &ModelSpec, config: &RunConfig) -> Self {
        Self {
            batch: batch_efficiency(config.batch_size),
            model: model_efficiency(model.params),
            quantization: config.inference_quantization.efficiency(),
            multi_gpu: MULTI_GPU_SCALING.powf(config.num_gpus.saturating_sub(1) as f64),
        }
    }

    pub fn combined(&self) -> f64 {
        self.batch * self.model * self.quantization * self.multi_gpu
    }
}

/// Diminishing returns from batching, saturating at batch size 15
pub fn batch_efficiency(batch_size: usize) -> f64 {
    ((batch_size as f64 + 1.0).log2() / 4.0).min(1.0)
}

/// Linear loss past the 7B baseline, floored at 0.3. Uses total
/// parameters even for mixture-of-experts models.
pub fn model_efficiency(params: f64) -> f64 {
    (1.0 - (params - BASELINE_PARAMS) / 100.0).max(MIN_MODEL_EFFICIENCY)
}

/// Tokens per second the aggregate memory bandwidth could sustain
pub fn theoretical_tokens_per_sec(
    model: &ModelSpec,
    hardware: &HardwareSpec,
    config: &RunConfig,
) -> f64 {
    let bytes_per_token =
        model.effective_params() * config.inference_quantization.bytes_per_param();
    hardware.bandwidth_gbps * config.num_gpus as f64 / bytes_per_token
}

/// Fails on a config with a zero count, which would otherwise divide by zero
pub fn estimate_performance(
    model: &ModelSpec,
    hardware: &HardwareSpec,
    config: &RunConfig,
) -> Result<PerformanceEstimate> {
    config.validate()?;

    let theoretical = theoretical_tokens_per_sec(model, hardware, config);
    let factors = EfficiencyFactors::for_config(model, config);
    let effective_tokens_per_sec = theoretical * factors.combined();

    tracing::debug!(
        theoretical,
        batch = factors.batch,
        model = factors.model,
        quantization = factors.quantization,
        multi_gpu = factors.multi_gpu,
        "Derated bandwidth ceiling"
    );

    let generation_speed = effective_tokens_per_sec / config.batch_size as f64;
    let total_throughput = effective_tokens_per_sec * config.concurrent_users as f64;

    // Attention prefill grows quadratically with prompt length
    let sequence_length = config.sequence_length as f64;
    let prefill_latency = sequence_length * sequence_length
        / (hardware.cores as f64 * config.num_gpus as f64 * 1_000_000.0);
    let decode_latency = OUTPUT_TOKENS_PER_REQUEST / generation_speed;

    Ok(PerformanceEstimate {
        generation_speed,
        total_throughput,
        latency_per_request: prefill_latency + decode_latency,
        prefill_latency,
        decode_latency,
    })
}
