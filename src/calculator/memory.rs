//! VRAM footprint estimation
//!
//! Weight memory uses the "billions of parameters × bytes per parameter =
//! GB" convention, while the KV cache and activations are converted from
//! bytes with 2^30. The mix is intentional and must be kept for estimates
//! to stay comparable with published figures from the same formulas.

use crate::config::{ModelSpec, RunConfig};
use crate::error::Result;
use serde::{Deserialize, Serialize};

const GIB: f64 = 1024.0 * 1024.0 * 1024.0;

/// Bytes held per activation element across intermediate buffers
const ACTIVATION_BYTES: f64 = 4.0;

const OVERHEAD_FACTOR: f64 = 0.20;
const OVERHEAD_FACTOR_OFFLOADING: f64 = 0.15;

/// Estimated VRAM use, in GB
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MemoryBreakdown {
    pub model_memory: f64,
    pub kv_cache: f64,
    pub activations: f64,
    pub overhead: f64,
    pub total: f64,
}

/// Estimate weights, KV cache, activations and framework overhead
///
/// Weights are sharded across GPUs; the KV cache and activations are not.
pub fn estimate_memory(model: &ModelSpec, config: &RunConfig) -> Result<MemoryBreakdown> {
    config.validate()?;

    let batch_size = config.batch_size as f64;
    let sequence_length = config.sequence_length as f64;
    let hidden_size = model.hidden_size as f64;

    let model_memory = model.effective_params() * config.inference_quantization.bytes_per_param()
        / config.num_gpus as f64;

    // Separate key and value tensors per layer
    let kv_cache_per_token =
        2.0 * config.kv_cache_quantization.bytes_per_param() * model.layers as f64 * hidden_size;
    let kv_cache = kv_cache_per_token
        * sequence_length
        * batch_size
        * config.concurrent_users as f64
        / GIB;

    let activations = batch_size * sequence_length * hidden_size * ACTIVATION_BYTES / GIB;

    let overhead_factor = if config.enable_offloading {
        OVERHEAD_FACTOR_OFFLOADING
    } else {
        OVERHEAD_FACTOR
    };
    let overhead = (model_memory + kv_cache + activations) * overhead_factor;

    Ok(MemoryBreakdown {
        model_memory,
        kv_cache,
        activations,
        overhead,
        total: model_memory + kv_cache + activations + overhead,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Quantization;
    use crate::error::CalcError;

    fn llama_7b() -> ModelSpec {
        ModelSpec::dense(7.0, 32, 4096)
    }

    #[test]
    fn test_weights_shard_across_gpus() {
        let one = estimate_memory(&llama_7b(), &RunConfig::new()).unwrap();
        let four = estimate_memory(&llama_7b(), &RunConfig::new().with_num_gpus(4)).unwrap();

        assert_eq!(one.model_memory, 14.0);
        assert_eq!(four.model_memory, 3.5);
        assert_eq!(one.kv_cache, four.kv_cache);
        assert_eq!(one.activations, four.activations);
    }

    #[test]
    fn test_kv_cache_default_config() {
        // 2 * 2 bytes * 32 layers * 4096 hidden * 2048 tokens = 1 GiB
        let mem = estimate_memory(&llama_7b(), &RunConfig::new()).unwrap();
        assert!((mem.kv_cache - 1.0).abs() < 1e-12);
        // 2048 * 4096 * 4 bytes = 32 MiB
        assert!((mem.activations - 1.0 / 32.0).abs() < 1e-12);
    }

    #[test]
    fn test_offloading_lowers_overhead() {
        let base = estimate_memory(&llama_7b(), &RunConfig::new()).unwrap();
        let offload =
            estimate_memory(&llama_7b(), &RunConfig::new().with_offloading(true)).unwrap();

        let subtotal = base.model_memory + base.kv_cache + base.activations;
        assert!((base.overhead - subtotal * 0.20).abs() < 1e-12);
        assert!((offload.overhead - subtotal * 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_kv_cache_quantization_scales_cache_only() {
        let fp16 = estimate_memory(&llama_7b(), &RunConfig::new()).unwrap();
        let int8 = estimate_memory(
            &llama_7b(),
            &RunConfig::new().with_kv_cache_quantization(Quantization::Int8),
        )
        .unwrap();
        assert!((int8.kv_cache * 2.0 - fp16.kv_cache).abs() < 1e-12);
        assert_eq!(int8.model_memory, fp16.model_memory);
    }

    #[test]
    fn test_zero_sequence_length_is_rejected() {
        let config = RunConfig::new().with_sequence_length(0);
        assert!(matches!(
            estimate_memory(&llama_7b(), &config),
            Err(CalcError::InvalidConfig {
                field: "sequence_length",
                ..
            })
        ));
    }
}
