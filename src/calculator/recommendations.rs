//! Rule-based tuning suggestions for an analyzed configuration

use crate::calculator::performance::PerformanceEstimate;
use crate::config::{DeploymentMode, ModelSpec, RunConfig};

const HIGH_USAGE_PERCENT: f64 = 90.0;
const SLOW_TOKENS_PER_SEC: f64 = 5.0;
const LARGE_MODEL_PARAMS: f64 = 70.0;
const HIGH_THROUGHPUT_TOKENS_PER_SEC: f64 = 1000.0;

pub fn recommend(
    model: &ModelSpec,
    config: &RunConfig,
    performance: &PerformanceEstimate,
    usage_percentage: f64,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    if usage_percentage > HIGH_USAGE_PERCENT {
        recommendations.push("Consider using more aggressive quantization (INT8 or INT4)".to_string());
        recommendations.push("Reduce batch size or sequence length".to_string());
        recommendations.push("Enable CPU/RAM offloading".to_string());
        recommendations.push("Consider using multiple GPUs".to_string());
    }

    if performance.generation_speed < SLOW_TOKENS_PER_SEC {
        recommendations.push("Consider a GPU with higher memory bandwidth".to_string());
        recommendations.push("Reduce model size or use a fine-tuned smaller model".to_string());
    }

    if config.batch_size == 1 && config.concurrent_users > 1 {
        recommendations.push("Increase batch size to improve throughput".to_string());
    }

    if model.params > LARGE_MODEL_PARAMS && config.num_gpus == 1 {
        recommendations.push("Large models require multiple GPUs for optimal performance".to_string());
    }

    if config.deployment_mode == DeploymentMode::Hosted
        && performance.total_throughput > HIGH_THROUGHPUT_TOKENS_PER_SEC
    {
        recommendations.push("Consider local deployment for high-throughput scenarios".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Current configuration looks optimal".to_string());
        recommendations
            .push("Consider testing with real workloads to validate performance".to_string());
    }

    recommendations
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perf(generation_speed: f64, total_throughput: f64) -> PerformanceEstimate {
        PerformanceEstimate {
            generation_speed,
            total_throughput,
            latency_per_request: 1.0,
            prefill_latency: 0.1,
            decode_latency: 0.9,
        }
    }

    #[test]
    fn test_optimal_configuration() {
        let model = ModelSpec::dense(7.0, 32, 4096);
        let recs = recommend(&model, &RunConfig::new(), &perf(50.0, 50.0), 40.0);
        assert_eq!(recs.len(), 2);
        assert!(recs[0].contains("optimal"));
    }

    #[test]
    fn test_memory_pressure() {
        let model = ModelSpec::dense(7.0, 32, 4096);
        let recs = recommend(&model, &RunConfig::new(), &perf(50.0, 50.0), 95.0);
        assert_eq!(recs.len(), 4);
        assert!(recs.iter().any(|r| r.contains("INT8 or INT4")));
    }

    #[test]
    fn test_large_model_single_gpu_and_unbatched_users() {
        let model = ModelSpec::dense(180.0, 80, 14848);
        let config = RunConfig::new().with_concurrent_users(8);
        let recs = recommend(&model, &config, &perf(2.0, 16.0), 50.0);

        assert!(recs.iter().any(|r| r.contains("higher memory bandwidth")));
        assert!(recs.iter().any(|r| r.contains("Increase batch size")));
        assert!(recs.iter().any(|r| r.contains("multiple GPUs")));
        assert!(!recs.iter().any(|r| r.contains("looks optimal")));
    }

    #[test]
    fn test_hosted_high_throughput() {
        let model = ModelSpec::dense(7.0, 32, 4096);
        let config = RunConfig::new().with_deployment_mode(DeploymentMode::Hosted);
        let recs = recommend(&model, &config, &perf(100.0, 2000.0), 30.0);
        assert_eq!(
            recs,
            vec!["Consider local deployment for high-throughput scenarios".to_string()]
        );
    }
}
