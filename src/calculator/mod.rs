//! Inference capacity estimates
//!
//! Each estimator is a pure function over a model spec, a hardware spec and
//! a `RunConfig`. `InferenceCalculator` resolves ids through a `Catalog`
//! and chains memory, performance and cost into an `AnalysisResult`.

pub mod compatibility;
pub mod cost;
pub mod memory;
pub mod performance;
pub mod recommendations;

use crate::catalog::Catalog;
use crate::config::{DeploymentMode, RunConfig};
use crate::error::Result;
use serde::{Deserialize, Serialize};

pub use compatibility::{vram_usage_percentage, Compatibility};
pub use cost::{estimate_cost, local_hourly_rate};
pub use memory::{estimate_memory, MemoryBreakdown};
pub use performance::{estimate_performance, EfficiencyFactors, PerformanceEstimate};
pub use recommendations::recommend;

/// Combined estimate for one (model, hardware, config) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub memory_usage: MemoryBreakdown,
    pub performance: PerformanceEstimate,
    /// USD per request
    pub cost_per_request: f64,
    pub compatibility: Compatibility,
    pub vram_usage_percentage: f64,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Print a human-readable report
    pub fn print_summary(&self, model_id: &str, hardware_id: &str, config: &RunConfig) {
        let mem = &self.memory_usage;
        let perf = &self.performance;

        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("LLM Inference Analysis");
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("  Model:             {}", model_id);
        println!(
            "  Hardware:          {} x{} ({} deployment)",
            hardware_id, config.num_gpus, config.deployment_mode
        );
        println!(
            "  Quantization:      {} weights / {} KV cache",
            config.inference_quantization.label().to_uppercase(),
            config.kv_cache_quantization.label().to_uppercase()
        );
        println!(
            "  Workload:          {} tokens, batch {}, {} users",
            config.sequence_length, config.batch_size, config.concurrent_users
        );
        println!();
        println!("  Memory");
        println!("    Model weights:   {:.2} GB", mem.model_memory);
        println!("    KV cache:        {:.2} GB", mem.kv_cache);
        println!("    Activations:     {:.2} GB", mem.activations);
        println!("    Overhead:        {:.2} GB", mem.overhead);
        println!("    Total:           {:.1} GB", mem.total);
        println!("    VRAM usage:      {:.1}%", self.vram_usage_percentage);
        println!();
        println!("  Performance");
        println!("    Generation:      {:.1} tokens/sec", perf.generation_speed);
        println!("    Throughput:      {:.1} tokens/sec", perf.total_throughput);
        println!(
            "    Latency:         {:.0} ms (prefill {:.0} ms)",
            perf.latency_per_request * 1000.0,
            perf.prefill_latency * 1000.0
        );
        println!();
        println!("  Cost per request:  ${:.6}", self.cost_per_request);
        println!("  Compatibility:     {}", self.compatibility);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        println!("Recommendations:");
        for rec in &self.recommendations {
            println!("  • {}", rec);
        }
    }
}

/// Id-based front end over the pure estimators
#[derive(Debug, Clone, Default)]
pub struct InferenceCalculator {
    catalog: Catalog,
}

impl InferenceCalculator {
    pub fn new(catalog: Catalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Mutable access for registering extra models or hardware
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn calculate_memory_usage(
        &self,
        model_id: &str,
        hardware_id: &str,
        config: &RunConfig,
    ) -> Result<MemoryBreakdown> {
        config.validate()?;
        let model = self.catalog.model(model_id)?;
        self.catalog.hardware(hardware_id)?;

        let memory = estimate_memory(&model, config)?;
        tracing::debug!(
            model = model_id,
            weights = memory.model_memory,
            kv_cache = memory.kv_cache,
            activations = memory.activations,
            total = memory.total,
            "Estimated memory"
        );
        Ok(memory)
    }

    pub fn calculate_performance(
        &self,
        model_id: &str,
        hardware_id: &str,
        config: &RunConfig,
    ) -> Result<PerformanceEstimate> {
        config.validate()?;
        let model = self.catalog.model(model_id)?;
        let hardware = self.catalog.hardware(hardware_id)?;
        estimate_performance(&model, &hardware, config)
    }

    pub fn calculate_cost(
        &self,
        hardware_id: &str,
        performance: &PerformanceEstimate,
        deployment_mode: &DeploymentMode,
        num_gpus: usize,
    ) -> Result<f64> {
        let hardware = self.catalog.hardware(hardware_id)?;
        Ok(estimate_cost(&hardware, performance, deployment_mode, num_gpus))
    }

    /// Run all estimators and classify the VRAM fit
    pub fn analyze_configuration(
        &self,
        model_id: &str,
        hardware_id: &str,
        config: &RunConfig,
    ) -> Result<AnalysisResult> {
        let memory_usage = self.calculate_memory_usage(model_id, hardware_id, config)?;
        let performance = self.calculate_performance(model_id, hardware_id, config)?;
        let cost_per_request = self.calculate_cost(
            hardware_id,
            &performance,
            &config.deployment_mode,
            config.num_gpus,
        )?;

        let model = self.catalog.model(model_id)?;
        let hardware = self.catalog.hardware(hardware_id)?;
        let usage = vram_usage_percentage(memory_usage.total, hardware.vram_gb, config.num_gpus);
        let compatibility = Compatibility::from_usage(usage);

        tracing::debug!(
            model = model_id,
            hardware = hardware_id,
            usage,
            %compatibility,
            "Analyzed configuration"
        );

        Ok(AnalysisResult {
            memory_usage,
            performance,
            cost_per_request,
            compatibility,
            vram_usage_percentage: usage,
            recommendations: recommend(&model, config, &performance, usage),
        })
    }
}

/// Analyze against the built-in catalog
pub fn analyze_configuration(
    model_id: &str,
    hardware_id: &str,
    config: &RunConfig,
) -> Result<AnalysisResult> {
    InferenceCalculator::default().analyze_configuration(model_id, hardware_id, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ModelSpec;
    use crate::error::CalcError;

    #[test]
    fn test_unknown_ids_propagate() {
        let calc = InferenceCalculator::default();
        let config = RunConfig::new();

        assert!(matches!(
            calc.analyze_configuration("nope", "a100-40gb", &config),
            Err(CalcError::UnknownModel { .. })
        ));
        assert!(matches!(
            calc.analyze_configuration("llama-7b", "nope", &config),
            Err(CalcError::UnknownHardware { .. })
        ));
        assert!(matches!(
            calc.calculate_memory_usage("llama-7b", "nope", &config),
            Err(CalcError::UnknownHardware { .. })
        ));
    }

    #[test]
    fn test_invalid_config_is_rejected_before_lookup() {
        let calc = InferenceCalculator::default();
        let config = RunConfig::new().with_num_gpus(0);
        assert!(matches!(
            calc.analyze_configuration("llama-7b", "a100-40gb", &config),
            Err(CalcError::InvalidConfig {
                field: "num_gpus",
                ..
            })
        ));
    }

    #[test]
    fn test_registered_model_is_analyzed() {
        let mut calc = InferenceCalculator::default();
        calc.catalog_mut()
            .register_model("phi-3-mini", ModelSpec::dense(3.8, 32, 3072))
            .unwrap();

        let result = calc
            .analyze_configuration("phi-3-mini", "rtx4090-24gb", &RunConfig::new())
            .unwrap();
        assert!((result.memory_usage.model_memory - 7.6).abs() < 1e-12);
        assert_eq!(result.compatibility, Compatibility::Compatible);
    }

    #[test]
    fn test_free_function_matches_calculator() {
        let config = RunConfig::new().with_batch_size(4);
        let a = analyze_configuration("llama-13b", "a100-80gb", &config).unwrap();
        let b = InferenceCalculator::default()
            .analyze_configuration("llama-13b", "a100-80gb", &config)
            .unwrap();
        assert_eq!(a, b);
    }
}
