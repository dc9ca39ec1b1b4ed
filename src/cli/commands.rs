//! CLI command implementations

use super::WorkloadArgs;
use anyhow::Result;
use llm_inference_calc::{
    analyze_configuration, Catalog, DeploymentMode, InferenceCalculator, Quantization, RunConfig,
};

fn load_catalog(path: Option<&str>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load_json(path),
        None => Ok(Catalog::builtin()),
    }
}

/// Build a run config from `--config` plus any explicit flags
pub fn build_config(args: &WorkloadArgs) -> Result<RunConfig> {
    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };

    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }
    if let Some(sequence_length) = args.sequence_length {
        config.sequence_length = sequence_length;
    }
    if let Some(num_gpus) = args.num_gpus {
        config.num_gpus = num_gpus;
    }
    if let Some(concurrent_users) = args.concurrent_users {
        config.concurrent_users = concurrent_users;
    }
    if let Some(label) = &args.inference_quantization {
        config.inference_quantization = label.parse::<Quantization>()?;
    }
    if let Some(label) = &args.kv_cache_quantization {
        config.kv_cache_quantization = label.parse::<Quantization>()?;
    }
    if args.enable_offloading {
        config.enable_offloading = true;
    }
    if let Some(label) = &args.deployment_mode {
        config.deployment_mode = DeploymentMode::from(label.as_str());
    }

    config.validate()?;
    Ok(config)
}

pub fn demo() -> Result<()> {
    let config = RunConfig::new()
        .with_batch_size(8)
        .with_sequence_length(2048)
        .with_concurrent_users(4);

    let result = analyze_configuration("llama-7b", "a100-40gb", &config)?;

    println!("LLM Inference Analysis:");
    println!("Memory Usage: {:.1} GB", result.memory_usage.total);
    println!(
        "Generation Speed: {:.1} tokens/sec",
        result.performance.generation_speed
    );
    println!("Cost per Request: ${:.6}", result.cost_per_request);
    println!("Compatibility: {}", result.compatibility);
    Ok(())
}

pub fn analyze(
    model: &str,
    hardware: &str,
    workload: &WorkloadArgs,
    catalog: Option<&str>,
    json: bool,
) -> Result<()> {
    let config = build_config(workload)?;
    let calculator = InferenceCalculator::new(load_catalog(catalog)?);
    let result = calculator.analyze_configuration(model, hardware, &config)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        result.print_summary(model, hardware, &config);
    }
    Ok(())
}

pub fn compare(model: &str, workload: &WorkloadArgs, catalog: Option<&str>) -> Result<()> {
    let config = build_config(workload)?;
    let calculator = InferenceCalculator::new(load_catalog(catalog)?);

    println!();
    println!(
        "  {:<16} {:>10} {:>8} {:>12} {:>12}  {}",
        "HARDWARE", "MEMORY", "VRAM", "TOKENS/SEC", "COST/REQ", "FIT"
    );

    let hardware_ids = calculator.catalog().hardware_ids();
    let mut fitting = 0;
    for hardware in &hardware_ids {
        let result = calculator.analyze_configuration(model, hardware, &config)?;
        if result.compatibility.fits() {
            fitting += 1;
        }
        println!(
            "  {:<16} {:>7.1} GB {:>7.1}% {:>12.1} {:>12.6}  {}",
            hardware,
            result.memory_usage.total,
            result.vram_usage_percentage,
            result.performance.generation_speed,
            result.cost_per_request,
            result.compatibility
        );
    }

    println!();
    println!(
        "  {} fits on {} of {} hardware options",
        model,
        fitting,
        hardware_ids.len()
    );
    println!();
    Ok(())
}

pub fn list_models(catalog: Option<&str>) -> Result<()> {
    let catalog = load_catalog(catalog)?;

    println!();
    println!(
        "  {:<16} {:>9} {:>8} {:>8}  {}",
        "MODEL", "PARAMS", "LAYERS", "HIDDEN", "ACTIVE"
    );
    for (id, spec) in catalog.models() {
        let active = if spec.is_moe {
            format!("{}B (MoE)", spec.active_params())
        } else {
            "-".to_string()
        };
        println!(
            "  {:<16} {:>8}B {:>8} {:>8}  {}",
            id, spec.params, spec.layers, spec.hidden_size, active
        );
    }
    println!();
    println!("  Ad-hoc sizes: custom-<N>b (e.g. custom-3b)");
    println!();
    Ok(())
}

pub fn list_hardware(catalog: Option<&str>) -> Result<()> {
    let catalog = load_catalog(catalog)?;

    println!();
    println!(
        "  {:<16} {:>8} {:>11} {:>8} {:>7} {:>7}",
        "HARDWARE", "VRAM", "BANDWIDTH", "$/HOUR", "CORES", "WATTS"
    );
    for (id, spec) in catalog.hardware_entries() {
        println!(
            "  {:<16} {:>5} GB {:>6} GB/s {:>8.3} {:>7} {:>7}",
            id, spec.vram_gb, spec.bandwidth_gbps, spec.price_per_hour, spec.cores, spec.power_watts
        );
    }
    println!();
    println!("  Ad-hoc cards: custom-<N>gb (e.g. custom-48gb)");
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_defaults() {
        let args = WorkloadArgs {
            batch_size: Some(16),
            inference_quantization: Some("int4".to_string()),
            deployment_mode: Some("cloud".to_string()),
            enable_offloading: true,
            ..Default::default()
        };
        let config = build_config(&args).unwrap();

        assert_eq!(config.batch_size, 16);
        assert_eq!(config.inference_quantization, Quantization::Int4);
        assert_eq!(config.deployment_mode, DeploymentMode::Cloud);
        assert!(config.enable_offloading);
        assert_eq!(config.sequence_length, 2048);
    }

    #[test]
    fn test_bad_flags_are_errors() {
        let args = WorkloadArgs {
            kv_cache_quantization: Some("int3".to_string()),
            ..Default::default()
        };
        assert!(build_config(&args).is_err());

        let args = WorkloadArgs {
            concurrent_users: Some(0),
            ..Default::default()
        };
        assert!(build_config(&args).is_err());
    }
}
