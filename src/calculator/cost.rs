//! Per-request cost under each deployment mode

use crate::calculator::performance::PerformanceEstimate;
use crate::config::DeploymentMode;
use crate::hardware::HardwareSpec;

/// Hours in the three-year, always-on amortization window
pub const AMORTIZATION_HOURS: f64 = 24.0 * 365.0 * 3.0;

/// Electricity price in USD per kWh
pub const ELECTRICITY_USD_PER_KWH: f64 = 0.12;

/// Flat per-request price assumed for hosted APIs
pub const HOSTED_COST_PER_REQUEST: f64 = 0.0015;

/// Hourly cost of owning `num_gpus` cards: amortized price plus power
pub fn local_hourly_rate(hardware: &HardwareSpec, num_gpus: usize) -> f64 {
    let gpus = num_gpus as f64;
    let hourly_hardware_cost = hardware.price_per_hour * gpus / AMORTIZATION_HOURS;
    let hourly_power_cost = hardware.power_watts * gpus * ELECTRICITY_USD_PER_KWH / 1000.0;
    hourly_hardware_cost + hourly_power_cost
}

/// Hourly rental cost of `num_gpus` cards
pub fn cloud_hourly_rate(hardware: &HardwareSpec, num_gpus: usize) -> f64 {
    hardware.price_per_hour * num_gpus as f64
}

/// Cost of serving one request, in USD
///
/// Unrecognized deployment modes cost nothing.
pub fn estimate_cost(
    hardware: &HardwareSpec,
    performance: &PerformanceEstimate,
    mode: &DeploymentMode,
    num_gpus: usize,
) -> f64 {
    let latency = performance.latency_per_request;

    match mode {
        DeploymentMode::Local => local_hourly_rate(hardware, num_gpus) * latency / 3600.0,
        DeploymentMode::Cloud => cloud_hourly_rate(hardware, num_gpus) * latency / 3600.0,
        DeploymentMode::Hosted => HOSTED_COST_PER_REQUEST,
        DeploymentMode::Unrecognized(label) => {
            tracing::warn!("Unrecognized deployment mode '{}', reporting zero cost", label);
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn perf(latency: f64) -> PerformanceEstimate {
        PerformanceEstimate {
            generation_speed: 10.0,
            total_throughput: 10.0,
            latency_per_request: latency,
            prefill_latency: 0.0,
            decode_latency: latency,
        }
    }

    fn a100() -> HardwareSpec {
        HardwareSpec::new(40.0, 1555.0, 2.06, 6912).with_power_watts(400.0)
    }

    #[test]
    fn test_local_hourly_rate() {
        let expected = (2.06 * 2.0) / (24.0 * 365.0 * 3.0) + (400.0 * 2.0 * 0.12) / 1000.0;
        assert!((local_hourly_rate(&a100(), 2) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_hosted_is_flat() {
        for latency in [0.1, 2.0, 300.0] {
            let cost = estimate_cost(&a100(), &perf(latency), &DeploymentMode::Hosted, 4);
            assert_eq!(cost, 0.0015);
        }
    }

    #[test]
    fn test_cloud_and_local_scale_with_latency() {
        for mode in [DeploymentMode::Cloud, DeploymentMode::Local] {
            let short = estimate_cost(&a100(), &perf(1.0), &mode, 1);
            let long = estimate_cost(&a100(), &perf(3.0), &mode, 1);
            assert!((long - 3.0 * short).abs() < 1e-15, "{} not linear", mode);
        }

        let cloud = estimate_cost(&a100(), &perf(3600.0), &DeploymentMode::Cloud, 2);
        assert!((cloud - 4.12).abs() < 1e-12);
    }

    #[test]
    fn test_unrecognized_mode_costs_nothing() {
        let mode = DeploymentMode::Unrecognized("spot".to_string());
        assert_eq!(estimate_cost(&a100(), &perf(5.0), &mode, 1), 0.0);
    }
}
