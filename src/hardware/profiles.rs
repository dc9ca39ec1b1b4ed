//! Accelerator specifications

use crate::error::{CalcError, Result};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_power_watts() -> f64 {
    400.0
}

/// One accelerator card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HardwareSpec {
    pub vram_gb: f64,
    /// Memory bandwidth in GB/s
    pub bandwidth_gbps: f64,
    /// Hourly price in USD. Local deployments amortize this figure
    /// over three years instead of billing it per hour.
    pub price_per_hour: f64,
    pub cores: u32,
    #[serde(default = "default_power_watts")]
    pub power_watts: f64,
}

impl HardwareSpec {
    pub fn new(vram_gb: f64, bandwidth_gbps: f64, price_per_hour: f64, cores: u32) -> Self {
        Self {
            vram_gb,
            bandwidth_gbps,
            price_per_hour,
            cores,
            power_watts: default_power_watts(),
        }
    }

    pub fn with_power_watts(mut self, power_watts: f64) -> Self {
        self.power_watts = power_watts;
        self
    }

    /// Generic card where only the VRAM size is known
    pub fn custom(vram_gb: f64) -> Self {
        Self::new(vram_gb, 1000.0, 2.0, 5000).with_power_watts(300.0)
    }

    pub fn validate(&self, id: &str) -> Result<()> {
        let invalid = |reason: &str| CalcError::InvalidHardwareSpec {
            id: id.to_string(),
            reason: reason.to_string(),
        };

        let figures = [
            self.vram_gb,
            self.bandwidth_gbps,
            self.price_per_hour,
            self.power_watts,
        ];
        if figures.iter().any(|value| !value.is_finite()) {
            return Err(invalid("figures must be finite"));
        }
        if !(self.vram_gb > 0.0) {
            return Err(invalid("vram_gb must be positive"));
        }
        if !(self.bandwidth_gbps > 0.0) {
            return Err(invalid("bandwidth_gbps must be positive"));
        }
        if self.cores == 0 {
            return Err(invalid("cores must be positive"));
        }
        if self.price_per_hour < 0.0 || self.power_watts < 0.0 {
            return Err(invalid("price and power must not be negative"));
        }
        Ok(())
    }
}

/// Built-in accelerator presets
pub static HARDWARE_PROFILES: Lazy<HashMap<String, HardwareSpec>> = Lazy::new(|| {
    let mut profiles = HashMap::new();

    profiles.insert(
        "t4-16gb".to_string(),
        HardwareSpec::new(16.0, 320.0, 0.526, 2560).with_power_watts(70.0),
    );
    profiles.insert(
        "a100-40gb".to_string(),
        HardwareSpec::new(40.0, 1555.0, 2.06, 6912).with_power_watts(400.0),
    );
    profiles.insert(
        "a100-80gb".to_string(),
        HardwareSpec::new(80.0, 1935.0, 3.21, 6912).with_power_watts(400.0),
    );
    profiles.insert(
        "h100-80gb".to_string(),
        HardwareSpec::new(80.0, 3350.0, 4.13, 14592).with_power_watts(700.0),
    );
    profiles.insert(
        "rtx4090-24gb".to_string(),
        HardwareSpec::new(24.0, 1008.0, 1.28, 16384).with_power_watts(450.0),
    );

    profiles
});
