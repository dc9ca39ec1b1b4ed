use serde::{Deserialize, Serialize};
use std::fmt;

/// How comfortably the estimate fits in the available VRAM
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compatibility {
    #[serde(rename = "Compatible")]
    Compatible,
    #[serde(rename = "Tight Fit")]
    TightFit,
    #[serde(rename = "Requires Optimization")]
    RequiresOptimization,
    #[serde(rename = "Insufficient Memory")]
    InsufficientMemory,
}

impl Compatibility {
    /// Classify a VRAM usage percentage. Each threshold is inclusive.
    pub fn from_usage(usage_percentage: f64) -> Self {
        if usage_percentage <= 70.0 {
            Compatibility::Compatible
        } else if usage_percentage <= 90.0 {
            Compatibility::TightFit
        } else if usage_percentage <= 100.0 {
            Compatibility::RequiresOptimization
        } else {
            Compatibility::InsufficientMemory
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Compatibility::Compatible => "Compatible",
            Compatibility::TightFit => "Tight Fit",
            Compatibility::RequiresOptimization => "Requires Optimization",
            Compatibility::InsufficientMemory => "Insufficient Memory",
        }
    }

    /// Whether the estimate fits in VRAM at all, possibly after tuning
    pub fn fits(self) -> bool {
        self != Compatibility::InsufficientMemory
    }
}

impl fmt::Display for Compatibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Share of the pooled VRAM taken by `total_gb`, in percent
pub fn vram_usage_percentage(total_gb: f64, vram_gb: f64, num_gpus: usize) -> f64 {
    total_gb / (vram_gb * num_gpus as f64) * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundaries_are_inclusive() {
        assert_eq!(Compatibility::from_usage(70.0), Compatibility::Compatible);
        assert_eq!(Compatibility::from_usage(70.0001), Compatibility::TightFit);
        assert_eq!(Compatibility::from_usage(90.0), Compatibility::TightFit);
        assert_eq!(
            Compatibility::from_usage(90.0001),
            Compatibility::RequiresOptimization
        );
        assert_eq!(
            Compatibility::from_usage(100.0),
            Compatibility::RequiresOptimization
        );
        assert_eq!(
            Compatibility::from_usage(100.0001),
            Compatibility::InsufficientMemory
        );
    }

    #[test]
    fn test_only_insufficient_memory_does_not_fit() {
        assert!(Compatibility::Compatible.fits());
        assert!(Compatibility::TightFit.fits());
        assert!(Compatibility::RequiresOptimization.fits());
        assert!(!Compatibility::InsufficientMemory.fits());
        assert!(!Compatibility::from_usage(100.5).fits());
    }

    #[test]
    fn test_labels() {
        assert_eq!(Compatibility::TightFit.to_string(), "Tight Fit");
        let json = serde_json::to_string(&Compatibility::InsufficientMemory).unwrap();
        assert_eq!(json, "\"Insufficient Memory\"");
    }

    #[test]
    fn test_usage_pools_gpus() {
        assert_eq!(vram_usage_percentage(40.0, 40.0, 2), 50.0);
    }
}
