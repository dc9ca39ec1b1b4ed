//! LLM Inference Calculator
//!
//! Closed-form estimates of memory footprint, throughput, latency and cost
//! for serving a large language model on a given accelerator setup. Nothing
//! is measured: every figure comes from analytic formulas over static
//! reference tables.
//!
//! ## Main Components
//!
//! - `config`: Run configuration, quantization and model presets
//! - `hardware`: Accelerator presets
//! - `catalog`: Extensible model/hardware lookup
//! - `calculator`: Memory, performance and cost estimators plus the analyzer
//!
//! ## Example
//!
//! ```
//! use llm_inference_calc::{analyze_configuration, RunConfig};
//!
//! let config = RunConfig::new()
//!     .with_batch_size(8)
//!     .with_concurrent_users(4);
//! let result = analyze_configuration("llama-7b", "a100-40gb", &config).unwrap();
//! assert_eq!(result.memory_usage.model_memory, 14.0);
//! ```

pub mod calculator;
pub mod catalog;
pub mod config;
pub mod error;
pub mod hardware;

pub use calculator::{
    analyze_configuration, AnalysisResult, Compatibility, InferenceCalculator, MemoryBreakdown,
    PerformanceEstimate,
};
pub use catalog::Catalog;
pub use config::{DeploymentMode, ModelSpec, Quantization, RunConfig};
pub use error::{CalcError, Result};
pub use hardware::HardwareSpec;
