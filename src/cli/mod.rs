pub mod commands;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "llm-calc")]
#[command(about = "Estimate LLM inference memory, speed and cost", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Workload flags shared by the analysis commands. Unset flags keep the
/// value from `--config`, or the default.
#[derive(Args, Debug, Default)]
pub struct WorkloadArgs {
    /// JSON run configuration to start from
    #[arg(long)]
    pub config: Option<String>,
    /// Requests processed together
    #[arg(long)]
    pub batch_size: Option<usize>,
    /// Prompt length in tokens
    #[arg(long)]
    pub sequence_length: Option<usize>,
    /// Number of GPUs
    #[arg(long)]
    pub num_gpus: Option<usize>,
    /// Concurrent users
    #[arg(long)]
    pub concurrent_users: Option<usize>,
    /// Weight precision: fp32, fp16, int8, int4
    #[arg(long)]
    pub inference_quantization: Option<String>,
    /// KV cache precision: fp32, fp16, int8, int4
    #[arg(long)]
    pub kv_cache_quantization: Option<String>,
    /// Offload part of the framework overhead to CPU/RAM
    #[arg(long)]
    pub enable_offloading: bool,
    /// local, cloud or hosted
    #[arg(long)]
    pub deployment_mode: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the reference example (llama-7b on a100-40gb)
    Demo,
    /// Analyze one model on one hardware configuration
    Analyze {
        /// Model id, or custom-<N>b
        #[arg(long)]
        model: String,
        /// Hardware id, or custom-<N>gb
        #[arg(long)]
        hardware: String,
        #[command(flatten)]
        workload: WorkloadArgs,
        /// JSON file with extra models and hardware
        #[arg(long)]
        catalog: Option<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
    /// Analyze one model on every known hardware entry
    Compare {
        /// Model id, or custom-<N>b
        #[arg(long)]
        model: String,
        #[command(flatten)]
        workload: WorkloadArgs,
        /// JSON file with extra models and hardware
        #[arg(long)]
        catalog: Option<String>,
    },
    /// List known models
    Models {
        /// JSON file with extra models and hardware
        #[arg(long)]
        catalog: Option<String>,
    },
    /// List known hardware
    Hardware {
        /// JSON file with extra models and hardware
        #[arg(long)]
        catalog: Option<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Demo => commands::demo(),
        Commands::Analyze {
            model,
            hardware,
            workload,
            catalog,
            json,
        } => commands::analyze(&model, &hardware, &workload, catalog.as_deref(), json),
        Commands::Compare {
            model,
            workload,
            catalog,
        } => commands::compare(&model, &workload, catalog.as_deref()),
        Commands::Models { catalog } => commands::list_models(catalog.as_deref()),
        Commands::Hardware { catalog } => commands::list_hardware(catalog.as_deref()),
    }
}
