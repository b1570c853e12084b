//! Command-line interface definitions.
//!
//! One subcommand per control-plane operation, plus `config validate`.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::paths;

/// Control plane for a fleet of GPU-backed inference workers
#[derive(Parser, Debug)]
#[command(name = "fleetward")]
#[command(version)]
pub struct Cli {
    /// Configuration file
    #[arg(long, short = 'c', global = true, default_value_os_t = paths::default_config())]
    pub config: PathBuf,

    /// API token presented with every call
    #[arg(long, global = true, env = "FLEETWARD_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Complete the one-time setup, or report whether it is done
    Setup(SetupArgs),

    /// List servable models
    Models,

    /// List workers and their status
    Workers,

    /// Provision a new worker
    Create(CreateArgs),

    /// Pause a running worker
    Pause(WorkerArg),

    /// Resume a paused worker
    Resume(WorkerArg),

    /// Delete a worker
    Delete(WorkerArg),

    /// Stream a chat completion from a worker
    Chat(ChatArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

/// Subcommands for `fleetward config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Load and validate the configuration file.
    Validate,
}

/// Arguments for `fleetward setup`.
#[derive(Parser, Debug)]
pub struct SetupArgs {
    /// Service-account key file to persist
    #[arg(long, value_name = "PATH")]
    pub key_file: Option<PathBuf>,
}

/// Arguments for `fleetward create`.
#[derive(Parser, Debug)]
pub struct CreateArgs {
    /// Model to serve
    pub model: String,

    /// Weight quantization [float16, int8, int4]
    #[arg(long)]
    pub quantization: String,

    /// GPU type [T4, L4, A100, A100-80GB, H100]
    #[arg(long)]
    pub gpu_type: String,

    /// GPUs per worker [1, 2, 4, 8]
    #[arg(long, default_value_t = 1)]
    pub gpu_count: u32,

    /// Worker name; generated from the model when omitted
    #[arg(long)]
    pub name: Option<String>,
}

/// A single worker name.
#[derive(Parser, Debug)]
pub struct WorkerArg {
    /// Worker name
    pub name: String,
}

/// Arguments for `fleetward chat`.
#[derive(Parser, Debug)]
pub struct ChatArgs {
    /// Worker to route the request to
    pub worker: String,

    /// User prompt
    pub prompt: String,

    /// System message sent before the prompt
    #[arg(long)]
    pub system: Option<String>,

    /// Sampling temperature (0.0 - 2.0)
    #[arg(long)]
    pub temperature: Option<f64>,

    /// Nucleus sampling mass (0.0 - 1.0)
    #[arg(long)]
    pub top_p: Option<f64>,

    /// Top-k sampling cutoff
    #[arg(long)]
    pub top_k: Option<u32>,

    /// Maximum generated length
    #[arg(long)]
    pub max_length: Option<u32>,
}
