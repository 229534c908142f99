use clap::{ Parser, Subcommand };
use std::path::PathBuf;

pub mod commands;
pub mod ui;

#[derive(Parser)]
#[command(
    name = "veritas",
    about = "Bounded model checking and proof sketches for finite transition systems",
    version,
    author,
    long_about = None
)]
pub struct VeritasCli {
    /// Sets the log level (error, warn, info, debug, trace)
    #[arg(short, long, global = true, default_value = "info")]
    pub log_level: String,

    /// Path to configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long, global = true, default_value = "text")]
    pub output_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Verify a list of properties against a model
    Verify {
        /// Path to the model document (JSON or YAML)
        #[arg(short, long)]
        model: PathBuf,

        /// Path to the property list (JSON or YAML)
        #[arg(short, long)]
        properties: PathBuf,

        /// Verification method (model-checking, theorem-proving)
        #[arg(long, default_value = "model-checking")]
        method: String,

        /// Depth bound for state-space exploration
        #[arg(short = 'd', long)]
        max_depth: Option<usize>,

        /// Timeout per property in seconds
        #[arg(short, long)]
        timeout: Option<u64>,

        /// Run properties on parallel workers
        #[arg(long, default_value = "false")]
        parallel: bool,
    },

    /// Build a model and print its normalized transition system
    Inspect {
        /// Path to the model document (JSON or YAML)
        #[arg(short, long)]
        model: PathBuf,
    },
}
