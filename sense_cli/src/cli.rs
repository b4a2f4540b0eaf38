//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "sense",
    version,
    about = "Touchless faucet and gas-leak monitor control"
)]
pub struct Cli {
    /// Path to config TOML (typed); defaults are used when the file is absent
    #[arg(long, value_name = "FILE", default_value = "etc/sense_config.toml")]
    pub config: PathBuf,

    /// Emit status/readings as JSON lines instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the touchless faucet controller
    Faucet {
        /// Stop after this many poll cycles (runs until Ctrl-C when absent)
        #[arg(long)]
        cycles: Option<u64>,

        /// Proximity threshold override (cm)
        #[arg(long)]
        threshold_cm: Option<f32>,

        /// Timed-open duration override (ms)
        #[arg(long)]
        valve_open_ms: Option<u64>,

        /// Initial simulated hand distance (cm); simulation builds only
        #[arg(long)]
        sim_distance_cm: Option<f32>,
    },
    /// Run the gas-leak monitor
    Monitor {
        /// Stop after this many poll cycles (runs until Ctrl-C when absent)
        #[arg(long)]
        cycles: Option<u64>,

        /// Safe/Moderate breakpoint override (ppm)
        #[arg(long)]
        low_ppm: Option<f32>,

        /// Moderate/Critical breakpoint override (ppm)
        #[arg(long)]
        high_ppm: Option<f32>,

        /// Initial simulated sensing resistance; simulation builds only
        #[arg(long)]
        sim_rs: Option<f32>,
    },
}
