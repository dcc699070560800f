use crate::config::ThresholdPreset;
use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scoutcheck")]
#[command(about = "Reconciles scouted match data against official match results", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Validate scouted data for an event against official results
    Validate {
        /// Official match records (JSON array)
        #[arg(long)]
        matches: PathBuf,

        /// Scouting entries (JSON array)
        #[arg(long)]
        scouting: PathBuf,

        /// Field catalog (JSON with `actions` and `toggles`)
        #[arg(long)]
        catalog: PathBuf,

        /// Event key; defaults to the key carried by the records
        #[arg(long)]
        event: Option<String>,

        /// Configuration file
        #[arg(short, long, env = "SCOUTCHECK_CONFIG")]
        config: Option<PathBuf>,

        /// Threshold preset (replaces the configured default thresholds)
        #[arg(long = "preset", value_enum)]
        preset: Option<ThresholdPreset>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Number of worker threads (0 = all cores)
        #[arg(short = 'j', long = "jobs")]
        jobs: Option<usize>,

        /// Validate matches one at a time
        #[arg(long = "no-parallel")]
        no_parallel: bool,

        /// Suppress the progress bar
        #[arg(short, long)]
        quiet: bool,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },

    /// Print match keys in schedule order with their labels
    SortKeys {
        /// Match keys such as 2025mimil_qm12
        #[arg(required = true)]
        keys: Vec<String>,
    },
}
