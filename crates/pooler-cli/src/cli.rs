use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Peptide Pooler CLI - plans the dilution and pooling of peptides of varying concentration for a liquid handler.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compute the pooling plan and the transfer list for a peptide table.
    Plan(PlanArgs),
    /// Run only the neat/diluted boundary search and print every evaluated step.
    Search(SearchArgs),
}

/// Arguments for the `plan` subcommand.
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub common: ConfigArgs,

    /// Directory that receives `pooling_plan.csv` and `transfers.csv`. Created if missing.
    #[arg(short, long, required = true, value_name = "DIR")]
    pub output: PathBuf,
}

/// Arguments for the `search` subcommand.
#[derive(Args, Debug)]
pub struct SearchArgs {
    #[command(flatten)]
    pub common: ConfigArgs,
}

/// Input and configuration arguments shared by every subcommand.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Path to the peptide table (CSV: identifier, sequence, concentration).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub input: PathBuf,

    /// Path to the configuration file in TOML format.
    #[arg(short, long, required = true, value_name = "PATH")]
    pub config: PathBuf,

    // --- Volume Overrides ---
    /// Override `volumes.min-pipette-volume` from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub min_pipette_volume: Option<f64>,

    /// Override `volumes.max-peptide-usage-volume` from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub max_peptide_usage_volume: Option<f64>,

    /// Override `volumes.max-pool-volume` from the config file.
    #[arg(long, value_name = "FLOAT")]
    pub max_pool_volume: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S dilution-factors.low.factor=4
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}
