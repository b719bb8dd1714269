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
    author = "Chempot Contributors",
    version,
    about = "chempot CLI - Computes chemical-potential stability diagrams from phase entries.",
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
    /// Compute a chemical-potential diagram and write it as JSON.
    Compute(ComputeArgs),
    /// Compute a diagram and print a per-domain summary.
    Inspect(InspectArgs),
}

/// Inputs shared by every diagram command.
#[derive(Args, Debug, Clone)]
pub struct DiagramArgs {
    // --- Core Arguments ---
    /// Path to the phase entries file (.json or .csv).
    #[arg(short, long, required = true, value_name = "PATH")]
    pub entries: PathBuf,

    /// Path to a diagram configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    // --- Diagram Overrides ---
    /// Axis elements in display order, comma separated (e.g. 'Li,Fe,O').
    #[arg(long, value_name = "EL,EL,...", value_delimiter = ',')]
    pub elements: Option<Vec<String>>,

    /// Use absolute chemical potentials instead of formal ones.
    #[arg(long)]
    pub absolute: bool,

    /// Compute a strict element subset directly, dropping entries outside it.
    #[arg(long)]
    pub subsystem_only: bool,

    /// Override the default lower limit of every axis, in eV.
    #[arg(long, value_name = "EV", allow_negative_numbers = true)]
    pub min_limit: Option<f64>,

    /// Override the display padding below the lowest vertex, in eV.
    #[arg(long, value_name = "EV", allow_negative_numbers = true)]
    pub padding: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S limits.O=-10,0
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE")]
    pub set_values: Vec<String>,
}

/// Arguments for the `compute` subcommand.
#[derive(Args, Debug)]
pub struct ComputeArgs {
    #[command(flatten)]
    pub diagram: DiagramArgs,

    /// Output JSON file. Writes to standard output when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Pretty-print the JSON output.
    #[arg(long)]
    pub pretty: bool,

    /// Also write padded domains and domain boundaries with annotation anchors.
    #[arg(long)]
    pub with_geometry: bool,
}

/// Arguments for the `inspect` subcommand.
#[derive(Args, Debug)]
pub struct InspectArgs {
    #[command(flatten)]
    pub diagram: DiagramArgs,
}
