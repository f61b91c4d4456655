//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};

/// bpred - Predict boiling points of organic molecules from SMILES.
#[derive(Debug, Parser)]
#[command(name = "bpred")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Model artifact path (overrides the configuration file)
    #[arg(short, long, global = true, env = "BPRED_MODEL")]
    pub model: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Predict boiling points
    Predict(PredictArgs),

    /// Show the descriptors of a structure
    Describe(DescribeArgs),

    /// Check whether structures parse and pass the element allowlist
    Check(CheckArgs),
}

/// Arguments for the predict command.
#[derive(Debug, Parser)]
pub struct PredictArgs {
    /// SMILES strings
    #[arg(required = true)]
    pub smiles: Vec<String>,
}

/// Arguments for the describe command.
#[derive(Debug, Parser)]
pub struct DescribeArgs {
    /// SMILES string
    pub smiles: String,
}

/// Arguments for the check command.
#[derive(Debug, Parser)]
pub struct CheckArgs {
    /// SMILES strings
    #[arg(required = true)]
    pub smiles: Vec<String>,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
