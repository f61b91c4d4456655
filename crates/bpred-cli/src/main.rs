//! bpred CLI - Boiling point predictions from the command line.

use anyhow::Context;
use bpred_cli::commands;
use bpred_cli::{Cli, Command, Config, Formatter};
use bpred_gatekeeper::PredictionService;
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let mut config =
        Config::load(cli.config.as_deref().map(Path::new)).context("failed to load configuration")?;
    if let Some(model) = cli.model {
        config.model_path = model;
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let service = PredictionService::from_artifact(&config.model_path, config.policy.clone())
        .with_context(|| format!("failed to load model artifact {}", config.model_path))?;

    match cli.command {
        Command::Predict(args) => commands::execute_predict(args, &service, &formatter)?,
        Command::Describe(args) => commands::execute_describe(args, &service, &formatter)?,
        Command::Check(args) => commands::execute_check(args, &service, &formatter)?,
    }

    Ok(())
}

/// Log to stderr so command output stays parseable; `RUST_LOG` overrides.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
