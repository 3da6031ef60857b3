mod commands;
mod logging;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "econ-sim", version, about = "Closed-economy money simulator")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run a model and print its statistics
    Run {
        /// JSON settings file holding one or more models
        #[arg(long)]
        model: Option<PathBuf>,
        /// Model to run from the settings file
        #[arg(long)]
        model_name: Option<String>,
        #[arg(long)]
        periods: Option<usize>,
        #[arg(long, conflicts_with = "unseeded")]
        seed: Option<u64>,
        /// Seed from OS entropy; the seed used is reported
        #[arg(long)]
        unseeded: bool,
        /// Population ceiling
        #[arg(long)]
        population: Option<usize>,
        /// Print summary, final state and series as JSON
        #[arg(long)]
        json: bool,
    },
    /// List tracked property names
    Properties,
    /// List parameter keys with their defaults
    Params,
}

fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    match cli.command {
        Command::Run {
            model,
            model_name,
            periods,
            seed,
            unseeded,
            population,
            json,
        } => commands::run(commands::RunArgs {
            model,
            model_name,
            periods,
            seed,
            unseeded,
            population,
            json,
        }),
        Command::Properties => commands::list_properties(),
        Command::Params => commands::list_params(),
    }
}
