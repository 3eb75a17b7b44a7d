//! cogniskill CLI: runs the student analysis pipeline and writes artifacts.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

use commands::PipelineArgs;

#[derive(Parser)]
#[command(
    name = "cogniskill",
    version,
    about = "Synthetic student cognitive-skill dataset and analysis"
)]
struct Cli {
    /// Defaults to `run` when omitted
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate the dataset, run every analysis and write all artifacts
    Run(PipelineArgs),

    /// Generate the dataset and dashboard summary only
    Generate(PipelineArgs),

    /// Load and validate the configuration
    Validate {
        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Create a starter cogniskill.toml
    Init,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("cogniskill=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        None => commands::run::execute(PipelineArgs::default()),
        Some(Commands::Run(args)) => commands::run::execute(args),
        Some(Commands::Generate(args)) => commands::generate::execute(args),
        Some(Commands::Validate { config }) => commands::validate::execute(config),
        Some(Commands::Init) => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
