mod catalog_cmd;
mod config_cmd;
mod run_cmd;
mod terminal_output;

use anyhow::Result;
use clap::{Parser, Subcommand};

use horadric_config::VisionConfig;

use catalog_cmd::CatalogCommands;
use run_cmd::RunArgs;

#[derive(Parser)]
#[command(name = "horadric")]
#[command(about = "Turn D2R tooltip screenshots into a searchable item catalog")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send every screenshot in a folder to the vision model and write one aggregate file
    Run(RunArgs),
    /// Load, search and edit the item catalog
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },
    /// Print the effective (redacted) configuration and validation report
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = VisionConfig::from_env();

    if let Err(e) = horadric_logging::init_logger(&config.log_dir, &config.log_level) {
        terminal_output::note_warn(&format!("File logging disabled: {e:#}"));
    }

    match cli.command {
        Commands::Run(args) => run_cmd::run(args, config).await?,
        Commands::Catalog { command } => catalog_cmd::run(command, &config)?,
        Commands::Config => config_cmd::run(&config)?,
    }
    Ok(())
}
