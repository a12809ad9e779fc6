mod commands;
mod logging;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "modpipe",
    version,
    about = "Event-triggered model-plugin orchestration pipeline"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one event bundle end to end with local collaborators
    Handle {
        /// Path to the event JSON bundle
        event: PathBuf,
        /// Directory the event's files are served from
        #[arg(long)]
        data_dir: PathBuf,
        /// Directory the uploaded artifact tree is copied into
        #[arg(long)]
        output: PathBuf,
        /// Python interpreter used to run model plugins
        #[arg(long, default_value = "python3")]
        python: PathBuf,
    },
    /// Assemble, validate, and classify an event bundle without running it
    Check {
        /// Path to the event JSON bundle
        event: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init(&cli.log_level);

    match cli.command {
        Commands::Handle {
            event,
            data_dir,
            output,
            python,
        } => commands::handle::execute(&event, &data_dir, &output, &python),
        Commands::Check { event } => commands::check::execute(&event),
    }
}
