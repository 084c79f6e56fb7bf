//! Inkwell CLI binary.
//!
//! This binary provides command-line access to Inkwell's functionality:
//! - Propose entities and timeline events for a raw text script
//! - Generate a coverage- and grounding-validated storyboard from a normalized comic script

use clap::Parser;
use inkwell::{InkwellSettings, LoggingConfig, init_logging};
use std::process::ExitCode;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    use cli::{Cli, Commands, ExtractOptions, run_extract, run_storyboard};

    // Load .env before anything reads provider keys
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    let logging = LoggingConfig::new()
        .with_verbose(cli.verbose)
        .with_json_logs(cli.json_logs);
    if let Err(e) = init_logging(&logging) {
        eprintln!("error: could not initialize logging: {}", e);
        return ExitCode::FAILURE;
    }

    let settings = match InkwellSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Execute the requested command
    let result = match cli.command {
        Commands::Extract {
            script,
            world,
            config,
            llm,
            merge,
            type_conflicts,
            output,
        } => {
            let options = ExtractOptions {
                script,
                world,
                config,
                llm,
                merge,
                type_conflicts,
                output,
            };
            run_extract(options, &settings).await
        }

        Commands::Storyboard { input, output } => run_storyboard(input, output, &settings).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
