mod config;
mod error;
mod models;
mod utils;
use std::process::ExitCode;
use dotenv::dotenv;
use log::{error, info};
use simplelog::{ColorChoice, Config as LogConfig, LevelFilter, TermLogger, TerminalMode};
use crate::config::Config;
use crate::error::ExportError;
use crate::utils::credentials::TerminalPrompt;
use crate::utils::export::run;

fn main() -> ExitCode {
    // Loads environment variables from a `.env` file, if present.
    dotenv().ok();

    // Initializes logging to the terminal with mixed output (both stdout and stderr) and automatic color support.
    if let Err(e) = TermLogger::init(
        LevelFilter::Info,
        LogConfig::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto
    ) {
        eprintln!("Logging unavailable: {}", e);
    }

    info!("--- StudentVUE Grade Exporter ---");

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        },
    };

    match run(&config, &mut TerminalPrompt) {
        Ok(summary) => {
            info!(
                "Export complete. {} rows from {} of {} reporting periods saved to '{}'",
                summary.rows_written,
                summary.periods_with_data,
                summary.periods_requested,
                config.output.display()
            );
            ExitCode::SUCCESS
        },
        Err(ExportError::Credentials(e)) => {
            error!("Could not read credentials: {}", e);
            ExitCode::FAILURE
        },
        Err(ExportError::Sink { path, source }) => {
            error!("A critical file error occurred: Could not write to {}. Details: {}", path.display(), source);
            ExitCode::FAILURE
        },
        Err(e) => {
            error!("An unexpected critical error occurred: {:#}", e);
            ExitCode::FAILURE
        },
    }
}
