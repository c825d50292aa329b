//! Command line entry points
//!
//! - `serve`: run the HTTP server
//! - `ask`: ingest local files and answer one question

pub mod ask;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// docmind - question answering over your own documents
#[derive(Parser)]
#[command(name = "docmind")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve(serve::ServeArgs),

    /// Ingest files into a throwaway index and answer one question
    Ask(ask::AskArgs),
}

/// Load `.env` and the layered configuration, then start logging
pub(crate) fn bootstrap() -> anyhow::Result<AppConfig> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_else(|e| {
        eprintln!("Failed to load configuration ({}), using defaults", e);
        AppConfig::default()
    });
    logging::init_logging(&config.logging)?;

    Ok(config)
}
