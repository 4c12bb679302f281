//! # Main — CLI Entry Point
//!
//! Routes CLI subcommands to the HTTP server and the offline estimators.
//! Handles shared concerns: environment loading, structured logging, and the
//! rate book configuration.
//!
//! ## Subcommands
//!
//! - `serve`: start the quote API server (requires `DATABASE_URL`).
//! - `estimate international` / `estimate uk`: price a project from flags and
//!   print the rounded breakdown as JSON, no database needed.
//!
//! ## Global Options
//!
//! - `--database-url` / `DATABASE_URL`: PostgreSQL connection for the archive.
//! - `--rates`: TOML file overriding the built-in rate book.

mod cli;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use railquote::rates;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "railquote", about = "Racing-fence installation quoting")]
struct Cli {
    /// PostgreSQL connection URL (or set DATABASE_URL env var)
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Path to a TOML rate book overriding the built-in rates
    #[arg(long)]
    rates: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Launch the quote API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value_t = 7001)]
        port: u16,
        /// Directory to serve static files from (e.g. a frontend build)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Price a project from the command line without archiving it
    Estimate {
        #[command(subcommand)]
        market: cli::EstimateMarket,
    },
}

fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    // Initialize structured logging: LOG_FORMAT=json for K8s, human-readable otherwise
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt().json().with_target(false).init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_target(false)
            .init();
    }

    let cli = Cli::parse();
    let rate_book = rates::load_or_default(cli.rates.as_deref())?;

    match &cli.command {
        Commands::Serve { port, static_dir } => {
            let database_url = cli.database_url.as_deref().ok_or_else(|| {
                anyhow::anyhow!("DATABASE_URL is required (set via --database-url or env)")
            })?;
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(railquote::server::run(
                *port,
                database_url,
                rate_book,
                static_dir.as_deref(),
            ))
        }
        Commands::Estimate { market } => cli::run_estimate(market, &rate_book),
    }
}
