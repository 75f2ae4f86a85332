//! `courier` - run a queue worker over stdin/stdout, or produce call envelopes.

mod call;
mod serve;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "courier", about = "Queue worker shell", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve calls: one envelope per stdin line, one response per stdout line
    Serve(serve::ServeArgs),

    /// Print a call envelope, or with --serve run it and print the result
    Call(call::CallArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing()?;

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
        Commands::Call(args) => call::run(args).await,
    }
}

/// Logs go to stderr; stdout carries messages only.
fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to install tracing subscriber")
}
