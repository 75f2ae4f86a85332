use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use tokio::sync::watch;
use tracing::info;

use courier_core::app::{
    Capabilities, CapabilityNames, DEFAULT_INBOX, DEFAULT_OUTBOX, WorkerBuilder, WorkerConfig,
};
use courier_core::impls::arith::builtin_table;
use courier_core::impls::{LineModule, TracingEventSink};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Stop after this many seconds without a successfully processed call
    #[arg(long, env = "COURIER_IDLE_TIMEOUT_SECONDS", default_value_t = 10)]
    idle_timeout_seconds: u64,

    /// Pause between polls, in milliseconds
    #[arg(long, env = "COURIER_POLL_INTERVAL_MS", default_value_t = 1)]
    poll_interval_ms: u64,

    /// Built-in functions to serve
    #[arg(
        long,
        env = "COURIER_FUNCTIONS",
        value_delimiter = ',',
        default_value = "add"
    )]
    functions: Vec<String>,

    /// Receive capability to bind. The stdio module exports it under the
    /// default name only, so any other name fails at startup.
    #[arg(long, env = "COURIER_INBOX", default_value = DEFAULT_INBOX)]
    inbox: String,

    /// Send capability to bind. Same export rule as --inbox.
    #[arg(long, env = "COURIER_OUTBOX", default_value = DEFAULT_OUTBOX)]
    outbox: String,

    /// Reply with {"uuid","error"} when a call fails instead of dropping it
    #[arg(long, env = "COURIER_ERROR_REPLIES")]
    error_replies: bool,
}

impl ServeArgs {
    fn config(&self) -> WorkerConfig {
        WorkerConfig {
            error_replies: self.error_replies,
            capabilities: CapabilityNames::new(&self.inbox, &self.outbox),
            ..WorkerConfig::from_parts(self.idle_timeout_seconds, self.poll_interval_ms)
        }
    }
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let config = args.config();

    let module = LineModule::stdio();
    let capabilities = Capabilities::bind(&module, &config.capabilities)
        .context("failed to bind queue capabilities")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("shutdown requested");
            let _ = shutdown_tx.send(true);
        }
    });

    let table = builtin_table(args.functions.as_slice())?;
    let worker = WorkerBuilder::new()
        .with_table(table)
        .event_sink(Arc::new(TracingEventSink))
        .config(config)
        .shutdown_signal(shutdown_rx)
        .build(capabilities)
        .context("invalid worker setup")?;

    let report = worker.run().await;
    info!(
        reason = ?report.reason,
        received = report.stats.received,
        processed = report.stats.processed,
        dropped = report.stats.dropped(),
        "run finished"
    );
    Ok(())
}
