use std::process::Stdio;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use clap::Args;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tracing::{debug, warn};

use courier_core::domain::{self, CallEnvelope, CorrelationId, FunctionName, Reply};
use courier_core::ports::{IdGenerator, SystemClock, UlidGenerator};
use courier_core::typed::codec;

#[derive(Args, Debug)]
pub struct CallArgs {
    /// Function to call
    function: String,

    /// Arguments as key=value. Values are read as JSON literals, anything
    /// that does not parse is taken as a string.
    #[arg(value_parser = parse_arg)]
    args: Vec<(String, domain::Value)>,

    /// Correlation id to use instead of a generated ULID
    #[arg(long)]
    uuid: Option<String>,

    /// Start a worker for the function, submit the call and print the result
    /// of the matching reply
    #[arg(long)]
    serve: bool,

    /// Idle timeout of the started worker
    #[arg(long, default_value_t = 10, requires = "serve")]
    idle_timeout_seconds: u64,
}

pub async fn run(args: CallArgs) -> Result<()> {
    let ids = UlidGenerator::new(Arc::new(SystemClock));
    let serve = args.serve;
    let function = args.function.clone();
    let idle_timeout_seconds = args.idle_timeout_seconds;
    let (correlation_id, text) = envelope(args, &ids)?;

    if !serve {
        println!("{text}");
        return Ok(());
    }

    let reply = serve_and_wait(&function, idle_timeout_seconds, &correlation_id, &text).await?;
    println!("{}", render(&function, reply)?);
    Ok(())
}

fn envelope(args: CallArgs, ids: &dyn IdGenerator) -> Result<(CorrelationId, String)> {
    let correlation_id = match args.uuid {
        Some(uuid) => CorrelationId::new(uuid),
        None => ids.generate_correlation_id(),
    };
    let call = CallEnvelope::new(
        FunctionName::new(args.function),
        args.args.into_iter().collect(),
        correlation_id.clone(),
    );
    let text = codec::encode_call(&call).context("failed to encode call")?;
    Ok((correlation_id, text))
}

/// Run `courier serve` as a child, hand it the call on stdin and wait for the
/// reply carrying `correlation_id` on its stdout.
async fn serve_and_wait(
    function: &str,
    idle_timeout_seconds: u64,
    correlation_id: &CorrelationId,
    envelope: &str,
) -> Result<Reply> {
    let exe = std::env::current_exe().context("cannot locate the courier binary")?;
    let mut child = Command::new(exe)
        .arg("serve")
        .arg("--functions")
        .arg(function)
        .arg("--idle-timeout-seconds")
        .arg(idle_timeout_seconds.to_string())
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit())
        .kill_on_drop(true)
        .spawn()
        .context("failed to start worker")?;

    let mut stdin = child.stdin.take().context("worker stdin is not piped")?;
    stdin.write_all(envelope.as_bytes()).await?;
    stdin.write_all(b"\n").await?;
    stdin.flush().await?;
    drop(stdin);

    let stdout = child.stdout.take().context("worker stdout is not piped")?;
    let reply = await_reply(BufReader::new(stdout), correlation_id).await;

    if let Err(e) = child.kill().await {
        debug!(error = %e, "worker already exited");
    }
    reply
}

/// Read replies until one carries `correlation_id`. Replies to other calls and
/// unreadable lines are skipped.
async fn await_reply<R>(mut replies: R, correlation_id: &CorrelationId) -> Result<Reply>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    loop {
        line.clear();
        let read = replies
            .read_line(&mut line)
            .await
            .context("failed to read worker output")?;
        if read == 0 {
            bail!("worker stopped without replying to {correlation_id}");
        }

        match codec::decode_reply(line.trim_end()) {
            Ok(reply) if reply.correlation_id() == correlation_id => return Ok(reply),
            Ok(reply) => {
                debug!(correlation_id = %reply.correlation_id(), "skipping reply to another call")
            }
            Err(e) => warn!(error = %e, "skipping unreadable worker output"),
        }
    }
}

fn render(function: &str, reply: Reply) -> Result<String> {
    match reply {
        Reply::Result(response) => {
            let json = codec::value_to_json(&response.result)?;
            Ok(serde_json::to_string(&json)?)
        }
        Reply::Error { message, .. } => bail!("{function} failed: {message}"),
    }
}

fn parse_arg(raw: &str) -> Result<(String, domain::Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{raw}'"));
    }
    let value = match serde_json::from_str::<serde_json::Value>(value) {
        Ok(json) => codec::value_from_json(&json),
        Err(_) => domain::Value::from(value),
    };
    Ok((key.to_string(), value))
}
