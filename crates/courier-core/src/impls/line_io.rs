//! Line-delimited queue capabilities over async byte streams.
//!
//! One message per line: the inbox reads lines from a reader (stdin by
//! default), the outbox writes lines to a writer (stdout by default). This
//! lets a worker sit in a shell pipeline:
//!
//! ```text
//! producer | courier serve | consumer
//! ```
//!
//! Reading happens on a background task that feeds a bounded channel, so
//! `receive_one` stays non-blocking. When the worker falls behind the reader
//! stalls instead of pulling the rest of the input into memory.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::{self, Receiver, error::TryRecvError};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::app::{DEFAULT_INBOX, DEFAULT_OUTBOX};
use crate::ports::{CapabilityModule, Inbox, Outbox, SendError};

/// Lines read ahead of the worker.
pub const DEFAULT_LINE_BUFFER: usize = 64;

pub struct LineInbox {
    rx: Mutex<Receiver<String>>,
    reader: JoinHandle<()>,
}

impl LineInbox {
    /// Start reading lines from `reader`. Must be called inside a tokio
    /// runtime.
    pub fn spawn<R>(reader: R) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self::spawn_with_capacity(reader, DEFAULT_LINE_BUFFER)
    }

    /// At most `capacity` lines are held between the reader and the worker.
    pub fn spawn_with_capacity<R>(reader: R, capacity: usize) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let reader = tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut buf = Vec::new();
            loop {
                buf.clear();
                match reader.read_until(b'\n', &mut buf).await {
                    Ok(0) => {
                        debug!("line inbox reached end of input");
                        break;
                    }
                    Ok(_) => {}
                    Err(e) => {
                        warn!(error = %e, "line inbox read failed");
                        break;
                    }
                }

                let line = match std::str::from_utf8(&buf) {
                    Ok(line) => line.trim_end_matches(['\n', '\r']),
                    Err(e) => {
                        warn!(error = %e, "skipping non UTF-8 input line");
                        continue;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }
                if tx.send(line.to_string()).await.is_err() {
                    break;
                }
            }
        });

        Self {
            rx: Mutex::new(rx),
            reader,
        }
    }

    /// Lines read but not yet received.
    pub fn buffered(&self) -> usize {
        self.rx.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    /// `true` once input has ended and every buffered line was taken.
    pub fn is_exhausted(&self) -> bool {
        let rx = self.rx.lock().unwrap_or_else(|e| e.into_inner());
        rx.is_closed() && rx.is_empty()
    }
}

impl Drop for LineInbox {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

#[async_trait]
impl Inbox for LineInbox {
    async fn receive_one(&self) -> Option<String> {
        let mut rx = self.rx.lock().unwrap_or_else(|e| e.into_inner());
        match rx.try_recv() {
            Ok(line) => Some(line),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

pub struct LineOutbox<W> {
    writer: tokio::sync::Mutex<W>,
}

impl<W> LineOutbox<W>
where
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(writer: W) -> Self {
        Self {
            writer: tokio::sync::Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[async_trait]
impl<W> Outbox for LineOutbox<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn send_one(&self, message: String) -> Result<(), SendError> {
        if message.contains('\n') {
            return Err(SendError::Io("message contains a line break".to_string()));
        }

        let mut writer = self.writer.lock().await;
        let io = |e: std::io::Error| SendError::Io(e.to_string());
        writer.write_all(message.as_bytes()).await.map_err(io)?;
        writer.write_all(b"\n").await.map_err(io)?;
        writer.flush().await.map_err(io)
    }
}

/// Capability module exporting a line inbox and a line outbox.
pub struct LineModule<W> {
    inbox_name: String,
    outbox_name: String,
    inbox: Arc<LineInbox>,
    outbox: Arc<LineOutbox<W>>,
}

impl<W> LineModule<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn from_io<R>(reader: R, writer: W) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        Self {
            inbox_name: DEFAULT_INBOX.to_string(),
            outbox_name: DEFAULT_OUTBOX.to_string(),
            inbox: Arc::new(LineInbox::spawn(reader)),
            outbox: Arc::new(LineOutbox::new(writer)),
        }
    }

    /// Export the line capabilities under custom names.
    pub fn with_names(mut self, inbox: impl Into<String>, outbox: impl Into<String>) -> Self {
        self.inbox_name = inbox.into();
        self.outbox_name = outbox.into();
        self
    }

    pub fn inbox(&self) -> &Arc<LineInbox> {
        &self.inbox
    }
}

impl LineModule<tokio::io::Stdout> {
    /// Read calls from stdin, write replies to stdout.
    pub fn stdio() -> Self {
        Self::from_io(tokio::io::stdin(), tokio::io::stdout())
    }
}

impl<W> CapabilityModule for LineModule<W>
where
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn name(&self) -> &str {
        "stdio"
    }

    fn resolve_inbox(&self, name: &str) -> Option<Arc<dyn Inbox>> {
        (name == self.inbox_name).then(|| self.inbox.clone() as Arc<dyn Inbox>)
    }

    fn resolve_outbox(&self, name: &str) -> Option<Arc<dyn Outbox>> {
        (name == self.outbox_name).then(|| self.outbox.clone() as Arc<dyn Outbox>)
    }
}
