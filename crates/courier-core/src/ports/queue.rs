//! Queue capabilities: receive one message / send one message.
//!
//! The worker never sees the queue substrate itself, only these two
//! operations.
//!
//! # Implementations
//! - `impls::InMemoryQueue`: tests and embedding
//! - `impls::LineInbox` / `impls::LineOutbox`: one message per line
//! - anything the host process exports through a `CapabilityModule`

use async_trait::async_trait;
use thiserror::Error;

/// Non-blocking receive side.
#[async_trait]
pub trait Inbox: Send + Sync {
    /// Take one message if one is ready. Must return promptly with `None`
    /// when the queue is empty.
    async fn receive_one(&self) -> Option<String>;
}

/// Send side. Completes before the worker continues.
#[async_trait]
pub trait Outbox: Send + Sync {
    async fn send_one(&self, message: String) -> Result<(), SendError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("outbox is closed")]
    Closed,

    #[error("outbox is full")]
    Full,

    #[error("send failed: {0}")]
    Io(String),
}
