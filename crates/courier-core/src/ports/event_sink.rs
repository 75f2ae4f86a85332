//! EventSink port - where the worker reports what happened to each message.

use crate::domain::WorkerEvent;

/// Receives worker events.
///
/// Called synchronously from the poll loop, so implementations must not block.
pub trait EventSink: Send + Sync {
    fn emit(&self, event: WorkerEvent);
}
