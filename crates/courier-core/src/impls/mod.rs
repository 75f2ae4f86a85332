//! Impls - port implementations and built-in handlers.
//!
//! - **arith**: `add` / `subtract` handlers
//! - **InMemoryQueue** / **InMemoryModule**: process-local queues
//! - **LineModule**: one message per line over stdin/stdout
//! - **TracingEventSink** / **MemoryEventSink**

pub mod arith;
pub mod event_sink;
pub mod inmem_queue;
pub mod line_io;

pub use self::event_sink::{MemoryEventSink, TracingEventSink};
pub use self::inmem_queue::{InMemoryModule, InMemoryQueue};
pub use self::line_io::{LineInbox, LineModule, LineOutbox};
