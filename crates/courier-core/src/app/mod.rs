//! App - the worker shell assembled from ports.
//!
//! - **binder**: resolve the inbox/outbox pair from a capability module
//! - **builder**: register handlers and validate before the first tick
//! - **worker_loop**: poll, dispatch, reply until idle or shutdown
//! - **idle** / **status**: idle timer and per-run counters

pub mod binder;
pub mod builder;
pub mod config;
pub mod idle;
pub mod status;
pub mod worker_loop;

pub use self::binder::{BindError, Capabilities, CapabilityNames, DEFAULT_INBOX, DEFAULT_OUTBOX};
pub use self::builder::{BuildError, WorkerBuilder};
pub use self::config::{ConfigError, WorkerConfig};
pub use self::idle::IdleTimer;
pub use self::status::{RunReport, StopReason, WorkerStats};
pub use self::worker_loop::{Outcome, Tick, Worker, WorkerState};
