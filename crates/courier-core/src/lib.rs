//! courier-core
//!
//! A queue worker shell: bind a receive/send capability pair, poll for call
//! envelopes, dispatch the ones this worker owns to typed handlers, send the
//! correlated responses, and stop after an idle timeout.
//!
//! # Modules
//! - **domain**: values, envelopes, identifiers, errors, events
//! - **ports**: capability module, inbox/outbox, clock, event sink, id generator
//! - **typed**: `Call` / `Handler`, `DispatchTable`, wire codec
//! - **app**: binder, builder, worker loop, idle timer, run report
//! - **impls**: built-in handlers, in-memory and line-based queues, event sinks

pub mod app;
pub mod domain;
pub mod impls;
pub mod ports;
pub mod typed;
