//! Ports - the seams between the worker and its environment.
//!
//! The worker shell depends only on these traits. Queue transport, time, event
//! reporting and id generation are all supplied from outside, so the loop can
//! be tested with in-memory fakes and deployed against a real substrate without
//! touching dispatch logic.

pub mod capability;
pub mod clock;
pub mod event_sink;
pub mod id_generator;
pub mod queue;

pub use self::capability::CapabilityModule;
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::event_sink::EventSink;
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::queue::{Inbox, Outbox, SendError};
