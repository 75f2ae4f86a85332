//! CapabilityModule port - a host that exports queue capabilities by name.
//!
//! The worker is handed a module at startup and asks it for exactly two
//! capabilities. Binding happens once in [`crate::app::Capabilities::bind`].

use std::sync::Arc;

use super::queue::{Inbox, Outbox};

pub trait CapabilityModule: Send + Sync {
    /// Human-readable module name for diagnostics.
    fn name(&self) -> &str;

    /// Look up a receive capability exported under `name`.
    fn resolve_inbox(&self, name: &str) -> Option<Arc<dyn Inbox>>;

    /// Look up a send capability exported under `name`.
    fn resolve_outbox(&self, name: &str) -> Option<Arc<dyn Outbox>>;
}
