//! Capability binding.
//!
//! A worker cannot exist without its two queue capabilities, so binding is a
//! one-shot, fail-fast step: a missing name is a startup configuration error,
//! never retried.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::ports::{CapabilityModule, Inbox, Outbox};

/// Default export names of the receive / send capabilities.
pub const DEFAULT_INBOX: &str = "read_from_input_queue";
pub const DEFAULT_OUTBOX: &str = "write_to_output_queue";

/// Which names to ask a module for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityNames {
    pub inbox: String,
    pub outbox: String,
}

impl CapabilityNames {
    pub fn new(inbox: impl Into<String>, outbox: impl Into<String>) -> Self {
        Self {
            inbox: inbox.into(),
            outbox: outbox.into(),
        }
    }
}

impl Default for CapabilityNames {
    fn default() -> Self {
        Self::new(DEFAULT_INBOX, DEFAULT_OUTBOX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("module '{module}' does not export capability '{name}'")]
    MissingCapability { module: String, name: String },
}

/// The bound receive/send pair. Owned by one worker for its whole life.
#[derive(Clone)]
pub struct Capabilities {
    inbox: Arc<dyn Inbox>,
    outbox: Arc<dyn Outbox>,
}

impl Capabilities {
    /// Inject capabilities directly.
    pub fn new(inbox: Arc<dyn Inbox>, outbox: Arc<dyn Outbox>) -> Self {
        Self { inbox, outbox }
    }

    /// Resolve both capabilities from `module`, failing on the first missing
    /// name.
    pub fn bind(module: &dyn CapabilityModule, names: &CapabilityNames) -> Result<Self, BindError> {
        let missing = |name: &str| BindError::MissingCapability {
            module: module.name().to_string(),
            name: name.to_string(),
        };

        let inbox = module
            .resolve_inbox(&names.inbox)
            .ok_or_else(|| missing(&names.inbox))?;
        let outbox = module
            .resolve_outbox(&names.outbox)
            .ok_or_else(|| missing(&names.outbox))?;

        info!(
            module = module.name(),
            inbox = %names.inbox,
            outbox = %names.outbox,
            "capabilities bound"
        );
        Ok(Self::new(inbox, outbox))
    }

    pub fn inbox(&self) -> &dyn Inbox {
        self.inbox.as_ref()
    }

    pub fn outbox(&self) -> &dyn Outbox {
        self.outbox.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::InMemoryModule;

    #[tokio::test]
    async fn test_binds_default_names() {
        let module = InMemoryModule::new();
        module.input().push("hello").unwrap();

        let caps = Capabilities::bind(&module, &CapabilityNames::default()).unwrap();
        assert_eq!(caps.inbox().receive_one().await.as_deref(), Some("hello"));

        caps.outbox().send_one("reply".to_string()).await.unwrap();
        assert_eq!(module.output().pop().as_deref(), Some("reply"));
    }

    #[test]
    fn test_missing_inbox_fails_fast() {
        let module = InMemoryModule::new();
        let names = CapabilityNames::new("read_from_queue", DEFAULT_OUTBOX);

        let err = Capabilities::bind(&module, &names).err().unwrap();
        assert_eq!(
            err,
            BindError::MissingCapability {
                module: "memory".to_string(),
                name: "read_from_queue".to_string(),
            }
        );
    }

    #[test]
    fn test_missing_outbox_fails_fast() {
        let module = InMemoryModule::new();
        let names = CapabilityNames::new(DEFAULT_INBOX, "write_to_queue");

        let err = Capabilities::bind(&module, &names).err().unwrap();
        assert!(err.to_string().contains("write_to_queue"));
    }

    #[test]
    fn test_names_are_not_interchangeable() {
        let module = InMemoryModule::new();
        let swapped = CapabilityNames::new(DEFAULT_OUTBOX, DEFAULT_INBOX);
        assert!(Capabilities::bind(&module, &swapped).is_err());
    }
}
