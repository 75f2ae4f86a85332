//! InMemoryQueue - process-local queue for tests and embedding.
//!
//! `InMemoryModule` exports one input and one output queue under the default
//! capability names, which is all a worker needs to run without a real
//! substrate.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::app::{DEFAULT_INBOX, DEFAULT_OUTBOX};
use crate::ports::{CapabilityModule, Inbox, Outbox, SendError};

/// FIFO of text messages behind a `Mutex`.
///
/// Both operations are non-blocking, so the lock is never held across an
/// await point.
#[derive(Debug, Default)]
pub struct InMemoryQueue {
    messages: Mutex<VecDeque<String>>,
    capacity: Option<usize>,
}

impl InMemoryQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// A queue that refuses pushes once `capacity` messages are waiting.
    pub fn bounded(capacity: usize) -> Self {
        Self {
            messages: Mutex::new(VecDeque::new()),
            capacity: Some(capacity),
        }
    }

    pub fn push(&self, message: impl Into<String>) -> Result<(), SendError> {
        let mut messages = self.lock();
        if self.capacity.is_some_and(|cap| messages.len() >= cap) {
            return Err(SendError::Full);
        }
        messages.push_back(message.into());
        Ok(())
    }

    pub fn pop(&self) -> Option<String> {
        self.lock().pop_front()
    }

    /// Take everything currently queued, oldest first.
    pub fn drain(&self) -> Vec<String> {
        self.lock().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, VecDeque<String>> {
        self.messages.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl Inbox for InMemoryQueue {
    async fn receive_one(&self) -> Option<String> {
        self.pop()
    }
}

#[async_trait]
impl Outbox for InMemoryQueue {
    async fn send_one(&self, message: String) -> Result<(), SendError> {
        self.push(message)
    }
}

/// Capability module backed by two in-memory queues.
pub struct InMemoryModule {
    inbox_name: String,
    outbox_name: String,
    input: Arc<InMemoryQueue>,
    output: Arc<InMemoryQueue>,
}

impl InMemoryModule {
    pub fn new() -> Self {
        Self::with_queues(Arc::new(InMemoryQueue::new()), Arc::new(InMemoryQueue::new()))
    }

    pub fn with_output_capacity(capacity: usize) -> Self {
        Self::with_queues(
            Arc::new(InMemoryQueue::new()),
            Arc::new(InMemoryQueue::bounded(capacity)),
        )
    }

    pub fn with_queues(input: Arc<InMemoryQueue>, output: Arc<InMemoryQueue>) -> Self {
        Self {
            inbox_name: DEFAULT_INBOX.to_string(),
            outbox_name: DEFAULT_OUTBOX.to_string(),
            input,
            output,
        }
    }

    /// Export the queues under custom names.
    pub fn with_names(mut self, inbox: impl Into<String>, outbox: impl Into<String>) -> Self {
        self.inbox_name = inbox.into();
        self.outbox_name = outbox.into();
        self
    }

    pub fn input(&self) -> &Arc<InMemoryQueue> {
        &self.input
    }

    pub fn output(&self) -> &Arc<InMemoryQueue> {
        &self.output
    }
}

impl Default for InMemoryModule {
    fn default() -> Self {
        Self::new()
    }
}

impl CapabilityModule for InMemoryModule {
    fn name(&self) -> &str {
        "memory"
    }

    fn resolve_inbox(&self, name: &str) -> Option<Arc<dyn Inbox>> {
        (name == self.inbox_name).then(|| self.input.clone() as Arc<dyn Inbox>)
    }

    fn resolve_outbox(&self, name: &str) -> Option<Arc<dyn Outbox>> {
        (name == self.outbox_name).then(|| self.output.clone() as Arc<dyn Outbox>)
    }
}
