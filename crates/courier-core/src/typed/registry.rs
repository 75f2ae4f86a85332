//! DispatchTable - function name to handler.
//!
//! Built once before the worker starts and read-only afterwards, so the loop
//! needs no locking.
//!
//! # Not-mine
//! A name with no entry is not an error: the queue is shared, and another
//! worker may own it. `lookup` returns `None` and the worker stays silent.

use std::collections::HashMap;
use std::sync::Arc;

use super::call::Call;
use super::handler::{DynHandler, Handler, TypedHandler};
use crate::domain::FunctionName;

#[derive(Default)]
pub struct DispatchTable {
    handlers: HashMap<String, Arc<dyn DynHandler>>,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("a handler for function '{0}' is already registered")]
    AlreadyRegistered(String),
}

impl DispatchTable {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: Call, H: Handler<C> + 'static>(
        &mut self,
        handler: H,
    ) -> Result<(), RegistryError> {
        self.register_dyn(Arc::new(TypedHandler::<C, H>::new(handler)))
    }

    /// Register an already type-erased handler under its own function name.
    pub fn register_dyn(&mut self, handler: Arc<dyn DynHandler>) -> Result<(), RegistryError> {
        let function = handler.function().to_string();
        if self.handlers.contains_key(&function) {
            return Err(RegistryError::AlreadyRegistered(function));
        }
        self.handlers.insert(function, handler);
        Ok(())
    }

    /// `None` means "not mine".
    pub fn lookup(&self, function: &str) -> Option<&Arc<dyn DynHandler>> {
        self.handlers.get(function)
    }

    pub fn contains(&self, function: &str) -> bool {
        self.handlers.contains_key(function)
    }

    /// Registered function names, sorted.
    pub fn functions(&self) -> Vec<FunctionName> {
        let mut names: Vec<FunctionName> =
            self.handlers.keys().map(|k| FunctionName::new(k.as_str())).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
