//! WorkerBuilder - wiring and startup validation.
//!
//! Everything that can be wrong about a worker is checked in `build()`:
//! expected functions are registered, the table is not empty, an event sink
//! was supplied and the config is valid. A worker that builds can only fail
//! per message afterwards.
//!
//! # Wiring
//! The builder only knows ports and the typed layer. Concrete handlers and
//! sinks come from `impls` (or the host) through `register`, `with_table`
//! and `event_sink`.

use std::sync::Arc;

use tokio::sync::watch;

use super::binder::Capabilities;
use super::config::{ConfigError, WorkerConfig};
use super::worker_loop::Worker;
use crate::ports::{Clock, EventSink, SystemClock};
use crate::typed::{Call, DispatchTable, Handler, RegistryError};

/// Builds a [`Worker`].
///
/// ```ignore
/// let worker = WorkerBuilder::new()
///     .register::<Add, _>(AddHandler)?
///     .expect_functions(&["add"])
///     .build(capabilities)?;
/// ```
pub struct WorkerBuilder {
    table: DispatchTable,
    expected: Option<Vec<String>>,
    config: WorkerConfig,
    clock: Option<Arc<dyn Clock>>,
    events: Option<Arc<dyn EventSink>>,
    shutdown: Option<watch::Receiver<bool>>,
}

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("missing functions: {0:?}. These functions were expected but not registered.")]
    MissingFunctions(Vec<String>),

    #[error("worker has no handlers registered")]
    EmptyTable,

    #[error("no event sink configured")]
    MissingEventSink,

    #[error("invalid config: {0}")]
    Config(#[from] ConfigError),
}

impl WorkerBuilder {
    pub fn new() -> Self {
        Self {
            table: DispatchTable::new(),
            expected: None,
            config: WorkerConfig::default(),
            clock: None,
            events: None,
            shutdown: None,
        }
    }

    pub fn register<C: Call, H: Handler<C> + 'static>(
        mut self,
        handler: H,
    ) -> Result<Self, RegistryError> {
        self.table.register::<C, H>(handler)?;
        Ok(self)
    }

    /// Replace the table wholesale.
    pub fn with_table(mut self, table: DispatchTable) -> Self {
        self.table = table;
        self
    }

    /// Functions that must be registered by the time `build()` runs.
    pub fn expect_functions(mut self, functions: &[&str]) -> Self {
        self.expected = Some(functions.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn config(mut self, config: WorkerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn event_sink(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// The loop stops at the next tick once this reads `true`.
    pub fn shutdown_signal(mut self, shutdown: watch::Receiver<bool>) -> Self {
        self.shutdown = Some(shutdown);
        self
    }

    pub fn build(self, capabilities: Capabilities) -> Result<Worker, BuildError> {
        self.config.validate()?;

        if let Some(expected) = &self.expected {
            let missing: Vec<String> = expected
                .iter()
                .filter(|f| !self.table.contains(f))
                .cloned()
                .collect();
            if !missing.is_empty() {
                return Err(BuildError::MissingFunctions(missing));
            }
        }
        if self.table.is_empty() {
            return Err(BuildError::EmptyTable);
        }
        let Some(events) = self.events else {
            return Err(BuildError::MissingEventSink);
        };

        Ok(Worker::new(
            capabilities,
            self.table,
            self.config,
            self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            events,
            self.shutdown,
        ))
    }
}

impl Default for WorkerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::impls::arith::{Add, AddHandler, Subtract};
    use crate::impls::{InMemoryModule, MemoryEventSink};
    use crate::typed::handler::fixtures::{Echo, EchoHandler};

    fn caps() -> Capabilities {
        Capabilities::bind(&InMemoryModule::new(), &Default::default()).unwrap()
    }

    fn builder() -> WorkerBuilder {
        WorkerBuilder::new().event_sink(Arc::new(MemoryEventSink::new()))
    }

    #[test]
    fn test_build_success() {
        let worker = builder()
            .register::<Add, _>(AddHandler)
            .unwrap()
            .expect_functions(&[Add::FUNCTION])
            .build(caps());
        assert!(worker.is_ok());
    }

    #[test]
    fn test_build_missing_functions() {
        let worker = builder()
            .register::<Add, _>(AddHandler)
            .unwrap()
            .expect_functions(&[Add::FUNCTION, Subtract::FUNCTION])
            .build(caps());
        assert!(matches!(
            worker,
            Err(BuildError::MissingFunctions(missing)) if missing == vec!["subtract".to_string()]
        ));
    }

    #[test]
    fn test_build_empty_table() {
        assert!(matches!(
            builder().build(caps()),
            Err(BuildError::EmptyTable)
        ));
    }

    #[test]
    fn test_build_without_event_sink() {
        let worker = WorkerBuilder::new()
            .register::<Echo, _>(EchoHandler)
            .unwrap()
            .build(caps());
        assert!(matches!(worker, Err(BuildError::MissingEventSink)));
    }

    #[test]
    fn test_build_invalid_config() {
        let worker = builder()
            .register::<Echo, _>(EchoHandler)
            .unwrap()
            .config(WorkerConfig::from_parts(0, 1))
            .build(caps());
        assert!(matches!(
            worker,
            Err(BuildError::Config(ConfigError::ZeroIdleTimeout))
        ));
    }

    #[test]
    fn test_build_with_table() {
        let mut table = DispatchTable::new();
        table.register::<Add, _>(AddHandler).unwrap();
        table.register::<Echo, _>(EchoHandler).unwrap();

        let worker = builder().with_table(table).build(caps()).unwrap();
        assert_eq!(worker.table().len(), 2);
    }
}
