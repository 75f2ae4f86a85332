//! EventSink implementations.

use std::sync::Mutex;

use tracing::{debug, warn};

use crate::domain::WorkerEvent;
use crate::ports::EventSink;

/// Logs through `tracing`: successes at debug, dropped messages at warn.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn emit(&self, event: WorkerEvent) {
        match event {
            WorkerEvent::Processed {
                function,
                correlation_id,
            } => debug!(%function, %correlation_id, "call processed"),
            WorkerEvent::Rejected { error } => {
                warn!(%error, "dropping malformed envelope")
            }
            WorkerEvent::CallFailed {
                function,
                correlation_id,
                error,
            } => warn!(%function, %correlation_id, %error, "call failed"),
            WorkerEvent::EncodeFailed {
                correlation_id,
                error,
            } => warn!(%correlation_id, %error, "could not encode reply"),
            WorkerEvent::SendFailed {
                correlation_id,
                reason,
            } => warn!(%correlation_id, %reason, "could not send reply"),
        }
    }
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct MemoryEventSink {
    events: Mutex<Vec<WorkerEvent>>,
}

impl MemoryEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WorkerEvent> {
        self.events.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn diagnostics(&self) -> Vec<WorkerEvent> {
        self.events()
            .into_iter()
            .filter(WorkerEvent::is_diagnostic)
            .collect()
    }
}

impl EventSink for MemoryEventSink {
    fn emit(&self, event: WorkerEvent) {
        self.events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CorrelationId, DecodeError};
    use std::sync::Arc;

    #[test]
    fn test_memory_sink_separates_diagnostics() {
        let sink = MemoryEventSink::new();
        sink.emit(WorkerEvent::Processed {
            function: "add".into(),
            correlation_id: CorrelationId::new("1"),
        });
        sink.emit(WorkerEvent::Rejected {
            error: DecodeError::NotAnObject,
        });

        assert_eq!(sink.events().len(), 2);
        assert_eq!(
            sink.diagnostics(),
            vec![WorkerEvent::Rejected {
                error: DecodeError::NotAnObject
            }]
        );
    }

    /// Shared buffer the fmt subscriber writes into.
    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn capture(events: Vec<WorkerEvent>) -> String {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, || {
            for event in events {
                TracingEventSink.emit(event);
            }
        });
        let bytes = out.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_tracing_sink_levels() {
        let logs = capture(vec![
            WorkerEvent::Processed {
                function: "add".into(),
                correlation_id: CorrelationId::new("ok-1"),
            },
            WorkerEvent::SendFailed {
                correlation_id: CorrelationId::new("bad-1"),
                reason: "closed".to_string(),
            },
        ]);

        let lines: Vec<&str> = logs.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("DEBUG"));
        assert!(lines[0].contains("call processed"));
        assert!(lines[0].contains("ok-1"));
        assert!(lines[1].contains("WARN"));
        assert!(lines[1].contains("could not send reply"));
        assert!(lines[1].contains("bad-1"));
    }
}
