//! Worker events.
//!
//! Everything the loop wants to tell the outside world about a message goes
//! through [`crate::ports::EventSink`] as one of these. Messages addressed to
//! another worker produce no event at all.

use super::errors::{DecodeError, DispatchError, EncodeError};
use super::ids::{CorrelationId, FunctionName};

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent {
    /// A call was handled and its response sent.
    Processed {
        function: FunctionName,
        correlation_id: CorrelationId,
    },

    /// Inbound text failed structural validation.
    Rejected { error: DecodeError },

    /// Arguments failed typed extraction, or the handler returned an error.
    CallFailed {
        function: FunctionName,
        correlation_id: CorrelationId,
        error: DispatchError,
    },

    /// The reply could not be serialized.
    EncodeFailed {
        correlation_id: CorrelationId,
        error: EncodeError,
    },

    /// The outbox refused the reply.
    SendFailed {
        correlation_id: CorrelationId,
        reason: String,
    },
}

impl WorkerEvent {
    /// `true` for events that describe a dropped message.
    pub fn is_diagnostic(&self) -> bool {
        !matches!(self, WorkerEvent::Processed { .. })
    }
}
