//! Domain model: values, envelopes, identifiers, errors and events.

pub mod envelope;
pub mod errors;
pub mod events;
pub mod ids;
pub mod value;

pub use envelope::{CallEnvelope, Reply, ResponseEnvelope};
pub use errors::{DecodeError, DispatchError, EncodeError, HandlerError};
pub use events::WorkerEvent;
pub use ids::{CorrelationId, FunctionName};
pub use value::{ArgError, Args, Value, ValueKind};
