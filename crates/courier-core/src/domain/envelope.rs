//! Call and response envelopes.
//!
//! Envelopes are transient: created per message, dropped after the reply is
//! sent or the message is rejected. Wire encoding lives in
//! [`crate::typed::codec`].

use super::ids::{CorrelationId, FunctionName};
use super::value::{Args, Value};

/// An inbound request: which function, with which arguments, under which id.
#[derive(Debug, Clone, PartialEq)]
pub struct CallEnvelope {
    function: FunctionName,
    args: Args,
    correlation_id: CorrelationId,
}

impl CallEnvelope {
    pub fn new(function: FunctionName, args: Args, correlation_id: CorrelationId) -> Self {
        Self {
            function,
            args,
            correlation_id,
        }
    }

    pub fn function(&self) -> &FunctionName {
        &self.function
    }

    pub fn args(&self) -> &Args {
        &self.args
    }

    pub fn correlation_id(&self) -> &CorrelationId {
        &self.correlation_id
    }

    /// Build the success response for this call.
    pub fn respond(&self, result: Value) -> ResponseEnvelope {
        ResponseEnvelope::new(self.correlation_id.clone(), result)
    }
}

/// A successful reply. `correlation_id` always equals the triggering call's.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub correlation_id: CorrelationId,
    pub result: Value,
}

impl ResponseEnvelope {
    pub fn new(correlation_id: CorrelationId, result: Value) -> Self {
        Self {
            correlation_id,
            result,
        }
    }
}

/// Any reply a caller may observe: a result or, with error replies enabled, a
/// handler failure.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Result(ResponseEnvelope),
    Error {
        correlation_id: CorrelationId,
        message: String,
    },
}

impl Reply {
    pub fn correlation_id(&self) -> &CorrelationId {
        match self {
            Reply::Result(r) => &r.correlation_id,
            Reply::Error { correlation_id, .. } => correlation_id,
        }
    }
}
