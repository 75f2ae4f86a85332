//! Per-message failure types.
//!
//! None of these stop the worker. Each one drops the message it belongs to and
//! is reported once through the event sink.

use thiserror::Error;

use super::value::ArgError;

/// Inbound text is not a well-formed call envelope.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DecodeError {
    #[error("invalid JSON: {0}")]
    NotJson(String),

    #[error("envelope must be a JSON object")]
    NotAnObject,

    #[error("missing field '{0}'")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}")]
    WrongFieldType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{0}' must not be empty")]
    EmptyField(&'static str),
}

/// A reply could not be serialized; nothing is sent.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EncodeError {
    #[error("non-finite float {0} has no JSON representation")]
    NonFiniteFloat(f64),

    #[error("serialization failed: {0}")]
    Serialize(String),
}

/// Business failure raised by a handler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    #[error("integer overflow in '{0}'")]
    Overflow(&'static str),

    #[error("{0}")]
    Domain(String),
}

/// Why a dispatched call produced no result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DispatchError {
    #[error("bad arguments: {0}")]
    Args(#[from] ArgError),

    #[error("handler failed: {0}")]
    Handler(#[from] HandlerError),
}
