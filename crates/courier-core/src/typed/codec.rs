//! Envelope codec - wire text to envelopes and back.
//!
//! Wire format (one JSON object per message):
//! - call:     `{"function": "<name>", "args": {...}, "uuid": "<id>"}`
//! - result:   `{"uuid": "<id>", "result": <value>}`
//! - error:    `{"uuid": "<id>", "error": "<message>"}` (only with error replies)
//!
//! Decoding validates structure only. Argument types are checked later by the
//! handler's [`super::Call::from_args`].

use serde::Serialize;
use serde_json::{Map, Number};

use crate::domain::{
    Args, CallEnvelope, CorrelationId, DecodeError, EncodeError, FunctionName, Reply,
    ResponseEnvelope, Value,
};

pub const FIELD_FUNCTION: &str = "function";
pub const FIELD_ARGS: &str = "args";
pub const FIELD_UUID: &str = "uuid";
pub const FIELD_RESULT: &str = "result";
pub const FIELD_ERROR: &str = "error";

#[derive(Serialize)]
struct WireCall<'a> {
    function: &'a str,
    args: serde_json::Value,
    uuid: &'a str,
}

#[derive(Serialize)]
struct WireResult<'a> {
    uuid: &'a str,
    result: serde_json::Value,
}

#[derive(Serialize)]
struct WireError<'a> {
    uuid: &'a str,
    error: &'a str,
}

/// Parse and validate an inbound call.
pub fn decode_call(text: &str) -> Result<CallEnvelope, DecodeError> {
    let obj = parse_object(text)?;

    let function = required_string(&obj, FIELD_FUNCTION)?;
    let args = match obj.get(FIELD_ARGS) {
        None => return Err(DecodeError::MissingField(FIELD_ARGS)),
        Some(serde_json::Value::Object(map)) => args_from_json(map),
        Some(_) => {
            return Err(DecodeError::WrongFieldType {
                field: FIELD_ARGS,
                expected: "an object",
            });
        }
    };
    let uuid = required_string(&obj, FIELD_UUID)?;

    Ok(CallEnvelope::new(
        FunctionName::new(function),
        args,
        CorrelationId::new(uuid),
    ))
}

/// Serialize a call, for callers putting work on the queue.
pub fn encode_call(call: &CallEnvelope) -> Result<String, EncodeError> {
    let wire = WireCall {
        function: call.function().as_str(),
        args: serde_json::Value::Object(args_to_json(call.args())?),
        uuid: call.correlation_id().as_str(),
    };
    to_text(&wire)
}

/// Serialize a successful response.
pub fn encode_response(response: &ResponseEnvelope) -> Result<String, EncodeError> {
    let wire = WireResult {
        uuid: response.correlation_id.as_str(),
        result: value_to_json(&response.result)?,
    };
    to_text(&wire)
}

/// Serialize an error reply.
pub fn encode_error(correlation_id: &CorrelationId, message: &str) -> Result<String, EncodeError> {
    let wire = WireError {
        uuid: correlation_id.as_str(),
        error: message,
    };
    to_text(&wire)
}

pub fn encode_reply(reply: &Reply) -> Result<String, EncodeError> {
    match reply {
        Reply::Result(response) => encode_response(response),
        Reply::Error {
            correlation_id,
            message,
        } => encode_error(correlation_id, message),
    }
}

/// Parse a reply, for callers matching responses to requests.
pub fn decode_reply(text: &str) -> Result<Reply, DecodeError> {
    let obj = parse_object(text)?;
    let uuid = CorrelationId::new(required_string(&obj, FIELD_UUID)?);

    if let Some(result) = obj.get(FIELD_RESULT) {
        return Ok(Reply::Result(ResponseEnvelope::new(
            uuid,
            value_from_json(result),
        )));
    }
    match obj.get(FIELD_ERROR) {
        Some(serde_json::Value::String(message)) => Ok(Reply::Error {
            correlation_id: uuid,
            message: message.clone(),
        }),
        Some(_) => Err(DecodeError::WrongFieldType {
            field: FIELD_ERROR,
            expected: "a string",
        }),
        None => Err(DecodeError::MissingField(FIELD_RESULT)),
    }
}

/// Convert a JSON tree into a [`Value`].
///
/// Integers that fit in `i64` become [`Value::Integer`]; larger unsigned
/// integers are kept as floats so typed extraction can report them as out of
/// range.
pub fn value_from_json(json: &serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(*b),
        serde_json::Value::Number(n) => number_from_json(n),
        serde_json::Value::String(s) => Value::String(s.clone()),
        serde_json::Value::Array(items) => {
            Value::Sequence(items.iter().map(value_from_json).collect())
        }
        serde_json::Value::Object(map) => Value::Mapping(args_from_json(map)),
    }
}

/// Convert a [`Value`] into JSON. Fails on NaN and infinities.
pub fn value_to_json(value: &Value) -> Result<serde_json::Value, EncodeError> {
    Ok(match value {
        Value::Null => serde_json::Value::Null,
        Value::Bool(b) => serde_json::Value::Bool(*b),
        Value::Integer(i) => serde_json::Value::Number(Number::from(*i)),
        Value::Float(f) => Number::from_f64(*f)
            .map(serde_json::Value::Number)
            .ok_or(EncodeError::NonFiniteFloat(*f))?,
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Sequence(items) => serde_json::Value::Array(
            items
                .iter()
                .map(value_to_json)
                .collect::<Result<Vec<_>, _>>()?,
        ),
        Value::Mapping(args) => serde_json::Value::Object(args_to_json(args)?),
    })
}

fn number_from_json(n: &Number) -> Value {
    if let Some(i) = n.as_i64() {
        Value::Integer(i)
    } else if let Some(u) = n.as_u64() {
        Value::Float(u as f64)
    } else {
        Value::Float(n.as_f64().unwrap_or(f64::NAN))
    }
}

fn args_from_json(map: &Map<String, serde_json::Value>) -> Args {
    map.iter()
        .map(|(k, v)| (k.clone(), value_from_json(v)))
        .collect()
}

fn args_to_json(args: &Args) -> Result<Map<String, serde_json::Value>, EncodeError> {
    let mut map = Map::with_capacity(args.len());
    for (k, v) in args.iter() {
        map.insert(k.to_string(), value_to_json(v)?);
    }
    Ok(map)
}

fn parse_object(text: &str) -> Result<Map<String, serde_json::Value>, DecodeError> {
    let json: serde_json::Value =
        serde_json::from_str(text).map_err(|e| DecodeError::NotJson(e.to_string()))?;
    match json {
        serde_json::Value::Object(obj) => Ok(obj),
        _ => Err(DecodeError::NotAnObject),
    }
}

fn required_string<'a>(
    obj: &'a Map<String, serde_json::Value>,
    field: &'static str,
) -> Result<&'a str, DecodeError> {
    match obj.get(field) {
        None => Err(DecodeError::MissingField(field)),
        Some(serde_json::Value::String(s)) if s.is_empty() => Err(DecodeError::EmptyField(field)),
        Some(serde_json::Value::String(s)) => Ok(s),
        Some(_) => Err(DecodeError::WrongFieldType {
            field,
            expected: "a string",
        }),
    }
}

fn to_text<T: Serialize>(wire: &T) -> Result<String, EncodeError> {
    serde_json::to_string(wire).map_err(|e| EncodeError::Serialize(e.to_string()))
}
