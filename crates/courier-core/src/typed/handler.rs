//! Handler trait and its type-erased form.
//!
//! `Handler<C>` is what application code implements; `DynHandler` is what the
//! dispatch table stores. `TypedHandler<C, H>` bridges the two by running
//! argument extraction before handing a typed call to the handler.

use std::marker::PhantomData;

use super::call::Call;
use crate::domain::{Args, DispatchError, HandlerError, Value};

/// Pure function from a typed call to a result value.
///
/// Handlers never touch the queue: the worker owns decoding, encoding and
/// transport.
pub trait Handler<C: Call>: Send + Sync {
    fn handle(&self, call: C) -> Result<Value, HandlerError>;
}

/// Object-safe handler, keyed by function name in the dispatch table.
pub trait DynHandler: Send + Sync {
    fn function(&self) -> &str;

    fn call(&self, args: &Args) -> Result<Value, DispatchError>;
}

pub struct TypedHandler<C: Call, H: Handler<C>> {
    handler: H,
    _marker: PhantomData<fn() -> C>,
}

impl<C: Call, H: Handler<C>> TypedHandler<C, H> {
    pub fn new(handler: H) -> Self {
        Self {
            handler,
            _marker: PhantomData,
        }
    }
}

impl<C: Call, H: Handler<C>> DynHandler for TypedHandler<C, H> {
    fn function(&self) -> &str {
        C::FUNCTION
    }

    fn call(&self, args: &Args) -> Result<Value, DispatchError> {
        let call = C::from_args(args)?;
        Ok(self.handler.handle(call)?)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use crate::domain::ArgError;

    /// `echo(text)` returns its argument unchanged.
    pub struct Echo {
        pub text: String,
    }

    impl Call for Echo {
        const FUNCTION: &'static str = "echo";

        fn from_args(args: &Args) -> Result<Self, ArgError> {
            Ok(Self {
                text: args.string("text")?.to_string(),
            })
        }
    }

    pub struct EchoHandler;

    impl Handler<Echo> for EchoHandler {
        fn handle(&self, call: Echo) -> Result<Value, HandlerError> {
            if call.text.is_empty() {
                return Err(HandlerError::Domain("nothing to echo".to_string()));
            }
            Ok(Value::String(call.text))
        }
    }
}
