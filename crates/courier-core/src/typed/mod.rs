//! Typed - typed calls, handlers, dispatch and the wire codec.
//!
//! Two layers:
//! - **typed**: `Call` + `Handler<C>`; argument extraction is checked per function.
//! - **dyn**: `DynHandler`, the object-safe form stored in `DispatchTable`.

pub mod call;
pub mod codec;
pub mod handler;
pub mod registry;

pub use self::call::Call;
pub use self::handler::{DynHandler, Handler, TypedHandler};
pub use self::registry::{DispatchTable, RegistryError};
