//! Call trait - binds a function name to a typed argument struct.

use crate::domain::{ArgError, Args};

/// A typed view of one function's arguments.
///
/// # Example
/// ```ignore
/// struct Greet { name: String }
///
/// impl Call for Greet {
///     const FUNCTION: &'static str = "greet";
///
///     fn from_args(args: &Args) -> Result<Self, ArgError> {
///         Ok(Self { name: args.string("name")?.to_string() })
///     }
/// }
/// ```
///
/// Extraction is where argument validation happens: a missing or mistyped
/// field surfaces as an [`ArgError`] before any handler runs.
pub trait Call: Sized + Send + Sync + 'static {
    /// Name on the wire (`"function"` field).
    const FUNCTION: &'static str;

    fn from_args(args: &Args) -> Result<Self, ArgError>;
}
