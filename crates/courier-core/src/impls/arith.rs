//! Integer arithmetic handlers: `add` and `subtract`.

use crate::domain::{ArgError, Args, HandlerError, Value};
use crate::typed::{Call, DispatchTable, Handler, RegistryError};

/// `add(a, b)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Add {
    pub a: i64,
    pub b: i64,
}

impl Call for Add {
    const FUNCTION: &'static str = "add";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        Ok(Self {
            a: args.int("a")?,
            b: args.int("b")?,
        })
    }
}

pub struct AddHandler;

impl Handler<Add> for AddHandler {
    fn handle(&self, call: Add) -> Result<Value, HandlerError> {
        call.a
            .checked_add(call.b)
            .map(Value::Integer)
            .ok_or(HandlerError::Overflow(Add::FUNCTION))
    }
}

/// `subtract(a, b)` = `a - b`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subtract {
    pub a: i64,
    pub b: i64,
}

impl Call for Subtract {
    const FUNCTION: &'static str = "subtract";

    fn from_args(args: &Args) -> Result<Self, ArgError> {
        Ok(Self {
            a: args.int("a")?,
            b: args.int("b")?,
        })
    }
}

pub struct SubtractHandler;

impl Handler<Subtract> for SubtractHandler {
    fn handle(&self, call: Subtract) -> Result<Value, HandlerError> {
        call.a
            .checked_sub(call.b)
            .map(Value::Integer)
            .ok_or(HandlerError::Overflow(Subtract::FUNCTION))
    }
}

/// Functions this crate ships handlers for.
pub const BUILTIN_FUNCTIONS: &[&str] = &[Add::FUNCTION, Subtract::FUNCTION];

/// Register the built-in handler for `function`. Returns `Ok(false)` when the
/// name is not a built-in.
pub fn register_builtin(table: &mut DispatchTable, function: &str) -> Result<bool, RegistryError> {
    if function == Add::FUNCTION {
        table.register::<Add, _>(AddHandler)?;
    } else if function == Subtract::FUNCTION {
        table.register::<Subtract, _>(SubtractHandler)?;
    } else {
        return Ok(false);
    }
    Ok(true)
}

#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
    #[error("no built-in handler for function '{0}'")]
    UnknownFunction(String),

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A dispatch table serving exactly the named built-ins.
pub fn builtin_table<S: AsRef<str>>(functions: &[S]) -> Result<DispatchTable, BuiltinError> {
    let mut table = DispatchTable::new();
    for function in functions {
        let function = function.as_ref();
        if !register_builtin(&mut table, function)? {
            return Err(BuiltinError::UnknownFunction(function.to_string()));
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(2, 3, 5)]
    #[case(-7, 7, 0)]
    #[case(i64::MAX, 0, i64::MAX)]
    fn test_add_sums(#[case] a: i64, #[case] b: i64, #[case] expected: i64) {
        assert_eq!(AddHandler.handle(Add { a, b }), Ok(Value::Integer(expected)));
    }

    #[test]
    fn test_add_reports_overflow() {
        let err = AddHandler.handle(Add { a: i64::MAX, b: 1 }).unwrap_err();
        assert_eq!(err, HandlerError::Overflow("add"));
    }

    #[rstest]
    #[case(10, 4, 6)]
    #[case(2, 3, -1)]
    fn test_subtract_differences(#[case] a: i64, #[case] b: i64, #[case] expected: i64) {
        assert_eq!(
            SubtractHandler.handle(Subtract { a, b }),
            Ok(Value::Integer(expected))
        );
    }

    #[test]
    fn test_subtract_reports_overflow() {
        let err = SubtractHandler
            .handle(Subtract { a: i64::MIN, b: 1 })
            .unwrap_err();
        assert_eq!(err, HandlerError::Overflow("subtract"));
    }

    #[test]
    fn test_add_args_must_be_integers() {
        let args = Args::new().with("a", "x").with("b", 3);
        assert!(matches!(
            Add::from_args(&args),
            Err(ArgError::WrongType { ref name, .. }) if name == "a"
        ));
    }

    #[test]
    fn test_register_builtin_knows_only_builtins() {
        let mut table = DispatchTable::new();
        assert!(register_builtin(&mut table, "add").unwrap());
        assert!(register_builtin(&mut table, "subtract").unwrap());
        assert!(!register_builtin(&mut table, "multiply").unwrap());
        assert_eq!(table.len(), 2);
        assert!(register_builtin(&mut table, "add").is_err());
    }

    #[test]
    fn test_builtin_table_by_name() {
        let table = builtin_table(&["add", "subtract"]).unwrap();
        assert_eq!(table.len(), 2);
        assert!(table.contains("subtract"));
    }

    #[test]
    fn test_builtin_table_unknown_function() {
        assert!(matches!(
            builtin_table(&["add", "multiply"]),
            Err(BuiltinError::UnknownFunction(f)) if f == "multiply"
        ));
    }

    #[test]
    fn test_builtin_table_duplicate_function() {
        assert!(matches!(
            builtin_table(&["add", "add"]),
            Err(BuiltinError::Registry(RegistryError::AlreadyRegistered(_)))
        ));
    }
}
