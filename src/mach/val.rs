use super::Address;
use crate::lang::Number;
use std::sync::Arc;

/// A runtime value on the operand stack or in a variable slot. Strings
/// are atomically refcounted so a compiled program holding them stays
/// shareable across threads.
///
/// `Return` never escapes the machine: it is pushed by a call sequence
/// and consumed by the matching `Return` opcode.
#[derive(Clone, Debug, PartialEq)]
pub enum Val {
    Number(Number),
    String(Arc<str>),
    Return(Address),
}

impl std::fmt::Display for Val {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        use Val::*;
        match self {
            Number(n) => write!(f, "{}", n),
            String(s) => write!(f, "{}", s),
            Return(a) => write!(f, "RETURN({})", a),
        }
    }
}

impl From<Number> for Val {
    fn from(n: Number) -> Val {
        Val::Number(n)
    }
}

impl From<i64> for Val {
    fn from(n: i64) -> Val {
        Val::Number(Number::from_int(n))
    }
}

impl From<i32> for Val {
    fn from(n: i32) -> Val {
        Val::Number(Number::from_int(n as i64))
    }
}

/// Booleans use the BASIC convention: true is -1, false is 0.
impl From<bool> for Val {
    fn from(b: bool) -> Val {
        Val::Number(Number::from_bool(b))
    }
}

impl From<&str> for Val {
    fn from(s: &str) -> Val {
        Val::String(s.into())
    }
}
