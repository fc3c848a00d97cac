use super::Val;
use crate::error;
use crate::lang::{Error, Number};

type Result<T> = std::result::Result<T, Error>;

/// Expression operators, shared between the VM dispatch loop and the
/// built-in library. All arithmetic is fixed-point; comparisons yield
/// the canonical booleans -1 and 0.
pub struct Operation {}

impl Operation {
    fn number(val: Val) -> Result<Number> {
        match val {
            Val::Number(n) => Ok(n),
            Val::String(_) | Val::Return(_) => Err(error!(TypeMismatch)),
        }
    }

    pub fn negate(val: Val) -> Result<Val> {
        Ok(Val::Number(Operation::number(val)?.checked_neg()?))
    }

    pub fn not(val: Val) -> Result<Val> {
        let n = Operation::number(val)?;
        Ok(Val::Number(Number::from_bool(!n.is_true())))
    }

    pub fn multiply(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = (Operation::number(lhs)?, Operation::number(rhs)?);
        Ok(Val::Number(l.checked_mul(r)?))
    }

    pub fn divide(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = (Operation::number(lhs)?, Operation::number(rhs)?);
        Ok(Val::Number(l.checked_div(r)?))
    }

    pub fn modulo(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = (Operation::number(lhs)?, Operation::number(rhs)?);
        Ok(Val::Number(l.checked_rem(r)?))
    }

    pub fn add(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = (Operation::number(lhs)?, Operation::number(rhs)?);
        Ok(Val::Number(l.checked_add(r)?))
    }

    pub fn subtract(lhs: Val, rhs: Val) -> Result<Val> {
        let (l, r) = (Operation::number(lhs)?, Operation::number(rhs)?);
        Ok(Val::Number(l.checked_sub(r)?))
    }

    pub fn equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(Number::from_bool(Operation::equal_bool(
            lhs, rhs,
        )?)))
    }

    pub fn not_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(Number::from_bool(!Operation::equal_bool(
            lhs, rhs,
        )?)))
    }

    fn equal_bool(lhs: Val, rhs: Val) -> Result<bool> {
        use Val::*;
        match (lhs, rhs) {
            (Number(l), Number(r)) => Ok(l == r),
            (String(l), String(r)) => Ok(l == r),
            _ => Err(error!(TypeMismatch)),
        }
    }

    pub fn less(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(Number::from_bool(Operation::less_bool(
            lhs, rhs,
        )?)))
    }

    pub fn greater(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(Number::from_bool(Operation::less_bool(
            rhs, lhs,
        )?)))
    }

    pub fn less_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(Number::from_bool(!Operation::less_bool(
            rhs, lhs,
        )?)))
    }

    pub fn greater_equal(lhs: Val, rhs: Val) -> Result<Val> {
        Ok(Val::Number(Number::from_bool(!Operation::less_bool(
            lhs, rhs,
        )?)))
    }

    fn less_bool(lhs: Val, rhs: Val) -> Result<bool> {
        let (l, r) = (Operation::number(lhs)?, Operation::number(rhs)?);
        Ok(l < r)
    }
}
