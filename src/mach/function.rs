use super::{Opcode, Val};
use crate::error;
use crate::lang::{Error, Number};
use chrono::{NaiveTime, Timelike};

type Result<T> = std::result::Result<T, Error>;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// ## Built-in function library
///
/// Time-of-day and rounding helpers available to every script. Each one
/// compiles to a dedicated opcode; the generator resolves the name and
/// checks the argument count, so the runtime only evaluates.
pub struct Function {}

impl Function {
    /// The opcode and arity for a built-in name, already uppercased.
    pub fn opcode_and_arity(name: &str) -> Option<(Opcode, usize)> {
        match name {
            "TIMETOHOURS" => Some((Opcode::TimeToHours, 1)),
            "TIMEOVERLAP" => Some((Opcode::TimeOverlap, 4)),
            "ROUND" => Some((Opcode::Round, 2)),
            _ => None,
        }
    }

    pub fn is_builtin(name: &str) -> bool {
        Function::opcode_and_arity(name).is_some()
    }

    /// `TimeToHours("01:30")` is `1.5`.
    pub fn time_to_hours(val: Val) -> Result<Val> {
        let m = Function::minutes(&val)?;
        let hours = Number::from_int(m).checked_div(Number::from_int(60))?;
        Ok(Val::Number(hours))
    }

    /// Hours of overlap between two `HH:MM` intervals, as a number.
    ///
    /// An interval whose end is at or before its start crosses midnight,
    /// so `"22:00".."06:00"` runs 22:00 today through 06:00 tomorrow and
    /// `"09:00".."09:00"` covers the full day. Summing the intersection
    /// over day-shifted copies of the second interval catches overlap on
    /// either side of midnight.
    pub fn time_overlap(a_start: Val, a_end: Val, b_start: Val, b_end: Val) -> Result<Val> {
        let (sa, ea) = Function::interval(&a_start, &a_end)?;
        let (sb, eb) = Function::interval(&b_start, &b_end)?;
        let mut overlap = 0i64;
        for k in &[-MINUTES_PER_DAY, 0, MINUTES_PER_DAY] {
            overlap += (ea.min(eb + k) - sa.max(sb + k)).max(0);
        }
        let hours = Number::from_int(overlap).checked_div(Number::from_int(60))?;
        Ok(Val::Number(hours))
    }

    /// `Round(x, digits)` half-away-from-zero; the result keeps exactly
    /// `digits` fractional digits when rendered.
    pub fn round(val: Val, digits: Val) -> Result<Val> {
        let n = match val {
            Val::Number(n) => n,
            _ => return Err(error!(TypeMismatch)),
        };
        let digits = match digits {
            Val::Number(d) => d.to_i64(),
            _ => None,
        };
        match digits {
            Some(d) if d >= 0 && d <= Number::MAX_SCALE as i64 => {
                Ok(Val::Number(n.round(d as u32)?))
            }
            _ => Err(error!(TypeMismatch; "ROUND DIGITS MUST BE A SMALL WHOLE NUMBER")),
        }
    }

    fn interval(start: &Val, end: &Val) -> Result<(i64, i64)> {
        let s = Function::minutes(start)?;
        let mut e = Function::minutes(end)?;
        if e <= s {
            e += MINUTES_PER_DAY;
        }
        Ok((s, e))
    }

    /// Minutes since midnight for an `HH:MM` string value.
    fn minutes(val: &Val) -> Result<i64> {
        let s = match val {
            Val::String(s) => s,
            _ => return Err(error!(TypeMismatch; "EXPECTED A TIME STRING")),
        };
        match NaiveTime::parse_from_str(s, "%H:%M") {
            Ok(t) => Ok(t.hour() as i64 * 60 + t.minute() as i64),
            Err(_) => Err(error!(MalformedTime)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::ErrorCode;

    fn hours(v: Val) -> String {
        match v {
            Val::Number(n) => n.to_string(),
            _ => panic!("expected a number"),
        }
    }

    #[test]
    fn test_time_to_hours() {
        let v = Function::time_to_hours("01:30".into()).unwrap();
        assert_eq!(hours(v), "1.5");
        let v = Function::time_to_hours("00:00".into()).unwrap();
        assert_eq!(hours(v), "0");
    }

    #[test]
    fn test_overlap_across_midnight() {
        // 22:00-06:00 worked against a 23:00-06:00 night window.
        let v =
            Function::time_overlap("22:00".into(), "06:00".into(), "23:00".into(), "06:00".into())
                .unwrap();
        assert_eq!(hours(v), "7");
    }

    #[test]
    fn test_overlap_disjoint() {
        let v =
            Function::time_overlap("09:00".into(), "12:00".into(), "13:00".into(), "17:00".into())
                .unwrap();
        assert_eq!(hours(v), "0");
    }

    #[test]
    fn test_overlap_same_day() {
        let v =
            Function::time_overlap("09:00".into(), "17:00".into(), "12:00".into(), "13:00".into())
                .unwrap();
        assert_eq!(hours(v), "1");
    }

    #[test]
    fn test_malformed_time() {
        let e = Function::time_to_hours("25:99".into()).unwrap_err();
        assert_eq!(e.code(), ErrorCode::MalformedTime);
        let e = Function::time_to_hours("noon".into()).unwrap_err();
        assert_eq!(e.code(), ErrorCode::MalformedTime);
    }

    #[test]
    fn test_round_rejects_fractional_digits() {
        let x = Val::Number(Number::from_literal("3.14159").unwrap());
        let d = Val::Number(Number::from_literal("1.5").unwrap());
        let e = Function::round(x, d).unwrap_err();
        assert_eq!(e.code(), ErrorCode::TypeMismatch);
    }

    #[test]
    fn test_round() {
        let x = Val::Number(Number::from_literal("3.14159").unwrap());
        let d = Val::Number(Number::from_int(2));
        assert_eq!(hours(Function::round(x, d).unwrap()), "3.14");
    }
}
