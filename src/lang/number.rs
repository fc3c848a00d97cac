use super::Error;
use std::convert::TryFrom;

type Result<T> = std::result::Result<T, Error>;

/// Fixed-point decimal: an integer mantissa and a decimal scale.
///
/// The scale is load-bearing for output: a value renders with exactly
/// `scale` fractional digits, so `15` prints as `15` while the result of
/// `Round(x, 2)` prints with two digits. Arithmetic propagates scale the
/// way hand calculation does: addition keeps the wider scale,
/// multiplication sums scales, division produces an exact result trimmed
/// of trailing zeros (capped at [`Number::MAX_SCALE`] digits).
#[derive(Clone, Copy)]
pub struct Number {
    mantissa: i128,
    scale: u32,
}

impl Number {
    pub const MAX_SCALE: u32 = 9;

    pub const ZERO: Number = Number {
        mantissa: 0,
        scale: 0,
    };

    pub fn new(mantissa: i128, scale: u32) -> Number {
        debug_assert!(scale <= Number::MAX_SCALE);
        Number { mantissa, scale }
    }

    pub fn from_int(n: i64) -> Number {
        Number {
            mantissa: n as i128,
            scale: 0,
        }
    }

    /// Parses a decimal literal of the form `123` or `123.45`.
    pub fn from_literal(s: &str) -> Option<Number> {
        let (sign, s) = match s.strip_prefix('-') {
            Some(rest) => (-1i128, rest),
            None => (1i128, s),
        };
        let (int_part, frac_part) = match s.find('.') {
            Some(dot) => (&s[..dot], &s[dot + 1..]),
            None => (s, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if frac_part.len() > Number::MAX_SCALE as usize {
            return None;
        }
        let mut mantissa: i128 = 0;
        for ch in int_part.chars().chain(frac_part.chars()) {
            let digit = ch.to_digit(10)? as i128;
            mantissa = mantissa.checked_mul(10)?.checked_add(digit)?;
        }
        Some(Number {
            mantissa: sign * mantissa,
            scale: frac_part.len() as u32,
        })
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn is_zero(&self) -> bool {
        self.mantissa == 0
    }

    /// Truthiness in the BASIC convention: anything non-zero.
    pub fn is_true(&self) -> bool {
        self.mantissa != 0
    }

    /// The canonical boolean values: comparisons yield -1 or 0.
    pub fn from_bool(b: bool) -> Number {
        if b {
            Number::from_int(-1)
        } else {
            Number::ZERO
        }
    }

    /// The integral value, if this number has no fractional part.
    pub fn to_i64(&self) -> Option<i64> {
        let t = self.trimmed();
        if t.scale == 0 {
            i64::try_from(t.mantissa).ok()
        } else {
            None
        }
    }

    fn pow10(exp: u32) -> i128 {
        10i128.pow(exp)
    }

    /// Both mantissas at the wider of the two scales.
    fn aligned(a: Number, b: Number) -> Result<(i128, i128, u32)> {
        let scale = a.scale.max(b.scale);
        let ma = a
            .mantissa
            .checked_mul(Number::pow10(scale - a.scale))
            .ok_or_else(|| error!(Overflow))?;
        let mb = b
            .mantissa
            .checked_mul(Number::pow10(scale - b.scale))
            .ok_or_else(|| error!(Overflow))?;
        Ok((ma, mb, scale))
    }

    fn div_round_half_away(n: i128, d: i128) -> i128 {
        let q = n / d;
        let r = n % d;
        if r.unsigned_abs() * 2 >= d.unsigned_abs() {
            let bump = if (n < 0) == (d < 0) { 1 } else { -1 };
            q + bump
        } else {
            q
        }
    }

    fn trimmed(mut self) -> Number {
        while self.scale > 0 && self.mantissa % 10 == 0 {
            self.mantissa /= 10;
            self.scale -= 1;
        }
        self
    }

    pub fn checked_neg(self) -> Result<Number> {
        match self.mantissa.checked_neg() {
            Some(m) => Ok(Number::new(m, self.scale)),
            None => Err(error!(Overflow)),
        }
    }

    pub fn checked_add(self, rhs: Number) -> Result<Number> {
        let (ma, mb, scale) = Number::aligned(self, rhs)?;
        match ma.checked_add(mb) {
            Some(m) => Ok(Number::new(m, scale)),
            None => Err(error!(Overflow)),
        }
    }

    pub fn checked_sub(self, rhs: Number) -> Result<Number> {
        let (ma, mb, scale) = Number::aligned(self, rhs)?;
        match ma.checked_sub(mb) {
            Some(m) => Ok(Number::new(m, scale)),
            None => Err(error!(Overflow)),
        }
    }

    pub fn checked_mul(self, rhs: Number) -> Result<Number> {
        let mantissa = self
            .mantissa
            .checked_mul(rhs.mantissa)
            .ok_or_else(|| error!(Overflow))?;
        let scale = self.scale + rhs.scale;
        if scale > Number::MAX_SCALE {
            let excess = Number::pow10(scale - Number::MAX_SCALE);
            Ok(Number::new(
                Number::div_round_half_away(mantissa, excess),
                Number::MAX_SCALE,
            ))
        } else {
            Ok(Number::new(mantissa, scale))
        }
    }

    pub fn checked_div(self, rhs: Number) -> Result<Number> {
        if rhs.mantissa == 0 {
            return Err(error!(DivisionByZero));
        }
        // Shift the dividend so the quotient lands at MAX_SCALE, round the
        // last digit half-away, then drop trailing zeros.
        let exp = Number::MAX_SCALE + rhs.scale - self.scale;
        let num = self
            .mantissa
            .checked_mul(Number::pow10(exp))
            .ok_or_else(|| error!(Overflow))?;
        let q = Number::div_round_half_away(num, rhs.mantissa);
        Ok(Number::new(q, Number::MAX_SCALE).trimmed())
    }

    /// Remainder with truncation toward zero, like the `MOD` operator.
    pub fn checked_rem(self, rhs: Number) -> Result<Number> {
        if rhs.mantissa == 0 {
            return Err(error!(DivisionByZero));
        }
        let (ma, mb, scale) = Number::aligned(self, rhs)?;
        Ok(Number::new(ma % mb, scale))
    }

    /// Rounds half-away-from-zero to exactly `digits` fractional digits
    /// and pins the rendering scale there.
    pub fn round(self, digits: u32) -> Result<Number> {
        let digits = digits.min(Number::MAX_SCALE);
        if digits >= self.scale {
            let m = self
                .mantissa
                .checked_mul(Number::pow10(digits - self.scale))
                .ok_or_else(|| error!(Overflow))?;
            Ok(Number::new(m, digits))
        } else {
            let m = Number::div_round_half_away(self.mantissa, Number::pow10(self.scale - digits));
            Ok(Number::new(m, digits))
        }
    }

    fn to_f64(self) -> f64 {
        self.mantissa as f64 / Number::pow10(self.scale) as f64
    }

    pub fn compare(self, rhs: Number) -> std::cmp::Ordering {
        match Number::aligned(self, rhs) {
            Ok((ma, mb, _)) => ma.cmp(&mb),
            // Alignment can only overflow on astronomical mantissas;
            // an approximate comparison is fine out there.
            Err(_) => self
                .to_f64()
                .partial_cmp(&rhs.to_f64())
                .unwrap_or(std::cmp::Ordering::Equal),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        self.compare(*other) == std::cmp::Ordering::Equal
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.compare(*other))
    }
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.scale == 0 {
            return write!(f, "{}", self.mantissa);
        }
        let p = Number::pow10(self.scale) as u128;
        let abs = self.mantissa.unsigned_abs();
        let sign = if self.mantissa < 0 { "-" } else { "" };
        write!(
            f,
            "{}{}.{:0width$}",
            sign,
            abs / p,
            abs % p,
            width = self.scale as usize
        )
    }
}

impl std::fmt::Debug for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}
