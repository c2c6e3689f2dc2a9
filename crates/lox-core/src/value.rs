//! Literal values stored in the constant pool.

use core::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

/// Numeric literal. Duplicates are not interned; identity is the pool slot.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
#[cfg_attr(feature = "serde", derive(Serialize), serde(transparent))]
pub struct Value(pub f64);

impl From<f64> for Value {
    fn from(v: f64) -> Self { Self(v) }
}

impl From<Value> for f64 {
    fn from(v: Value) -> Self { v.0 }
}

/// Prints like C's `%g`: six significant digits, trailing zeros trimmed,
/// exponent notation when the decimal exponent is below -4 or at least 6.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_general(self.0))
    }
}

const SIGNIFICANT_DIGITS: i32 = 6;

/// `%g` rendering of `v`.
pub fn format_general(v: f64) -> String {
    if v.is_nan() {
        return "nan".into();
    }
    if v.is_infinite() {
        return if v.is_sign_negative() { "-inf".into() } else { "inf".into() };
    }
    if v == 0.0 {
        return if v.is_sign_negative() { "-0".into() } else { "0".into() };
    }

    // Round to the target precision first: the exponent of the rounded value
    // decides the notation (999999.5 becomes 1e+06).
    let sci = format!("{:.*e}", (SIGNIFICANT_DIGITS - 1) as usize, v);
    let (mantissa, exp) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exp: i32 = exp.parse().unwrap_or(0);

    if exp < -4 || exp >= SIGNIFICANT_DIGITS {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{sign}{:02}", trim_zeros(mantissa), exp.abs())
    } else {
        let decimals = (SIGNIFICANT_DIGITS - 1 - exp).max(0) as usize;
        trim_zeros(&format!("{v:.decimals$}")).to_owned()
    }
}

fn trim_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn general_format_matches_printf() {
        let cases = [
            (1.2, "1.2"),
            (0.0, "0"),
            (-0.0, "-0"),
            (1.0, "1"),
            (-3.5, "-3.5"),
            (100.0, "100"),
            (123_456.0, "123456"),
            (1_234_567.0, "1.23457e+06"),
            (999_999.5, "1e+06"),
            (0.0001, "0.0001"),
            (0.000_012_5, "1.25e-05"),
            (0.1 + 0.2, "0.3"),
            (1e100, "1e+100"),
            (2.0 / 3.0, "0.666667"),
        ];
        for (v, expected) in cases {
            assert_eq!(format_general(v), expected, "formatting {v:?}");
        }
    }

    #[test]
    fn non_finite() {
        assert_eq!(Value(f64::NAN).to_string(), "nan");
        assert_eq!(Value(f64::INFINITY).to_string(), "inf");
        assert_eq!(Value(f64::NEG_INFINITY).to_string(), "-inf");
    }
}
