//! Loose numeric coercion for form input and JSON request bodies.
//!
//! Text typed into a form (and numbers that arrive as strings in a request
//! body) are read the lenient way browsers read them: leading whitespace is
//! skipped and the longest numeric prefix wins, so `"12 boxes"` is `12`.

use serde_json::Value;

/// Parse the leading integer of `s` (`"  -12abc"` -> `-12`).
///
/// Returns `None` when there is no digit to read or the value overflows `i64`.
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }

    s[..end].parse().ok()
}

/// Parse the leading decimal number of `s` (`"1.5e2kg"` -> `150.0`).
///
/// Returns `None` when no digits precede the first non-numeric character.
pub fn parse_float_prefix(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        if digits > 0 {
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when it carries at least one digit.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse().ok()
}

/// Text of a number as a browser prints it (`10`, `1.5`, `1e+21`, `1.5e-7`).
///
/// Magnitudes from `1e-6` up to (not including) `1e21` print in positional
/// form, everything else in exponent form with an explicit exponent sign.
/// Zero (either sign) prints as `0`.
pub fn number_text(n: f64) -> String {
    if n == 0.0 {
        return "0".to_string();
    }
    let magnitude = n.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return n.to_string();
    }

    let exp = format!("{n:e}");
    match exp.split_once('e') {
        Some((mantissa, power)) if !power.starts_with('-') => format!("{mantissa}e+{power}"),
        _ => exp,
    }
}

/// Truthiness of a JSON value: `null`, `false`, `0`, `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Coerce a JSON value to an integer, truncating fractions.
///
/// Numbers are truncated toward zero; strings go through [`parse_int_prefix`].
pub fn coerce_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => Some(i),
            None => {
                let f = n.as_f64()?;
                let t = f.trunc();
                (t.is_finite() && t >= i64::MIN as f64 && t <= i64::MAX as f64).then_some(t as i64)
            }
        },
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Coerce a JSON value to a finite float.
pub fn coerce_float(value: &Value) -> Option<f64> {
    let f = match value {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => parse_float_prefix(s)?,
        _ => return None,
    };
    f.is_finite().then_some(f)
}
