//! String → Value parsing rules.
//!
//! Values given to `cache run` are auto-detected:
//! 1. Integer pattern that fits i64 → `Value::Int`
//! 2. Float pattern → `Value::Float`
//! 3. Everything else → `Value::Text`
//!
//! `--text` skips detection.

use tessera_core::Value;

/// Auto-detect value type from a user-supplied string.
pub fn parse_value(s: &str) -> Value {
    if is_integer(s) {
        if let Ok(n) = s.parse::<i64>() {
            return Value::Int(n);
        }
    }
    if is_float(s) {
        if let Ok(f) = s.parse::<f64>() {
            return Value::Float(f);
        }
    }
    Value::Text(s.to_string())
}

/// Parse every argument, or keep them all as text when `as_text` is set.
pub fn parse_values(args: &[String], as_text: bool) -> Vec<Value> {
    args.iter()
        .map(|s| {
            if as_text {
                Value::Text(s.clone())
            } else {
                parse_value(s)
            }
        })
        .collect()
}

/// Split a `KEY=VALUE` field argument.
pub fn parse_field(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("Expected KEY=VALUE, got '{}'", s)),
    }
}

fn is_integer(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

fn is_float(s: &str) -> bool {
    let s = s.strip_prefix('-').unwrap_or(s);
    if s.is_empty() || !s.bytes().any(|b| b.is_ascii_digit()) {
        return false;
    }
    if !s.contains('.') && !s.contains('e') && !s.contains('E') {
        return false;
    }
    s.bytes().all(|b| {
        b.is_ascii_digit() || b == b'.' || b == b'e' || b == b'E' || b == b'+' || b == b'-'
    })
}
