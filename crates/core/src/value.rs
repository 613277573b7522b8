//! Value types for the key-value cache
//!
//! This module defines:
//! - Value: the scalar values a cache entry can hold
//!
//! ## Encoding
//!
//! Key-value stores only hold bytes. Every `Value` has a byte encoding that
//! matches what a Redis client writes on `SET`:
//! - `Text` is stored as its UTF-8 bytes
//! - `Bytes` are stored verbatim
//! - `Int` and `Float` are stored as their decimal text
//!
//! The encoding is lossy on purpose: reading back gives bytes, and the caller
//! picks a converter (`get_str`, `get_int`) to recover a typed value.

use std::fmt;

/// A scalar cache value
///
/// Different variants are never equal, even when their encodings match:
/// `Int(1) != Text("1")`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit floating point
    Float(f64),
}

impl Value {
    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "Text",
            Value::Bytes(_) => "Bytes",
            Value::Int(_) => "Int",
            Value::Float(_) => "Float",
        }
    }

    /// Byte encoding written to the store.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Value::Text(s) => s.as_bytes().to_vec(),
            Value::Bytes(b) => b.clone(),
            Value::Int(i) => i.to_string().into_bytes(),
            Value::Float(f) => f.to_string().into_bytes(),
        }
    }

    /// Literal rendering used when recording call arguments.
    ///
    /// Text is quoted and escaped, bytes use a `b"..."` literal with ASCII
    /// escapes, numbers are bare.
    pub fn to_literal(&self) -> String {
        match self {
            Value::Text(s) => format!("{:?}", s),
            Value::Bytes(b) => format!("b\"{}\"", b.escape_ascii()),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format!("{:?}", f),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_literal())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<Vec<u8>> for Value {
    fn from(b: Vec<u8>) -> Self {
        Value::Bytes(b)
    }
}

impl From<&[u8]> for Value {
    fn from(b: &[u8]) -> Self {
        Value::Bytes(b.to_vec())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

/// Render an argument tuple as a bracketed literal list, e.g. `["foo", 42]`.
pub fn args_literal(args: &[Value]) -> String {
    let parts: Vec<String> = args.iter().map(Value::to_literal).collect();
    format!("[{}]", parts.join(", "))
}
