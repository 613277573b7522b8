//! Core types for Tessera
//!
//! This crate defines the foundational types shared by the cache and
//! document-store crates:
//! - Value: scalar value held by a cache entry
//! - Document: JSON object held by a collection, with dotted-path lookup
//! - Error: Error type shared by every library crate

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod error;
pub mod value;

pub use document::{compare_values, float_value, resolve_path, values_equal, Document, ID_FIELD};
pub use error::{Error, Result};
pub use value::{args_literal, Value};
