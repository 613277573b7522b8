//! Integration Tests
//!
//! End-to-end use of the facade crate:
//! - Dumps: document helpers over collections loaded from JSON-lines files
//! - Recording: cache call recording and replay through a shared store

#[path = "../common/mod.rs"]
mod common;

mod dumps;
mod recording;
