//! Replay of recorded call history.
//!
//! Reads the `<operation>:inputs` and `<operation>:outputs` lists written by
//! [`CallHistory`](crate::interceptor::CallHistory) and renders them:
//!
//! ```text
//! Cache.store was called 3 times:
//! Cache.store(*["foo"]) -> 5c0f...
//! Cache.store(*["bar"]) -> 9a1e...
//! Cache.store(*[42]) -> 0d7b...
//! ```

use std::fmt;

use tessera_core::{Error, Result};
use tracing::warn;

use crate::interceptor::{inputs_key, outputs_key};
use crate::store::KeyValueStore;

/// One recorded call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Serialized argument list
    pub args: String,
    /// Serialized result
    pub output: String,
}

/// Full recorded history of one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replay {
    /// Operation name
    pub operation: String,
    /// Calls in the order they were made
    pub calls: Vec<RecordedCall>,
}

impl Replay {
    /// Load the history of `operation` from `store`.
    ///
    /// Fails with [`Error::HistoryMismatch`] when the input and output lists
    /// differ in length. An operation with no history yields zero calls.
    pub fn load(store: &dyn KeyValueStore, operation: &str) -> Result<Self> {
        let inputs = store.lrange_all(inputs_key(operation).as_bytes())?;
        let outputs = store.lrange_all(outputs_key(operation).as_bytes())?;

        if inputs.len() != outputs.len() {
            return Err(Error::HistoryMismatch {
                operation: operation.to_string(),
                inputs: inputs.len(),
                outputs: outputs.len(),
            });
        }

        if let Some(raw) = store.get(operation.as_bytes())? {
            let counted = String::from_utf8_lossy(&raw);
            if counted.parse::<usize>().ok() != Some(inputs.len()) {
                warn!(
                    operation,
                    counter = %counted,
                    recorded = inputs.len(),
                    "call counter disagrees with recorded history"
                );
            }
        }

        let calls = inputs
            .into_iter()
            .zip(outputs)
            .map(|(args, output)| RecordedCall {
                args: String::from_utf8_lossy(&args).into_owned(),
                output: String::from_utf8_lossy(&output).into_owned(),
            })
            .collect();

        Ok(Self {
            operation: operation.to_string(),
            calls,
        })
    }

    /// Number of recorded calls.
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    /// Whether no calls were recorded.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.operation, self.calls.len())?;
        for call in &self.calls {
            writeln!(f, "{}(*{}) -> {}", self.operation, call.args, call.output)?;
        }
        Ok(())
    }
}

/// Load and render the history of `operation`.
pub fn replay(store: &dyn KeyValueStore, operation: &str) -> Result<String> {
    Ok(Replay::load(store, operation)?.to_string())
}
