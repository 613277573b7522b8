//! Invocation interceptors.
//!
//! An interceptor observes one completed call of a wrapped operation and
//! queues the writes that record it. Interceptors never touch the store
//! themselves: the cache hands them the batch that also carries the call's
//! own write, so the call and everything recorded about it commit together.
//!
//! Two interceptors are provided:
//! - [`CallCounter`]: `INCR <operation>`
//! - [`CallHistory`]: `RPUSH <operation>:inputs <args>` and
//!   `RPUSH <operation>:outputs <result>`

use tessera_core::{args_literal, Result, Value};

use crate::store::Batch;

/// One call of a wrapped operation, after it produced its result.
#[derive(Debug, Clone, Copy)]
pub struct Invocation<'a> {
    /// Qualified operation name, e.g. `Cache.store`
    pub operation: &'a str,
    /// Arguments the operation was called with
    pub args: &'a [Value],
    /// Serialized result
    pub output: &'a str,
}

/// Records something about each call of a wrapped operation.
pub trait Interceptor: Send + Sync {
    /// Queue the writes that record `call` onto `batch`.
    fn record(&self, call: &Invocation<'_>, batch: &mut Batch) -> Result<()>;
}

/// Key of the list holding the recorded inputs of `operation`.
pub fn inputs_key(operation: &str) -> String {
    format!("{}:inputs", operation)
}

/// Key of the list holding the recorded outputs of `operation`.
pub fn outputs_key(operation: &str) -> String {
    format!("{}:outputs", operation)
}

/// Counts calls in a counter keyed by the operation name.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallCounter;

impl Interceptor for CallCounter {
    fn record(&self, call: &Invocation<'_>, batch: &mut Batch) -> Result<()> {
        batch.incr(call.operation);
        Ok(())
    }
}

/// Appends each call's arguments and result to the operation's history lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallHistory;

impl Interceptor for CallHistory {
    fn record(&self, call: &Invocation<'_>, batch: &mut Batch) -> Result<()> {
        batch
            .push(inputs_key(call.operation), args_literal(call.args))
            .push(outputs_key(call.operation), call.output);
        Ok(())
    }
}
