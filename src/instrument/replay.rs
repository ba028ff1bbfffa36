//! Replay Engine
//!
//! Rebuilds the execution trace of an instrumented operation from its
//! counter and history lists.

use std::fmt;

use serde::Serialize;

use super::history::{inputs_key, outputs_key, FAILED_OUTPUT};
use crate::error::{CacheError, Result};
use crate::store::{read_counter, KeyValueStore};

// == Call Record ==
/// One recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRecord {
    /// Serialized arguments
    pub input: String,
    /// Serialized result, `None` when the call failed or is in flight
    pub output: Option<String>,
}

// == Replay ==
/// Ordered trace of an operation, oldest call first.
///
/// Renders as
///
/// ```text
/// Cache.store was called 2 times:
/// Cache.store("foo") -> "9d6d4c2e-..."
/// Cache.store(42) -> "f0c1a6b8-..."
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Replay {
    pub operation: String,
    pub calls: u64,
    pub entries: Vec<CallRecord>,
}

impl Replay {
    /// Writes the trace to stdout.
    pub fn print(&self) {
        print!("{self}");
    }
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} was called {} times:", self.operation, self.calls)?;
        for entry in &self.entries {
            match &entry.output {
                Some(output) => writeln!(f, "{}({}) -> {}", self.operation, entry.input, output)?,
                None => writeln!(f, "{}({}) -> <no result>", self.operation, entry.input)?,
            }
        }
        Ok(())
    }
}

/// Reads the trace of `operation`.
///
/// Fails with `NoHistoryRecorded` when the operation was never counted.
/// Inputs and outputs pair up by position. A failed call, or one still in
/// flight at the tail, shows no result. Never writes to the store.
pub async fn replay(store: &dyn KeyValueStore, operation: &str) -> Result<Replay> {
    let calls = match read_counter(store, operation).await? {
        Some(calls) if calls > 0 => calls,
        _ => return Err(CacheError::NoHistoryRecorded(operation.to_string())),
    };

    let inputs = store.read_list(&inputs_key(operation), 0, -1).await?;
    let mut outputs = store
        .read_list(&outputs_key(operation), 0, -1)
        .await?
        .into_iter();

    let entries = inputs
        .into_iter()
        .map(|input| CallRecord {
            input: String::from_utf8_lossy(&input).into_owned(),
            output: outputs
                .next()
                .filter(|output| output.as_slice() != FAILED_OUTPUT)
                .map(|output| String::from_utf8_lossy(&output).into_owned()),
        })
        .collect();

    Ok(Replay {
        operation: operation.to_string(),
        calls,
        entries,
    })
}
