//! Call History Wrapper
//!
//! Records the arguments and result of every call to an operation as two
//! parallel lists in the shared store.

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::Operation;
use crate::error::Result;
use crate::store::{read_counter, KeyValueStore, SharedStore};

/// List key holding serialized arguments for `name`.
pub fn inputs_key(name: &str) -> String {
    format!("{name}:inputs")
}

/// List key holding serialized results for `name`.
pub fn outputs_key(name: &str) -> String {
    format!("{name}:outputs")
}

/// Output entry written in place of a result when the call failed.
/// `serde_json` never renders a value as empty text.
pub const FAILED_OUTPUT: &[u8] = b"";

// == Call History ==
/// Wraps an operation and appends `serde_json` text of its arguments to
/// `{name}:inputs` before the call and of its result to `{name}:outputs`
/// after it.
///
/// When the inner call fails the input entry stays and `FAILED_OUTPUT`
/// takes the place of the result, keeping both lists aligned by position.
/// The error is returned unchanged.
pub struct CallHistory<O> {
    store: SharedStore,
    inner: O,
}

impl<O> CallHistory<O> {
    pub fn new(store: SharedStore, inner: O) -> Self {
        Self { store, inner }
    }

    /// Returns the wrapped operation.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<A, O> Operation<A> for CallHistory<O>
where
    A: Serialize + Send + 'static,
    O: Operation<A>,
    O::Output: Serialize,
{
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, args: A) -> Result<O::Output> {
        let name = self.inner.name();

        let input = serde_json::to_string(&args)?;
        self.store
            .append_to_list(&inputs_key(name), input.into_bytes())
            .await?;

        let output = match self.inner.call(args).await {
            Ok(output) => output,
            Err(err) => {
                if let Err(marker_err) = self
                    .store
                    .append_to_list(&outputs_key(name), FAILED_OUTPUT.to_vec())
                    .await
                {
                    warn!(operation = name, error = %marker_err, "Failed to mark failed call");
                }
                return Err(err);
            }
        };

        let rendered = serde_json::to_string(&output)?;
        self.store
            .append_to_list(&outputs_key(name), rendered.into_bytes())
            .await?;
        debug!(operation = name, "Recorded call history");

        Ok(output)
    }
}

// == History Status ==
/// Sizes of the counter and both history lists for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoryStatus {
    /// Counter value, 0 when the counter key is absent
    pub calls: u64,
    /// Number of recorded inputs
    pub inputs: usize,
    /// Number of recorded results, failed calls excluded
    pub outputs: usize,
}

impl HistoryStatus {
    /// True when the counter and both lists agree.
    ///
    /// Only meaningful with both wrappers applied and no call in flight.
    /// A failed inner call, or a crash between the wrappers' writes,
    /// leaves them apart.
    pub fn is_consistent(&self) -> bool {
        self.calls as usize == self.inputs && self.inputs == self.outputs
    }
}

/// Reads the counter and history list lengths for `name`.
pub async fn history_status(store: &dyn KeyValueStore, name: &str) -> Result<HistoryStatus> {
    let calls = read_counter(store, name).await?.unwrap_or(0);
    let inputs = store.read_list(&inputs_key(name), 0, -1).await?.len();
    let outputs = store
        .read_list(&outputs_key(name), 0, -1)
        .await?
        .iter()
        .filter(|output| output.as_slice() != FAILED_OUTPUT)
        .count();

    Ok(HistoryStatus {
        calls,
        inputs,
        outputs,
    })
}
