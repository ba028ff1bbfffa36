//! Call Instrumentation Module
//!
//! Wrappers that record how often an operation runs and with what
//! arguments and results, and the replay engine that reads it back.
//!
//! Wrappers nest: `CallHistory::new(store, CountCalls::new(store, op))`
//! records history outside and counts inside. Either order keeps the
//! operation's signature and errors unchanged; only the side effects that
//! survive an inner failure differ.

mod count;
mod history;
mod operation;
mod replay;

pub use count::CountCalls;
pub use history::{
    history_status, inputs_key, outputs_key, CallHistory, HistoryStatus, FAILED_OUTPUT,
};
pub use operation::{FnOperation, Operation};
pub use replay::{replay, CallRecord, Replay};

use crate::store::SharedStore;

// == Instrument ==
/// Builder-style access to the wrappers.
///
/// ```ignore
/// let op = FnOperation::new("lookup", lookup)
///     .counted(store.clone())
///     .recorded(store.clone());
/// ```
pub trait Instrument: Sized {
    /// Wraps `self` in a call counter.
    fn counted(self, store: SharedStore) -> CountCalls<Self> {
        CountCalls::new(store, self)
    }

    /// Wraps `self` in a history recorder.
    fn recorded(self, store: SharedStore) -> CallHistory<Self> {
        CallHistory::new(store, self)
    }
}

impl<O: Send + Sync> Instrument for O {}
