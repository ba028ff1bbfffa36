//! Call Counting Wrapper
//!
//! Counts invocations of an operation in the shared store.

use async_trait::async_trait;
use tracing::debug;

use super::Operation;
use crate::error::Result;
use crate::store::SharedStore;

// == Count Calls ==
/// Wraps an operation and increments the counter keyed by its name before
/// every call.
///
/// The increment happens before the inner call and is kept if that call
/// fails. Arguments are not recorded.
pub struct CountCalls<O> {
    store: SharedStore,
    inner: O,
}

impl<O> CountCalls<O> {
    pub fn new(store: SharedStore, inner: O) -> Self {
        Self { store, inner }
    }

    /// Returns the wrapped operation.
    pub fn inner(&self) -> &O {
        &self.inner
    }
}

#[async_trait]
impl<A, O> Operation<A> for CountCalls<O>
where
    A: Send + 'static,
    O: Operation<A>,
{
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, args: A) -> Result<O::Output> {
        let calls = self.store.increment(self.inner.name()).await?;
        debug!(operation = self.inner.name(), calls, "Counted call");

        self.inner.call(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::error::CacheError;
    use crate::instrument::FnOperation;
    use crate::store::{read_counter, MemoryStore};

    #[tokio::test]
    async fn test_counts_each_call() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let echo = CountCalls::new(
            store.clone(),
            FnOperation::new("echo", |s: String| async move { Ok::<_, CacheError>(s) }),
        );

        for _ in 0..3 {
            echo.call("hi".to_string()).await.unwrap();
        }

        assert_eq!(read_counter(store.as_ref(), "echo").await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn test_counts_failed_calls_and_propagates_error() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let failing = CountCalls::new(
            store.clone(),
            FnOperation::new("failing", |_: ()| async move {
                Err::<(), _>(CacheError::FetchFailed("upstream down".to_string()))
            }),
        );

        let result = failing.call(()).await;

        assert!(matches!(result, Err(CacheError::FetchFailed(msg)) if msg == "upstream down"));
        assert_eq!(read_counter(store.as_ref(), "failing").await.unwrap(), Some(1));
    }

    #[tokio::test]
    async fn test_name_is_forwarded() {
        let store: SharedStore = Arc::new(MemoryStore::new());
        let op = CountCalls::new(
            store,
            FnOperation::new("Cache.store", |_: ()| async move { Ok::<_, CacheError>(()) }),
        );

        assert_eq!(Operation::<()>::name(&op), "Cache.store");
        assert_eq!(Operation::<()>::name(op.inner()), "Cache.store");
    }
}
