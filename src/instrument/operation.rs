//! Operation Module
//!
//! The unit that instrumentation wrappers decorate.

use std::future::Future;

use async_trait::async_trait;

use crate::error::Result;

// == Operation ==
/// A named async call taking `A` and producing `Output`.
///
/// Multi-argument operations take a tuple. Wrappers implement this same
/// trait, so a wrapped operation is a drop-in for the one it wraps.
#[async_trait]
pub trait Operation<A: Send + 'static>: Send + Sync {
    type Output: Send + 'static;

    /// Stable identity used for counter and history keys.
    fn name(&self) -> &str;

    async fn call(&self, args: A) -> Result<Self::Output>;
}

// == Fn Operation ==
/// Adapts a named async closure into an `Operation`.
pub struct FnOperation<F> {
    name: String,
    f: F,
}

impl<F> FnOperation<F> {
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

#[async_trait]
impl<A, R, F, Fut> Operation<A> for FnOperation<F>
where
    A: Send + 'static,
    R: Send + 'static,
    F: Fn(A) -> Fut + Send + Sync,
    Fut: Future<Output = Result<R>> + Send + 'static,
{
    type Output = R;

    fn name(&self) -> &str {
        &self.name
    }

    async fn call(&self, args: A) -> Result<R> {
        (self.f)(args).await
    }
}
