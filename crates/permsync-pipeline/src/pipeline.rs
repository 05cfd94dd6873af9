//! The deferred computation wrapper.
//!
//! A [`Pipeline`] holds a thunk producing a `Result` future. Nothing runs
//! until [`Pipeline::run`] is invoked; invoking `run()` again re-executes the
//! deferred function from the start (the only restart semantic offered).
//! Stages chained with `map`/`and_then` start only after their predecessor's
//! value has resolved.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use std::sync::Arc;

use crate::fault::{panic_detail, Fault};

type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;
type Thunk<T, E> = Arc<dyn Fn() -> BoxFuture<Result<T, E>> + Send + Sync>;

/// A lazily evaluated, composable `Result` computation.
pub struct Pipeline<T, E> {
    thunk: Thunk<T, E>,
}

impl<T, E> Clone for Pipeline<T, E> {
    fn clone(&self) -> Self {
        Self {
            thunk: Arc::clone(&self.thunk),
        }
    }
}

impl<T, E> Pipeline<T, E>
where
    T: Send + 'static,
    E: Fault,
{
    /// Wrap a deferred computation. `f` is not invoked until `run()`.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
    {
        Self {
            thunk: Arc::new(move || Box::pin(f())),
        }
    }

    /// A pipeline that resolves immediately to a success.
    pub fn ready(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::new(move || {
            let value = value.clone();
            async move { Ok(value) }
        })
    }

    /// A pipeline that resolves immediately to a failure.
    pub fn fail(error: E) -> Self
    where
        E: Clone + Sync,
    {
        Self::new(move || {
            let error = error.clone();
            async move { Err(error) }
        })
    }

    /// Transform the success value. A failure passes through unchanged.
    pub fn map<U, F>(self, f: F) -> Pipeline<U, E>
    where
        U: Send + 'static,
        F: Fn(T) -> U + Send + Sync + 'static,
    {
        let thunk = self.thunk;
        let f = Arc::new(f);
        Pipeline {
            thunk: Arc::new(move || {
                let fut = (thunk)();
                let f = Arc::clone(&f);
                Box::pin(async move { fut.await.map(|v| (f)(v)) })
            }),
        }
    }

    /// Chain into another pipeline on success.
    ///
    /// Panics raised while invoking `f` or inside the nested pipeline are
    /// captured by `run()`, never propagated as uncaught faults.
    pub fn and_then<U, F>(self, f: F) -> Pipeline<U, E>
    where
        U: Send + 'static,
        F: Fn(T) -> Pipeline<U, E> + Send + Sync + 'static,
    {
        let thunk = self.thunk;
        let f = Arc::new(f);
        Pipeline {
            thunk: Arc::new(move || {
                let fut = (thunk)();
                let f = Arc::clone(&f);
                Box::pin(async move {
                    match fut.await {
                        Ok(v) => {
                            let next = (f)(v);
                            (next.thunk)().await
                        }
                        Err(e) => Err(e),
                    }
                })
            }),
        }
    }

    /// Run a side effect on success only. A panic inside the side effect
    /// converts the pipeline to a failure via [`Fault::from_panic`].
    pub fn tap<F>(self, f: F) -> Pipeline<T, E>
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let thunk = self.thunk;
        let f = Arc::new(f);
        Pipeline {
            thunk: Arc::new(move || {
                let fut = (thunk)();
                let f = Arc::clone(&f);
                Box::pin(async move {
                    let v = fut.await?;
                    match panic::catch_unwind(AssertUnwindSafe(|| (f)(&v))) {
                        Ok(()) => Ok(v),
                        Err(payload) => Err(E::from_panic(panic_detail(payload))),
                    }
                })
            }),
        }
    }

    /// On failure, compute a replacement value.
    ///
    /// A fault inside `f` (a panic or a returned failure) produces the
    /// distinguished [`Fault::recovery_failed`] error, never a silent swallow.
    pub fn recover<F>(self, f: F) -> Pipeline<T, E>
    where
        E: std::fmt::Display,
        F: Fn(E) -> Result<T, E> + Send + Sync + 'static,
    {
        let thunk = self.thunk;
        let f = Arc::new(f);
        Pipeline {
            thunk: Arc::new(move || {
                let fut = (thunk)();
                let f = Arc::clone(&f);
                Box::pin(async move {
                    match fut.await {
                        Ok(v) => Ok(v),
                        Err(e) => match panic::catch_unwind(AssertUnwindSafe(|| (f)(e))) {
                            Ok(Ok(v)) => Ok(v),
                            Ok(Err(cause)) => Err(E::recovery_failed(cause.to_string())),
                            Err(payload) => Err(E::recovery_failed(panic_detail(payload))),
                        },
                    }
                })
            }),
        }
    }

    /// Execute the deferred computation and return its `Result`.
    ///
    /// Never panics across this boundary: a panic anywhere in the chain is
    /// captured and returned as [`Fault::from_panic`]. Calling `run()` again
    /// re-executes the chain from the start.
    pub async fn run(&self) -> Result<T, E> {
        let fut = (self.thunk)();
        match tokio::spawn(fut).await {
            Ok(result) => result,
            Err(join_err) if join_err.is_panic() => {
                Err(E::from_panic(panic_detail(join_err.into_panic())))
            }
            Err(_) => Err(E::from_panic("pipeline task cancelled".to_string())),
        }
    }
}
