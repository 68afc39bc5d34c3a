//! Task spawning and timer abstractions for the async runtime.
//! **Note**: at the moment, these are simple functions with baked-in tokio-based
//! implementation.

pub use impls::{JoinHandle, spawn, with_timeout};

#[cfg(feature = "tokio")]
mod impls {
    use std::{future::Future, time::Duration};

    pub type JoinHandle<T> = tokio::task::JoinHandle<T>;

    pub fn spawn<F>(future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::task::spawn(future)
    }

    /// Runs `future` to completion, or returns `None` once `timeout` elapses.
    pub async fn with_timeout<F: Future>(timeout: Duration, future: F) -> Option<F::Output> {
        tokio::time::timeout(timeout, future).await.ok()
    }
}
