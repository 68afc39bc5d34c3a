//! *Metadata source* abstraction: the client-side component able to ask a
//! live cluster for its secondary-index definitions.
//!
//! Transport, authentication and retries belong to the implementor. The cache
//! only issues [`MetadataSource::fetch_index_metadata`] and parses the reply.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use sindex_common::{Result, async_runtime, error::Error};

/// Issues the administrative "list indexes" command against a cluster.
#[async_trait]
pub trait MetadataSource: Send + Sync + 'static {
    /// Returns the raw info response (see [`crate::parser`] for its layout).
    ///
    /// Failures must be reported as connectivity errors
    /// ([`Error::is_connectivity`]).
    async fn fetch_index_metadata(&self) -> Result<String>;
}

#[async_trait]
impl<S: MetadataSource + ?Sized> MetadataSource for Arc<S> {
    async fn fetch_index_metadata(&self) -> Result<String> {
        self.as_ref().fetch_index_metadata().await
    }
}

/// A source replying with a fixed response. Useful for tests and for
/// embedding a known index layout.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    response: String,
}

impl StaticSource {
    pub fn new(response: impl Into<String>) -> StaticSource {
        StaticSource {
            response: response.into(),
        }
    }
}

#[async_trait]
impl MetadataSource for StaticSource {
    async fn fetch_index_metadata(&self) -> Result<String> {
        Ok(self.response.clone())
    }
}

/// Bounds every fetch of the inner source by `timeout`.
pub struct TimeoutSource<S> {
    inner: S,
    timeout: Duration,
}

impl<S: MetadataSource> TimeoutSource<S> {
    pub fn new(inner: S, timeout: Duration) -> TimeoutSource<S> {
        TimeoutSource { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<S: MetadataSource> MetadataSource for TimeoutSource<S> {
    async fn fetch_index_metadata(&self) -> Result<String> {
        async_runtime::with_timeout(self.timeout, self.inner.fetch_index_metadata())
            .await
            .ok_or_else(|| Error::timeout("fetch index metadata", self.timeout))?
    }
}
