//! Fetch Module
//!
//! The pull side of the fleet service: one full snapshot per entity type.

mod http;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::cache::{EntityRecord, EntityType};

pub use http::HttpFetcher;

// == Fetch Error ==
/// Why a pull failed. Recorded into `CacheMetadata::error`, never returned
/// to refresh callers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(String),

    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid response: {0}")]
    Decode(String),

    #[error("network timeout after {0:?}")]
    Timeout(Duration),

    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

// == Fetcher Trait ==
#[async_trait]
pub trait Fetcher: Send + Sync + 'static {
    /// Pull the current full set of records for `entity_type`.
    async fn fetch(&self, entity_type: EntityType) -> Result<Vec<EntityRecord>, FetchError>;
}

// == Timeout Fetcher ==
/// Bounds every fetch of the wrapped fetcher; an elapsed timeout is a failure.
pub struct TimeoutFetcher<F> {
    inner: F,
    timeout: Duration,
}

impl<F: Fetcher> TimeoutFetcher<F> {
    pub fn new(inner: F, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<F: Fetcher> Fetcher for TimeoutFetcher<F> {
    async fn fetch(&self, entity_type: EntityType) -> Result<Vec<EntityRecord>, FetchError> {
        match tokio::time::timeout(self.timeout, self.inner.fetch(entity_type)).await {
            Ok(result) => result,
            Err(_) => Err(FetchError::Timeout(self.timeout)),
        }
    }
}
