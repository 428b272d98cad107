//! Live channel plumbing.
//!
//! A `LiveSource` hands out one connection at a time as an mpsc receiver;
//! the receiver closing means the connection dropped.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

use crate::error::FleetError;
use crate::live::LivePositionEvent;

/// Buffered events per connection before publishers see back-pressure.
const CONNECTION_BUFFER: usize = 1024;

// == Live Error ==
#[derive(Error, Debug)]
pub enum LiveError {
    #[error("Failed to connect live channel: {0}")]
    Connect(String),
}

// == Live Source Trait ==
#[async_trait]
pub trait LiveSource: Send + Sync + 'static {
    /// Opens a new connection. Events arrive on the receiver in order.
    async fn connect(&self) -> Result<mpsc::Receiver<LivePositionEvent>, LiveError>;
}

// == Ingest Hub ==
/// In-process live source fed by `publish`, e.g. from an HTTP ingest route.
///
/// Each `connect` opens a new channel and replaces the previous one, whose
/// receiver then closes. Nothing is replayed across connections.
#[derive(Clone, Default)]
pub struct IngestHub {
    current: Arc<RwLock<Option<mpsc::Sender<LivePositionEvent>>>>,
}

impl IngestHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards `event` to the open connection.
    pub async fn publish(&self, event: LivePositionEvent) -> Result<(), FleetError> {
        let sender = self
            .current
            .read()
            .await
            .clone()
            .ok_or_else(|| FleetError::LiveChannelUnavailable("not connected".to_string()))?;

        sender
            .send(event)
            .await
            .map_err(|_| FleetError::LiveChannelUnavailable("connection closed".to_string()))
    }

    pub async fn is_connected(&self) -> bool {
        self.current
            .read()
            .await
            .as_ref()
            .is_some_and(|sender| !sender.is_closed())
    }

    /// Drops the open connection, if any.
    pub async fn disconnect(&self) {
        if self.current.write().await.take().is_some() {
            info!("Live ingest connection closed");
        }
    }
}

#[async_trait]
impl LiveSource for IngestHub {
    async fn connect(&self) -> Result<mpsc::Receiver<LivePositionEvent>, LiveError> {
        let (tx, rx) = mpsc::channel(CONNECTION_BUFFER);
        *self.current.write().await = Some(tx);
        info!("Live ingest connection opened");
        Ok(rx)
    }
}
