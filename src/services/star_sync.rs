//! Remote star-service synchronization.
//!
//! Starring and unstarring commit locally first; the remote service is updated
//! by a background worker draining an explicit queue. Delivery is retried with
//! backoff and a failure is logged, never surfaced to the state commit — the
//! remote record is eventually consistent with local bookmark state.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::types::errors::SyncError;

/// Attempts per request before the worker gives up and logs the failure.
pub const SYNC_MAX_ATTEMPTS: u32 = 3;

/// Delay before the first retry; doubled on each subsequent attempt.
pub const SYNC_RETRY_BASE: Duration = Duration::from_millis(250);

/// Transport seam for the remote star service.
#[async_trait]
pub trait StarTransport: Send + Sync {
    async fn star(&self, url: &str, session_id: &str) -> Result<(), SyncError>;
    async fn unstar(&self, url: &str, session_id: &str) -> Result<(), SyncError>;
}

/// Builds the star endpoint for one location: `{base}/stars/{url-encoded url}`.
pub fn stars_endpoint(base_url: &str, url: &str) -> String {
    format!(
        "{}/stars/{}",
        base_url.trim_end_matches('/'),
        urlencoding::encode(url)
    )
}

/// HTTP transport: POST to star, DELETE (with the session in the body) to unstar.
pub struct HttpStarTransport {
    base_url: String,
    client: reqwest::Client,
}

impl HttpStarTransport {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn check_status(response: reqwest::Response) -> Result<(), SyncError> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SyncError::ServiceStatus(status.as_u16()))
        }
    }
}

#[async_trait]
impl StarTransport for HttpStarTransport {
    async fn star(&self, url: &str, session_id: &str) -> Result<(), SyncError> {
        let response = self
            .client
            .post(stars_endpoint(&self.base_url, url))
            .json(&json!({ "session": session_id }))
            .send()
            .await
            .map_err(|e| SyncError::NetworkError(e.to_string()))?;
        Self::check_status(response)
    }

    async fn unstar(&self, url: &str, session_id: &str) -> Result<(), SyncError> {
        let response = self
            .client
            .delete(stars_endpoint(&self.base_url, url))
            .json(&json!({ "session": session_id }))
            .send()
            .await
            .map_err(|e| SyncError::NetworkError(e.to_string()))?;
        Self::check_status(response)
    }
}

/// One queued synchronization request.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncRequest {
    Star { url: String, session_id: String },
    Unstar { url: String, session_id: String },
}

/// Handle to the background sync worker.
///
/// Enqueueing never blocks and never fails the caller; the worker owns
/// delivery. Dropping every handle shuts the worker down once the queue
/// drains.
#[derive(Clone)]
pub struct SyncQueue {
    tx: mpsc::UnboundedSender<SyncRequest>,
}

impl SyncQueue {
    /// Spawns the worker task and returns the queue handle plus the worker's
    /// join handle (awaited in tests to observe drain).
    pub fn spawn(transport: Arc<dyn StarTransport>) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_worker(transport, rx));
        (Self { tx }, worker)
    }

    /// Queues one request for delivery. Fire-and-forget.
    pub fn enqueue(&self, request: SyncRequest) {
        if self.tx.send(request).is_err() {
            error!("star sync worker is gone, dropping request");
        }
    }
}

async fn run_worker(transport: Arc<dyn StarTransport>, mut rx: mpsc::UnboundedReceiver<SyncRequest>) {
    while let Some(request) = rx.recv().await {
        deliver(transport.as_ref(), &request).await;
    }
}

/// Delivers one request with bounded retries and exponential backoff.
async fn deliver(transport: &dyn StarTransport, request: &SyncRequest) {
    let mut delay = SYNC_RETRY_BASE;
    for attempt in 1..=SYNC_MAX_ATTEMPTS {
        let result = match request {
            SyncRequest::Star { url, session_id } => transport.star(url, session_id).await,
            SyncRequest::Unstar { url, session_id } => transport.unstar(url, session_id).await,
        };
        match result {
            Ok(()) => return,
            Err(err) if attempt < SYNC_MAX_ATTEMPTS => {
                warn!(attempt, %err, "star sync attempt failed, retrying");
                tokio::time::sleep(delay).await;
                delay *= 2;
            }
            Err(err) => {
                error!(%err, ?request, "star sync failed after {} attempts", SYNC_MAX_ATTEMPTS);
            }
        }
    }
}
