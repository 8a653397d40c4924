use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::models::CartItem;

/// Quiet period before a cart snapshot is flushed.
pub const SYNC_DEBOUNCE: Duration = Duration::from_secs(5);

/// Destination for flushed cart snapshots.
pub trait SyncSink: Send + Sync + 'static {
    fn deliver(
        &self,
        items: Vec<CartItem>,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

/// Best-effort mirroring of the live cart to the abandoned-cart endpoint.
/// Each change reschedules a single pending flush; rapid edits collapse into
/// one delivery. Failures are logged, never surfaced: this is a recovery
/// aid, not a backup the shopper depends on.
pub struct CartSync<S: SyncSink> {
    sink: Arc<S>,
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl<S: SyncSink> CartSync<S> {
    pub fn new(sink: S) -> Self {
        Self::with_delay(sink, SYNC_DEBOUNCE)
    }

    pub fn with_delay(sink: S, delay: Duration) -> Self {
        Self {
            sink: Arc::new(sink),
            delay,
            pending: Mutex::new(None),
        }
    }

    /// Called on every cart mutation: cancel any pending flush and schedule a
    /// new one after the debounce window.
    pub fn on_change(&self, items: Vec<CartItem>) {
        let sink = Arc::clone(&self.sink);
        let delay = self.delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = sink.deliver(items).await {
                tracing::warn!(error = %err, "cart sync failed");
            }
        });

        let mut pending = self.pending.lock().expect("sync timer lock poisoned");
        if let Some(previous) = pending.replace(handle) {
            previous.abort();
        }
    }

    /// Cancel any pending flush (component teardown).
    pub fn cancel(&self) {
        if let Some(handle) = self.pending.lock().expect("sync timer lock poisoned").take() {
            handle.abort();
        }
    }
}

impl<S: SyncSink> Drop for CartSync<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Posts snapshots to the server's cart-sync endpoint. Guests carry no token;
/// the server treats them as a no-op.
#[derive(Clone)]
pub struct HttpSyncSink {
    client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
}

impl HttpSyncSink {
    pub fn new(endpoint: impl Into<String>, token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
            token,
        }
    }
}

impl SyncSink for HttpSyncSink {
    async fn deliver(&self, items: Vec<CartItem>) -> anyhow::Result<()> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "items": items }));
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }
        let response = request.send().await?;
        response.error_for_status()?;
        Ok(())
    }
}
