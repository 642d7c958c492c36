//! In-process message router
//!
//! Stand-in for the host's inter-context messaging primitive. Each
//! execution context registers an endpoint and gets a `BusHandle` plus an
//! inbox of `Envelope`s. Requests flow to the background endpoint and
//! carry a one-shot reply slot; broadcasts fan out to every live tab
//! endpoint independently.
//!
//! Per-sender/per-recipient FIFO comes from the underlying mpsc channel;
//! nothing is guaranteed across senders or across broadcast recipients.

use crate::types::Message;
use parking_lot::Mutex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

const INBOX_CAPACITY: usize = 64;

/// How long a sender waits for a response before giving up and resolving
/// to "no response". Bounds `send` so it can never hang on a handler that
/// forgot to reply.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(3);

/// One inbound message plus an optional reply slot.
///
/// A `None` reply means the sender is not waiting (broadcast or
/// fire-and-forget); handlers drop the slot to signal "no response".
pub struct Envelope {
    pub message: Value,
    pub reply: Option<oneshot::Sender<Value>>,
}

/// Which role an endpoint plays on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointKind {
    Background,
    Tab,
    Popup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct EndpointId(u64);

struct RouterInner {
    background: Mutex<Option<(EndpointId, mpsc::Sender<Envelope>)>>,
    tabs: Mutex<HashMap<EndpointId, mpsc::Sender<Envelope>>>,
    next_id: AtomicU64,
    request_timeout: Duration,
}

/// Shared router; clones refer to the same endpoint table.
#[derive(Clone)]
pub struct MessageRouter {
    inner: Arc<RouterInner>,
}

impl MessageRouter {
    pub fn new() -> MessageRouter {
        MessageRouter::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn with_timeout(request_timeout: Duration) -> MessageRouter {
        MessageRouter {
            inner: Arc::new(RouterInner {
                background: Mutex::new(None),
                tabs: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
                request_timeout,
            }),
        }
    }

    /// Register the background endpoint. A later registration replaces an
    /// earlier one (the host restarts its service worker the same way).
    pub fn register_background(&self) -> (BusHandle, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
        let id = self.next_endpoint_id();
        *self.inner.background.lock() = Some((id, tx));
        (self.handle(id, EndpointKind::Background), rx)
    }

    /// Register a tab endpoint; it receives background broadcasts.
    pub fn register_tab(&self) -> (BusHandle, mpsc::Receiver<Envelope>) {
        let (tx, rx) = mpsc::channel(INBOX_CAPACITY);
        let id = self.next_endpoint_id();
        self.inner.tabs.lock().insert(id, tx);
        (self.handle(id, EndpointKind::Tab), rx)
    }

    /// Register a popup endpoint. Popups only originate requests, so no
    /// inbox is handed out and broadcasts do not reach them.
    pub fn register_popup(&self) -> BusHandle {
        let id = self.next_endpoint_id();
        self.handle(id, EndpointKind::Popup)
    }

    fn next_endpoint_id(&self) -> EndpointId {
        EndpointId(self.inner.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn handle(&self, id: EndpointId, kind: EndpointKind) -> BusHandle {
        BusHandle {
            inner: Arc::clone(&self.inner),
            id,
            kind,
        }
    }
}

impl Default for MessageRouter {
    fn default() -> Self {
        MessageRouter::new()
    }
}

/// A context's connection to the bus. Dropping the handle unregisters
/// the endpoint.
pub struct BusHandle {
    inner: Arc<RouterInner>,
    id: EndpointId,
    kind: EndpointKind,
}

impl BusHandle {
    pub fn kind(&self) -> EndpointKind {
        self.kind
    }

    /// Send a request to the background context and wait for its reply.
    ///
    /// Resolves to `None` - never an error - when there is no background
    /// endpoint, its inbox is closed, the handler declined to respond, or
    /// the timeout elapsed. Callers always get a stable shape back and
    /// decide their own fallback.
    pub async fn send(&self, message: &Message) -> Option<Value> {
        self.send_raw(message.to_value()).await
    }

    /// Send a raw JSON envelope. The wire is only "an object with a
    /// `type` field", so a newer sender may carry tags this build does
    /// not know; recipients answer those with a structured rejection.
    pub async fn send_raw(&self, message: Value) -> Option<Value> {
        let target = {
            let background = self.inner.background.lock();
            background.as_ref().map(|(_, tx)| tx.clone())
        };
        let Some(target) = target else {
            debug!("send: no background endpoint registered");
            return None;
        };

        let (reply_tx, reply_rx) = oneshot::channel();
        let envelope = Envelope {
            message,
            reply: Some(reply_tx),
        };
        if target.send(envelope).await.is_err() {
            debug!("send: background inbox closed");
            return None;
        }

        match tokio::time::timeout(self.inner.request_timeout, reply_rx).await {
            Ok(Ok(response)) => Some(response),
            Ok(Err(_)) => {
                // Handler dropped the reply slot: deliberate "no response".
                None
            }
            Err(_) => {
                warn!("send: request timed out waiting for background response");
                None
            }
        }
    }

    /// Fan a message out to every live tab endpoint (background only).
    ///
    /// Failures are per-destination: a tab closed mid-flight is logged
    /// and skipped without aborting delivery to the others.
    pub fn broadcast(&self, message: &Message) {
        if self.kind != EndpointKind::Background {
            warn!("broadcast called from a non-background endpoint; ignoring");
            return;
        }

        let targets: Vec<(EndpointId, mpsc::Sender<Envelope>)> = self
            .inner
            .tabs
            .lock()
            .iter()
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let value = message.to_value();
        for (id, target) in targets {
            let envelope = Envelope {
                message: value.clone(),
                reply: None,
            };
            if let Err(err) = target.try_send(envelope) {
                debug!("broadcast: could not deliver to tab {id:?}: {err}");
            }
        }
    }
}

impl Drop for BusHandle {
    fn drop(&mut self) {
        match self.kind {
            EndpointKind::Background => {
                let mut background = self.inner.background.lock();
                if background.as_ref().is_some_and(|(id, _)| *id == self.id) {
                    *background = None;
                }
            }
            EndpointKind::Tab => {
                self.inner.tabs.lock().remove(&self.id);
            }
            EndpointKind::Popup => {}
        }
    }
}
