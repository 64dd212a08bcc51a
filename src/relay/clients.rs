//! Live set of connected game clients.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{RwLock, mpsc};
use tracing::debug;

/// Outbound text frames queued for one client session. The session owns the
/// receiving half; the registry keeps the sending half.
pub type ClientSender = mpsc::UnboundedSender<Arc<str>>;

/// Identity of a client connection, assigned on connect.
pub type ClientId = u64;

/// Connected game clients in connection order.
///
/// Ids grow monotonically, so ordering the map by id preserves insertion
/// order for broadcast iteration.
#[derive(Debug)]
pub struct ClientRegistry {
    live: RwLock<BTreeMap<ClientId, ClientSender>>,
    next_id: AtomicU64,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self {
            live: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Add a new connection to the live set, returning (client_id, receiver).
    pub async fn connect(&self) -> (ClientId, mpsc::UnboundedReceiver<Arc<str>>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (tx, rx) = mpsc::unbounded_channel();

        self.live.write().await.insert(id, tx);

        debug!(client_id = id, "client added to live set");
        (id, rx)
    }

    /// Remove a connection by identity. Returns `false` when it was not
    /// tracked, in which case nothing changes.
    pub async fn disconnect(&self, client_id: ClientId) -> bool {
        let removed = self.live.write().await.remove(&client_id).is_some();
        if removed {
            debug!(client_id, "client removed from live set");
        }
        removed
    }

    /// Senders of every live connection at call time, in connection order.
    async fn snapshot(&self) -> Vec<(ClientId, ClientSender)> {
        let live = self.live.read().await;
        live.iter().map(|(&id, tx)| (id, tx.clone())).collect()
    }

    /// Queue `text` for every client live at call time. Returns how many
    /// sessions accepted it; a session that is already gone is skipped.
    pub async fn send_all(&self, text: &str) -> usize {
        let frame: Arc<str> = Arc::from(text);
        let mut delivered = 0;
        for (id, tx) in self.snapshot().await {
            if tx.send(frame.clone()).is_ok() {
                delivered += 1;
            } else {
                debug!(client_id = id, "dropped frame for closing client");
            }
        }
        delivered
    }

    pub async fn len(&self) -> usize {
        self.live.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.live.read().await.is_empty()
    }

    pub async fn contains(&self, client_id: ClientId) -> bool {
        self.live.read().await.contains_key(&client_id)
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
