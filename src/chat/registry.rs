//! Client registry with broadcast delivery.
//!
//! Every connected client owns a bounded outbox channel. Broadcasting
//! copies the current set of outboxes under the lock and delivers after
//! releasing it, so registrations and removals never wait on delivery.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use tokio::sync::mpsc::{self, error::TrySendError};
use tracing::debug;

use super::names::generate_display_name;

/// Maximum number of undelivered messages buffered per client.
pub const OUTBOX_CAPACITY: usize = 256;

/// Identifier of a registered client.
pub type ClientId = u64;

/// Receiving end of a client's outbound messages.
pub type Outbox = mpsc::Receiver<String>;

/// Handle to a registered client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientHandle {
    id: ClientId,
    name: String,
}

impl ClientHandle {
    /// Get the client ID.
    pub fn id(&self) -> ClientId {
        self.id
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// A registered client.
struct ClientEntry {
    name: String,
    sender: mpsc::Sender<String>,
}

/// Registry of connected clients.
///
/// Shared across all connections.
pub struct ClientRegistry {
    next_id: AtomicU64,
    clients: RwLock<HashMap<ClientId, ClientEntry>>,
}

impl ClientRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            clients: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new client with a generated display name.
    pub fn register(&self) -> (ClientHandle, Outbox) {
        self.register_named(generate_display_name())
    }

    /// Register a new client with the given display name.
    ///
    /// Every call creates a new entry, even for a name already in use.
    pub fn register_named(&self, name: impl Into<String>) -> (ClientHandle, Outbox) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let name = name.into();
        let (sender, outbox) = mpsc::channel(OUTBOX_CAPACITY);

        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                id,
                ClientEntry {
                    name: name.clone(),
                    sender,
                },
            );

        (ClientHandle { id, name }, outbox)
    }

    /// Register a new client whose registration ends when the guard drops.
    pub fn join(self: &Arc<Self>) -> (RegisteredClient, Outbox) {
        let (handle, outbox) = self.register();
        (
            RegisteredClient {
                registry: Arc::clone(self),
                handle,
            },
            outbox,
        )
    }

    /// Remove a client.
    ///
    /// Returns true if the client was removed, false if it was not registered.
    pub fn unregister(&self, handle: &ClientHandle) -> bool {
        self.clients
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&handle.id)
            .is_some()
    }

    /// Deliver `text` to every registered client, the sender included.
    ///
    /// Clients whose outbox is closed or full are skipped.
    ///
    /// Returns the number of clients the message was delivered to.
    pub fn broadcast_all(&self, text: &str) -> usize {
        let snapshot: Vec<(ClientId, mpsc::Sender<String>)> = self
            .clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(id, entry)| (*id, entry.sender.clone()))
            .collect();

        let mut delivered = 0;
        for (id, sender) in snapshot {
            match sender.try_send(text.to_string()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => debug!("Outbox of client {} is full", id),
                Err(TrySendError::Closed(_)) => debug!("Client {} is gone", id),
            }
        }
        delivered
    }

    /// Get the number of registered clients.
    pub fn len(&self) -> usize {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Check if no client is registered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the display names of all registered clients.
    pub fn names(&self) -> Vec<String> {
        self.clients
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(|entry| entry.name.clone())
            .collect()
    }
}

impl Default for ClientRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// A client registration that is removed from the registry on drop.
pub struct RegisteredClient {
    registry: Arc<ClientRegistry>,
    handle: ClientHandle,
}

impl RegisteredClient {
    /// Get the client handle.
    pub fn handle(&self) -> &ClientHandle {
        &self.handle
    }

    /// Get the display name.
    pub fn name(&self) -> &str {
        self.handle.name()
    }
}

impl Drop for RegisteredClient {
    fn drop(&mut self) {
        self.registry.unregister(&self.handle);
    }
}
