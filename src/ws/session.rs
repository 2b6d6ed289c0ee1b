use std::collections::HashMap;

use tracing::{debug, warn};

use super::conn::{ConnHandle, ConnId};
use super::documents::DocumentRegistry;
use super::pending::PendingAccess;
use crate::models::{DocumentSummary, SendMessage};

/// All signaling state of the process: live connections, open documents and
/// pending access requests. Mutated only through `&mut self`, so callers
/// serialize access by holding it behind a single lock.
#[derive(Debug)]
pub struct SessionManager {
    conns: HashMap<ConnId, ConnHandle>,
    documents: DocumentRegistry,
    pending: PendingAccess,
}

impl SessionManager {
    pub fn new() -> Self {
        Self {
            conns: HashMap::new(),
            documents: DocumentRegistry::new(),
            pending: PendingAccess::new(),
        }
    }

    pub fn connect(&mut self, handle: ConnHandle) {
        debug!("Registering connection {}", handle.id());
        self.conns.insert(handle.id(), handle);
    }

    /// Forget a connection without any reconciliation. See `disconnect`.
    pub(super) fn forget(&mut self, conn: ConnId) -> Option<ConnHandle> {
        self.conns.remove(&conn)
    }

    pub fn is_live(&self, conn: ConnId) -> bool {
        self.conns.contains_key(&conn)
    }

    pub fn conn_count(&self) -> usize {
        self.conns.len()
    }

    pub fn documents(&self) -> &DocumentRegistry {
        &self.documents
    }

    pub fn documents_mut(&mut self) -> &mut DocumentRegistry {
        &mut self.documents
    }

    pub fn pending(&self) -> &PendingAccess {
        &self.pending
    }

    pub fn pending_mut(&mut self) -> &mut PendingAccess {
        &mut self.pending
    }

    /// Best-effort delivery. Returns false and logs if the connection is gone.
    pub fn send_to(&self, conn: ConnId, msg: SendMessage) -> bool {
        let Some(handle) = self.conns.get(&conn) else {
            warn!("Dropping message for unknown connection {}", conn);
            return false;
        };
        match handle.send(msg) {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to deliver message: {}", e);
                false
            }
        }
    }

    /// Send `msg` to every target, continuing past dead peers. Returns the
    /// number of successful deliveries.
    pub fn broadcast(&self, targets: &[ConnId], msg: &SendMessage) -> usize {
        targets
            .iter()
            .filter(|conn| self.send_to(**conn, msg.clone()))
            .count()
    }

    /// Ask the connection's writer to close the socket.
    pub fn close(&self, conn: ConnId) {
        if let Some(handle) = self.conns.get(&conn) {
            if let Err(e) = handle.close() {
                debug!("Close request not delivered: {}", e);
            }
        }
    }

    pub fn summaries(&self) -> Vec<DocumentSummary> {
        let mut docs: Vec<DocumentSummary> = self
            .documents
            .iter()
            .map(|doc| DocumentSummary {
                id: doc.id.clone(),
                owner: doc.owner.clone(),
                created_at: doc.created_at,
                n_pending: self.pending.count(&doc.id) as u32,
            })
            .collect();
        docs.sort_by(|a, b| a.id.cmp(&b.id));
        docs
    }
}
