use tracing::info;

use super::conn::ConnId;
use super::session::SessionManager;
use crate::models::SendMessage;

pub const OWNER_GONE_MESSAGE: &str =
    "The owner of the document has disconnected. You have been removed from the session.";

impl SessionManager {
    /// Reconcile the registries after `conn` closed. Must run once per
    /// connection, after its last message was handled.
    pub fn disconnect(&mut self, conn: ConnId) {
        let left = self.pending_mut().remove_conn(conn);
        if !left.is_empty() {
            info!("Connection {} left pending access for {:?}", conn, left);
        }

        for doc_id in self.documents().owned_by(conn) {
            info!("Owner disconnected for document {}", doc_id);
            let collaborators = self.pending_mut().remove_entry(&doc_id);
            for collaborator in &collaborators {
                self.send_to(*collaborator, SendMessage::error(OWNER_GONE_MESSAGE));
                self.close(*collaborator);
            }
            self.documents_mut().remove(&doc_id);
            info!(
                "Document {} closed, {} collaborator(s) removed",
                doc_id,
                collaborators.len()
            );
        }

        self.forget(conn);
    }
}
