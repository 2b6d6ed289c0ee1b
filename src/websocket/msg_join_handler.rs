use tracing::info;

use crate::models::{JoinDocumentMessage, SendMessage};
use crate::ws::{conn::ConnId, session::SessionManager};

pub const DIFFERENT_OWNER_MESSAGE: &str = "Document already exists and has a different owner.";

/// Handle JoinDocumentMessage
///
/// Creates the document on first join, or reattaches the owner connection
/// when the owner comes back under the same username.
pub fn handle_join_message(session: &mut SessionManager, conn: ConnId, join_msg: &JoinDocumentMessage) {
    let document_id = &join_msg.document_id;
    info!("{} is trying to join document {}", join_msg.username, document_id);

    let existing_owner = session.documents().get(document_id).map(|doc| doc.owner.clone());
    match existing_owner {
        Some(owner) if owner == join_msg.username => {
            info!("Owner {} rejoining document {}", owner, document_id);
            session.documents_mut().reattach_owner(document_id, conn);
            session.send_to(
                conn,
                SendMessage::joined(format!("You have rejoined your document \"{}\".", document_id)),
            );
        }
        Some(owner) => {
            info!(
                "{} cannot join document {} owned by {}",
                join_msg.username, document_id, owner
            );
            session.send_to(conn, SendMessage::error(DIFFERENT_OWNER_MESSAGE));
        }
        None => {
            session.documents_mut().create(document_id, &join_msg.username, conn);
            info!("Document {} created by {}", document_id, join_msg.username);
            session.send_to(
                conn,
                SendMessage::joined(format!("You have created and joined document \"{}\".", document_id)),
            );
        }
    }
}
