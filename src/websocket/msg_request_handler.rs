use tracing::{debug, info};

use crate::models::{AccessRequestMessage, RequestAccessMessage, SendMessage};
use crate::ws::{conn::ConnId, session::SessionManager};

pub const NOT_FOUND_MESSAGE: &str = "Document not found.";
pub const ALREADY_OWNER_MESSAGE: &str = "You are the owner of this document.";
pub const NOT_ACCESSIBLE_MESSAGE: &str = "Document is not accessible.";
pub const REQUEST_SENT_MESSAGE: &str = "Your access request has been sent to the owner.";

/// Handle RequestAccessMessage
///
/// Forwards the request to the owner and records the sender as pending.
pub fn handle_request_message(session: &mut SessionManager, conn: ConnId, request_msg: &RequestAccessMessage) {
    let document_id = &request_msg.document_id;
    info!("{} requests access to document {}", request_msg.username, document_id);

    let (owner, owner_conn) = match session.documents().get(document_id) {
        Some(doc) => (doc.owner.clone(), doc.owner_conn),
        None => {
            info!("Access request for unknown document {}", document_id);
            session.send_to(conn, SendMessage::error(NOT_FOUND_MESSAGE));
            return;
        }
    };

    if owner == request_msg.username {
        session.send_to(conn, SendMessage::error(ALREADY_OWNER_MESSAGE));
        return;
    }

    let forwarded = session.is_live(owner_conn)
        && session.send_to(
            owner_conn,
            SendMessage::AccessRequest(AccessRequestMessage {
                document_id: document_id.clone(),
                username: request_msg.username.clone(),
            }),
        );
    if !forwarded {
        info!("Owner of document {} is unreachable", document_id);
        session.send_to(conn, SendMessage::error(NOT_ACCESSIBLE_MESSAGE));
        return;
    }

    if session.pending().contains(document_id, conn) {
        debug!("{} asked again for document {}", request_msg.username, document_id);
    }
    session.pending_mut().add(document_id, conn);
    session.send_to(conn, SendMessage::access_requested(REQUEST_SENT_MESSAGE));
}
