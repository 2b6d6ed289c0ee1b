use tracing::{info, warn};

use crate::models::{AccessGrantedMessage, ApproveAccessMessage, SendMessage};
use crate::websocket::msg_request_handler::NOT_FOUND_MESSAGE;
use crate::ws::{conn::ConnId, session::SessionManager};

/// Handle ApproveAccessMessage
///
/// The grant goes to every connection pending on the document, carrying the
/// owner's content unchanged.
pub fn handle_approve_message(session: &mut SessionManager, conn: ConnId, approve_msg: &ApproveAccessMessage) {
    let document_id = &approve_msg.document_id;

    let (title, owner_conn) = match session.documents().get(document_id) {
        Some(doc) => (doc.title.clone(), doc.owner_conn),
        None => {
            session.send_to(conn, SendMessage::error(NOT_FOUND_MESSAGE));
            return;
        }
    };
    if owner_conn != conn {
        warn!(
            "Approval for document {} sent by {} from a non-owner connection",
            document_id, approve_msg.username
        );
    }

    let targets = session.pending().members(document_id);
    let granted = SendMessage::AccessGranted(AccessGrantedMessage {
        content: approve_msg.content.clone(),
        message: format!("Your request to access the document \"{}\" has been approved.", title),
    });
    let delivered = session.broadcast(&targets, &granted);
    info!(
        "Access to document {} granted to {}/{} pending connection(s)",
        document_id,
        delivered,
        targets.len()
    );
}
