use tracing::{info, warn};

use crate::models::{DenyAccessMessage, SendMessage};
use crate::websocket::msg_request_handler::NOT_FOUND_MESSAGE;
use crate::ws::{conn::ConnId, session::SessionManager};

/// Handle DenyAccessMessage
pub fn handle_deny_message(session: &mut SessionManager, conn: ConnId, deny_msg: &DenyAccessMessage) {
    let document_id = &deny_msg.document_id;

    let (title, owner_conn) = match session.documents().get(document_id) {
        Some(doc) => (doc.title.clone(), doc.owner_conn),
        None => {
            session.send_to(conn, SendMessage::error(NOT_FOUND_MESSAGE));
            return;
        }
    };
    if owner_conn != conn {
        warn!(
            "Denial for document {} sent by {} from a non-owner connection",
            document_id, deny_msg.username
        );
    }

    let targets = session.pending().members(document_id);
    let denied = SendMessage::access_denied(format!(
        "Your request to access the document \"{}\" has been denied.",
        title
    ));
    let delivered = session.broadcast(&targets, &denied);
    info!(
        "Access to document {} denied for {}/{} pending connection(s)",
        document_id,
        delivered,
        targets.len()
    );
}
