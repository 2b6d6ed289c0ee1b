use thiserror::Error;
use tracing::{debug, info};

use crate::models::ReceivedMessage;
use crate::websocket::msg_approve_handler::handle_approve_message;
use crate::websocket::msg_deny_handler::handle_deny_message;
use crate::websocket::msg_join_handler::handle_join_message;
use crate::websocket::msg_request_handler::handle_request_message;
use crate::ws::{conn::ConnId, session::SessionManager};

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("frame is not valid UTF-8: {0}")]
    NotUtf8(#[from] std::str::Utf8Error),
    #[error("not a valid JSON message: {0}")]
    NotJson(serde_json::Error),
    #[error("unexpected message shape: {0}")]
    Shape(serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    Handled,
    /// Valid JSON with a `type` the protocol does not know.
    Ignored,
    /// Not a protocol message at all; belongs to the content stream.
    Opaque,
}

pub fn decode_frame(frame: &[u8]) -> Result<ReceivedMessage, DecodeError> {
    let text = std::str::from_utf8(frame)?;
    let value: serde_json::Value = serde_json::from_str(text).map_err(DecodeError::NotJson)?;
    serde_json::from_value(value).map_err(DecodeError::Shape)
}

/// Decode one inbound frame and run the matching operation against the session.
pub fn handle_frame(session: &mut SessionManager, conn: ConnId, frame: &[u8]) -> FrameOutcome {
    let json_msg = match decode_frame(frame) {
        Ok(json_msg) => json_msg,
        Err(e) => {
            debug!("Skipping frame from {}: {}", conn, e);
            return FrameOutcome::Opaque;
        }
    };
    debug!("Received message from {}: {:?}", conn, json_msg);

    match json_msg {
        ReceivedMessage::JoinDocument(join_msg) => handle_join_message(session, conn, &join_msg),
        ReceivedMessage::RequestAccess(request_msg) => handle_request_message(session, conn, &request_msg),
        ReceivedMessage::ApproveAccess(approve_msg) => handle_approve_message(session, conn, &approve_msg),
        ReceivedMessage::DenyAccess(deny_msg) => handle_deny_message(session, conn, &deny_msg),
        ReceivedMessage::Unknown => {
            info!("Unknown message type from {}", conn);
            return FrameOutcome::Ignored;
        }
    }
    FrameOutcome::Handled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccessGrantedMessage, AccessRequestMessage, SendMessage};
    use crate::websocket::msg_join_handler::DIFFERENT_OWNER_MESSAGE;
    use crate::websocket::msg_request_handler::{
        ALREADY_OWNER_MESSAGE, NOT_ACCESSIBLE_MESSAGE, NOT_FOUND_MESSAGE, REQUEST_SENT_MESSAGE,
    };
    use crate::ws::conn::Outbound;
    use crate::ws::reconcile::OWNER_GONE_MESSAGE;
    use crate::ws::testutil::Client;
    use serde_json::json;

    fn send(session: &mut SessionManager, client: &Client, msg: serde_json::Value) -> FrameOutcome {
        handle_frame(session, client.id, msg.to_string().as_bytes())
    }

    fn join(session: &mut SessionManager, client: &Client, doc: &str, user: &str) {
        send(session, client, json!({"type": "JOIN_DOCUMENT", "documentId": doc, "username": user}));
    }

    fn request(session: &mut SessionManager, client: &Client, doc: &str, user: &str) {
        send(session, client, json!({"type": "REQUEST_ACCESS", "documentId": doc, "username": user}));
    }

    #[test]
    fn test_first_join_creates_document() {
        let mut session = SessionManager::new();
        let mut alice = Client::connect(&mut session);

        join(&mut session, &alice, "doc1", "alice");

        assert_eq!(
            alice.messages(),
            vec![SendMessage::joined("You have created and joined document \"doc1\".")]
        );
        let doc = session.documents().get("doc1").unwrap();
        assert_eq!(doc.owner, "alice");
        assert_eq!(doc.owner_conn, alice.id);
    }

    #[test]
    fn test_owner_rejoin_reattaches() {
        let mut session = SessionManager::new();
        let alice = Client::connect(&mut session);
        let mut alice2 = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");

        join(&mut session, &alice2, "doc1", "alice");

        assert_eq!(
            alice2.messages(),
            vec![SendMessage::joined("You have rejoined your document \"doc1\".")]
        );
        assert_eq!(session.documents().len(), 1);
        assert_eq!(session.documents().get("doc1").unwrap().owner_conn, alice2.id);
    }

    #[test]
    fn test_join_with_different_owner_is_rejected() {
        let mut session = SessionManager::new();
        let alice = Client::connect(&mut session);
        let mut mallory = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");
        let before = session.documents().get("doc1").cloned();

        join(&mut session, &mallory, "doc1", "mallory");

        assert_eq!(mallory.messages(), vec![SendMessage::error(DIFFERENT_OWNER_MESSAGE)]);
        assert_eq!(session.documents().get("doc1").cloned(), before);
    }

    #[test]
    fn test_request_unknown_document() {
        let mut session = SessionManager::new();
        let mut bob = Client::connect(&mut session);

        request(&mut session, &bob, "nope", "bob");

        assert_eq!(bob.messages(), vec![SendMessage::error(NOT_FOUND_MESSAGE)]);
        assert!(!session.pending().has_entry("nope"));
    }

    #[test]
    fn test_owner_cannot_request_own_document() {
        let mut session = SessionManager::new();
        let mut alice = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");
        alice.drain();

        request(&mut session, &alice, "doc1", "alice");

        assert_eq!(alice.messages(), vec![SendMessage::error(ALREADY_OWNER_MESSAGE)]);
        assert!(!session.pending().contains("doc1", alice.id));
    }

    #[test]
    fn test_request_is_forwarded_to_owner() {
        let mut session = SessionManager::new();
        let mut alice = Client::connect(&mut session);
        let mut bob = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");
        alice.drain();

        request(&mut session, &bob, "doc1", "bob");

        assert_eq!(
            alice.messages(),
            vec![SendMessage::AccessRequest(AccessRequestMessage {
                document_id: "doc1".to_string(),
                username: "bob".to_string(),
            })]
        );
        assert_eq!(bob.messages(), vec![SendMessage::access_requested(REQUEST_SENT_MESSAGE)]);
        assert!(session.pending().contains("doc1", bob.id));
    }

    #[test]
    fn test_request_with_unreachable_owner() {
        let mut session = SessionManager::new();
        let alice = Client::connect(&mut session);
        let mut bob = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");
        // Writer gone but the close has not been reconciled yet.
        drop(alice);

        request(&mut session, &bob, "doc1", "bob");

        assert_eq!(bob.messages(), vec![SendMessage::error(NOT_ACCESSIBLE_MESSAGE)]);
        assert!(!session.pending().has_entry("doc1"));
    }

    #[test]
    fn test_approve_broadcasts_to_pending_set_only() {
        let mut session = SessionManager::new();
        let mut alice = Client::connect(&mut session);
        let mut bob = Client::connect(&mut session);
        let mut carol = Client::connect(&mut session);
        let mut dave = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");
        request(&mut session, &bob, "doc1", "bob");
        request(&mut session, &carol, "doc1", "carol");
        alice.drain();
        bob.drain();
        carol.drain();

        let outcome = send(
            &mut session,
            &alice,
            json!({"type": "APPROVE_ACCESS", "documentId": "doc1", "content": "X", "username": "alice"}),
        );
        assert_eq!(outcome, FrameOutcome::Handled);

        let expected = SendMessage::AccessGranted(AccessGrantedMessage {
            content: Some(json!("X")),
            message: "Your request to access the document \"doc1\" has been approved.".to_string(),
        });
        assert_eq!(bob.messages(), vec![expected.clone()]);
        assert_eq!(carol.messages(), vec![expected]);
        assert!(alice.messages().is_empty());
        assert!(dave.messages().is_empty());
        // Approval leaves the registries untouched.
        assert_eq!(session.pending().count("doc1"), 2);
    }

    #[test]
    fn test_approve_without_content_omits_it() {
        let mut session = SessionManager::new();
        let alice = Client::connect(&mut session);
        let mut bob = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");
        request(&mut session, &bob, "doc1", "bob");
        bob.drain();

        send(&mut session, &alice, json!({"type": "APPROVE_ACCESS", "documentId": "doc1", "username": "alice"}));

        let granted = bob.messages();
        assert_eq!(
            granted,
            vec![SendMessage::AccessGranted(AccessGrantedMessage {
                content: None,
                message: "Your request to access the document \"doc1\" has been approved.".to_string(),
            })]
        );
        assert_eq!(
            serde_json::to_value(&granted[0]).unwrap(),
            json!({
                "type": "ACCESS_GRANTED",
                "message": "Your request to access the document \"doc1\" has been approved.",
            })
        );
    }

    #[test]
    fn test_deny_broadcasts_to_pending_set() {
        let mut session = SessionManager::new();
        let mut alice = Client::connect(&mut session);
        let mut bob = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");
        request(&mut session, &bob, "doc1", "bob");
        alice.drain();
        bob.drain();

        send(
            &mut session,
            &alice,
            json!({"type": "DENY_ACCESS", "documentId": "doc1", "username": "alice"}),
        );

        assert_eq!(
            bob.messages(),
            vec![SendMessage::access_denied(
                "Your request to access the document \"doc1\" has been denied."
            )]
        );
        assert!(alice.messages().is_empty());
    }

    #[test]
    fn test_approve_and_deny_unknown_document() {
        let mut session = SessionManager::new();
        let mut alice = Client::connect(&mut session);

        send(&mut session, &alice, json!({"type": "APPROVE_ACCESS", "documentId": "x", "content": 1, "username": "alice"}));
        send(&mut session, &alice, json!({"type": "DENY_ACCESS", "documentId": "x", "username": "alice"}));

        assert_eq!(
            alice.messages(),
            vec![SendMessage::error(NOT_FOUND_MESSAGE), SendMessage::error(NOT_FOUND_MESSAGE)]
        );
    }

    #[test]
    fn test_approve_with_empty_pending_set_sends_nothing() {
        let mut session = SessionManager::new();
        let mut alice = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");
        alice.drain();

        send(&mut session, &alice, json!({"type": "APPROVE_ACCESS", "documentId": "doc1", "content": null, "username": "alice"}));

        assert!(alice.messages().is_empty());
    }

    #[test]
    fn test_unknown_and_malformed_frames_are_ignored() {
        let mut session = SessionManager::new();
        let mut alice = Client::connect(&mut session);

        assert_eq!(
            send(&mut session, &alice, json!({"type": "LEAVE_DOCUMENT", "documentId": "doc1"})),
            FrameOutcome::Ignored
        );
        assert_eq!(handle_frame(&mut session, alice.id, b"not json"), FrameOutcome::Opaque);
        assert_eq!(handle_frame(&mut session, alice.id, &[0x00, 0x01, 0xff]), FrameOutcome::Opaque);
        assert_eq!(
            send(&mut session, &alice, json!({"type": "JOIN_DOCUMENT", "documentId": "doc1"})),
            FrameOutcome::Opaque
        );

        assert!(alice.messages().is_empty());
        assert_eq!(session.documents().len(), 0);
    }

    #[test]
    fn test_decode_error_kinds() {
        assert!(matches!(decode_frame(&[0xff, 0xfe]), Err(DecodeError::NotUtf8(_))));
        assert!(matches!(decode_frame(b"{"), Err(DecodeError::NotJson(_))));
        assert!(matches!(decode_frame(b"42"), Err(DecodeError::Shape(_))));
    }

    #[test]
    fn test_owner_leaves_then_document_is_recreated() {
        let mut session = SessionManager::new();
        let alice = Client::connect(&mut session);
        let mut bob = Client::connect(&mut session);
        join(&mut session, &alice, "doc1", "alice");
        request(&mut session, &bob, "doc1", "bob");
        bob.drain();

        session.disconnect(alice.id);
        assert_eq!(
            bob.drain(),
            vec![Outbound::Message(SendMessage::error(OWNER_GONE_MESSAGE)), Outbound::Close]
        );

        let mut alice2 = Client::connect(&mut session);
        join(&mut session, &alice2, "doc1", "alice");
        assert_eq!(
            alice2.messages(),
            vec![SendMessage::joined("You have created and joined document \"doc1\".")]
        );
        assert!(!session.pending().has_entry("doc1"));
    }
}
