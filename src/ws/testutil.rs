use tokio::sync::mpsc::UnboundedReceiver;

use super::conn::{ConnHandle, ConnId, Outbound};
use super::session::SessionManager;
use crate::models::SendMessage;

/// In-memory stand-in for a websocket client.
pub struct Client {
    pub id: ConnId,
    rx: UnboundedReceiver<Outbound>,
}

impl Client {
    pub fn connect(session: &mut SessionManager) -> Self {
        let (handle, rx) = ConnHandle::channel();
        let id = handle.id();
        session.connect(handle);
        Self { id, rx }
    }

    /// Everything queued for this client so far.
    pub fn drain(&mut self) -> Vec<Outbound> {
        let mut out = Vec::new();
        while let Ok(frame) = self.rx.try_recv() {
            out.push(frame);
        }
        out
    }

    /// Queued messages, panicking on a close request.
    pub fn messages(&mut self) -> Vec<SendMessage> {
        self.drain()
            .into_iter()
            .map(|frame| match frame {
                Outbound::Message(msg) => msg,
                Outbound::Close => panic!("unexpected close for {}", self.id),
            })
            .collect()
    }
}
