use thiserror::Error;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use uuid::Uuid;

use crate::models::SendMessage;

/// Identity of a live websocket connection.
pub type ConnId = Uuid;

/// Frame queued for a connection's writer task.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Message(SendMessage),
    /// Close the socket after flushing everything queued before it.
    Close,
}

#[derive(Error, Debug, PartialEq)]
pub enum SendError {
    #[error("connection {0} is closed")]
    Closed(ConnId),
}

/// Sending half of a connection. Cheap to clone, never blocks.
#[derive(Clone, Debug)]
pub struct ConnHandle {
    id: ConnId,
    tx: UnboundedSender<Outbound>,
}

impl ConnHandle {
    pub fn new(id: ConnId, tx: UnboundedSender<Outbound>) -> Self {
        Self { id, tx }
    }

    /// New handle with a fresh id plus the receiver its writer task drains.
    pub fn channel() -> (Self, UnboundedReceiver<Outbound>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(Uuid::new_v4(), tx), rx)
    }

    pub fn id(&self) -> ConnId {
        self.id
    }

    pub fn send(&self, msg: SendMessage) -> Result<(), SendError> {
        self.tx
            .send(Outbound::Message(msg))
            .map_err(|_| SendError::Closed(self.id))
    }

    pub fn close(&self) -> Result<(), SendError> {
        self.tx.send(Outbound::Close).map_err(|_| SendError::Closed(self.id))
    }
}
