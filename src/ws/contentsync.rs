use tracing::debug;

use super::conn::ConnId;

/// Receives the traffic the signaling core does not understand, typically
/// the binary update stream of a collaborative editor sharing the socket.
pub trait ContentSync: Send + Sync {
    fn on_connect(&self, _conn: ConnId, _room: &str) {}

    fn on_frame(&self, conn: ConnId, frame: &[u8]);

    fn on_disconnect(&self, _conn: ConnId) {}
}

/// Drops every frame. Used when no replication backend is attached.
#[derive(Debug, Default, Clone, Copy)]
pub struct DiscardContentSync;

impl ContentSync for DiscardContentSync {
    fn on_connect(&self, conn: ConnId, room: &str) {
        debug!("Content sync not attached, connection {} on room '{}' is signaling only", conn, room);
    }

    fn on_frame(&self, conn: ConnId, frame: &[u8]) {
        debug!("Discarding {} byte content frame from connection {}", frame.len(), conn);
    }
}
