//! Shared application state

use crate::config::Config;
use crate::directory::RoomDirectory;
use crate::protocol::ServerMessage;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc::UnboundedSender, Mutex};

/// Global application state
pub struct AppState {
    /// Live connections (peer_id -> PeerSession)
    pub peers: DashMap<String, PeerSession>,
    /// Room membership and chat history, one mutual-exclusion domain.
    ///
    /// Fan-out enqueues happen while this lock is held: the per-peer
    /// channels are unbounded so an enqueue never blocks, and lock order
    /// becomes the delivery order every member's channel observes.
    pub directory: Mutex<RoomDirectory>,
    /// Settings
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            peers: DashMap::new(),
            directory: Mutex::new(RoomDirectory::new()),
            config: Arc::new(config),
        }
    }

    /// Best-effort send to one live peer. Unknown ids and closed channels
    /// drop the message.
    pub fn send_to_peer(&self, peer_id: &str, message: ServerMessage) {
        if let Some(session) = self.peers.get(peer_id) {
            let _ = session.sender.send(message);
        }
    }
}

/// Peer session info
pub struct PeerSession {
    #[allow(dead_code)]
    pub id: String,
    pub sender: UnboundedSender<ServerMessage>,
    pub connected_at: Instant,
}
