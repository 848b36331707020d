//! Connection lifecycle handlers

use crate::protocol::ServerMessage;
use crate::state::{AppState, PeerSession};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Registers a new connection and announces its assigned id to the client.
pub async fn handle_connection(
    state: Arc<AppState>,
    sender: UnboundedSender<ServerMessage>,
) -> String {
    let peer_id = Uuid::new_v4().to_string();

    let session = PeerSession {
        id: peer_id.clone(),
        sender: sender.clone(),
        connected_at: Instant::now(),
    };

    state.peers.insert(peer_id.clone(), session);

    let _ = sender.send(ServerMessage::Connected {
        socket_id: peer_id.clone(),
    });

    tracing::info!(peer_id = %peer_id, "New connection established");
    peer_id
}

/// Tears down a connection: deregisters the peer, removes it from every
/// room it was a member of, and sends departure notices to the members
/// that remain. Calling this twice for the same id is harmless.
pub async fn handle_disconnect(state: Arc<AppState>, peer_id: &str) {
    // Deregister first so nothing can enqueue to this channel anymore.
    let session = state.peers.remove(peer_id);

    let mut directory = state.directory.lock().await;
    let online_ms = directory
        .online_since(peer_id)
        .map(|since| since.elapsed().as_millis() as u64);

    for (room_key, remaining) in directory.leave(peer_id) {
        for member_id in &remaining {
            state.send_to_peer(
                member_id,
                ServerMessage::UserLeft {
                    socket_id: peer_id.to_string(),
                },
            );
        }

        tracing::info!(
            peer_id = %peer_id,
            room_key = %room_key,
            remaining = remaining.len(),
            online_ms = online_ms.unwrap_or(0),
            "User left room"
        );

        if remaining.is_empty() {
            tracing::info!(room_key = %room_key, "Room deleted");
        }
    }
    drop(directory);

    if let Some((_, session)) = session {
        tracing::info!(
            peer_id = %peer_id,
            lifetime_ms = session.connected_at.elapsed().as_millis() as u64,
            "Connection closed"
        );
    }
}

/// Heartbeat keep-alive.
pub fn handle_heartbeat(sender: &UnboundedSender<ServerMessage>) {
    let _ = sender.send(ServerMessage::HeartbeatAck);
}
