//! Chat handler

use crate::directory::DirectoryError;
use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::sync::Arc;

/// Records a chat message in the sender's room and fans it out to every
/// member, the sender included, tagged with the originating connection id.
///
/// A chat from a connection that is in no room is dropped without any
/// reply; the sender is told nothing.
pub async fn handle_chat_message(
    state: Arc<AppState>,
    peer_id: &str,
    display_sender: &str,
    body: &str,
) {
    let mut directory = state.directory.lock().await;

    let (room_key, members) = match directory.record_chat(peer_id, display_sender, body) {
        Ok(resolved) => resolved,
        Err(DirectoryError::NotInRoom) => {
            tracing::debug!(peer_id = %peer_id, "Chat from connection in no room, dropped");
            return;
        }
    };

    for member_id in &members {
        state.send_to_peer(
            member_id,
            ServerMessage::ChatMessage {
                body: body.to_string(),
                sender: display_sender.to_string(),
                from: peer_id.to_string(),
            },
        );
    }
    drop(directory);

    tracing::info!(
        peer_id = %peer_id,
        room_key = %room_key,
        sender = %display_sender,
        "Chat message recorded"
    );
}
