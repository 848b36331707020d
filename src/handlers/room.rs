//! Room join handler
//!
//! There is no explicit leave event: a connection stays in its room until
//! it disconnects (see `connection::handle_disconnect`).

use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::sync::Arc;

/// Joins `peer_id` to the room keyed by `room_key`.
///
/// Every member of the post-join roster (the newcomer included) receives a
/// `user-joined` event carrying the full member list, so existing members
/// learn the new peer and the newcomer can initiate negotiation with each
/// pre-existing one. The room's chat transcript is then replayed to the
/// newcomer alone, in arrival order.
pub async fn handle_join_call(state: Arc<AppState>, peer_id: &str, room_key: &str) {
    let mut directory = state.directory.lock().await;

    let members = directory.join(room_key, peer_id);

    for member_id in &members {
        state.send_to_peer(
            member_id,
            ServerMessage::UserJoined {
                socket_id: peer_id.to_string(),
                users: members.clone(),
            },
        );
    }

    // Replay happens under the same lock acquisition as the join, so no
    // chat recorded afterwards can reach the newcomer before the backlog.
    let history = directory.history_of(room_key);
    for entry in history {
        state.send_to_peer(
            peer_id,
            ServerMessage::ChatMessage {
                body: entry.body.clone(),
                sender: entry.sender.clone(),
                from: entry.from.clone(),
            },
        );
    }

    tracing::info!(
        peer_id = %peer_id,
        room_key = %room_key,
        member_count = members.len(),
        replayed = history.len(),
        "User joined room"
    );
}
