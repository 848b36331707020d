//! Negotiation payload relay
//!
//! Payloads are opaque blobs (SDP descriptions, ICE candidates) produced
//! and consumed by the peers themselves; the server only routes them by
//! destination id. No room-membership check is applied.

use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::sync::Arc;

/// Forwards `payload` verbatim to `to`, tagged with the sender's id.
/// An unknown destination is a silent drop, not an error.
pub async fn handle_signal(state: Arc<AppState>, from_peer_id: &str, to: &str, payload: String) {
    if state.peers.contains_key(to) {
        state.send_to_peer(
            to,
            ServerMessage::Signal {
                from: from_peer_id.to_string(),
                payload,
            },
        );
        tracing::debug!(from = %from_peer_id, to = %to, "Relayed signal");
    } else {
        tracing::debug!(from = %from_peer_id, to = %to, "Unknown signal destination, dropped");
    }
}
