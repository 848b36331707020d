//! Client-server message protocol definitions
//!
//! Event names on the wire mirror the socket.io events of the reference
//! frontend: `join-call`, `signal`, `chat-message`, `user-joined`, `user-left`.

use serde::{Deserialize, Serialize};

/// Client → server messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ClientMessage {
    // Connection
    Heartbeat,

    /// Join the room keyed by `room_key` (any string; rooms materialize lazily).
    JoinCall { room_key: String },

    /// Forward an opaque negotiation payload (SDP/ICE blob) to one peer.
    Signal { to: String, payload: String },

    /// Room-wide chat. `sender` is the display name chosen by the client.
    ChatMessage { body: String, sender: String },
}

/// Server → client messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "kebab-case")]
pub enum ServerMessage {
    // Connection
    Connected { socket_id: String },
    HeartbeatAck,

    /// Roster update: `socket_id` just joined, `users` is the full member
    /// list of the room in join order (the newcomer included, last).
    UserJoined { socket_id: String, users: Vec<String> },

    /// Relayed negotiation payload, tagged with the originating connection.
    Signal { from: String, payload: String },

    /// New or replayed chat entry. `from` is the originating connection id,
    /// `sender` the display name it was sent under.
    ChatMessage {
        body: String,
        sender: String,
        from: String,
    },

    /// `socket_id` left the room (disconnected).
    UserLeft { socket_id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_events_use_wire_names() {
        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"join-call","payload":{"room_key":"/meet/abc-def"}}"#,
        )
        .unwrap();
        assert!(matches!(msg, ClientMessage::JoinCall { room_key } if room_key == "/meet/abc-def"));

        let msg: ClientMessage = serde_json::from_str(
            r#"{"type":"signal","payload":{"to":"peer-1","payload":"{\"sdp\":\"...\"}"}}"#,
        )
        .unwrap();
        assert!(matches!(msg, ClientMessage::Signal { to, .. } if to == "peer-1"));
    }

    #[test]
    fn server_events_use_wire_names() {
        let json = serde_json::to_string(&ServerMessage::UserLeft {
            socket_id: "peer-1".into(),
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"user-left","payload":{"socket_id":"peer-1"}}"#);

        let json = serde_json::to_string(&ServerMessage::ChatMessage {
            body: "hi".into(),
            sender: "Alice".into(),
            from: "peer-1".into(),
        })
        .unwrap();
        assert!(json.starts_with(r#"{"type":"chat-message""#));
    }
}
