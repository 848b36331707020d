//! Room directory: authoritative membership and chat transcripts
//!
//! Purely synchronous state. `AppState` wraps the directory in a single
//! mutex, so every mutation is totally ordered; nothing here survives a
//! process restart.

use std::collections::HashMap;
use std::time::Instant;
use thiserror::Error;

/// Directory error taxonomy. None of these are fatal to the server.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    /// Chat from a connection that is in no room; the caller drops the
    /// message without replying to the sender.
    #[error("connection is not in any room")]
    NotInRoom,
}

/// One recorded chat message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    /// Display name the message was sent under.
    pub sender: String,
    pub body: String,
    /// Originating connection id.
    pub from: String,
}

#[derive(Debug, Default)]
struct Room {
    /// Connection ids in join order. A repeated join appends again.
    members: Vec<String>,
    /// Append-only transcript; deleted together with the room.
    history: Vec<ChatEntry>,
}

/// Mapping from room key → membership and transcript.
///
/// Room keys are opaque caller-supplied strings (the meeting URL in the
/// reference frontend); no normalization is applied. A room exists iff its
/// member list is non-empty.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<String, Room>,
    /// connection id → room key of its most recent join.
    member_of: HashMap<String, String>,
    /// connection id → instant of its most recent join, for the uptime log.
    joined_at: HashMap<String, Instant>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `connection_id` to the room's member list, creating the room
    /// on first join, and returns the post-append snapshot (the joiner
    /// included, at its insertion position). Never fails: any string is a
    /// valid room key.
    pub fn join(&mut self, room_key: &str, connection_id: &str) -> Vec<String> {
        let room = self.rooms.entry(room_key.to_string()).or_default();
        room.members.push(connection_id.to_string());
        self.member_of
            .insert(connection_id.to_string(), room_key.to_string());
        self.joined_at
            .insert(connection_id.to_string(), Instant::now());
        room.members.clone()
    }

    /// Appends a chat entry to the room holding `connection_id` and returns
    /// the room key plus the current member snapshot for fan-out.
    pub fn record_chat(
        &mut self,
        connection_id: &str,
        sender: &str,
        body: &str,
    ) -> Result<(String, Vec<String>), DirectoryError> {
        let room_key = self
            .member_of
            .get(connection_id)
            .cloned()
            .ok_or(DirectoryError::NotInRoom)?;
        let room = self
            .rooms
            .get_mut(&room_key)
            .ok_or(DirectoryError::NotInRoom)?;
        room.history.push(ChatEntry {
            sender: sender.to_string(),
            body: body.to_string(),
            from: connection_id.to_string(),
        });
        Ok((room_key, room.members.clone()))
    }

    /// Removes `connection_id` from every room it appears in. Rooms left
    /// empty are deleted together with their history. Returns one
    /// `(room_key, remaining_members)` entry per affected room, normally
    /// zero or one. Calling this for an id present nowhere is a no-op.
    pub fn leave(&mut self, connection_id: &str) -> Vec<(String, Vec<String>)> {
        let mut affected = Vec::new();
        self.rooms.retain(|room_key, room| {
            let before = room.members.len();
            room.members.retain(|m| m != connection_id);
            if room.members.len() == before {
                return true;
            }
            affected.push((room_key.clone(), room.members.clone()));
            !room.members.is_empty()
        });
        self.member_of.remove(connection_id);
        self.joined_at.remove(connection_id);
        affected
    }

    /// Transcript of a room in arrival order; empty for unknown keys.
    pub fn history_of(&self, room_key: &str) -> &[ChatEntry] {
        self.rooms
            .get(room_key)
            .map(|r| r.history.as_slice())
            .unwrap_or(&[])
    }

    /// Instant of the connection's most recent join, if it ever joined.
    pub fn online_since(&self, connection_id: &str) -> Option<Instant> {
        self.joined_at.get(connection_id).copied()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Current member snapshot; empty for unknown keys.
    #[cfg(test)]
    pub fn members_of(&self, room_key: &str) -> Vec<String> {
        self.rooms
            .get(room_key)
            .map(|r| r.members.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_returns_snapshot_in_join_order() {
        let mut dir = RoomDirectory::new();
        assert_eq!(dir.join("r1", "a"), vec!["a"]);
        assert_eq!(dir.join("r1", "b"), vec!["a", "b"]);
        assert_eq!(dir.join("r1", "c"), vec!["a", "b", "c"]);
        assert_eq!(dir.room_count(), 1);
    }

    #[test]
    fn rooms_materialize_lazily_per_key() {
        let mut dir = RoomDirectory::new();
        dir.join("/meet/xyz", "a");
        // No normalization: keys differing by trailing characters differ.
        dir.join("/meet/xyz/", "b");
        assert_eq!(dir.room_count(), 2);
        assert_eq!(dir.members_of("/meet/xyz"), vec!["a"]);
        assert_eq!(dir.members_of("/meet/xyz/"), vec!["b"]);
    }

    #[test]
    fn duplicate_join_appends_again() {
        let mut dir = RoomDirectory::new();
        dir.join("r1", "a");
        dir.join("r1", "a");
        assert_eq!(dir.members_of("r1"), vec!["a", "a"]);
        // A single leave removes every occurrence.
        dir.leave("a");
        assert_eq!(dir.room_count(), 0);
    }

    #[test]
    fn chat_appends_history_and_returns_fanout_snapshot() {
        let mut dir = RoomDirectory::new();
        dir.join("r1", "a");
        dir.join("r1", "b");
        let (room_key, members) = dir.record_chat("a", "Alice", "hi").unwrap();
        assert_eq!(room_key, "r1");
        assert_eq!(members, vec!["a", "b"]);
        assert_eq!(
            dir.history_of("r1"),
            &[ChatEntry {
                sender: "Alice".into(),
                body: "hi".into(),
                from: "a".into(),
            }]
        );
    }

    #[test]
    fn chat_history_preserves_recording_order() {
        let mut dir = RoomDirectory::new();
        dir.join("r1", "a");
        dir.join("r1", "b");
        dir.record_chat("a", "Alice", "first").unwrap();
        dir.record_chat("b", "Bob", "second").unwrap();
        dir.record_chat("a", "Alice", "third").unwrap();
        let bodies: Vec<&str> = dir.history_of("r1").iter().map(|e| e.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
    }

    #[test]
    fn chat_from_unassociated_connection_fails_without_mutation() {
        let mut dir = RoomDirectory::new();
        dir.join("r1", "a");
        assert_eq!(
            dir.record_chat("ghost", "Ghost", "boo"),
            Err(DirectoryError::NotInRoom)
        );
        assert!(dir.history_of("r1").is_empty());
    }

    #[test]
    fn leave_reports_remaining_members() {
        let mut dir = RoomDirectory::new();
        dir.join("r1", "a");
        dir.join("r1", "b");
        dir.join("r1", "c");
        let affected = dir.leave("b");
        assert_eq!(affected, vec![("r1".to_string(), vec!["a".to_string(), "c".to_string()])]);
        assert_eq!(dir.members_of("r1"), vec!["a", "c"]);
    }

    #[test]
    fn last_leave_deletes_room_and_history_atomically() {
        let mut dir = RoomDirectory::new();
        dir.join("r1", "a");
        dir.join("r1", "b");
        dir.record_chat("a", "Alice", "hi").unwrap();

        dir.leave("a");
        assert_eq!(dir.history_of("r1").len(), 1);

        let affected = dir.leave("b");
        assert_eq!(affected, vec![("r1".to_string(), vec![])]);
        assert_eq!(dir.room_count(), 0);
        assert!(dir.history_of("r1").is_empty());
    }

    #[test]
    fn cleanup_is_complete_in_any_disconnect_order() {
        for order in [["a", "b", "c"], ["c", "a", "b"], ["b", "c", "a"]] {
            let mut dir = RoomDirectory::new();
            dir.join("r1", "a");
            dir.join("r1", "b");
            dir.join("r1", "c");
            dir.record_chat("b", "Bob", "hello").unwrap();
            for id in order {
                dir.leave(id);
            }
            assert_eq!(dir.room_count(), 0);
            assert!(dir.history_of("r1").is_empty());
        }
    }

    #[test]
    fn leave_is_idempotent() {
        let mut dir = RoomDirectory::new();
        dir.join("r1", "a");
        dir.join("r1", "b");
        assert_eq!(dir.leave("a").len(), 1);
        assert!(dir.leave("a").is_empty());
        assert!(dir.leave("never-joined").is_empty());
        assert_eq!(dir.members_of("r1"), vec!["b"]);
    }

    #[test]
    fn rejoin_after_leave_starts_fresh() {
        let mut dir = RoomDirectory::new();
        dir.join("r1", "a");
        dir.record_chat("a", "Alice", "hi").unwrap();
        dir.leave("a");

        // Same key, new room: the old transcript is gone.
        assert_eq!(dir.join("r1", "a"), vec!["a"]);
        assert!(dir.history_of("r1").is_empty());
        assert!(dir.online_since("a").is_some());
    }

    #[test]
    fn chat_resolves_to_most_recent_join() {
        let mut dir = RoomDirectory::new();
        dir.join("r1", "a");
        dir.join("r2", "a");
        let (room_key, _) = dir.record_chat("a", "Alice", "hi").unwrap();
        assert_eq!(room_key, "r2");
        // Leave still scrubs both rooms.
        let mut affected = dir.leave("a");
        affected.sort();
        assert_eq!(
            affected,
            vec![("r1".to_string(), vec![]), ("r2".to_string(), vec![])]
        );
        assert_eq!(dir.room_count(), 0);
    }
}
