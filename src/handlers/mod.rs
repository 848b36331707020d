//! Event handlers

pub mod chat;
pub mod connection;
pub mod room;
pub mod signaling;

pub use chat::*;
pub use connection::*;
pub use room::*;
pub use signaling::*;
