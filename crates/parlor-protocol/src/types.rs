//! Core protocol types for Parlor's wire format.
//!
//! Everything in this module travels "on the wire": these structures are
//! serialized to bytes, sent over the network, and deserialized on the
//! other side. The protocol layer knows nothing about rooms or game rules —
//! it only defines the shapes the client and server agree on.

use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique, externally verified identifier for a player.
///
/// Parlor never mints these itself — the authenticator collaborator in
/// the session layer resolves a connection's token to a `PlayerId` before
/// any game event is processed. A newtype over `u64` so a `PlayerId` can't
/// be confused with a seat index or a sequence number.
///
/// `#[serde(transparent)]` keeps the JSON representation a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P-{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// RoomCode
// ---------------------------------------------------------------------------

/// The alphabet room codes are drawn from.
///
/// 32 symbols; I, O, 0 and 1 are excluded so a code read aloud or copied
/// from a friend's screen can't be mis-typed.
pub const CODE_ALPHABET: &[u8; 32] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Length of a room code in characters.
pub const CODE_LEN: usize = 6;

/// A short shareable code identifying one in-progress game room.
///
/// Always exactly [`CODE_LEN`] characters from [`CODE_ALPHABET`]. The only
/// way to construct one from untrusted input is [`RoomCode::from_str`],
/// which validates; codes arriving over the wire are therefore well-formed
/// by the time they reach the room layer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RoomCode(String);

impl RoomCode {
    /// Builds a code from raw alphabet indices. Used by the code generator
    /// in the room layer; indices are taken modulo the alphabet size.
    pub fn from_indices(indices: [u8; CODE_LEN]) -> Self {
        let chars = indices
            .iter()
            .map(|&i| CODE_ALPHABET[i as usize % CODE_ALPHABET.len()] as char)
            .collect();
        Self(chars)
    }

    /// Returns the code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for RoomCode {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Lowercase input is accepted — players type codes by hand.
        let normalized: String = s.trim().chars().map(|c| c.to_ascii_uppercase()).collect();
        if normalized.len() != CODE_LEN {
            return Err(ProtocolError::InvalidRoomCode(s.to_string()));
        }
        if !normalized.bytes().all(|b| CODE_ALPHABET.contains(&b)) {
            return Err(ProtocolError::InvalidRoomCode(s.to_string()));
        }
        Ok(Self(normalized))
    }
}

impl TryFrom<String> for RoomCode {
    type Error = ProtocolError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<RoomCode> for String {
    fn from(code: RoomCode) -> Self {
        code.0
    }
}

impl fmt::Display for RoomCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Lobby roster
// ---------------------------------------------------------------------------

/// One seat in a room's roster, in seat order (index 0 is the host).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatEntry {
    /// Who is sitting here.
    pub player_id: PlayerId,
    /// Display name resolved by the identity collaborator at join time.
    pub name: String,
    /// Whether this seat currently has a live connection attached.
    /// Mid-game, a seat can be occupied but disconnected.
    pub connected: bool,
}

// ---------------------------------------------------------------------------
// SystemMessage — framework-level messages
// ---------------------------------------------------------------------------

/// Messages used by the framework itself (not game-specific).
///
/// These cover the plumbing: connecting, authenticating, room lifecycle,
/// heartbeats, and errors. Game actions and game views travel as opaque
/// [`Payload::Game`] bytes / [`SystemMessage::GameState`] instead.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON
/// (`{ "type": "Handshake", "version": 1, ... }`), which is easy to
/// dispatch on from a browser client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SystemMessage {
    // -- Connection lifecycle --
    /// Client → Server: "Hello, I want to connect."
    /// `token` is resolved to a verified identity by the authenticator.
    Handshake { version: u32, token: Option<String> },

    /// Server → Client: "Welcome, you're connected."
    HandshakeAck {
        player_id: PlayerId,
        display_name: String,
        server_time: u64,
    },

    /// Either direction: "I'm disconnecting."
    Disconnect { reason: String },

    // -- Heartbeat (keep-alive) --
    /// Client → Server: "I'm still here." `client_time` is echoed back
    /// so the client can compute RTT.
    Heartbeat { client_time: u64 },

    /// Server → Client: heartbeat echo with the server clock attached.
    HeartbeatAck { client_time: u64, server_time: u64 },

    // -- Room lifecycle --
    /// Client → Server: "Open a new room with me as the host."
    CreateRoom,

    /// Client → Server: "Seat me in the room with this code."
    /// Also used to re-attach to a seat after a mid-game disconnect.
    JoinRoom { code: RoomCode },

    /// Server → Client: "You're in." `seat` is the player's fixed index.
    RoomJoined { code: RoomCode, seat: usize },

    /// Client → Server: "I'm leaving the room."
    LeaveRoom,

    /// Client → Server: host asks the room to start the game.
    StartGame,

    /// Server → Client: the room's current roster. Broadcast whenever a
    /// seat is added, removed, or changes connection state.
    Lobby {
        code: RoomCode,
        players: Vec<SeatEntry>,
    },

    /// Server → Client: "Here is YOUR view of the game."
    /// The bytes are the game's per-seat `View`, serialized by the codec —
    /// opaque to the protocol layer, already filtered of other players'
    /// hidden information.
    GameState { data: Vec<u8> },

    /// Server → Client: a game action was rejected. Sent only to the
    /// offending connection; the authoritative state did not change.
    GameError { message: String },

    // -- Errors --
    /// Server → Client: a protocol-level failure (bad room code, room
    /// full, unauthenticated, ...). `code` follows HTTP conventions.
    Error { code: u16, message: String },
}

// ---------------------------------------------------------------------------
// Payload and Envelope — the top-level wire format
// ---------------------------------------------------------------------------

/// The content of a message: either a system message or opaque game data.
///
/// Adjacently tagged (`{ "type": "System", "data": {...} }`) so the
/// framework can tell plumbing from game traffic without decoding the
/// game bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum Payload {
    /// A framework-level message.
    System(SystemMessage),

    /// Game-specific data, opaque to the framework. Client → server this
    /// is a game `Action`; server → client views travel as
    /// [`SystemMessage::GameState`] instead.
    Game(Vec<u8>),
}

/// The top-level message wrapper. Every message on the wire is an Envelope.
///
/// All traffic is reliable and ordered (a single WebSocket stream), so the
/// envelope carries only ordering metadata, no delivery-guarantee channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    /// Auto-incrementing sequence number. Each side maintains its own
    /// counter; used to detect missing or re-ordered messages in logs.
    pub seq: u64,

    /// Milliseconds since the sender's epoch (server start / page load).
    pub timestamp: u64,

    /// The actual message content.
    pub payload: Payload,
}

// =========================================================================
// Tests
// =========================================================================
