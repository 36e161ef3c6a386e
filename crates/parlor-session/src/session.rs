//! Session types: the server's record of a connected player.

use std::time::Instant;

use crate::Profile;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for session behavior.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How long (in seconds) a disconnected player's session is remembered
    /// before it is expired and cleaned up.
    ///
    /// While the session is remembered, the player's display name stays
    /// available to any room where they still hold a seat, and a fresh
    /// connection with the same identity silently replaces the old record.
    pub disconnect_grace_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            disconnect_grace_secs: 300,
        }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// The current state of a player's session.
///
/// ```text
///   Connected ──(disconnect)──→ Disconnected ──(grace elapses)──→ Expired
///       ↑                            │
///       └──────(re-authenticate)─────┘
/// ```
///
/// There is no token-based resume: a player who drops simply authenticates
/// again with the same identity, and their seat in any in-progress room
/// re-attaches when they rejoin the same room code.
#[derive(Debug, Clone)]
pub enum SessionState {
    /// Player is actively connected.
    Connected,

    /// Player disconnected at the given instant. Their game seats stay
    /// reserved; the session record is kept for the grace period so the
    /// roster can keep showing their name.
    Disconnected { since: Instant },

    /// Grace period elapsed; the record will be removed on the next
    /// cleanup pass.
    Expired,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single player's session on the server.
#[derive(Debug, Clone)]
pub struct Session {
    /// Verified identity and display name.
    pub profile: Profile,

    /// Current lifecycle state.
    pub state: SessionState,
}
