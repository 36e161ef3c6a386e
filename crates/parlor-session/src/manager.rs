//! The session manager: tracks all active player sessions.
//!
//! # Concurrency note
//!
//! `SessionManager` is NOT thread-safe by itself — it uses a plain
//! `HashMap`. This is intentional: it is owned by the server and accessed
//! through a mutex at a higher level, which keeps this layer free of
//! hidden locking.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parlor_protocol::PlayerId;

use crate::{Profile, Session, SessionConfig, SessionError, SessionState};

/// Registry of every player currently connected (or recently disconnected).
///
/// ## Lifecycle
///
/// ```text
/// connect(profile) ──→ [Connected] ──disconnect()──→ [Disconnected]
///                          ↑                              │
///                          │ connect() (same identity)    ▼ expire_stale()
///                          └────────────────────────  [Expired] ──→ cleanup_expired()
/// ```
pub struct SessionManager {
    /// All sessions, keyed by player ID. A player has at most one.
    sessions: HashMap<PlayerId, Session>,

    /// Grace period configuration.
    config: SessionConfig,
}

impl SessionManager {
    /// Creates a new, empty session manager with the given config.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    /// Registers a freshly authenticated connection.
    ///
    /// A Disconnected or Expired record for the same identity is silently
    /// replaced — that is the re-attachment path after a network drop.
    ///
    /// # Errors
    /// Returns [`SessionError::AlreadyConnected`] if the player already has
    /// a live connection; a second concurrent login is rejected rather
    /// than hijacking the first.
    pub fn connect(&mut self, profile: Profile) -> Result<&Session, SessionError> {
        let player_id = profile.player_id;
        if let Some(existing) = self.sessions.get(&player_id) {
            if matches!(existing.state, SessionState::Connected) {
                return Err(SessionError::AlreadyConnected(player_id));
            }
        }

        self.sessions.insert(
            player_id,
            Session {
                profile,
                state: SessionState::Connected,
            },
        );

        tracing::info!(%player_id, "session created");
        Ok(self
            .sessions
            .get(&player_id)
            .expect("inserted on the line above"))
    }

    /// Marks a player as disconnected. Starts the grace period.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn disconnect(&mut self, player_id: PlayerId) -> Result<(), SessionError> {
        let session = self
            .sessions
            .get_mut(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;

        session.state = SessionState::Disconnected {
            since: Instant::now(),
        };

        tracing::info!(%player_id, "player disconnected, grace period started");
        Ok(())
    }

    /// Scans all sessions and expires any past the grace period.
    ///
    /// Called periodically by the server's sweep task. Returns the player
    /// IDs that were expired so higher layers can react (e.g., log a
    /// permanently abandoned seat) before `cleanup_expired` deletes them.
    pub fn expire_stale(&mut self) -> Vec<PlayerId> {
        let grace = Duration::from_secs(self.config.disconnect_grace_secs);
        let mut expired = Vec::new();

        for session in self.sessions.values_mut() {
            if let SessionState::Disconnected { since } = &session.state
                && since.elapsed() > grace
            {
                session.state = SessionState::Expired;
                expired.push(session.profile.player_id);
                tracing::info!(
                    player_id = %session.profile.player_id,
                    "session expired (grace period elapsed)"
                );
            }
        }

        expired
    }

    /// Removes all expired sessions, freeing memory.
    pub fn cleanup_expired(&mut self) {
        self.sessions
            .retain(|_, session| !matches!(session.state, SessionState::Expired));
    }

    /// Looks up a session by player ID.
    pub fn get(&self, player_id: &PlayerId) -> Option<&Session> {
        self.sessions.get(player_id)
    }

    /// Returns the display name for a player, if their session is still
    /// remembered.
    pub fn display_name(&self, player_id: &PlayerId) -> Option<&str> {
        self.sessions
            .get(player_id)
            .map(|s| s.profile.display_name.as_str())
    }

    /// Returns the number of tracked sessions (any state).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Returns `true` if there are no sessions.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
