//! Table configuration and room lifecycle state machine.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TableConfig
// ---------------------------------------------------------------------------

/// Seating limits for a game type.
///
/// Game developers override the defaults by implementing
/// [`TableGame::table`](crate::TableGame::table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableConfig {
    /// Minimum players required before the host can start.
    pub min_players: usize,

    /// Maximum players allowed at the table.
    pub max_players: usize,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            min_players: 2,
            max_players: 8,
        }
    }
}

// ---------------------------------------------------------------------------
// RoomPhase
// ---------------------------------------------------------------------------

/// The lifecycle phase of a room.
///
/// ```text
/// Lobby → InGame → Finished → Destroying
/// ```
///
/// - **Lobby**: Room exists, accepting joins. The game starts only when
///   the host explicitly asks for it — reaching the minimum player count
///   changes nothing by itself.
/// - **InGame**: A game is running. Seats are fixed; new identities
///   cannot join, but a dropped player can re-attach to their seat.
/// - **Finished**: The game ended. Players can see the final state but
///   can no longer act.
/// - **Destroying**: The room is being torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomPhase {
    Lobby,
    InGame,
    Finished,
    Destroying,
}

impl RoomPhase {
    /// Returns `true` if new players may take a seat.
    pub fn is_joinable(&self) -> bool {
        matches!(self, Self::Lobby)
    }

    /// Returns `true` if a game is running.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::InGame)
    }
}

impl std::fmt::Display for RoomPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Lobby => write!(f, "Lobby"),
            Self::InGame => write!(f, "InGame"),
            Self::Finished => write!(f, "Finished"),
            Self::Destroying => write!(f, "Destroying"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_lobby_is_joinable() {
        assert!(RoomPhase::Lobby.is_joinable());
        assert!(!RoomPhase::InGame.is_joinable());
        assert!(!RoomPhase::Finished.is_joinable());
        assert!(!RoomPhase::Destroying.is_joinable());
    }

    #[test]
    fn test_only_in_game_is_active() {
        assert!(!RoomPhase::Lobby.is_active());
        assert!(RoomPhase::InGame.is_active());
        assert!(!RoomPhase::Finished.is_active());
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(RoomPhase::Lobby.to_string(), "Lobby");
        assert_eq!(RoomPhase::InGame.to_string(), "InGame");
    }

    #[test]
    fn test_table_config_default() {
        let config = TableConfig::default();
        assert_eq!(config.min_players, 2);
        assert_eq!(config.max_players, 8);
    }
}
