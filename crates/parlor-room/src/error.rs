//! Error types for the room layer.

use parlor_protocol::{PlayerId, RoomCode};

/// Errors that can occur during room operations.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// No room exists with this code.
    #[error("room {0} not found")]
    NotFound(RoomCode),

    /// Every seat is taken.
    #[error("room {0} is full")]
    RoomFull(RoomCode),

    /// The player already holds a connected seat in this room.
    #[error("player {0} already in room {1}")]
    AlreadyInRoom(PlayerId, RoomCode),

    /// The player does not hold a seat in any room.
    #[error("player {0} is not in a room")]
    NotInRoom(PlayerId),

    /// Only the host (seat 0) may perform this operation.
    #[error("player {0} is not the host")]
    NotHost(PlayerId),

    /// Too few players seated to start the game.
    #[error("need at least {needed} players to start, have {seated}")]
    NotEnoughPlayers { needed: usize, seated: usize },

    /// The room's phase does not allow this operation.
    /// For example, joining a room whose game is already running.
    #[error("invalid room state for this operation: {0}")]
    InvalidState(String),

    /// The room's command channel is full or closed.
    #[error("room {0} is unavailable")]
    Unavailable(RoomCode),
}
