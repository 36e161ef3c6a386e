//! Room manager: creates rooms, generates join codes, routes players.

use std::collections::HashMap;
use std::time::Duration;

use parlor_protocol::{CODE_LEN, PlayerId, RoomCode};

use crate::room::spawn_room;
use crate::{GameRng, PlayerSender, RoomError, RoomHandle, RoomInfo, RoomPhase, TableGame};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Manages all active rooms and tracks which player is in which room.
///
/// This is the entry point for room operations from higher layers
/// (the connection handler, the idle sweep task).
pub struct RoomManager<G: TableGame> {
    /// Active rooms, keyed by join code.
    rooms: HashMap<RoomCode, RoomHandle<G>>,

    /// Maps each player to the room they're currently in.
    /// A player can be in at most ONE room at a time (key invariant).
    player_rooms: HashMap<PlayerId, RoomCode>,

    /// Source of join codes and of every room's game randomness.
    rng: GameRng,
}

impl<G: TableGame> RoomManager<G> {
    /// Creates a manager seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(GameRng::from_entropy())
    }

    /// Creates a manager with a fixed seed. Every room it spawns gets a
    /// deterministic fork, so a whole server run can be replayed.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(GameRng::new(seed))
    }

    fn with_rng(rng: GameRng) -> Self {
        Self {
            rooms: HashMap::new(),
            player_rooms: HashMap::new(),
            rng,
        }
    }

    /// Creates a new room and returns its join code.
    pub fn create_room(&mut self, game_config: G::Config) -> RoomCode {
        let code = self.generate_code();
        let config = G::table();
        let handle = spawn_room::<G>(
            code.clone(),
            config,
            game_config,
            self.rng.fork(),
            DEFAULT_CHANNEL_SIZE,
        );
        self.rooms.insert(code.clone(), handle);
        tracing::info!(%code, "room created");
        code
    }

    /// Draws a fresh join code, retrying on the (rare) collision with a
    /// live room.
    fn generate_code(&mut self) -> RoomCode {
        loop {
            let mut indices = [0u8; CODE_LEN];
            for i in &mut indices {
                *i = self.rng.index(32) as u8;
            }
            let code = RoomCode::from_indices(indices);
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }

    /// Seats a player in a room (or re-attaches them to their seat).
    ///
    /// Enforces the "one room at a time" invariant. Returns the seat
    /// index assigned by the room.
    pub async fn join_room(
        &mut self,
        player_id: PlayerId,
        name: String,
        code: &RoomCode,
        sender: PlayerSender<G>,
    ) -> Result<usize, RoomError> {
        if let Some(current) = self.player_rooms.get(&player_id)
            && current != code
        {
            return Err(RoomError::InvalidState(format!(
                "player {} is already in room {}",
                player_id, current
            )));
        }

        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        let seat = handle.join(player_id, name, sender).await?;
        self.player_rooms.insert(player_id, code.clone());
        Ok(seat)
    }

    /// Removes a player from their current room.
    ///
    /// In the lobby this frees their seat; mid-game it only detaches
    /// their connection (the seat waits for a rejoin, and the player
    /// stays bound to the room).
    pub async fn leave_room(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        let code = self
            .player_rooms
            .get(&player_id)
            .cloned()
            .ok_or(RoomError::NotInRoom(player_id))?;

        let seat_freed = match self.rooms.get(&code) {
            Some(handle) => handle.leave(player_id).await?,
            None => true,
        };

        if seat_freed {
            self.player_rooms.remove(&player_id);
        }
        Ok(())
    }

    /// Reports a dropped connection to the player's room, if any.
    ///
    /// Lobby seats are freed on a drop; in-game seats stay reserved.
    pub async fn detach(&mut self, player_id: PlayerId) {
        let Some(code) = self.player_rooms.get(&player_id).cloned() else {
            return;
        };
        let Some(handle) = self.rooms.get(&code) else {
            return;
        };

        let in_lobby = matches!(
            handle.get_info().await.map(|i| i.phase),
            Ok(RoomPhase::Lobby)
        );
        handle.detach(player_id).await;
        if in_lobby {
            self.player_rooms.remove(&player_id);
        }
    }

    /// Asks a player's current room to start its game.
    pub async fn start_game(&self, player_id: PlayerId) -> Result<(), RoomError> {
        let code = self
            .player_rooms
            .get(&player_id)
            .ok_or(RoomError::NotInRoom(player_id))?;
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.start(player_id).await
    }

    /// Routes a game action from a player to their current room.
    pub async fn route_action(
        &self,
        player_id: PlayerId,
        action: G::Action,
    ) -> Result<(), RoomError> {
        let code = self
            .player_rooms
            .get(&player_id)
            .ok_or(RoomError::NotInRoom(player_id))?;
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.action(player_id, action).await
    }

    /// Returns info about a specific room.
    pub async fn get_room_info(&self, code: &RoomCode) -> Result<RoomInfo, RoomError> {
        let handle = self
            .rooms
            .get(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;
        handle.get_info().await
    }

    /// Shuts down a room and removes all its players from the index.
    pub async fn destroy_room(&mut self, code: &RoomCode) -> Result<(), RoomError> {
        let handle = self
            .rooms
            .remove(code)
            .ok_or_else(|| RoomError::NotFound(code.clone()))?;

        let _ = handle.shutdown().await;
        self.player_rooms.retain(|_, c| c != code);

        tracing::info!(%code, "room destroyed");
        Ok(())
    }

    /// Destroys rooms that are finished or have been idle too long.
    ///
    /// Called periodically by the server's sweep task. Rooms whose actor
    /// has already stopped (e.g., everyone left) are pruned as well.
    /// Returns the codes that were removed.
    pub async fn sweep_idle(&mut self, max_idle: Duration) -> Vec<RoomCode> {
        let mut doomed = Vec::new();
        for (code, handle) in &self.rooms {
            match handle.get_info().await {
                Ok(info) if info.phase == RoomPhase::Finished || info.idle_for >= max_idle => {
                    doomed.push(code.clone());
                }
                Ok(_) => {}
                Err(_) => doomed.push(code.clone()),
            }
        }

        for code in &doomed {
            if let Some(handle) = self.rooms.remove(code) {
                let _ = handle.shutdown().await;
            }
            self.player_rooms.retain(|_, c| c != code);
            tracing::info!(%code, "room swept");
        }
        doomed
    }

    /// Returns the room code a player is currently bound to, if any.
    pub fn player_room(&self, player_id: &PlayerId) -> Option<&RoomCode> {
        self.player_rooms.get(player_id)
    }

    /// Returns the number of active rooms.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl<G: TableGame> Default for RoomManager<G> {
    fn default() -> Self {
        Self::new()
    }
}
