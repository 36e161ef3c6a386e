//! Room actor: an isolated Tokio task that owns one game instance.
//!
//! Each room runs in its own task, communicating with the outside world
//! through an mpsc channel. This is the "actor model" — no shared
//! mutable state, just message passing.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parlor_protocol::{PlayerId, RoomCode, SeatEntry};
use tokio::sync::{mpsc, oneshot};

use crate::{GameRng, RoomError, RoomPhase, TableConfig, TableGame};

/// An outbound message from the room actor to a player's connection handler.
#[derive(Debug)]
pub enum RoomOutbound<G: TableGame> {
    /// This seat's filtered snapshot of the game state.
    View(G::View),
    /// The current roster, in seat order (seat 0 is the host).
    Roster(Vec<SeatEntry>),
    /// An action was rejected. Sent only to the seat that submitted it;
    /// nobody else learns an attempt was made.
    Rejected(String),
}

impl<G: TableGame> Clone for RoomOutbound<G> {
    fn clone(&self) -> Self {
        match self {
            Self::View(v) => Self::View(v.clone()),
            Self::Roster(r) => Self::Roster(r.clone()),
            Self::Rejected(m) => Self::Rejected(m.clone()),
        }
    }
}

/// Channel sender for delivering outbound messages to a player.
pub type PlayerSender<G> = mpsc::UnboundedSender<RoomOutbound<G>>;

/// Commands sent to a room actor through its channel.
///
/// The `oneshot::Sender` in some variants is a "reply channel" — the
/// caller sends a command and waits for the response on that channel.
pub(crate) enum RoomCommand<G: TableGame> {
    /// Seat a player, or re-attach a dropped player to their seat.
    Join {
        player_id: PlayerId,
        name: String,
        sender: PlayerSender<G>,
        reply: oneshot::Sender<Result<usize, RoomError>>,
    },

    /// Remove a player. Replies with `true` if their seat was freed
    /// (lobby), `false` if the seat stays reserved (game running).
    Leave {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<bool, RoomError>>,
    },

    /// The player's connection dropped. Their seat stays reserved.
    Detach { player_id: PlayerId },

    /// The host asks to start the game.
    Start {
        player_id: PlayerId,
        reply: oneshot::Sender<Result<(), RoomError>>,
    },

    /// Deliver a game action from a player.
    Action {
        player_id: PlayerId,
        action: G::Action,
    },

    /// Request the current room metadata.
    GetInfo { reply: oneshot::Sender<RoomInfo> },

    /// Shut down the room.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    /// The room's join code.
    pub code: RoomCode,
    /// Current lifecycle phase.
    pub phase: RoomPhase,
    /// Number of occupied seats.
    pub player_count: usize,
    /// Maximum players allowed.
    pub max_players: usize,
    /// Time since the last join, start, or accepted action.
    pub idle_for: Duration,
}

/// Handle to a running room actor. Used to send commands to it.
///
/// Cheap to clone — it's just an `mpsc::Sender` wrapper. The
/// `RoomManager` holds one of these per room.
pub struct RoomHandle<G: TableGame> {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand<G>>,
}

impl<G: TableGame> Clone for RoomHandle<G> {
    fn clone(&self) -> Self {
        Self {
            code: self.code.clone(),
            sender: self.sender.clone(),
        }
    }
}

impl<G: TableGame> RoomHandle<G> {
    /// Returns the room's join code.
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Seats a player (or re-attaches them). Returns their seat index.
    pub async fn join(
        &self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender<G>,
    ) -> Result<usize, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                name,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Removes a player. `Ok(true)` means the seat was freed.
    pub async fn leave(&self, player_id: PlayerId) -> Result<bool, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Leave {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Reports a dropped connection (fire-and-forget).
    pub async fn detach(&self, player_id: PlayerId) {
        let _ = self.sender.send(RoomCommand::Detach { player_id }).await;
    }

    /// Asks the room to start its game. Host only.
    pub async fn start(&self, player_id: PlayerId) -> Result<(), RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Start {
                player_id,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Sends a game action to the room (fire-and-forget).
    ///
    /// Rule outcomes, including rejections, come back on the player's
    /// outbound channel, not on this call.
    pub async fn action(&self, player_id: PlayerId, action: G::Action) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Action { player_id, action })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Requests the current room info.
    pub async fn get_info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::GetInfo { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor<G: TableGame> {
    code: RoomCode,
    phase: RoomPhase,
    config: TableConfig,
    game_config: G::Config,
    /// Occupied seats in join order. Seat 0 is the host. Once the game
    /// starts this list never changes; only `connected` flags do.
    seats: Vec<SeatEntry>,
    /// Live outbound channels, keyed by identity. A seat without an
    /// entry here is occupied but disconnected.
    senders: HashMap<PlayerId, PlayerSender<G>>,
    game: Option<G::State>,
    rng: GameRng,
    receiver: mpsc::Receiver<RoomCommand<G>>,
    last_activity: Instant,
    ever_joined: bool,
}

impl<G: TableGame> RoomActor<G> {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!(code = %self.code, "room actor started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                RoomCommand::Join {
                    player_id,
                    name,
                    sender,
                    reply,
                } => {
                    let result = self.handle_join(player_id, name, sender);
                    let _ = reply.send(result);
                }
                RoomCommand::Leave { player_id, reply } => {
                    let result = self.handle_leave(player_id);
                    let _ = reply.send(result);
                }
                RoomCommand::Detach { player_id } => {
                    self.handle_detach(player_id);
                }
                RoomCommand::Start { player_id, reply } => {
                    let result = self.handle_start(player_id);
                    let _ = reply.send(result);
                }
                RoomCommand::Action { player_id, action } => {
                    self.handle_action(player_id, action);
                }
                RoomCommand::GetInfo { reply } => {
                    let _ = reply.send(self.info());
                }
                RoomCommand::Shutdown => {
                    tracing::info!(code = %self.code, "room shutting down");
                    self.phase = RoomPhase::Destroying;
                    break;
                }
            }

            // A room with no seats left has no way to become useful again.
            if self.ever_joined && self.seats.is_empty() {
                tracing::info!(code = %self.code, "room emptied, stopping");
                self.phase = RoomPhase::Destroying;
                break;
            }
        }

        tracing::info!(code = %self.code, "room actor stopped");
    }

    fn handle_join(
        &mut self,
        player_id: PlayerId,
        name: String,
        sender: PlayerSender<G>,
    ) -> Result<usize, RoomError> {
        // Re-attachment: the identity already holds a seat.
        if let Some(seat) = self.seat_of(player_id) {
            if self.seats[seat].connected {
                return Err(RoomError::AlreadyInRoom(player_id, self.code.clone()));
            }
            self.seats[seat].connected = true;
            self.senders.insert(player_id, sender);
            self.touch();
            tracing::info!(code = %self.code, %player_id, seat, "player re-attached");

            self.broadcast_roster();
            if let Some(state) = &self.game {
                self.send_to(player_id, RoomOutbound::View(G::view(state, seat)));
            }
            return Ok(seat);
        }

        if !self.phase.is_joinable() {
            return Err(RoomError::InvalidState(format!(
                "cannot join room in phase {}",
                self.phase
            )));
        }
        if self.seats.len() >= self.config.max_players {
            return Err(RoomError::RoomFull(self.code.clone()));
        }

        let seat = self.seats.len();
        self.seats.push(SeatEntry {
            player_id,
            name,
            connected: true,
        });
        self.senders.insert(player_id, sender);
        self.ever_joined = true;
        self.touch();
        tracing::info!(
            code = %self.code,
            %player_id,
            seat,
            players = self.seats.len(),
            "player joined"
        );

        self.broadcast_roster();
        Ok(seat)
    }

    fn handle_leave(&mut self, player_id: PlayerId) -> Result<bool, RoomError> {
        let seat = self
            .seat_of(player_id)
            .ok_or(RoomError::NotInRoom(player_id))?;

        // Once the game is running, seats are fixed: leaving only detaches
        // the connection and the seat waits for a rejoin.
        if self.game.is_some() && self.phase != RoomPhase::Finished {
            self.handle_detach(player_id);
            return Ok(false);
        }

        self.seats.remove(seat);
        self.senders.remove(&player_id);
        tracing::info!(
            code = %self.code,
            %player_id,
            players = self.seats.len(),
            "player left"
        );

        self.broadcast_roster();
        Ok(true)
    }

    fn handle_detach(&mut self, player_id: PlayerId) {
        let Some(seat) = self.seat_of(player_id) else {
            return;
        };

        // In the lobby a drop is the same as leaving.
        if self.phase == RoomPhase::Lobby {
            self.seats.remove(seat);
            self.senders.remove(&player_id);
            tracing::info!(code = %self.code, %player_id, "player dropped in lobby, seat freed");
        } else {
            self.seats[seat].connected = false;
            self.senders.remove(&player_id);
            tracing::info!(code = %self.code, %player_id, seat, "player dropped, seat reserved");
        }

        self.broadcast_roster();
    }

    fn handle_start(&mut self, player_id: PlayerId) -> Result<(), RoomError> {
        if self.phase != RoomPhase::Lobby {
            return Err(RoomError::InvalidState(format!(
                "cannot start game in phase {}",
                self.phase
            )));
        }
        if self.seats.first().map(|s| s.player_id) != Some(player_id) {
            return Err(RoomError::NotHost(player_id));
        }
        if self.seats.len() < self.config.min_players {
            return Err(RoomError::NotEnoughPlayers {
                needed: self.config.min_players,
                seated: self.seats.len(),
            });
        }

        let players: Vec<PlayerId> = self.seats.iter().map(|s| s.player_id).collect();
        self.game = Some(G::init(&self.game_config, &players, &mut self.rng));
        self.phase = RoomPhase::InGame;
        self.touch();
        tracing::info!(
            code = %self.code,
            players = players.len(),
            "game started"
        );

        self.broadcast_views();
        Ok(())
    }

    fn handle_action(&mut self, player_id: PlayerId, action: G::Action) {
        let Some(seat) = self.seat_of(player_id) else {
            tracing::warn!(code = %self.code, %player_id, "action from non-member, ignoring");
            return;
        };

        if self.phase != RoomPhase::InGame {
            self.send_to(
                player_id,
                RoomOutbound::Rejected("no game in progress".to_string()),
            );
            return;
        }

        let state = match &mut self.game {
            Some(s) => s,
            None => return,
        };

        // Rejected actions mutate nothing and are reported only to the
        // seat that sent them.
        if let Err(reason) = G::validate(state, seat, &action) {
            tracing::debug!(code = %self.code, %player_id, seat, %reason, "action rejected");
            self.send_to(player_id, RoomOutbound::Rejected(reason));
            return;
        }

        G::apply(state, seat, action, &mut self.rng);
        let over = G::is_over(state);
        self.touch();

        self.broadcast_views();

        if over {
            self.phase = RoomPhase::Finished;
            tracing::info!(code = %self.code, "game finished");
        }
    }

    /// Sends every seat its own filtered snapshot.
    fn broadcast_views(&self) {
        let Some(state) = &self.game else { return };
        for (seat, entry) in self.seats.iter().enumerate() {
            self.send_to(entry.player_id, RoomOutbound::View(G::view(state, seat)));
        }
    }

    /// Sends the current roster to everyone.
    fn broadcast_roster(&self) {
        let roster = self.seats.clone();
        for entry in &self.seats {
            self.send_to(entry.player_id, RoomOutbound::Roster(roster.clone()));
        }
    }

    /// Sends an outbound message to a single player. Silently drops if
    /// the receiver is gone (player disconnected).
    fn send_to(&self, player_id: PlayerId, msg: RoomOutbound<G>) {
        if let Some(sender) = self.senders.get(&player_id) {
            let _ = sender.send(msg);
        }
    }

    fn seat_of(&self, player_id: PlayerId) -> Option<usize> {
        self.seats.iter().position(|s| s.player_id == player_id)
    }

    fn touch(&mut self) {
        self.last_activity = Instant::now();
    }

    fn info(&self) -> RoomInfo {
        RoomInfo {
            code: self.code.clone(),
            phase: self.phase,
            player_count: self.seats.len(),
            max_players: self.config.max_players,
            idle_for: self.last_activity.elapsed(),
        }
    }
}

/// Spawns a new room actor task and returns a handle to communicate with it.
///
/// `channel_size` controls backpressure — if the channel fills up,
/// senders will wait (bounded channel).
pub(crate) fn spawn_room<G: TableGame>(
    code: RoomCode,
    config: TableConfig,
    game_config: G::Config,
    rng: GameRng,
    channel_size: usize,
) -> RoomHandle<G> {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor::<G> {
        code: code.clone(),
        phase: RoomPhase::Lobby,
        config,
        game_config,
        seats: Vec::new(),
        senders: HashMap::new(),
        game: None,
        rng,
        receiver: rx,
        last_activity: Instant::now(),
        ever_joined: false,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
