//! Per-connection handler: handshake, auth, and message routing.
//!
//! Each accepted connection gets its own Tokio task running this handler.
//! The flow is:
//!   1. Receive Handshake → validate version
//!   2. Authenticate token → get Profile
//!   3. Send HandshakeAck → player is connected
//!   4. Spawn the outbound pump: room broadcasts → wire messages
//!   5. Loop: receive envelopes → dispatch system or game messages

use std::sync::Arc;
use std::sync::Mutex as StdMutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parlor_protocol::{Codec, Envelope, Payload, PlayerId, RoomCode, SystemMessage};
use parlor_room::{PlayerSender, RoomError, RoomOutbound, TableGame};
use parlor_session::{Authenticator, Profile};
use parlor_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ParlorError;
use crate::server::{PROTOCOL_VERSION, ServerState};

/// How long to wait for the first (handshake) message.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Inactivity timeout for an established connection. Clients heartbeat
/// well inside this window.
const CLIENT_TIMEOUT: Duration = Duration::from_secs(30);

/// Drop guard that cleans up when the handler exits: the player's seat
/// is detached from their room (reserved mid-game, freed in the lobby)
/// and their session moves to the reconnect grace period.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, we spawn a fire-and-forget task for the async locks.
struct ConnectionGuard<G: TableGame, A: Authenticator, C: Codec> {
    player_id: PlayerId,
    state: Arc<ServerState<G, A, C>>,
}

impl<G: TableGame, A: Authenticator, C: Codec> Drop for ConnectionGuard<G, A, C> {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            state.rooms.lock().await.detach(player_id).await;
            let _ = state.sessions.lock().await.disconnect(player_id);
        });
    }
}

/// The room a connection's pump is currently attached to.
///
/// Shared between the inbound handler (which sets it on join/leave) and
/// the outbound pump (which needs the code to label lobby broadcasts).
/// A std mutex is fine: it is never held across an await.
type CurrentRoom = Arc<StdMutex<Option<RoomCode>>>;

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection<G, A, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<G, A, C>>,
) -> Result<(), ParlorError>
where
    G: TableGame,
    A: Authenticator,
    C: Codec,
{
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let start = Instant::now();
    let seq = Arc::new(AtomicU64::new(1));

    // --- Step 1: Handshake ---
    let profile = perform_handshake(&conn, &state, &seq, &start).await?;
    let player_id = profile.player_id;
    let display_name = profile.display_name.clone();

    // Register the session; a duplicate live connection is refused, a
    // disconnected one is silently replaced (this is the reconnect path).
    if let Err(e) = state.sessions.lock().await.connect(profile) {
        send_error(&conn, &state.codec, 409, &e.to_string(), &seq, &start).await?;
        return Err(ParlorError::Session(e));
    }
    let _guard = ConnectionGuard {
        player_id,
        state: Arc::clone(&state),
    };

    tracing::info!(%conn_id, %player_id, name = %display_name, "player authenticated");

    let ack = SystemMessage::HandshakeAck {
        player_id,
        display_name: display_name.clone(),
        server_time: start.elapsed().as_millis() as u64,
    };
    send_system(&conn, &state.codec, ack, &seq, &start).await?;

    // --- Step 2: Outbound pump ---
    // The room actor broadcasts on this channel; the pump translates
    // each message to the wire format. It runs concurrently with the
    // inbound loop below on a clone of the same connection.
    let (out_tx, out_rx) = mpsc::unbounded_channel::<RoomOutbound<G>>();
    let current_room: CurrentRoom = Arc::new(StdMutex::new(None));
    let pump = spawn_outbound_pump(
        conn.clone(),
        Arc::clone(&state),
        out_rx,
        Arc::clone(&current_room),
        Arc::clone(&seq),
        start,
    );

    // --- Step 3: Message loop ---
    loop {
        let data = match tokio::time::timeout(CLIENT_TIMEOUT, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                tracing::info!(%player_id, "connection closed cleanly");
                break;
            }
            Ok(Err(e)) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
            Err(_) => {
                tracing::info!(%player_id, "connection timed out");
                break;
            }
        };

        let envelope: Envelope = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "failed to decode envelope");
                continue;
            }
        };

        match envelope.payload {
            Payload::System(sys_msg) => {
                let should_close = handle_system_message(
                    &conn,
                    &state,
                    player_id,
                    &display_name,
                    sys_msg,
                    &out_tx,
                    &current_room,
                    &seq,
                    &start,
                )
                .await?;
                if should_close {
                    let _ = conn.close().await;
                    break;
                }
            }
            Payload::Game(game_data) => {
                handle_game_message::<G, A, C>(&conn, &state, player_id, game_data, &seq, &start)
                    .await?;
            }
        }
    }

    pump.abort();
    // _guard drops here → room detach and session disconnect fire.
    Ok(())
}

/// Spawns the task that forwards room broadcasts to this connection.
fn spawn_outbound_pump<G, A, C>(
    conn: WebSocketConnection,
    state: Arc<ServerState<G, A, C>>,
    mut out_rx: mpsc::UnboundedReceiver<RoomOutbound<G>>,
    current_room: CurrentRoom,
    seq: Arc<AtomicU64>,
    start: Instant,
) -> tokio::task::JoinHandle<()>
where
    G: TableGame,
    A: Authenticator,
    C: Codec,
{
    tokio::spawn(async move {
        while let Some(outbound) = out_rx.recv().await {
            let msg = match outbound {
                RoomOutbound::View(view) => match state.codec.encode(&view) {
                    Ok(data) => SystemMessage::GameState { data },
                    Err(e) => {
                        tracing::warn!(error = %e, "failed to encode game view");
                        continue;
                    }
                },
                RoomOutbound::Roster(players) => {
                    let code = current_room.lock().expect("room lock").clone();
                    match code {
                        Some(code) => SystemMessage::Lobby { code, players },
                        // Roster for a room we already left; stale.
                        None => continue,
                    }
                }
                RoomOutbound::Rejected(message) => SystemMessage::GameError { message },
            };

            if send_system(&conn, &state.codec, msg, &seq, &start)
                .await
                .is_err()
            {
                break;
            }
        }
    })
}

/// Performs the initial handshake: receive Handshake, validate, auth.
async fn perform_handshake<G, A, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<G, A, C>>,
    seq: &AtomicU64,
    start: &Instant,
) -> Result<Profile, ParlorError>
where
    G: TableGame,
    A: Authenticator,
    C: Codec,
{
    let data = match tokio::time::timeout(HANDSHAKE_TIMEOUT, conn.recv()).await {
        Ok(Ok(Some(data))) => data,
        Ok(Ok(None)) => {
            return Err(ParlorError::Protocol(
                parlor_protocol::ProtocolError::InvalidMessage(
                    "connection closed before handshake".into(),
                ),
            ));
        }
        Ok(Err(e)) => return Err(ParlorError::Transport(e)),
        Err(_) => {
            return Err(ParlorError::Protocol(
                parlor_protocol::ProtocolError::InvalidMessage("handshake timed out".into()),
            ));
        }
    };

    let envelope: Envelope = state.codec.decode(&data)?;

    let (version, token) = match envelope.payload {
        Payload::System(SystemMessage::Handshake { version, token }) => (version, token),
        _ => {
            send_error(conn, &state.codec, 400, "expected Handshake", seq, start).await?;
            return Err(ParlorError::Protocol(
                parlor_protocol::ProtocolError::InvalidMessage(
                    "first message must be Handshake".into(),
                ),
            ));
        }
    };

    if version != PROTOCOL_VERSION {
        send_error(
            conn,
            &state.codec,
            400,
            &format!("version mismatch: expected {PROTOCOL_VERSION}, got {version}"),
            seq,
            start,
        )
        .await?;
        return Err(ParlorError::Protocol(
            parlor_protocol::ProtocolError::InvalidMessage("protocol version mismatch".into()),
        ));
    }

    let token_str = token.as_deref().unwrap_or("");
    match state.auth.authenticate(token_str).await {
        Ok(profile) => Ok(profile),
        Err(e) => {
            send_error(conn, &state.codec, 401, "unauthorized", seq, start).await?;
            Err(ParlorError::Session(e))
        }
    }
}

/// Handles a system message. Returns `true` if the connection should close.
#[allow(clippy::too_many_arguments)]
async fn handle_system_message<G, A, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<G, A, C>>,
    player_id: PlayerId,
    display_name: &str,
    msg: SystemMessage,
    out_tx: &PlayerSender<G>,
    current_room: &CurrentRoom,
    seq: &AtomicU64,
    start: &Instant,
) -> Result<bool, ParlorError>
where
    G: TableGame,
    A: Authenticator,
    C: Codec,
{
    match msg {
        SystemMessage::Heartbeat { client_time } => {
            let ack = SystemMessage::HeartbeatAck {
                client_time,
                server_time: start.elapsed().as_millis() as u64,
            };
            send_system(conn, &state.codec, ack, seq, start).await?;
        }

        SystemMessage::CreateRoom => {
            let code = state.rooms.lock().await.create_room(G::Config::default());
            attach_to_room(
                conn,
                state,
                player_id,
                display_name,
                code,
                out_tx,
                current_room,
                seq,
                start,
            )
            .await?;
        }

        SystemMessage::JoinRoom { code } => {
            attach_to_room(
                conn,
                state,
                player_id,
                display_name,
                code,
                out_tx,
                current_room,
                seq,
                start,
            )
            .await?;
        }

        SystemMessage::StartGame => {
            let result = state.rooms.lock().await.start_game(player_id).await;
            if let Err(e) = result {
                send_error(
                    conn,
                    &state.codec,
                    room_error_code(&e),
                    &e.to_string(),
                    seq,
                    start,
                )
                .await?;
            }
        }

        SystemMessage::LeaveRoom => {
            let leave_result = {
                let mut rooms = state.rooms.lock().await;
                let result = rooms.leave_room(player_id).await;
                // Mid-game the seat stays reserved and the player stays
                // bound to the room; only a freed seat clears the pump.
                *current_room.lock().expect("room lock") = rooms.player_room(&player_id).cloned();
                result
            };
            if let Err(e) = leave_result {
                tracing::debug!(%player_id, error = %e, "leave room failed");
            }
        }

        SystemMessage::Disconnect { reason } => {
            tracing::info!(%player_id, %reason, "client disconnected");
            return Ok(true);
        }

        _ => {
            tracing::debug!(%player_id, "ignoring unexpected system message");
        }
    }

    Ok(false)
}

/// Seats the player in a room (or re-attaches them to a reserved seat)
/// and replies with `RoomJoined` or an error.
#[allow(clippy::too_many_arguments)]
async fn attach_to_room<G, A, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<G, A, C>>,
    player_id: PlayerId,
    display_name: &str,
    code: RoomCode,
    out_tx: &PlayerSender<G>,
    current_room: &CurrentRoom,
    seq: &AtomicU64,
    start: &Instant,
) -> Result<(), ParlorError>
where
    G: TableGame,
    A: Authenticator,
    C: Codec,
{
    // Point the pump at the room before joining: the roster broadcast
    // can arrive before the join reply is even sent.
    let previous = {
        let mut current = current_room.lock().expect("room lock");
        std::mem::replace(&mut *current, Some(code.clone()))
    };

    let join_result = {
        let mut rooms = state.rooms.lock().await;
        rooms
            .join_room(player_id, display_name.to_string(), &code, out_tx.clone())
            .await
    };

    match join_result {
        Ok(seat) => {
            let resp = SystemMessage::RoomJoined { code, seat };
            send_system(conn, &state.codec, resp, seq, start).await?;
        }
        Err(e) => {
            *current_room.lock().expect("room lock") = previous;
            send_error(
                conn,
                &state.codec,
                room_error_code(&e),
                &e.to_string(),
                seq,
                start,
            )
            .await?;
        }
    }
    Ok(())
}

/// Handles a game message: decode the action, route to the player's room.
async fn handle_game_message<G, A, C>(
    conn: &WebSocketConnection,
    state: &Arc<ServerState<G, A, C>>,
    player_id: PlayerId,
    game_data: Vec<u8>,
    seq: &AtomicU64,
    start: &Instant,
) -> Result<(), ParlorError>
where
    G: TableGame,
    A: Authenticator,
    C: Codec,
{
    // An action outside the game's closed enum fails right here, before
    // any rules run.
    let action: G::Action = match state.codec.decode(&game_data) {
        Ok(action) => action,
        Err(e) => {
            send_error(
                conn,
                &state.codec,
                400,
                &format!("invalid game action: {e}"),
                seq,
                start,
            )
            .await?;
            return Ok(());
        }
    };

    // Rule rejections come back on the pump channel; only routing
    // failures (not in a room, room gone) are reported here.
    let result = state.rooms.lock().await.route_action(player_id, action).await;

    if let Err(e) = result {
        send_error(
            conn,
            &state.codec,
            room_error_code(&e),
            &e.to_string(),
            seq,
            start,
        )
        .await?;
    }

    Ok(())
}

/// Maps a room error to an HTTP-convention status code for the wire.
fn room_error_code(err: &RoomError) -> u16 {
    match err {
        RoomError::NotFound(_) => 404,
        RoomError::NotInRoom(_) => 400,
        RoomError::NotHost(_) => 403,
        RoomError::RoomFull(_)
        | RoomError::AlreadyInRoom(..)
        | RoomError::NotEnoughPlayers { .. }
        | RoomError::InvalidState(_) => 409,
        RoomError::Unavailable(_) => 503,
    }
}

/// Sends a system message wrapped in a fresh envelope.
async fn send_system(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    msg: SystemMessage,
    seq: &AtomicU64,
    start: &Instant,
) -> Result<(), ParlorError> {
    let envelope = Envelope {
        seq: seq.fetch_add(1, Ordering::Relaxed),
        timestamp: start.elapsed().as_millis() as u64,
        payload: Payload::System(msg),
    };
    let bytes = codec.encode(&envelope)?;
    conn.send(&bytes).await.map_err(ParlorError::Transport)
}

/// Sends a `SystemMessage::Error` envelope to the client.
async fn send_error(
    conn: &WebSocketConnection,
    codec: &impl Codec,
    code: u16,
    message: &str,
    seq: &AtomicU64,
    start: &Instant,
) -> Result<(), ParlorError> {
    send_system(
        conn,
        codec,
        SystemMessage::Error {
            code,
            message: message.to_string(),
        },
        seq,
        start,
    )
    .await
}
