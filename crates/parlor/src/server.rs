//! `ParlorServer` builder and server loop.
//!
//! This is the entry point for running a Parlor game server. It ties
//! together all the layers: transport → protocol → session → room.

use std::sync::Arc;
use std::time::Duration;

use parlor_protocol::{Codec, JsonCodec};
use parlor_room::{RoomManager, TableGame};
use parlor_session::{Authenticator, SessionConfig, SessionManager};
use parlor_transport::{Transport, WebSocketTransport};
use tokio::sync::Mutex;

use crate::ParlorError;
use crate::handler::handle_connection;

/// The current protocol version. Clients must send this in their
/// handshake or be rejected.
pub const PROTOCOL_VERSION: u32 = 1;

/// Shared server state passed to each connection handler task.
///
/// Wrapped in `Arc` so it can be cheaply cloned across tasks.
/// Interior mutability via `Mutex` where needed.
pub(crate) struct ServerState<G: TableGame, A: Authenticator, C: Codec> {
    pub(crate) sessions: Mutex<SessionManager>,
    pub(crate) rooms: Mutex<RoomManager<G>>,
    pub(crate) auth: A,
    pub(crate) codec: C,
}

/// Builder for configuring and starting a Parlor server.
///
/// # Example
///
/// ```rust,ignore
/// use parlor::prelude::*;
///
/// let server = ParlorServer::builder()
///     .bind("0.0.0.0:8080")
///     .build::<Meyer>(my_auth)
///     .await?;
/// server.run().await
/// ```
pub struct ParlorServerBuilder {
    bind_addr: String,
    session_config: SessionConfig,
    seed: Option<u64>,
    room_idle_timeout: Duration,
    sweep_interval: Duration,
}

impl ParlorServerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bind_addr: "127.0.0.1:8080".to_string(),
            session_config: SessionConfig::default(),
            seed: None,
            room_idle_timeout: Duration::from_secs(30 * 60),
            sweep_interval: Duration::from_secs(60),
        }
    }

    /// Sets the address to bind the server to.
    pub fn bind(mut self, addr: &str) -> Self {
        self.bind_addr = addr.to_string();
        self
    }

    /// Sets the session configuration.
    pub fn session_config(mut self, config: SessionConfig) -> Self {
        self.session_config = config;
        self
    }

    /// Fixes the server's RNG seed. Every room gets a deterministic
    /// fork, so a whole run (shuffles, dice, room codes) can be
    /// replayed. Intended for tests and bug reproduction.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Sets how long a room may sit idle before the sweep destroys it.
    pub fn room_idle_timeout(mut self, timeout: Duration) -> Self {
        self.room_idle_timeout = timeout;
        self
    }

    /// Sets how often the idle sweep runs.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Builds and starts the server with the given authenticator.
    ///
    /// Uses `JsonCodec` and `WebSocketTransport` as defaults.
    pub async fn build<G: TableGame>(
        self,
        auth: impl Authenticator,
    ) -> Result<ParlorServer<G, impl Authenticator, JsonCodec>, ParlorError> {
        let transport = WebSocketTransport::bind(&self.bind_addr).await?;

        let rooms = match self.seed {
            Some(seed) => RoomManager::with_seed(seed),
            None => RoomManager::new(),
        };

        let state = Arc::new(ServerState {
            sessions: Mutex::new(SessionManager::new(self.session_config)),
            rooms: Mutex::new(rooms),
            auth,
            codec: JsonCodec,
        });

        Ok(ParlorServer {
            transport,
            state,
            room_idle_timeout: self.room_idle_timeout,
            sweep_interval: self.sweep_interval,
        })
    }
}

impl Default for ParlorServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A running Parlor game server.
///
/// Call [`run()`](Self::run) to start accepting connections.
pub struct ParlorServer<G: TableGame, A: Authenticator, C: Codec> {
    transport: WebSocketTransport,
    state: Arc<ServerState<G, A, C>>,
    room_idle_timeout: Duration,
    sweep_interval: Duration,
}

impl<G, A, C> ParlorServer<G, A, C>
where
    G: TableGame,
    A: Authenticator,
    C: Codec + Clone + 'static,
{
    /// Creates a new builder.
    pub fn builder() -> ParlorServerBuilder {
        ParlorServerBuilder::new()
    }

    /// Returns the local address the server is bound to.
    pub fn local_addr(&self) -> std::io::Result<std::net::SocketAddr> {
        self.transport.local_addr()
    }

    /// Runs the server accept loop.
    ///
    /// Accepts incoming connections, performs the handshake, and spawns
    /// a handler task for each connected player. A background sweep
    /// task reclaims finished and idle rooms, and expires sessions
    /// whose reconnect grace has run out. Runs until the process is
    /// terminated.
    pub async fn run(mut self) -> Result<(), ParlorError> {
        tracing::info!("Parlor server running");

        spawn_sweep_task(
            Arc::clone(&self.state),
            self.sweep_interval,
            self.room_idle_timeout,
        );

        loop {
            match self.transport.accept().await {
                Ok(conn) => {
                    let state = Arc::clone(&self.state);
                    tokio::spawn(async move {
                        if let Err(e) = handle_connection::<G, A, C>(conn, state).await {
                            tracing::debug!(error = %e, "connection ended with error");
                        }
                    });
                }
                Err(e) => {
                    tracing::error!(error = %e, "accept failed");
                }
            }
        }
    }
}

/// Spawns the periodic maintenance task: destroys finished and idle
/// rooms, and expires sessions past their reconnect grace.
fn spawn_sweep_task<G, A, C>(
    state: Arc<ServerState<G, A, C>>,
    interval: Duration,
    room_idle_timeout: Duration,
) where
    G: TableGame,
    A: Authenticator,
    C: Codec,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // First tick fires immediately; skip it.
        ticker.tick().await;
        loop {
            ticker.tick().await;

            let swept = state.rooms.lock().await.sweep_idle(room_idle_timeout).await;
            if !swept.is_empty() {
                tracing::info!(count = swept.len(), "swept idle rooms");
            }

            let mut sessions = state.sessions.lock().await;
            let expired = sessions.expire_stale();
            if !expired.is_empty() {
                tracing::info!(count = expired.len(), "expired stale sessions");
                sessions.cleanup_expired();
            }
        }
    });
}
