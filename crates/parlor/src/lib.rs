//! # Parlor
//!
//! Room-based server framework for turn-based parlor games.
//!
//! Parlor provides a server-authoritative architecture where game
//! developers implement a single [`TableGame`](parlor_room::TableGame)
//! trait and the framework handles transport, sessions, rooms, and
//! per-seat state filtering: the full game state never leaves the
//! server, each seat only ever receives its own view.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use parlor::prelude::*;
//!
//! // Implement TableGame for your game, then:
//! // let server = ParlorServer::builder()
//! //     .bind("0.0.0.0:8080")
//! //     .build::<MyGame>(my_auth)
//! //     .await?;
//! // server.run().await
//! ```

mod error;
mod handler;
mod server;

pub use error::ParlorError;
pub use server::{PROTOCOL_VERSION, ParlorServer, ParlorServerBuilder};

/// Everything a game server binary typically needs.
pub mod prelude {
    pub use crate::{PROTOCOL_VERSION, ParlorError, ParlorServer, ParlorServerBuilder};

    pub use parlor_protocol::{
        Codec, Envelope, JsonCodec, Payload, PlayerId, RoomCode, SeatEntry, SystemMessage,
    };
    pub use parlor_room::{GameRng, RoomError, TableConfig, TableGame};
    pub use parlor_session::{Authenticator, Profile, SessionConfig, SessionError};
}
