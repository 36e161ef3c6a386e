//! Room lifecycle management for Parlor.
//!
//! Each room runs as an isolated Tokio task (actor model) owning the
//! authoritative game state. Clients never see that state directly:
//! after every accepted action, each seat receives its own filtered
//! view, so hidden information stays hidden.
//!
//! # Key types
//!
//! - [`TableGame`] — the trait game developers implement
//! - [`RoomManager`] — creates/destroys rooms, routes players by join code
//! - [`RoomHandle`] — send commands to a running room actor
//! - [`GameRng`] — seedable randomness injected into game rules
//! - [`RoomPhase`] — lifecycle state machine

#![allow(async_fn_in_trait)]

mod config;
mod error;
mod game;
mod manager;
mod rng;
mod room;

pub use config::{RoomPhase, TableConfig};
pub use error::RoomError;
pub use game::TableGame;
pub use manager::RoomManager;
pub use rng::GameRng;
pub use room::{PlayerSender, RoomHandle, RoomInfo, RoomOutbound};
