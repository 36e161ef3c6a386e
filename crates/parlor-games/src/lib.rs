//! Built-in game engines for Parlor.
//!
//! Three ready-to-run [`TableGame`](parlor_room::TableGame)
//! implementations, plus the card and dice primitives they share:
//!
//! - [`Meyer`](meyer::Meyer) — dice bluffing, 2–6 players
//! - [`Pirat`](pirat::Pirat) — exact-bid trick taking, 4 players
//! - [`Holdem`](holdem::Holdem) — no-limit Texas Hold'em, 2–9 players
//!
//! Each engine is a pure state machine: the room actor owns the state,
//! feeds it validated actions, and sends every seat its own filtered
//! view. The engines never see connections or identities, only seat
//! indices.

pub mod cards;
pub mod eval;
pub mod holdem;
pub mod meyer;
pub mod pirat;

pub use holdem::{Holdem, HoldemAction, HoldemConfig, HoldemView};
pub use meyer::{Meyer, MeyerAction, MeyerConfig, MeyerView};
pub use pirat::{Pirat, PiratAction, PiratConfig, PiratView};
