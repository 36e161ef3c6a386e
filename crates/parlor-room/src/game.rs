//! The `TableGame` trait — the main extension point for game developers.
//!
//! The framework calls these methods at the right time; the developer
//! just writes game rules. All randomness comes in through the
//! [`GameRng`] parameter so that a seeded room replays deterministically.

use parlor_protocol::PlayerId;
use serde::{Serialize, de::DeserializeOwned};

use crate::{GameRng, TableConfig};

/// The core trait that turn-based games implement.
///
/// Each associated type defines the shape of the game's data:
/// - `Config` — game-specific settings (starting lives, chip stacks, etc.)
/// - `State` — the full authoritative state, held only by the room actor
/// - `Action` — the closed set of moves a player can submit
/// - `View` — what one seat is allowed to see
///
/// Players are addressed by **seat index** (position in join order), not
/// by identity; the room actor owns the `PlayerId` ↔ seat mapping.
///
/// The central contract is the `View` type: the full `State` never
/// leaves the room. After every accepted action the room calls
/// [`view`](TableGame::view) once per seat and sends each seat its own
/// filtered snapshot — hidden hands and unrolled dice stay hidden.
pub trait TableGame: Send + Sync + 'static {
    /// Game-specific configuration.
    type Config: Send + Sync + Clone + Default;

    /// The full game state. Never serialized to clients.
    type State: Send + Sync + Clone;

    /// Actions players can submit. A closed enum, so anything outside
    /// the ruleset fails to even deserialize.
    type Action: Send + Sync + Clone + Serialize + DeserializeOwned;

    /// A per-seat snapshot of the state, safe to show to that seat.
    type View: Send + Sync + Clone + Serialize + DeserializeOwned;

    /// Creates the initial game state when the host starts the game.
    ///
    /// `players` lists the seated identities in seat order; games that
    /// don't care about identity can use only `players.len()`.
    fn init(config: &Self::Config, players: &[PlayerId], rng: &mut GameRng) -> Self::State;

    /// Checks an action against the rules without touching the state.
    ///
    /// Called before [`apply`](TableGame::apply). On `Err` the action is
    /// discarded, the state stays untouched, and the reason is sent back
    /// to the offending seat only.
    fn validate(state: &Self::State, seat: usize, action: &Self::Action) -> Result<(), String>;

    /// Applies a validated action. This is where the rules live.
    fn apply(state: &mut Self::State, seat: usize, action: Self::Action, rng: &mut GameRng);

    /// Produces the filtered snapshot for one seat.
    fn view(state: &Self::State, seat: usize) -> Self::View;

    /// Returns `true` when the game has ended.
    ///
    /// Checked after every [`apply`](TableGame::apply); the room then
    /// moves to `Finished` and stops accepting actions.
    fn is_over(state: &Self::State) -> bool;

    /// Seating limits for this game type.
    ///
    /// Default: 2–8 players.
    fn table() -> TableConfig {
        TableConfig::default()
    }
}
