//! Player identity and connection-session tracking for Parlor.
//!
//! This crate handles who is on the other end of a connection:
//!
//! 1. **Authentication** — the [`Authenticator`] seam resolves a token to
//!    a verified [`Profile`] (identity + display name). Parlor trusts the
//!    result; it never authenticates anyone itself.
//! 2. **Session tracking** — [`SessionManager`] knows which identities are
//!    connected, recently dropped, or gone for good.
//!
//! There is deliberately no token-based resume: reconnection is simply
//! authenticating again with the same identity and rejoining the same
//! room code.

#![allow(async_fn_in_trait)]

mod auth;
mod error;
mod manager;
mod session;

pub use auth::{Authenticator, Profile};
pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{Session, SessionConfig, SessionState};
