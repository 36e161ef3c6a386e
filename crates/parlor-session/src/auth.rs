//! Authentication hook for resolving player identity.
//!
//! Parlor does not authenticate anyone itself — identity is an external
//! collaborator (the attendance platform's auth layer, a JWT validator, a
//! dev stub). The framework only defines the seam: a token string goes in,
//! a verified identity plus display name comes out, and that happens once
//! per connection before any game event is processed.

use parlor_protocol::PlayerId;
use serde::{Deserialize, Serialize};

use crate::SessionError;

/// A verified player identity with the display name the lobby shows.
///
/// The display name is resolved by the identity provider at handshake
/// time; rooms never look names up themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// The externally verified player identity.
    pub player_id: PlayerId,
    /// Human-readable name for rosters and views.
    pub display_name: String,
}

/// Validates a client's auth token and returns their identity.
///
/// `Send + Sync + 'static` because the authenticator is shared across
/// connection handler tasks for the lifetime of the server.
///
/// # Example
///
/// ```rust
/// use parlor_session::{Authenticator, Profile, SessionError};
/// use parlor_protocol::PlayerId;
///
/// /// Accepts any numeric token and uses it as the player ID.
/// /// Development only.
/// struct DevAuthenticator;
///
/// impl Authenticator for DevAuthenticator {
///     async fn authenticate(&self, token: &str) -> Result<Profile, SessionError> {
///         let id: u64 = token
///             .parse()
///             .map_err(|_| SessionError::AuthFailed("token must be a number".into()))?;
///         Ok(Profile {
///             player_id: PlayerId(id),
///             display_name: format!("player-{id}"),
///         })
///     }
/// }
/// ```
pub trait Authenticator: Send + Sync + 'static {
    /// Validates the given token and returns the player's profile.
    ///
    /// # Errors
    /// [`SessionError::AuthFailed`] when the token is invalid or expired.
    fn authenticate(
        &self,
        token: &str,
    ) -> impl std::future::Future<Output = Result<Profile, SessionError>> + Send;
}
