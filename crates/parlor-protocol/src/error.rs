//! Error types for the protocol layer.

/// Errors that can occur while encoding, decoding, or validating wire data.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    /// Common causes: malformed JSON, missing fields, or a game action
    /// payload that matches no known variant.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// A room code that is not 6 characters from the code alphabet.
    #[error("invalid room code: {0:?}")]
    InvalidRoomCode(String),

    /// The message is invalid at the protocol level — it deserialized
    /// fine but violates protocol rules (wrong handshake version, a
    /// message sent before the handshake, ...).
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
