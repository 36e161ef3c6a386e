//! Wire protocol for Parlor.
//!
//! This crate defines the language that clients and servers speak:
//!
//! - **Types** ([`Envelope`], [`SystemMessage`], [`RoomCode`], etc.) —
//!   the message structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing either.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and session
//! (player identity). It doesn't know about connections or rooms — it only
//! knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (Envelope) → Session (player context)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    CODE_ALPHABET, CODE_LEN, Envelope, Payload, PlayerId, RoomCode, SeatEntry, SystemMessage,
};
