//! Wire protocol for Parlor.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientEvent`], [`ServerEvent`], the identity newtypes,
//!   [`Card`], [`Player`]) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong doing so.
//!
//! The protocol layer knows nothing about rooms or connections; it only
//! knows how to name events and serialize them.

mod codec;
mod error;
mod types;

pub use codec::{Codec, JsonCodec};
pub use error::ProtocolError;
pub use types::{
    Card, CharacterId, ClientEvent, ConnectionId, Player, Recipient, RoomId,
    RosterSnapshot, ServerEvent,
};
