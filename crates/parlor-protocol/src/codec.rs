//! Codec trait and the JSON implementation.
//!
//! The transport layer hands the handler raw frames; a codec converts
//! between those bytes and typed events. Everything above the codec
//! deals in [`ClientEvent`](crate::ClientEvent) and
//! [`ServerEvent`](crate::ServerEvent) only.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Converts between Rust types and wire bytes.
///
/// `Send + Sync + 'static` because codecs live inside long-running
/// connection tasks and may be shared across Tokio worker threads.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into bytes.
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError>;

    /// Deserializes bytes back into a value.
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError>;
}

/// A [`Codec`] backed by `serde_json`.
///
/// JSON keeps the wire human-readable, which is what the browser
/// clients speak and what you want in DevTools while debugging a
/// misbehaving room.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<Vec<u8>, ProtocolError> {
        serde_json::to_vec(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, ProtocolError> {
        serde_json::from_slice(data).map_err(ProtocolError::Decode)
    }
}
