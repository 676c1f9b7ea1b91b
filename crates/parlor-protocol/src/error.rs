//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed: malformed JSON, an unknown event name,
    /// or a payload that doesn't match the event's schema.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The frame decoded but is invalid at the protocol level.
    #[error("invalid payload: {0}")]
    InvalidPayload(String),
}
