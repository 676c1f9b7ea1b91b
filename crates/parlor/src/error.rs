//! Unified error type for the parlor server.

use parlor_protocol::ProtocolError;
use parlor_room::RegistryError;

/// Top-level error that wraps the lower layers' errors.
///
/// The `#[from]` attribute on each variant auto-generates `From`
/// impls, so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum ParlorError {
    /// A socket-level error (bind, accept).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// A WebSocket-level error (handshake, frame I/O).
    #[error(transparent)]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// A wire encode or decode error.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room registry rejection.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
