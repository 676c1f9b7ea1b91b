//! # Parlor
//!
//! WebSocket session server for turn-based parlor games.
//!
//! Parlor hosts password-protected rooms in which players claim
//! characters, take turns, roll dice, draw cards, and move around a
//! shared board. Every change to a room is pushed to its members over
//! their persistent connections.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use parlor::ParlorServer;
//!
//! # async fn run() -> Result<(), parlor::ParlorError> {
//! let server = ParlorServer::builder()
//!     .bind("0.0.0.0:3000")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::ParlorError;
pub use server::{ParlorServer, ParlorServerBuilder};

pub use parlor_game::GameConfig;
pub use parlor_protocol::{ClientEvent, ConnectionId, RoomId, ServerEvent};
