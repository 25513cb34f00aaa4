//! WebSocket connection to the game server
//!
//! - `connection_manager`: runtime-free lifecycle state machine
//! - `desktop`: tokio-tungstenite transport and tokio reconnect timer
//! - `bridge`: session loop wiring and the client facade

mod bridge;
mod connection_manager;
mod core;
mod desktop;

pub use bridge::{create_connection, Connection};
pub use connection_manager::{ConnectionError, ConnectionEvent, ConnectionManager};
pub use desktop::{TokioReconnectTimer, WsTransport};
