//! Tres en raya player crate.
//!
//! Client session core (connection lifecycle, session state, intent
//! validation) plus the tokio/WebSocket adapters and a terminal front end.

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod state;
pub mod ui;

pub use config::{ClientConfig, ConfigError, ReconnectPolicy};
pub use infrastructure::websocket::{create_connection, Connection};
