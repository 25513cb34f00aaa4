//! Command Bus and Event Bus messaging infrastructure.
//!
//! - `CommandBus`: queue user commands (connect, intents, disconnect)
//! - `EventBus`: receive change notifications (push-based subscription)
//! - `ConnectionHandle` / `ConnectionStateObserver`: connection lifecycle
//!
//! The bridge (in the websocket module) connects these buses to the session loop.

pub mod command_bus;
pub mod connection;
pub mod event_bus;

pub use command_bus::{ClientCommand, CommandBus};
pub use connection::{
    set_connection_state, ConnectionHandle, ConnectionState, ConnectionStateObserver,
};
pub use event_bus::EventBus;
