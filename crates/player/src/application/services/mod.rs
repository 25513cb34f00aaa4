//! Application services
//!
//! - `intent_gateway`: local validation of user intents
//! - `event_dispatcher`: server events applied to session state
//! - `session_controller`: owns connection and session, emits notifications

pub mod event_dispatcher;
pub mod intent_gateway;
pub mod session_controller;

pub use event_dispatcher::{Dispatch, EventDispatcher};
pub use intent_gateway::{GatewayDecision, IntentGateway, ValidationError};
pub use session_controller::SessionController;
