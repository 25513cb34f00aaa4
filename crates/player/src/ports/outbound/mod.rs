//! Outbound ports - Interfaces for the transport and the reconnect timer
//!
//! The connection manager drives these traits without knowing whether it is
//! talking to a real WebSocket, a tokio timer, or a test double.

pub mod reconnect_scheduler_port;
pub mod transport_port;

pub use reconnect_scheduler_port::ReconnectSchedulerPort;
pub use transport_port::{InboundEvent, LinkId, TransportEvent, TransportPort};

#[cfg(any(test, feature = "testing"))]
pub use reconnect_scheduler_port::MockReconnectSchedulerPort;
#[cfg(any(test, feature = "testing"))]
pub use transport_port::MockTransportPort;
