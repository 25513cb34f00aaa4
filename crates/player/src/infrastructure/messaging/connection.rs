//! Connection state shared between the session loop and its owner.
//!
//! The loop publishes its state into an `AtomicU8`; observers read it without
//! touching the loop. The handle is the only way to stop the loop.

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::oneshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ConnectionState {
    /// Idle. Also the state after a user disconnect or after giving up.
    Disconnected,
    Connecting,
    /// Link open and player name sent
    Connected,
    /// Link lost, waiting on the retry timer
    Reconnecting,
}

impl ConnectionState {
    pub fn to_u8(self) -> u8 {
        match self {
            ConnectionState::Disconnected => 0,
            ConnectionState::Connecting => 1,
            ConnectionState::Connected => 2,
            ConnectionState::Reconnecting => 3,
        }
    }

    /// Unknown values read as `Disconnected`.
    pub fn from_u8(v: u8) -> Self {
        match v {
            1 => ConnectionState::Connecting,
            2 => ConnectionState::Connected,
            3 => ConnectionState::Reconnecting,
            _ => ConnectionState::Disconnected,
        }
    }
}

/// Owner's grip on the session loop.
///
/// `shutdown` stops the loop, which closes the link and drops any armed
/// retry. Dropping the handle has the same effect once the loop next polls.
pub struct ConnectionHandle {
    shutdown_tx: oneshot::Sender<()>,
}

impl ConnectionHandle {
    pub fn new(shutdown_tx: oneshot::Sender<()>) -> Self {
        Self { shutdown_tx }
    }

    /// A stopped loop cannot be restarted; build a new connection instead.
    pub fn shutdown(self) {
        // Loop already gone.
        let _ = self.shutdown_tx.send(());
    }
}

/// Read-only view of the published connection state.
#[derive(Clone)]
pub struct ConnectionStateObserver {
    state: Arc<AtomicU8>,
}

impl ConnectionStateObserver {
    pub fn new(state: Arc<AtomicU8>) -> Self {
        Self { state }
    }

    pub fn state(&self) -> ConnectionState {
        ConnectionState::from_u8(self.state.load(Ordering::SeqCst))
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }
}

/// Publish a new state. Only the session loop writes.
pub fn set_connection_state(state_ref: &AtomicU8, new_state: ConnectionState) {
    state_ref.store(new_state.to_u8(), Ordering::SeqCst);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_survives_atomic_storage() {
        let states = [
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Connected,
            ConnectionState::Reconnecting,
        ];

        for state in states {
            assert_eq!(ConnectionState::from_u8(state.to_u8()), state);
        }
        assert_eq!(ConnectionState::from_u8(200), ConnectionState::Disconnected);
    }

    #[test]
    fn test_observer_reads_state() {
        let state = Arc::new(AtomicU8::new(ConnectionState::Disconnected.to_u8()));
        let observer = ConnectionStateObserver::new(Arc::clone(&state));

        assert_eq!(observer.state(), ConnectionState::Disconnected);
        assert!(!observer.is_connected());

        set_connection_state(&state, ConnectionState::Connected);

        assert_eq!(observer.state(), ConnectionState::Connected);
        assert!(observer.is_connected());
    }

    #[tokio::test]
    async fn test_shutdown_signals_loop() {
        let (tx, rx) = oneshot::channel();
        ConnectionHandle::new(tx).shutdown();
        assert!(rx.await.is_ok());
    }

    #[tokio::test]
    async fn test_dropped_handle_wakes_loop() {
        let (tx, rx) = oneshot::channel::<()>();
        drop(ConnectionHandle::new(tx));
        assert!(rx.await.is_err());
    }
}
