//! WebSocket Bridge - connects CommandBus/EventBus to the session controller.
//!
//! `create_connection` sets up:
//! - A CommandBus for queueing user commands
//! - An EventBus for receiving change notifications
//! - A background task that owns the transport, timer and session state

use std::sync::atomic::AtomicU8;
use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};

use super::connection_manager::ConnectionManager;
use super::desktop::{TokioReconnectTimer, WsTransport};
use crate::application::services::SessionController;
use crate::config::ClientConfig;
use crate::infrastructure::messaging::{
    set_connection_state, ClientCommand, CommandBus, ConnectionHandle, ConnectionState,
    ConnectionStateObserver, EventBus,
};
use crate::ports::outbound::{InboundEvent, ReconnectSchedulerPort, TransportPort};

/// Result of creating a connection.
///
/// Contains all the pieces needed to use the connection:
/// - `command_bus`: Send commands to the session
/// - `event_bus`: Subscribe to change notifications
/// - `handle`: Control the session loop lifetime
/// - `state_observer`: Observe connection state (for UI binding)
pub struct Connection {
    pub command_bus: CommandBus,
    pub event_bus: EventBus,
    pub handle: ConnectionHandle,
    pub state_observer: ConnectionStateObserver,
}

/// Spawn the session loop on the current tokio runtime.
///
/// Nothing is opened until a `connect` command arrives.
pub fn create_connection(config: &ClientConfig) -> Connection {
    let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>(config.command_buffer);
    let (inbound_tx, inbound_rx) = mpsc::unbounded_channel::<InboundEvent>();
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    let state = Arc::new(AtomicU8::new(ConnectionState::Disconnected.to_u8()));

    let command_bus = CommandBus::new(cmd_tx);
    let event_bus = EventBus::new();
    let state_observer = ConnectionStateObserver::new(Arc::clone(&state));

    let transport = WsTransport::new(config.server_url.clone(), inbound_tx.clone());
    let timer = TokioReconnectTimer::new(inbound_tx);
    let controller =
        SessionController::new(ConnectionManager::new(transport, timer, config.reconnect));

    tokio::spawn(session_loop(
        controller,
        cmd_rx,
        inbound_rx,
        shutdown_rx,
        event_bus.clone(),
        state,
    ));

    let handle = ConnectionHandle::new(shutdown_tx);

    Connection {
        command_bus,
        event_bus,
        handle,
        state_observer,
    }
}

/// Main loop: one event at a time, notifications delivered before the next.
pub(crate) async fn session_loop<T, S>(
    mut controller: SessionController<T, S>,
    mut cmd_rx: mpsc::Receiver<ClientCommand>,
    mut inbound_rx: mpsc::UnboundedReceiver<InboundEvent>,
    mut shutdown_rx: oneshot::Receiver<()>,
    event_bus: EventBus,
    state: Arc<AtomicU8>,
) where
    T: TransportPort,
    S: ReconnectSchedulerPort,
{
    loop {
        let notifications = tokio::select! {
            biased;

            _ = &mut shutdown_rx => {
                tracing::info!("Shutdown requested");
                break;
            }

            command = cmd_rx.recv() => match command {
                Some(command) => vec![controller.handle_command(command)],
                None => {
                    tracing::info!("Command bus dropped, stopping session loop");
                    break;
                }
            },

            Some(event) = inbound_rx.recv() => controller.handle_inbound(event),
        };

        set_connection_state(&state, controller.connection_state());
        for notification in &notifications {
            event_bus.dispatch(notification).await;
        }
    }

    controller.shutdown();
    set_connection_state(&state, controller.connection_state());
}
