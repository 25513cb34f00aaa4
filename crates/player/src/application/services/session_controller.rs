//! Session controller: the single owner of connection and session state.
//!
//! The session loop feeds it user commands and inbound events one at a
//! time. Every processed command or connection event produces exactly one
//! [`ChangeNotification`], in processing order.

use tresenraya_shared::{decode, encode, Intent};

use super::event_dispatcher::EventDispatcher;
use super::intent_gateway::{GatewayDecision, IntentGateway};
use crate::application::dto::{ChangeNotification, Notice};
use crate::infrastructure::messaging::{ClientCommand, ConnectionState};
use crate::infrastructure::websocket::{ConnectionEvent, ConnectionManager};
use crate::ports::outbound::{InboundEvent, ReconnectSchedulerPort, TransportPort};
use crate::state::Session;

pub struct SessionController<T, S> {
    connection: ConnectionManager<T, S>,
    session: Session,
}

impl<T, S> SessionController<T, S>
where
    T: TransportPort,
    S: ReconnectSchedulerPort,
{
    pub fn new(connection: ConnectionManager<T, S>) -> Self {
        Self {
            connection,
            session: Session::new(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    pub fn handle_command(&mut self, command: ClientCommand) -> ChangeNotification {
        let notice = match command {
            ClientCommand::Connect { player_name } => self.connect(&player_name),
            ClientCommand::Submit(intent) => self.submit(intent),
            ClientCommand::Disconnect => self
                .connection
                .disconnect()
                .into_iter()
                .find_map(|event| self.on_connection_event(event)),
        };
        self.notify(notice)
    }

    pub fn handle_inbound(&mut self, event: InboundEvent) -> Vec<ChangeNotification> {
        self.connection
            .handle(event)
            .into_iter()
            .map(|event| {
                let notice = self.on_connection_event(event);
                self.notify(notice)
            })
            .collect()
    }

    /// Close the transport and cancel any retry before the loop exits.
    pub fn shutdown(&mut self) {
        self.connection.disconnect();
        self.sync_connection();
    }

    fn connect(&mut self, player_name: &str) -> Option<Notice> {
        let name = match IntentGateway::validate_player_name(player_name) {
            Ok(name) => name,
            Err(e) => return Some(Notice::error(e.to_string())),
        };
        match self.connection.connect(&name) {
            Ok(()) => {
                self.session.set_player_name(&name);
                Some(Notice::info(format!("Connecting as {name}...")))
            }
            Err(e) => Some(Notice::error(e.to_string())),
        }
    }

    fn submit(&mut self, intent: Intent) -> Option<Notice> {
        match IntentGateway::evaluate(&self.session, intent) {
            Ok(GatewayDecision::Forward(frame)) => {
                self.connection.send(&frame);
                None
            }
            Ok(GatewayDecision::Dropped(_)) => None,
            Err(e) => Some(Notice::error(e.to_string())),
        }
    }

    fn on_connection_event(&mut self, event: ConnectionEvent) -> Option<Notice> {
        match event {
            ConnectionEvent::Connected => {
                // The server sees a reopened link as a new client.
                self.session.leave_room();
                self.connection.send(&encode(&Intent::RequestRoomList));
                Some(Notice::success("Connected to server"))
            }
            ConnectionEvent::FrameReceived(frame) => match decode(&frame) {
                Ok(event) => {
                    let dispatch = EventDispatcher::apply_server_event(&mut self.session, event);
                    if let Some(follow_up) = dispatch.follow_up {
                        self.connection.send(&encode(&follow_up));
                    }
                    dispatch.notice
                }
                Err(e) => {
                    tracing::warn!(frame = %frame, "Dropping malformed frame: {}", e);
                    Some(Notice::error(format!("Ignored malformed server message: {e}")))
                }
            },
            ConnectionEvent::Retrying { attempt } => {
                Some(Notice::info(format!("Reconnecting (attempt {attempt})...")))
            }
            ConnectionEvent::ReconnectScheduled { attempt, delay } => Some(Notice::error(format!(
                "Connection lost. Retrying in {}s (attempt {attempt})",
                delay.as_secs_f32()
            ))),
            ConnectionEvent::ReconnectExhausted { attempts } => Some(Notice::persistent_error(
                format!("Could not reconnect after {attempts} attempts. Connect again to retry."),
            )),
            ConnectionEvent::TransportError(message) => {
                Some(Notice::error(format!("Connection error: {message}")))
            }
            ConnectionEvent::Disconnected => Some(Notice::info("Disconnected")),
        }
    }

    fn sync_connection(&mut self) {
        self.session
            .set_connection(self.connection.state(), self.connection.attempt());
    }

    fn notify(&mut self, notice: Option<Notice>) -> ChangeNotification {
        self.sync_connection();
        ChangeNotification::new(self.session.snapshot(), notice)
    }
}
