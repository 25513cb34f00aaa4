//! Command Bus for submitting user commands to the session loop.
//!
//! The CommandBus is the intent-submission side of the client: the rendering
//! layer queues commands here and the session loop processes them in order.

use anyhow::Result;
use tokio::sync::mpsc;

use tresenraya_shared::Intent;

/// Commands processed by the session loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientCommand {
    /// Open the connection as `player_name`
    Connect { player_name: String },
    /// Validate and forward a user intent
    Submit(Intent),
    /// User-initiated disconnect; suppresses automatic reconnection
    Disconnect,
}

/// Command bus for sending commands to the session loop.
///
/// This is a concrete struct (not a trait) that can be cloned and shared.
#[derive(Clone)]
pub struct CommandBus {
    tx: mpsc::Sender<ClientCommand>,
}

impl CommandBus {
    pub fn new(tx: mpsc::Sender<ClientCommand>) -> Self {
        Self { tx }
    }

    /// Queue a command.
    ///
    /// Returns immediately; fails only if the queue is full or the session
    /// loop has stopped.
    pub fn send(&self, command: ClientCommand) -> Result<()> {
        self.tx
            .try_send(command)
            .map_err(|e| anyhow::anyhow!("CommandBus send failed: {}", e))
    }

    pub fn connect(&self, player_name: &str) -> Result<()> {
        self.send(ClientCommand::Connect {
            player_name: player_name.to_string(),
        })
    }

    pub fn disconnect(&self) -> Result<()> {
        self.send(ClientCommand::Disconnect)
    }

    pub fn submit(&self, intent: Intent) -> Result<()> {
        self.send(ClientCommand::Submit(intent))
    }

    pub fn create_room(&self, name: &str) -> Result<()> {
        self.submit(Intent::CreateRoom {
            name: name.to_string(),
        })
    }

    pub fn join_room(&self, room_id: &str) -> Result<()> {
        self.submit(Intent::JoinRoom {
            room_id: room_id.to_string(),
        })
    }

    pub fn request_room_list(&self) -> Result<()> {
        self.submit(Intent::RequestRoomList)
    }

    pub fn make_move(&self, position: u8) -> Result<()> {
        self.submit(Intent::Move { position })
    }

    pub fn leave_room(&self) -> Result<()> {
        self.submit(Intent::LeaveRoom)
    }
}
