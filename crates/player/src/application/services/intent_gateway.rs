//! Intent gateway: local checks before a user intent reaches the wire.
//!
//! Two kinds of refusal exist. Malformed input (empty room name, a delimiter
//! inside an argument, an out-of-range cell) is a [`ValidationError`] and is
//! reported to the user. A well-formed move that the current game does not
//! allow is silently dropped.

use thiserror::Error;
use tresenraya_shared::{encode, Intent, BOARD_CELLS, DELIMITER};

use crate::state::{MoveRejection, Session};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Room name cannot be empty")]
    EmptyName,

    #[error("The {field} cannot contain '{}'", DELIMITER)]
    ContainsDelimiter { field: &'static str },

    #[error("Cell {0} is outside the board")]
    CellOutOfRange(u8),

    #[error("Player name cannot be empty")]
    EmptyPlayerName,
}

/// Outcome of a valid intent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayDecision {
    /// Send this encoded frame
    Forward(String),
    /// Drop without sending or notifying
    Dropped(MoveRejection),
}

pub struct IntentGateway;

impl IntentGateway {
    /// Normalize a player name for the handshake.
    pub fn validate_player_name(name: &str) -> Result<String, ValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyPlayerName);
        }
        reject_delimiter(name, "player name")?;
        Ok(name.to_string())
    }

    pub fn evaluate(session: &Session, intent: Intent) -> Result<GatewayDecision, ValidationError> {
        let intent = match intent {
            Intent::CreateRoom { name } => {
                let name = name.trim();
                if name.is_empty() {
                    return Err(ValidationError::EmptyName);
                }
                reject_delimiter(name, "room name")?;
                Intent::CreateRoom {
                    name: name.to_string(),
                }
            }
            Intent::JoinRoom { room_id } => {
                reject_delimiter(&room_id, "room id")?;
                Intent::JoinRoom { room_id }
            }
            Intent::Move { position } => {
                if usize::from(position) >= BOARD_CELLS {
                    return Err(ValidationError::CellOutOfRange(position));
                }
                let check = match session.game() {
                    Some(game) => game.check_move(usize::from(position)),
                    None => Err(MoveRejection::NoGame),
                };
                if let Err(rejection) = check {
                    tracing::debug!(position, ?rejection, "Dropping move");
                    return Ok(GatewayDecision::Dropped(rejection));
                }
                Intent::Move { position }
            }
            other @ (Intent::RequestRoomList | Intent::LeaveRoom) => other,
        };

        Ok(GatewayDecision::Forward(encode(&intent)))
    }
}

fn reject_delimiter(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.contains(DELIMITER) {
        Err(ValidationError::ContainsDelimiter { field })
    } else {
        Ok(())
    }
}
