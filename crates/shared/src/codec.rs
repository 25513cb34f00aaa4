//! Frame codec: `Intent` -> wire text, wire text -> `ServerEvent`.
//!
//! Pure functions, no state. Arguments are never escaped; callers must make
//! sure no argument contains [`DELIMITER`].

use thiserror::Error;

use crate::messages::{
    command, GameUpdate, Intent, Mark, RoomRecord, RoomStatus, ServerEvent, WireBoard,
    BOARD_CELLS, BOARD_SEPARATOR, DELIMITER, NO_OPPONENT, TURN_FLAG_TRUE,
};

/// Why an inbound frame could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Unknown command: {0:?}")]
    UnknownCommand(String),

    #[error("Malformed {command} frame: expected {expected} argument(s), found {found}")]
    MalformedArguments {
        command: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Malformed board: expected 9 cells, found {found}")]
    MalformedBoard { found: usize },

    #[error("Unknown cell marker {marker:?} at index {index}")]
    UnknownCellMarker { index: usize, marker: String },
}

/// `LIST` payload could not be parsed as room records.
#[derive(Debug, Error)]
#[error("Invalid room list payload: {0}")]
pub struct RoomListError(#[from] serde_json::Error);

/// The handshake frame: the bare player name, no keyword, no delimiter.
pub fn handshake(player_name: &str) -> String {
    player_name.to_string()
}

/// Encode an intent as a single frame.
pub fn encode(intent: &Intent) -> String {
    let keyword = intent.command();
    match intent {
        Intent::CreateRoom { name } => format!("{keyword}{DELIMITER}{name}"),
        Intent::JoinRoom { room_id } => format!("{keyword}{DELIMITER}{room_id}"),
        Intent::Move { position } => format!("{keyword}{DELIMITER}{position}"),
        Intent::RequestRoomList | Intent::LeaveRoom => keyword.to_string(),
    }
}

/// Decode one inbound frame.
pub fn decode(frame: &str) -> Result<ServerEvent, DecodeError> {
    let frame = frame.trim_end_matches(['\r', '\n']);
    let mut tokens = frame.split(DELIMITER);
    // `split` always yields at least one item
    let keyword = tokens.next().unwrap_or_default();
    let args: Vec<&str> = tokens.collect();

    match keyword {
        command::CREATE => {
            let [room_id, room_name] = take_args::<2>(command::CREATE, &args)?;
            Ok(ServerEvent::RoomCreated {
                room_id: room_id.to_string(),
                room_name: room_name.to_string(),
            })
        }
        command::JOIN => {
            let [room_id, room_name] = take_args::<2>(command::JOIN, &args)?;
            Ok(ServerEvent::RoomJoined {
                room_id: room_id.to_string(),
                room_name: room_name.to_string(),
            })
        }
        command::UPDATE => {
            let [status, board, turn, opponent] = take_args::<4>(command::UPDATE, &args)?;
            Ok(ServerEvent::GameUpdated(GameUpdate {
                status: RoomStatus::from_wire(status),
                board: parse_board(board)?,
                is_my_turn: parse_turn_flag(turn),
                opponent_name: parse_opponent(opponent),
            }))
        }
        command::END => {
            let [message] = take_args::<1>(command::END, &args)?;
            Ok(ServerEvent::GameEnded {
                message: message.to_string(),
            })
        }
        command::ERROR => {
            let [message] = take_args::<1>(command::ERROR, &args)?;
            Ok(ServerEvent::ServerError {
                message: message.to_string(),
            })
        }
        command::LIST => {
            take_args::<1>(command::LIST, &args)?;
            // JSON may itself contain the delimiter; put it back together
            Ok(ServerEvent::RoomList {
                payload: args.join(&DELIMITER.to_string()),
            })
        }
        command::LEAVE => Ok(ServerEvent::RoomLeft),
        other => Err(DecodeError::UnknownCommand(other.to_string())),
    }
}

/// Parse a `LIST` payload into room records.
pub fn parse_room_list(payload: &str) -> Result<Vec<RoomRecord>, RoomListError> {
    Ok(serde_json::from_str(payload)?)
}

/// Parse a comma-separated board of exactly nine markers.
pub fn parse_board(csv: &str) -> Result<WireBoard, DecodeError> {
    let tokens: Vec<&str> = csv.split(BOARD_SEPARATOR).collect();
    if tokens.len() != BOARD_CELLS {
        return Err(DecodeError::MalformedBoard {
            found: tokens.len(),
        });
    }

    let mut board: WireBoard = [None; BOARD_CELLS];
    for (index, token) in tokens.into_iter().enumerate() {
        board[index] = match token {
            " " | "" => None,
            "X" => Some(Mark::X),
            "O" => Some(Mark::O),
            other => {
                return Err(DecodeError::UnknownCellMarker {
                    index,
                    marker: other.to_string(),
                })
            }
        };
    }
    Ok(board)
}

/// Only the exact literal counts as true; everything else is false.
pub fn parse_turn_flag(token: &str) -> bool {
    token == TURN_FLAG_TRUE
}

fn parse_opponent(token: &str) -> Option<String> {
    match token.trim() {
        "" | NO_OPPONENT => None,
        name => Some(name.to_string()),
    }
}

fn take_args<'a, const N: usize>(
    command: &'static str,
    args: &[&'a str],
) -> Result<[&'a str; N], DecodeError> {
    if args.len() < N {
        return Err(DecodeError::MalformedArguments {
            command,
            expected: N,
            found: args.len(),
        });
    }
    let mut out = [""; N];
    out.copy_from_slice(&args[..N]);
    Ok(out)
}
