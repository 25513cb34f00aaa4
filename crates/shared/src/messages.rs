//! Wire vocabulary for the pipe-delimited room/game protocol.
//!
//! `Intent` is what the client asks for; `ServerEvent` is what the server
//! reports back. Both are closed enums: every recognized command keyword maps
//! to exactly one variant, and anything else is a decode failure.

use serde::{Deserialize, Serialize};

/// Field separator inside a frame.
pub const DELIMITER: char = '|';

/// Separator between cells inside a board token.
pub const BOARD_SEPARATOR: char = ',';

/// Number of cells on the board (3x3, row-major, index 0 = top-left).
pub const BOARD_CELLS: usize = 9;

/// Command keywords shared by both directions of the protocol.
pub mod command {
    pub const CREATE: &str = "CREATE";
    pub const JOIN: &str = "JOIN";
    pub const MOVE: &str = "MOVE";
    pub const UPDATE: &str = "UPDATE";
    pub const END: &str = "END";
    pub const ERROR: &str = "ERROR";
    pub const LIST: &str = "LIST";
    pub const LEAVE: &str = "LEAVE";
}

/// Literal the server uses for a true turn flag.
pub const TURN_FLAG_TRUE: &str = "True";

/// Placeholder the server sends as opponent name while a room is waiting.
pub const NO_OPPONENT: &str = "-";

// =============================================================================
// Client -> Server
// =============================================================================

/// A user-originated request destined for the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Open a new room with the given display name
    CreateRoom { name: String },
    /// Join an existing room by its server-assigned id
    JoinRoom { room_id: String },
    /// Ask for the current list of joinable rooms
    RequestRoomList,
    /// Place a mark on the cell at `position` (0-8)
    Move { position: u8 },
    /// Leave the current room
    LeaveRoom,
}

impl Intent {
    /// Command keyword this intent is sent under.
    pub fn command(&self) -> &'static str {
        match self {
            Intent::CreateRoom { .. } => command::CREATE,
            Intent::JoinRoom { .. } => command::JOIN,
            Intent::RequestRoomList => command::LIST,
            Intent::Move { .. } => command::MOVE,
            Intent::LeaveRoom => command::LEAVE,
        }
    }
}

// =============================================================================
// Server -> Client
// =============================================================================

/// A player's mark on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// First mark (`X`), held by the player who moves first
    X,
    /// Second mark (`O`)
    O,
}

impl Mark {
    pub fn other(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Mark::X => 'X',
            Mark::O => 'O',
        }
    }
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Board as sent on the wire: `None` is a blank cell.
pub type WireBoard = [Option<Mark>; BOARD_CELLS];

/// Room status literal carried by `UPDATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoomStatus {
    Waiting,
    Playing,
    Win,
    Loss,
    Draw,
}

impl RoomStatus {
    /// Map a status literal. Unknown literals are treated as an ongoing game.
    pub fn from_wire(literal: &str) -> Self {
        match literal {
            "WAITING" => RoomStatus::Waiting,
            "WIN" => RoomStatus::Win,
            "LOSS" => RoomStatus::Loss,
            "DRAW" => RoomStatus::Draw,
            _ => RoomStatus::Playing,
        }
    }

    pub fn as_wire(self) -> &'static str {
        match self {
            RoomStatus::Waiting => "WAITING",
            RoomStatus::Playing => "PLAYING",
            RoomStatus::Win => "WIN",
            RoomStatus::Loss => "LOSS",
            RoomStatus::Draw => "DRAW",
        }
    }
}

/// Payload of an `UPDATE` frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameUpdate {
    pub status: RoomStatus,
    pub board: WireBoard,
    pub is_my_turn: bool,
    /// `None` while nobody else has joined the room
    pub opponent_name: Option<String>,
}

/// One entry of a `LIST` payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub id: String,
    pub name: String,
    pub creator: String,
}

/// A decoded server frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    /// Our `CREATE` succeeded; we are alone in the new room
    RoomCreated { room_id: String, room_name: String },
    /// Our `JOIN` succeeded
    RoomJoined { room_id: String, room_name: String },
    /// Authoritative board/turn/status for the current room
    GameUpdated(GameUpdate),
    /// The game is over; `message` is the server's human-readable summary
    GameEnded { message: String },
    /// Server-reported fault, shown verbatim
    ServerError { message: String },
    /// Raw JSON array of room records (delimiters already rejoined)
    RoomList { payload: String },
    /// Acknowledgment of our `LEAVE`
    RoomLeft,
}

impl ServerEvent {
    /// Command keyword this event arrived under.
    pub fn command(&self) -> &'static str {
        match self {
            ServerEvent::RoomCreated { .. } => command::CREATE,
            ServerEvent::RoomJoined { .. } => command::JOIN,
            ServerEvent::GameUpdated(_) => command::UPDATE,
            ServerEvent::GameEnded { .. } => command::END,
            ServerEvent::ServerError { .. } => command::ERROR,
            ServerEvent::RoomList { .. } => command::LIST,
            ServerEvent::RoomLeft => command::LEAVE,
        }
    }
}
