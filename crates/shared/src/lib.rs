//! Tresenraya Protocol - Shared types for server and player communication
//!
//! This crate contains the pipe-delimited wire protocol:
//! - `Intent` (client -> server) and `ServerEvent` (server -> client)
//! - The frame codec (`encode`, `decode`, `handshake`)
//! - Room list payload parsing
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde, serde_json and thiserror
//! 2. **No business logic** - Move legality and win detection stay on the server
//! 3. **No state** - Every function here is pure

pub mod codec;
pub mod messages;

pub use codec::{
    decode, encode, handshake, parse_board, parse_room_list, parse_turn_flag,
    DecodeError, RoomListError,
};
pub use messages::{
    command, GameUpdate, Intent, Mark, RoomRecord, RoomStatus, ServerEvent, WireBoard,
    BOARD_CELLS, BOARD_SEPARATOR, DELIMITER, NO_OPPONENT, TURN_FLAG_TRUE,
};
