//! Client-side mirror of the room the player is in.

use serde::Serialize;
use tresenraya_shared::{GameUpdate, Mark, RoomStatus, WireBoard, BOARD_CELLS};

/// A board cell from this player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Cell {
    Empty,
    Mine,
    Theirs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameStatus {
    Waiting,
    Playing,
    Won,
    Lost,
    Draw,
    /// The server closed the game with an `END` message. Terminal.
    Ended,
}

impl From<RoomStatus> for GameStatus {
    fn from(status: RoomStatus) -> Self {
        match status {
            RoomStatus::Waiting => GameStatus::Waiting,
            RoomStatus::Playing => GameStatus::Playing,
            RoomStatus::Win => GameStatus::Won,
            RoomStatus::Loss => GameStatus::Lost,
            RoomStatus::Draw => GameStatus::Draw,
        }
    }
}

/// Why a move was not sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveRejection {
    NoGame,
    NotPlaying(GameStatus),
    NotYourTurn,
    CellTaken(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameView {
    pub room_id: String,
    pub room_name: String,
    pub status: GameStatus,
    marks: WireBoard,
    pub is_my_turn: bool,
    pub opponent_name: Option<String>,
    /// Inferred from the first turn-bearing update, then fixed
    my_symbol: Option<Mark>,
    pub end_message: Option<String>,
}

impl GameView {
    /// A freshly entered room: waiting, empty board.
    pub fn new(room_id: impl Into<String>, room_name: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            room_name: room_name.into(),
            status: GameStatus::Waiting,
            marks: [None; BOARD_CELLS],
            is_my_turn: false,
            opponent_name: None,
            my_symbol: None,
            end_message: None,
        }
    }

    pub fn my_symbol(&self) -> Option<Mark> {
        self.my_symbol
    }

    pub fn marks(&self) -> &WireBoard {
        &self.marks
    }

    /// Board relative to this player. Occupied cells count as `Theirs` until
    /// our symbol is known.
    pub fn board(&self) -> [Cell; BOARD_CELLS] {
        self.marks.map(|mark| match mark {
            None => Cell::Empty,
            Some(mark) if Some(mark) == self.my_symbol => Cell::Mine,
            Some(_) => Cell::Theirs,
        })
    }

    pub fn cell(&self, index: usize) -> Option<Cell> {
        self.board().get(index).copied()
    }

    /// Replace board, turn and opponent from an authoritative update.
    ///
    /// A game that already ended keeps its `Ended` status.
    pub fn apply_update(&mut self, update: &GameUpdate) {
        self.marks = update.board;
        self.is_my_turn = update.is_my_turn;
        self.opponent_name = update.opponent_name.clone();

        if self.status != GameStatus::Ended {
            self.status = update.status.into();
        }

        if self.my_symbol.is_none() && update.status != RoomStatus::Waiting {
            // The first mover holds X. Without an explicit symbol from the
            // server, whoever has the turn on the first playing update is X.
            let symbol = if update.is_my_turn { Mark::X } else { Mark::O };
            tracing::debug!(room_id = %self.room_id, %symbol, "Inferred player symbol");
            self.my_symbol = Some(symbol);
        }
    }

    pub fn end(&mut self, message: impl Into<String>) {
        self.status = GameStatus::Ended;
        self.is_my_turn = false;
        self.end_message = Some(message.into());
    }

    /// Client-side move checks. The server still has the final word.
    pub fn check_move(&self, position: usize) -> Result<(), MoveRejection> {
        if self.status != GameStatus::Playing {
            return Err(MoveRejection::NotPlaying(self.status));
        }
        if !self.is_my_turn {
            return Err(MoveRejection::NotYourTurn);
        }
        match self.cell(position) {
            Some(Cell::Empty) => Ok(()),
            _ => Err(MoveRejection::CellTaken(position)),
        }
    }
}
