//! Session state: connection, room list and the current game.
//!
//! Owned by the session loop. The rendering layer only ever sees
//! [`SessionSnapshot`] copies.

use serde::Serialize;
use tresenraya_shared::{GameUpdate, RoomRecord};

use super::game_view::{GameStatus, GameView};
use crate::infrastructure::messaging::ConnectionState;

/// One joinable room from the last room-list snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub id: String,
    pub name: String,
    pub creator_name: String,
}

impl From<RoomRecord> for RoomSummary {
    fn from(record: RoomRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            creator_name: record.creator,
        }
    }
}

/// Screen-level phase derived from connection and game state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Disconnected,
    Menu,
    Waiting,
    Playing,
    Ended,
}

#[derive(Debug, Clone)]
pub struct Session {
    connection: ConnectionState,
    player_name: Option<String>,
    reconnect_attempt: u32,
    rooms: Vec<RoomSummary>,
    game: Option<GameView>,
    /// Update that arrived before the JOIN acknowledgment for its room
    early_update: Option<GameUpdate>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            connection: ConnectionState::Disconnected,
            player_name: None,
            reconnect_attempt: 0,
            rooms: Vec::new(),
            game: None,
            early_update: None,
        }
    }

    pub fn connection(&self) -> ConnectionState {
        self.connection
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    pub fn rooms(&self) -> &[RoomSummary] {
        &self.rooms
    }

    pub fn game(&self) -> Option<&GameView> {
        self.game.as_ref()
    }

    pub fn set_connection(&mut self, state: ConnectionState, reconnect_attempt: u32) {
        self.connection = state;
        self.reconnect_attempt = reconnect_attempt;
    }

    /// Record the player name. Only the first call has any effect.
    pub fn set_player_name(&mut self, name: &str) {
        if self.player_name.is_none() {
            self.player_name = Some(name.to_string());
        }
    }

    /// Replace the room list wholesale.
    pub fn replace_rooms(&mut self, rooms: Vec<RoomSummary>) {
        self.rooms = rooms;
    }

    /// Enter a room we just created.
    pub fn enter_room(&mut self, room_id: &str, room_name: &str) {
        self.early_update = None;
        self.game = Some(GameView::new(room_id, room_name));
    }

    /// Enter a room we joined. A repeated join of the current room keeps the
    /// board and only refreshes the name.
    ///
    /// The server starts the game before acknowledging the join, so an
    /// update held from outside a room belongs to this one.
    pub fn join_room(&mut self, room_id: &str, room_name: &str) {
        match &mut self.game {
            Some(game) if game.room_id == room_id => game.room_name = room_name.to_string(),
            _ => {
                let mut game = GameView::new(room_id, room_name);
                if let Some(update) = self.early_update.take() {
                    tracing::debug!(room_id, "Applying update received before join");
                    game.apply_update(&update);
                }
                self.game = Some(game);
            }
        }
    }

    /// Apply an update to the current game. Returns false when there is no
    /// current room; the update is then held for the next join.
    pub fn apply_update(&mut self, update: &GameUpdate) -> bool {
        match &mut self.game {
            Some(game) => {
                game.apply_update(update);
                true
            }
            None => {
                tracing::debug!("Holding game update received outside a room");
                self.early_update = Some(update.clone());
                false
            }
        }
    }

    pub fn end_game(&mut self, message: &str) -> bool {
        match &mut self.game {
            Some(game) => {
                game.end(message);
                true
            }
            None => false,
        }
    }

    pub fn leave_room(&mut self) {
        self.game = None;
        self.early_update = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            connection: self.connection,
            player_name: self.player_name.clone(),
            reconnect_attempt: self.reconnect_attempt,
            rooms: self.rooms.clone(),
            game: self.game.clone(),
        }
    }
}

/// Immutable copy of the session handed to subscribers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub connection: ConnectionState,
    pub player_name: Option<String>,
    pub reconnect_attempt: u32,
    pub rooms: Vec<RoomSummary>,
    pub game: Option<GameView>,
}

impl SessionSnapshot {
    pub fn phase(&self) -> Phase {
        if self.connection != ConnectionState::Connected {
            return Phase::Disconnected;
        }
        match &self.game {
            None => Phase::Menu,
            Some(game) => match game.status {
                GameStatus::Waiting => Phase::Waiting,
                GameStatus::Ended => Phase::Ended,
                GameStatus::Playing | GameStatus::Won | GameStatus::Lost | GameStatus::Draw => {
                    Phase::Playing
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tresenraya_shared::RoomStatus;

    fn record(id: &str, name: &str, creator: &str) -> RoomSummary {
        RoomSummary::from(RoomRecord {
            id: id.into(),
            name: name.into(),
            creator: creator.into(),
        })
    }

    #[test]
    fn test_new_session_is_disconnected() {
        let session = Session::new();
        let snapshot = session.snapshot();
        assert_eq!(snapshot.connection, ConnectionState::Disconnected);
        assert_eq!(snapshot.reconnect_attempt, 0);
        assert_eq!(snapshot.phase(), Phase::Disconnected);
    }

    #[test]
    fn test_player_name_is_set_once() {
        let mut session = Session::new();
        session.set_player_name("Alice");
        session.set_player_name("Mallory");
        assert_eq!(session.player_name(), Some("Alice"));
    }

    #[test]
    fn test_room_list_is_replaced_not_merged() {
        let mut session = Session::new();
        session.replace_rooms(vec![record("r1", "A", "Alice"), record("r2", "B", "Bob")]);
        session.replace_rooms(vec![record("r3", "C", "Carol")]);

        assert_eq!(session.rooms(), &[record("r3", "C", "Carol")]);
    }

    #[test]
    fn test_phases_follow_game() {
        let mut session = Session::new();
        session.set_connection(ConnectionState::Connected, 0);
        assert_eq!(session.snapshot().phase(), Phase::Menu);

        session.enter_room("room1", "MyRoom");
        assert_eq!(session.snapshot().phase(), Phase::Waiting);

        session.apply_update(&GameUpdate {
            status: RoomStatus::Playing,
            board: [None; 9],
            is_my_turn: true,
            opponent_name: Some("Bob".into()),
        });
        assert_eq!(session.snapshot().phase(), Phase::Playing);

        session.end_game("Draw");
        assert_eq!(session.snapshot().phase(), Phase::Ended);

        session.leave_room();
        assert_eq!(session.snapshot().phase(), Phase::Menu);

        session.set_connection(ConnectionState::Reconnecting, 1);
        assert_eq!(session.snapshot().phase(), Phase::Disconnected);
    }

    #[test]
    fn test_update_before_join_is_applied_on_join() {
        let mut session = Session::new();
        let applied = session.apply_update(&GameUpdate {
            status: RoomStatus::Playing,
            board: [None; 9],
            is_my_turn: true,
            opponent_name: Some("Carol".into()),
        });
        assert!(!applied);
        assert!(session.game().is_none());

        session.join_room("r1", "Room");

        let game = session.game().unwrap();
        assert_eq!(game.status, GameStatus::Playing);
        assert!(game.is_my_turn);
        assert_eq!(game.opponent_name.as_deref(), Some("Carol"));
        assert!(game.check_move(4).is_ok());
    }

    #[test]
    fn test_held_update_is_dropped_by_create_and_leave() {
        let playing = GameUpdate {
            status: RoomStatus::Playing,
            board: [None; 9],
            is_my_turn: true,
            opponent_name: Some("Carol".into()),
        };

        let mut session = Session::new();
        session.apply_update(&playing);
        session.enter_room("mine", "Mine");
        assert_eq!(session.game().unwrap().status, GameStatus::Waiting);

        session.leave_room();
        session.apply_update(&playing);
        session.leave_room();
        session.join_room("r1", "Room");
        assert_eq!(session.game().unwrap().status, GameStatus::Waiting);
    }

    #[test]
    fn test_rejoin_same_room_keeps_board() {
        let mut session = Session::new();
        session.join_room("room1", "Old");
        session.apply_update(&GameUpdate {
            status: RoomStatus::Playing,
            board: tresenraya_shared::parse_board("X, , , , , , , , ").unwrap(),
            is_my_turn: false,
            opponent_name: Some("Bob".into()),
        });
        session.join_room("room1", "New");

        let game = session.game().unwrap();
        assert_eq!(game.room_name, "New");
        assert_eq!(game.status, GameStatus::Playing);

        session.join_room("room2", "Other");
        assert_eq!(session.game().unwrap().status, GameStatus::Waiting);
    }
}
