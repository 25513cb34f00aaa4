//! Session state owned by the session loop
//!
//! `Session` is mutated only by the event dispatcher; everything else sees
//! `SessionSnapshot` copies.

mod game_view;
mod session_state;

pub use game_view::{Cell, GameStatus, GameView, MoveRejection};
pub use session_state::{Phase, RoomSummary, Session, SessionSnapshot};
