//! Applies decoded server events to the session.
//!
//! Each event yields the notice to show (if any) and, for `LEAVE`, the
//! follow-up request the client should send next.

use tresenraya_shared::{parse_room_list, Intent, ServerEvent};

use crate::application::dto::Notice;
use crate::state::{RoomSummary, Session};

/// Result of applying one server event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Dispatch {
    pub notice: Option<Notice>,
    pub follow_up: Option<Intent>,
}

impl Dispatch {
    fn quiet() -> Self {
        Self::default()
    }

    fn notice(notice: Notice) -> Self {
        Self {
            notice: Some(notice),
            follow_up: None,
        }
    }
}

pub struct EventDispatcher;

impl EventDispatcher {
    pub fn apply_server_event(session: &mut Session, event: ServerEvent) -> Dispatch {
        match event {
            ServerEvent::RoomCreated { room_id, room_name } => {
                tracing::info!(room_id = %room_id, "Room created");
                session.enter_room(&room_id, &room_name);
                Dispatch::notice(Notice::success(format!(
                    "Room '{room_name}' created, waiting for an opponent"
                )))
            }
            ServerEvent::RoomJoined { room_id, room_name } => {
                tracing::info!(room_id = %room_id, "Joined room");
                session.join_room(&room_id, &room_name);
                Dispatch::notice(Notice::success(format!("Joined room '{room_name}'")))
            }
            ServerEvent::GameUpdated(update) => {
                session.apply_update(&update);
                Dispatch::quiet()
            }
            ServerEvent::GameEnded { message } => {
                if !session.end_game(&message) {
                    tracing::warn!("Game end received outside a room");
                }
                Dispatch::notice(Notice::info(message))
            }
            ServerEvent::ServerError { message } => {
                tracing::warn!(error = %message, "Server reported an error");
                Dispatch::notice(Notice::error(message))
            }
            ServerEvent::RoomList { payload } => match parse_room_list(&payload) {
                Ok(records) => {
                    tracing::debug!(count = records.len(), "Room list received");
                    session.replace_rooms(records.into_iter().map(RoomSummary::from).collect());
                    Dispatch::quiet()
                }
                Err(e) => {
                    tracing::warn!("Dropping unparseable room list: {}", e);
                    Dispatch::quiet()
                }
            },
            ServerEvent::RoomLeft => {
                session.leave_room();
                Dispatch {
                    notice: Some(Notice::info("Left the room")),
                    follow_up: Some(Intent::RequestRoomList),
                }
            }
        }
    }
}
