//! Line-oriented terminal front end.
//!
//! Parses user input into client commands and renders change notifications.
//! No game rules live here.

use std::fmt::Write as _;
use std::str::FromStr;

use thiserror::Error;
use tresenraya_shared::Intent;

use crate::application::dto::{ChangeNotification, NoticeKind};
use crate::state::{Cell, GameView, Phase, SessionSnapshot};

pub const HELP: &str = "commands: create <name> | join <id> | list | move <0-8> | leave | connect | disconnect | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalCommand {
    Submit(Intent),
    Connect,
    Disconnect,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("Unknown command {0:?}")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),
}

impl FromStr for TerminalCommand {
    type Err = ParseCommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "create" => Ok(TerminalCommand::Submit(Intent::CreateRoom {
                name: rest.to_string(),
            })),
            "join" if !rest.is_empty() => Ok(TerminalCommand::Submit(Intent::JoinRoom {
                room_id: rest.to_string(),
            })),
            "join" => Err(ParseCommandError::Usage("join <room id>")),
            "list" => Ok(TerminalCommand::Submit(Intent::RequestRoomList)),
            "move" => rest
                .parse::<u8>()
                .map(|position| TerminalCommand::Submit(Intent::Move { position }))
                .map_err(|_| ParseCommandError::Usage("move <0-8>")),
            "leave" => Ok(TerminalCommand::Submit(Intent::LeaveRoom)),
            "connect" => Ok(TerminalCommand::Connect),
            "disconnect" => Ok(TerminalCommand::Disconnect),
            "help" | "?" => Ok(TerminalCommand::Help),
            "quit" | "exit" => Ok(TerminalCommand::Quit),
            other => Err(ParseCommandError::Unknown(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per notification
    Json,
}

impl OutputFormat {
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

pub fn render(notification: &ChangeNotification, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => render_text(notification),
        OutputFormat::Json => serde_json::to_string(notification)
            .unwrap_or_else(|e| format!("{{\"error\":\"{e}\"}}")),
    }
}

fn render_text(notification: &ChangeNotification) -> String {
    let mut out = String::new();
    if let Some(notice) = &notification.notice {
        let tag = match notice.kind {
            NoticeKind::Info => "info",
            NoticeKind::Success => "ok",
            NoticeKind::Error if notice.persistent => "FATAL",
            NoticeKind::Error => "error",
        };
        let _ = writeln!(out, "[{tag}] {}", notice.message);
    }
    out.push_str(&render_snapshot(&notification.snapshot));
    out
}

fn render_snapshot(snapshot: &SessionSnapshot) -> String {
    let mut out = String::new();
    match (snapshot.phase(), &snapshot.game) {
        (Phase::Disconnected, _) => {
            let _ = writeln!(out, "-- {:?} --", snapshot.connection);
        }
        (Phase::Menu, _) => {
            let _ = writeln!(out, "-- rooms ({}) --", snapshot.rooms.len());
            for room in &snapshot.rooms {
                let _ = writeln!(out, "  {}  {} (by {})", room.id, room.name, room.creator_name);
            }
        }
        (_, Some(game)) => out.push_str(&render_game(game)),
        (_, None) => {}
    }
    out
}

fn render_game(game: &GameView) -> String {
    let mut out = String::new();
    let opponent = game.opponent_name.as_deref().unwrap_or("nobody yet");
    let _ = writeln!(
        out,
        "-- {} [{}] vs {} : {:?} --",
        game.room_name, game.room_id, opponent, game.status
    );

    let mine = game.my_symbol().map(|m| m.as_char()).unwrap_or('?');
    let theirs = game.my_symbol().map(|m| m.other().as_char()).unwrap_or('#');
    for row in game.board().chunks(3) {
        let line: Vec<String> = row
            .iter()
            .map(|cell| match cell {
                Cell::Empty => ".".to_string(),
                Cell::Mine => mine.to_string(),
                Cell::Theirs => theirs.to_string(),
            })
            .collect();
        let _ = writeln!(out, "  {}", line.join(" "));
    }

    if let Some(message) = &game.end_message {
        let _ = writeln!(out, "  {message}");
    } else if game.is_my_turn {
        let _ = writeln!(out, "  your turn");
    }
    out
}
