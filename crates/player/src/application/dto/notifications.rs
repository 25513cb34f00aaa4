//! Change notifications delivered after every processed event.

use serde::Serialize;

use crate::state::SessionSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeKind {
    Info,
    Success,
    Error,
}

/// A user-facing message accompanying a change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    /// Stays visible until dismissed rather than fading out
    pub persistent: bool,
}

impl Notice {
    fn transient(kind: NoticeKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            persistent: false,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::transient(NoticeKind::Info, message)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::transient(NoticeKind::Success, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::transient(NoticeKind::Error, message)
    }

    pub fn persistent_error(message: impl Into<String>) -> Self {
        Self {
            persistent: true,
            ..Self::error(message)
        }
    }
}

/// Snapshot of the session after one processed event, plus an optional notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChangeNotification {
    pub snapshot: SessionSnapshot,
    pub notice: Option<Notice>,
}

impl ChangeNotification {
    pub fn new(snapshot: SessionSnapshot, notice: Option<Notice>) -> Self {
        Self { snapshot, notice }
    }
}
