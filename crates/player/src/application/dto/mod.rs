//! Data transfer objects
//!
//! Types handed from the session loop to the rendering layer.

pub mod notifications;

pub use notifications::{ChangeNotification, Notice, NoticeKind};
