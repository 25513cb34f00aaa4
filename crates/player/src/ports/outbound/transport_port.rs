//! Transport Port - Opens, feeds and closes the server link
//!
//! Every open produces a fresh [`LinkId`]. Events coming back from the
//! transport carry that id so the session loop can ignore anything emitted by
//! a link it has already abandoned.

/// Identifier of one transport instance.
pub type LinkId = u64;

/// Lifecycle and data events produced by a transport link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// The link is ready to carry frames
    Opened,
    /// A text frame arrived from the server
    FrameReceived(String),
    /// The link is gone, whether it ever opened or not
    Closed { reason: Option<String> },
    /// A transport fault. Always followed by `Closed` when fatal.
    Errored(String),
}

/// Everything the session loop can receive besides user commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    Transport { link: LinkId, event: TransportEvent },
    /// The reconnect timer elapsed
    ReconnectDue,
}

impl InboundEvent {
    pub fn transport(link: LinkId, event: TransportEvent) -> Self {
        InboundEvent::Transport { link, event }
    }
}

/// Port for the underlying message transport.
///
/// Implementations report progress asynchronously as [`InboundEvent`]s on a
/// channel handed to them at construction.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait TransportPort: Send {
    /// Start opening a new link, abandoning any previous one.
    fn open(&mut self) -> LinkId;

    /// Queue a frame on the current link.
    fn send(&mut self, frame: &str);

    /// Close the current link. No further events are expected from it.
    fn close(&mut self);

    /// Whether the current link is open and writable
    fn is_open(&self) -> bool;

    /// Whether `link` is the link most recently opened and not yet closed
    fn is_current(&self, link: LinkId) -> bool;
}
