//! Connection lifecycle state machine.
//!
//! `ConnectionManager` owns the transport and the reconnect timer and is
//! driven entirely by calls from the session loop: commands (`connect`,
//! `disconnect`, `send`) and inbound events (`handle`). It performs no I/O of
//! its own, so every transition can be exercised synchronously in tests.

use std::time::Duration;

use thiserror::Error;
use tresenraya_shared::handshake;

use super::core::BackoffState;
use crate::config::ReconnectPolicy;
use crate::infrastructure::messaging::ConnectionState;
use crate::ports::outbound::{InboundEvent, ReconnectSchedulerPort, TransportEvent, TransportPort};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("A connection is already active or being opened")]
    AlreadyActive,

    #[error("Player name is already set to {current:?}")]
    PlayerNameLocked { current: String },
}

/// What the session layer needs to hear about after a call into the manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    /// Transport opened and handshake sent
    Connected,
    /// A text frame from the server, in arrival order
    FrameReceived(String),
    /// A scheduled retry is now opening a new transport
    Retrying { attempt: u32 },
    /// The link dropped and a retry is scheduled
    ReconnectScheduled { attempt: u32, delay: Duration },
    /// The link dropped and no retries remain
    ReconnectExhausted { attempts: u32 },
    /// Transport fault. State is unchanged; a close may follow.
    TransportError(String),
    /// User-initiated disconnect completed
    Disconnected,
}

pub struct ConnectionManager<T, S> {
    transport: T,
    scheduler: S,
    backoff: BackoffState,
    state: ConnectionState,
    player_name: Option<String>,
}

impl<T, S> ConnectionManager<T, S>
where
    T: TransportPort,
    S: ReconnectSchedulerPort,
{
    pub fn new(transport: T, scheduler: S, policy: ReconnectPolicy) -> Self {
        Self {
            transport,
            scheduler,
            backoff: BackoffState::new(policy),
            state: ConnectionState::Disconnected,
            player_name: None,
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Current reconnection attempt; 0 after a successful open.
    pub fn attempt(&self) -> u32 {
        self.backoff.attempts()
    }

    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// Open a transport as `player_name`.
    ///
    /// Valid from Disconnected or Reconnecting. The name is fixed by the first
    /// successful call; later calls must repeat it.
    pub fn connect(&mut self, player_name: &str) -> Result<(), ConnectionError> {
        if matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            return Err(ConnectionError::AlreadyActive);
        }
        match &self.player_name {
            Some(current) if current != player_name => {
                return Err(ConnectionError::PlayerNameLocked {
                    current: current.clone(),
                });
            }
            Some(_) => {}
            None => self.player_name = Some(player_name.to_string()),
        }

        if self.state == ConnectionState::Reconnecting {
            // Retry now instead of waiting for the timer.
            self.scheduler.cancel();
        } else {
            self.backoff.reset();
        }

        self.open_link();
        Ok(())
    }

    /// Apply an event from the transport or the reconnect timer.
    pub fn handle(&mut self, event: InboundEvent) -> Vec<ConnectionEvent> {
        match event {
            InboundEvent::ReconnectDue => self.on_reconnect_due(),
            InboundEvent::Transport { link, event } => {
                if !self.transport.is_current(link) {
                    tracing::debug!(link, "Ignoring event from superseded link");
                    return Vec::new();
                }
                self.on_transport_event(event)
            }
        }
    }

    /// User-initiated disconnect. Cancels any pending retry.
    pub fn disconnect(&mut self) -> Vec<ConnectionEvent> {
        self.scheduler.cancel();
        self.backoff.reset();

        if self.state == ConnectionState::Disconnected {
            return Vec::new();
        }

        self.transport.close();
        self.state = ConnectionState::Disconnected;
        tracing::info!("Disconnected by user");
        vec![ConnectionEvent::Disconnected]
    }

    /// Best-effort send. Returns false when the frame was dropped.
    pub fn send(&mut self, frame: &str) -> bool {
        if self.state != ConnectionState::Connected || !self.transport.is_open() {
            tracing::debug!(frame, state = ?self.state, "Dropping frame, transport not open");
            return false;
        }
        self.transport.send(frame);
        true
    }

    fn open_link(&mut self) {
        let link = self.transport.open();
        self.state = ConnectionState::Connecting;
        tracing::debug!(link, attempt = self.backoff.attempts(), "Opening transport");
    }

    fn on_reconnect_due(&mut self) -> Vec<ConnectionEvent> {
        if self.state != ConnectionState::Reconnecting {
            tracing::debug!(state = ?self.state, "Ignoring stale reconnect timer");
            return Vec::new();
        }

        let attempt = self.backoff.attempts();
        tracing::info!(attempt, "Reconnecting");
        self.open_link();
        vec![ConnectionEvent::Retrying { attempt }]
    }

    fn on_transport_event(&mut self, event: TransportEvent) -> Vec<ConnectionEvent> {
        match event {
            TransportEvent::Opened => {
                if self.state != ConnectionState::Connecting {
                    return Vec::new();
                }
                if let Some(name) = &self.player_name {
                    self.transport.send(&handshake(name));
                }
                self.backoff.reset();
                self.state = ConnectionState::Connected;
                tracing::info!("Connected");
                vec![ConnectionEvent::Connected]
            }
            TransportEvent::FrameReceived(frame) => {
                if self.state != ConnectionState::Connected {
                    tracing::debug!(state = ?self.state, "Dropping frame received while not connected");
                    return Vec::new();
                }
                vec![ConnectionEvent::FrameReceived(frame)]
            }
            TransportEvent::Errored(message) => {
                tracing::error!(error = %message, "Transport error");
                vec![ConnectionEvent::TransportError(message)]
            }
            TransportEvent::Closed { reason } => self.on_closed(reason),
        }
    }

    fn on_closed(&mut self, reason: Option<String>) -> Vec<ConnectionEvent> {
        if !matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            return Vec::new();
        }

        tracing::info!(reason = reason.as_deref().unwrap_or("none"), "Connection closed");
        self.transport.close();

        match self.backoff.next_delay_and_advance() {
            Some(delay) => {
                let attempt = self.backoff.attempts();
                self.scheduler.schedule(delay);
                self.state = ConnectionState::Reconnecting;
                tracing::info!(
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "Reconnection scheduled"
                );
                vec![ConnectionEvent::ReconnectScheduled { attempt, delay }]
            }
            None => {
                let attempts = self.backoff.attempts();
                self.state = ConnectionState::Disconnected;
                tracing::error!(attempts, "Max reconnection attempts reached, giving up");
                vec![ConnectionEvent::ReconnectExhausted { attempts }]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::testing::{ManualScheduler, RecordingTransport};
    use crate::ports::outbound::{MockReconnectSchedulerPort, MockTransportPort};
    use mockall::predicate::eq;
    use mockall::Sequence;

    type TestManager = ConnectionManager<RecordingTransport, ManualScheduler>;

    fn manager() -> (TestManager, RecordingTransport, ManualScheduler) {
        let transport = RecordingTransport::new();
        let scheduler = ManualScheduler::new();
        let manager = ConnectionManager::new(
            transport.clone(),
            scheduler.clone(),
            ReconnectPolicy::default(),
        );
        (manager, transport, scheduler)
    }

    fn opened(manager: &mut TestManager, transport: &RecordingTransport) -> Vec<ConnectionEvent> {
        transport.mark_open();
        manager.handle(InboundEvent::transport(
            transport.current_link(),
            TransportEvent::Opened,
        ))
    }

    fn closed(manager: &mut TestManager, transport: &RecordingTransport) -> Vec<ConnectionEvent> {
        let link = transport.current_link();
        transport.mark_closed();
        manager.handle(InboundEvent::transport(
            link,
            TransportEvent::Closed { reason: None },
        ))
    }

    #[test]
    fn test_connect_sends_handshake_on_open() {
        let mut transport = MockTransportPort::new();
        let mut seq = Sequence::new();
        transport
            .expect_open()
            .times(1)
            .in_sequence(&mut seq)
            .return_const(7u64);
        transport.expect_is_current().with(eq(7u64)).return_const(true);
        transport
            .expect_send()
            .withf(|frame: &str| frame == "Alice")
            .times(1)
            .in_sequence(&mut seq)
            .return_const(());

        let mut scheduler = MockReconnectSchedulerPort::new();
        scheduler.expect_schedule().never();

        let mut manager = ConnectionManager::new(transport, scheduler, ReconnectPolicy::default());
        manager.connect("Alice").unwrap();
        assert_eq!(manager.state(), ConnectionState::Connecting);

        let events = manager.handle(InboundEvent::transport(7, TransportEvent::Opened));
        assert_eq!(events, vec![ConnectionEvent::Connected]);
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(manager.attempt(), 0);
    }

    #[test]
    fn test_delay_sequence_then_terminal_disconnect() {
        let mut transport = MockTransportPort::new();
        transport.expect_open().times(6).return_const(1u64);
        transport.expect_is_current().return_const(true);
        transport.expect_close().return_const(());

        let mut scheduler = MockReconnectSchedulerPort::new();
        let mut seq = Sequence::new();
        for ms in [1000u64, 2000, 3000, 4000, 5000] {
            scheduler
                .expect_schedule()
                .with(eq(Duration::from_millis(ms)))
                .times(1)
                .in_sequence(&mut seq)
                .return_const(());
        }

        let mut manager = ConnectionManager::new(transport, scheduler, ReconnectPolicy::default());
        manager.connect("Alice").unwrap();

        let mut attempts = Vec::new();
        for _ in 0..5 {
            let events =
                manager.handle(InboundEvent::transport(1, TransportEvent::Closed { reason: None }));
            match events.as_slice() {
                [ConnectionEvent::ReconnectScheduled { attempt, .. }] => attempts.push(*attempt),
                other => panic!("unexpected events: {other:?}"),
            }
            assert_eq!(manager.state(), ConnectionState::Reconnecting);
            manager.handle(InboundEvent::ReconnectDue);
            assert_eq!(manager.state(), ConnectionState::Connecting);
        }
        assert_eq!(attempts, vec![1, 2, 3, 4, 5]);

        let events =
            manager.handle(InboundEvent::transport(1, TransportEvent::Closed { reason: None }));
        assert_eq!(events, vec![ConnectionEvent::ReconnectExhausted { attempts: 5 }]);
        assert_eq!(manager.state(), ConnectionState::Disconnected);

        // Nothing left to retry.
        assert!(manager.handle(InboundEvent::ReconnectDue).is_empty());
    }

    #[test]
    fn test_successful_reopen_resets_attempts() {
        let (mut manager, transport, scheduler) = manager();
        manager.connect("Alice").unwrap();
        opened(&mut manager, &transport);

        closed(&mut manager, &transport);
        manager.handle(InboundEvent::ReconnectDue);
        closed(&mut manager, &transport);
        assert_eq!(manager.attempt(), 2);

        manager.handle(InboundEvent::ReconnectDue);
        opened(&mut manager, &transport);
        assert_eq!(manager.attempt(), 0);

        closed(&mut manager, &transport);
        assert_eq!(scheduler.scheduled_ms(), vec![1000, 2000, 1000]);
        assert_eq!(transport.sent(), vec!["Alice", "Alice"]);
    }

    #[test]
    fn test_connect_preconditions() {
        let (mut manager, transport, _scheduler) = manager();
        manager.connect("Alice").unwrap();
        assert_eq!(manager.connect("Alice"), Err(ConnectionError::AlreadyActive));

        opened(&mut manager, &transport);
        assert_eq!(manager.connect("Alice"), Err(ConnectionError::AlreadyActive));

        manager.disconnect();
        assert_eq!(
            manager.connect("Bob"),
            Err(ConnectionError::PlayerNameLocked {
                current: "Alice".into()
            })
        );
        assert!(manager.connect("Alice").is_ok());
        assert_eq!(manager.player_name(), Some("Alice"));
    }

    #[test]
    fn test_disconnect_cancels_pending_retry() {
        let (mut manager, transport, scheduler) = manager();
        manager.connect("Alice").unwrap();
        opened(&mut manager, &transport);
        closed(&mut manager, &transport);
        assert_eq!(manager.state(), ConnectionState::Reconnecting);

        let events = manager.disconnect();
        assert_eq!(events, vec![ConnectionEvent::Disconnected]);
        assert!(scheduler.cancels() >= 1);

        // A timer expiry that raced the cancel must not reopen.
        assert!(manager.handle(InboundEvent::ReconnectDue).is_empty());
        assert_eq!(transport.opens(), 1);
        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_connect_while_reconnecting_retries_immediately() {
        let (mut manager, transport, scheduler) = manager();
        manager.connect("Alice").unwrap();
        opened(&mut manager, &transport);
        closed(&mut manager, &transport);

        manager.connect("Alice").unwrap();
        assert_eq!(scheduler.cancels(), 1);
        assert_eq!(transport.opens(), 2);
        assert_eq!(manager.attempt(), 1);
    }

    #[test]
    fn test_send_dropped_unless_connected() {
        let (mut manager, transport, _scheduler) = manager();
        assert!(!manager.send("LIST"));

        manager.connect("Alice").unwrap();
        assert!(!manager.send("LIST"));

        opened(&mut manager, &transport);
        assert!(manager.send("LIST"));

        closed(&mut manager, &transport);
        assert!(!manager.send("LIST"));
        assert_eq!(transport.sent(), vec!["Alice", "LIST"]);
    }

    #[test]
    fn test_error_does_not_change_state() {
        let (mut manager, transport, scheduler) = manager();
        manager.connect("Alice").unwrap();
        opened(&mut manager, &transport);

        let events = manager.handle(InboundEvent::transport(
            transport.current_link(),
            TransportEvent::Errored("reset by peer".into()),
        ));
        assert_eq!(
            events,
            vec![ConnectionEvent::TransportError("reset by peer".into())]
        );
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert!(scheduler.scheduled_ms().is_empty());
    }

    #[test]
    fn test_events_from_superseded_link_are_ignored() {
        let (mut manager, transport, _scheduler) = manager();
        manager.connect("Alice").unwrap();
        let stale = transport.current_link();
        opened(&mut manager, &transport);
        closed(&mut manager, &transport);
        manager.handle(InboundEvent::ReconnectDue);

        let events = manager.handle(InboundEvent::transport(
            stale,
            TransportEvent::FrameReceived("LEAVE".into()),
        ));
        assert!(events.is_empty());
        assert_eq!(manager.state(), ConnectionState::Connecting);
    }

    #[test]
    fn test_frames_pass_through_in_order() {
        let (mut manager, transport, _scheduler) = manager();
        manager.connect("Alice").unwrap();
        opened(&mut manager, &transport);

        let link = transport.current_link();
        let mut frames = Vec::new();
        for frame in ["LIST|[]", "LEAVE"] {
            frames.extend(manager.handle(InboundEvent::transport(
                link,
                TransportEvent::FrameReceived(frame.into()),
            )));
        }
        assert_eq!(
            frames,
            vec![
                ConnectionEvent::FrameReceived("LIST|[]".into()),
                ConnectionEvent::FrameReceived("LEAVE".into()),
            ]
        );
    }
}
