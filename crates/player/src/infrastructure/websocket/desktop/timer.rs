//! Reconnect timer on the tokio clock

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::ports::outbound::{InboundEvent, ReconnectSchedulerPort};

/// Delivers `InboundEvent::ReconnectDue` on the session loop's inbound
/// channel once the scheduled delay has elapsed.
pub struct TokioReconnectTimer {
    events: mpsc::UnboundedSender<InboundEvent>,
    pending: Option<JoinHandle<()>>,
}

impl TokioReconnectTimer {
    pub fn new(events: mpsc::UnboundedSender<InboundEvent>) -> Self {
        Self {
            events,
            pending: None,
        }
    }
}

impl ReconnectSchedulerPort for TokioReconnectTimer {
    fn schedule(&mut self, delay: Duration) {
        self.cancel();
        let events = self.events.clone();
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = events.send(InboundEvent::ReconnectDue);
        }));
    }

    fn cancel(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }
}

impl Drop for TokioReconnectTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
