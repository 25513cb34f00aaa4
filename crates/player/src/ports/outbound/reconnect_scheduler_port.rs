//! Reconnect Scheduler Port - One-shot delayed retry trigger

use std::time::Duration;

/// Port for the reconnection timer.
///
/// At most one retry is pending at a time. When the delay elapses the
/// implementation delivers `InboundEvent::ReconnectDue` to the session loop.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait ReconnectSchedulerPort: Send {
    /// Arm the timer, replacing any pending retry.
    fn schedule(&mut self, delay: Duration);

    /// Disarm the timer. A no-op when nothing is pending.
    fn cancel(&mut self);
}
