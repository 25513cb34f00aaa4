//! Simple test fixtures used across unit tests.
//!
//! Both doubles share their log through an `Arc` so a test can keep a clone
//! after moving the double into the code under test.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::ports::outbound::{LinkId, ReconnectSchedulerPort, TransportPort};

#[derive(Debug, Default)]
pub struct TransportLog {
    pub opens: u32,
    pub closes: u32,
    pub sent: Vec<String>,
    pub current: Option<LinkId>,
    pub open: bool,
}

/// Transport that records calls and never touches the network.
///
/// Tests drive it by feeding `InboundEvent`s tagged with `current_link()`.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    log: Arc<Mutex<TransportLog>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opens(&self) -> u32 {
        self.log.lock().unwrap().opens
    }

    pub fn sent(&self) -> Vec<String> {
        self.log.lock().unwrap().sent.clone()
    }

    pub fn current_link(&self) -> LinkId {
        self.log.lock().unwrap().current.unwrap_or_default()
    }

    /// Mark the current link writable, as a real transport does just before
    /// reporting `Opened`.
    pub fn mark_open(&self) {
        self.log.lock().unwrap().open = true;
    }

    /// Mark the current link dead, as a real transport does just before
    /// reporting `Closed`.
    pub fn mark_closed(&self) {
        self.log.lock().unwrap().open = false;
    }
}

impl TransportPort for RecordingTransport {
    fn open(&mut self) -> LinkId {
        let mut log = self.log.lock().unwrap();
        log.opens += 1;
        log.open = false;
        let link = LinkId::from(log.opens);
        log.current = Some(link);
        link
    }

    fn send(&mut self, frame: &str) {
        let mut log = self.log.lock().unwrap();
        if log.open {
            log.sent.push(frame.to_string());
        }
    }

    fn close(&mut self) {
        let mut log = self.log.lock().unwrap();
        log.closes += 1;
        log.open = false;
        log.current = None;
    }

    fn is_open(&self) -> bool {
        self.log.lock().unwrap().open
    }

    fn is_current(&self, link: LinkId) -> bool {
        self.log.lock().unwrap().current == Some(link)
    }
}

#[derive(Debug, Default)]
pub struct SchedulerLog {
    pub scheduled: Vec<Duration>,
    pub cancels: u32,
}

/// Scheduler that only records requested delays; tests fire retries by hand.
#[derive(Clone, Default)]
pub struct ManualScheduler {
    log: Arc<Mutex<SchedulerLog>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scheduled_ms(&self) -> Vec<u128> {
        self.log
            .lock()
            .unwrap()
            .scheduled
            .iter()
            .map(Duration::as_millis)
            .collect()
    }

    pub fn cancels(&self) -> u32 {
        self.log.lock().unwrap().cancels
    }
}

impl ReconnectSchedulerPort for ManualScheduler {
    fn schedule(&mut self, delay: Duration) {
        self.log.lock().unwrap().scheduled.push(delay);
    }

    fn cancel(&mut self) {
        self.log.lock().unwrap().cancels += 1;
    }
}
