//! Desktop WebSocket transport using tokio-tungstenite

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::ports::outbound::{InboundEvent, LinkId, TransportEvent, TransportPort};

struct ActiveLink {
    id: LinkId,
    outbound: mpsc::UnboundedSender<String>,
    open: Arc<AtomicBool>,
}

/// WebSocket transport to the game server.
///
/// Each `open` spawns a task owning one socket. The task reports lifecycle
/// and inbound frames on the shared inbound channel, tagged with its link id.
/// Dropping the outbound sender (on `close` or a new `open`) ends the task.
pub struct WsTransport {
    url: String,
    events: mpsc::UnboundedSender<InboundEvent>,
    next_link: LinkId,
    link: Option<ActiveLink>,
}

impl WsTransport {
    pub fn new(url: impl Into<String>, events: mpsc::UnboundedSender<InboundEvent>) -> Self {
        Self {
            url: url.into(),
            events,
            next_link: 0,
            link: None,
        }
    }
}

impl TransportPort for WsTransport {
    fn open(&mut self) -> LinkId {
        self.next_link += 1;
        let id = self.next_link;
        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let open = Arc::new(AtomicBool::new(false));

        tokio::spawn(run_link(
            self.url.clone(),
            id,
            outbound_rx,
            Arc::clone(&open),
            self.events.clone(),
        ));

        self.link = Some(ActiveLink {
            id,
            outbound: outbound_tx,
            open,
        });
        id
    }

    fn send(&mut self, frame: &str) {
        if let Some(link) = &self.link {
            if link.outbound.send(frame.to_string()).is_err() {
                tracing::debug!(link = link.id, "Link task gone, frame dropped");
            }
        }
    }

    fn close(&mut self) {
        if let Some(link) = self.link.take() {
            link.open.store(false, Ordering::SeqCst);
        }
    }

    fn is_open(&self) -> bool {
        self.link
            .as_ref()
            .is_some_and(|link| link.open.load(Ordering::SeqCst))
    }

    fn is_current(&self, link: LinkId) -> bool {
        self.link.as_ref().is_some_and(|current| current.id == link)
    }
}

async fn run_link(
    url: String,
    id: LinkId,
    mut outbound: mpsc::UnboundedReceiver<String>,
    open: Arc<AtomicBool>,
    events: mpsc::UnboundedSender<InboundEvent>,
) {
    let emit = |event: TransportEvent| {
        // The session loop is gone; nothing left to notify.
        let _ = events.send(InboundEvent::transport(id, event));
    };

    let ws_stream = match connect_async(url.as_str()).await {
        Ok((ws_stream, _)) => ws_stream,
        Err(e) => {
            tracing::error!(link = id, "Failed to connect to {}: {}", url, e);
            emit(TransportEvent::Errored(e.to_string()));
            emit(TransportEvent::Closed {
                reason: Some("connect failed".to_string()),
            });
            return;
        }
    };

    tracing::info!(link = id, "Connected to {}", url);
    let (mut write, mut read) = ws_stream.split();
    open.store(true, Ordering::SeqCst);
    emit(TransportEvent::Opened);

    let reason = loop {
        tokio::select! {
            msg = read.next() => match msg {
                Some(Ok(Message::Text(text))) => emit(TransportEvent::FrameReceived(text)),
                Some(Ok(Message::Close(frame))) => {
                    break frame.map(|f| f.reason.to_string());
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    emit(TransportEvent::Errored(e.to_string()));
                    break Some(e.to_string());
                }
                None => break None,
            },
            frame = outbound.recv() => match frame {
                Some(frame) => {
                    if let Err(e) = write.send(Message::Text(frame)).await {
                        emit(TransportEvent::Errored(e.to_string()));
                        break Some(e.to_string());
                    }
                }
                None => {
                    // Closed locally.
                    let _ = write.send(Message::Close(None)).await;
                    break Some("closed by client".to_string());
                }
            },
        }
    };

    open.store(false, Ordering::SeqCst);
    tracing::debug!(link = id, reason = ?reason, "Link task finished");
    emit(TransportEvent::Closed { reason });
}
