//! Event Bus for delivering change notifications to the rendering layer.
//!
//! Push-based: subscribers register callbacks that are invoked, in order, for
//! every notification the session loop produces.

use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::dto::ChangeNotification;

type Subscriber = Box<dyn FnMut(&ChangeNotification) + Send + 'static>;

/// Event bus for session change notifications.
///
/// Subscribers live as long as the bus; there is no unsubscribe.
#[derive(Clone)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            subscribers: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Subscribe to all notifications.
    pub async fn subscribe(&self, callback: impl FnMut(&ChangeNotification) + Send + 'static) {
        self.subscribers.lock().await.push(Box::new(callback));
    }

    /// Deliver a notification to every subscriber.
    ///
    /// Called by the session loop once per processed event; awaiting it keeps
    /// delivery in processing order.
    pub async fn dispatch(&self, notification: &ChangeNotification) {
        let mut subscribers = self.subscribers.lock().await;
        for subscriber in subscribers.iter_mut() {
            subscriber(notification);
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
