//! Strata Cache Topics
//!
//! Named publish/subscribe channels carrying string payloads, independent
//! of map entries. Topics provide out-of-band notification between cluster
//! clients; subscribers run on the publishing thread.
//!
//! @version 0.1.0
//! @author Strata Development Team

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

type MessageFn = Arc<dyn Fn(&str) + Send + Sync>;

// =============================================================================
// Topic State
// =============================================================================

/// Cluster-side state for one named topic.
pub(crate) struct TopicState {
    name: String,
    subscribers: RwLock<Vec<(u64, MessageFn)>>,
    next_id: AtomicU64,
}

impl TopicState {
    pub(crate) fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subscribers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

// =============================================================================
// Topic Handle
// =============================================================================

/// Handle to a named publish/subscribe channel.
#[derive(Clone)]
pub struct TopicHandle {
    state: Arc<TopicState>,
}

impl TopicHandle {
    pub(crate) fn new(state: Arc<TopicState>) -> Self {
        Self { state }
    }

    /// The topic name.
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// Publish a message to every subscriber.
    pub fn publish(&self, message: &str) {
        let subscribers: Vec<MessageFn> = {
            let subscribers = self.state.subscribers.read();
            subscribers.iter().map(|(_, f)| Arc::clone(f)).collect()
        };

        for subscriber in subscribers {
            subscriber(message);
        }
    }

    /// Subscribe to messages; returns a cancellable subscription.
    pub fn subscribe<F>(&self, on_message: F) -> TopicSubscription
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        let id = self.state.next_id.fetch_add(1, Ordering::SeqCst);
        self.state
            .subscribers
            .write()
            .push((id, Arc::new(on_message)));

        TopicSubscription {
            state: Arc::clone(&self.state),
            id,
        }
    }
}

// =============================================================================
// Topic Subscription
// =============================================================================

/// A cancellable topic subscription.
pub struct TopicSubscription {
    state: Arc<TopicState>,
    id: u64,
}

impl TopicSubscription {
    /// Stop receiving messages.
    pub fn cancel(self) {
        self.state.subscribers.write().retain(|(id, _)| *id != self.id);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn test_publish_reaches_subscribers() {
        let topic = TopicHandle::new(Arc::new(TopicState::new("updates")));
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&received);
        let _sub = topic.subscribe(move |msg| {
            sink.lock().unwrap().push(msg.to_string());
        });

        topic.publish("hello");
        topic.publish("world");

        let received = received.lock().unwrap();
        assert_eq!(*received, vec!["hello".to_string(), "world".to_string()]);
    }

    #[test]
    fn test_cancelled_subscription_stops_delivery() {
        let topic = TopicHandle::new(Arc::new(TopicState::new("updates")));
        let received = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&received);
        let sub = topic.subscribe(move |msg| {
            sink.lock().unwrap().push(msg.to_string());
        });

        topic.publish("before");
        sub.cancel();
        topic.publish("after");

        assert_eq!(received.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_topic_name() {
        let topic = TopicHandle::new(Arc::new(TopicState::new("server-events")));
        assert_eq!(topic.name(), "server-events");
    }
}
