//! Destination registry
//!
//! Queues and topics are created lazily by name. Lookup is case-insensitive
//! within a kind and the two kinds never collide: `"orders"` may name both a
//! queue and a topic. Names are otherwise taken as given, so `" orders"` is a
//! different destination. The first spelling seen is kept as the name.
//!
//! Handles are handed out as `Arc`s and membership is decided by pointer
//! identity, so a `Topic` built outside this registry, or taken from a broker
//! that has since been removed, is never considered registered.
//!
//! Concurrency note: the registry itself is not synchronized; the owning
//! `Broker` keeps it behind a lock.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::broker::BrokerId;

#[derive(Debug)]
pub struct Queue {
    name: String,
    broker_id: BrokerId,
}

#[derive(Debug)]
pub struct Topic {
    name: String,
    broker_id: BrokerId,
}

impl Queue {
    pub fn new(name: &str, broker_id: BrokerId) -> Self {
        Self {
            name: name.to_string(),
            broker_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the broker this queue was created for.
    pub fn broker_id(&self) -> BrokerId {
        self.broker_id
    }
}

impl Topic {
    pub fn new(name: &str, broker_id: BrokerId) -> Self {
        Self {
            name: name.to_string(),
            broker_id,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Id of the broker this topic was created for.
    pub fn broker_id(&self) -> BrokerId {
        self.broker_id
    }
}

/// Either kind of destination, as accepted by `Broker::send`.
#[derive(Debug, Clone)]
pub enum Destination {
    Queue(Arc<Queue>),
    Topic(Arc<Topic>),
}

impl Destination {
    pub fn name(&self) -> &str {
        match self {
            Destination::Queue(q) => q.name(),
            Destination::Topic(t) => t.name(),
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Queue(q) => write!(f, "queue://{}", q.name()),
            Destination::Topic(t) => write!(f, "topic://{}", t.name()),
        }
    }
}

impl From<Arc<Queue>> for Destination {
    fn from(queue: Arc<Queue>) -> Self {
        Destination::Queue(queue)
    }
}

impl From<Arc<Topic>> for Destination {
    fn from(topic: Arc<Topic>) -> Self {
        Destination::Topic(topic)
    }
}

impl From<&Arc<Queue>> for Destination {
    fn from(queue: &Arc<Queue>) -> Self {
        Destination::Queue(Arc::clone(queue))
    }
}

impl From<&Arc<Topic>> for Destination {
    fn from(topic: &Arc<Topic>) -> Self {
        Destination::Topic(Arc::clone(topic))
    }
}

fn lookup_key(name: &str) -> String {
    name.to_lowercase()
}

#[derive(Debug)]
pub struct DestinationRegistry {
    broker_id: BrokerId,
    queues: HashMap<String, Arc<Queue>>,
    topics: HashMap<String, Arc<Topic>>,
}

impl DestinationRegistry {
    pub fn new(broker_id: BrokerId) -> Self {
        Self {
            broker_id,
            queues: HashMap::new(),
            topics: HashMap::new(),
        }
    }

    /// Return the queue registered under `name` (any case), creating it first
    /// if needed. The `bool` is `true` when the queue was created.
    pub fn create_or_get_queue(&mut self, name: &str) -> (Arc<Queue>, bool) {
        let key = lookup_key(name);
        if let Some(queue) = self.queues.get(&key) {
            return (Arc::clone(queue), false);
        }
        let queue = Arc::new(Queue::new(name, self.broker_id));
        self.queues.insert(key, Arc::clone(&queue));
        (queue, true)
    }

    /// Return the topic registered under `name` (any case), creating it first
    /// if needed. The `bool` is `true` when the topic was created.
    pub fn create_or_get_topic(&mut self, name: &str) -> (Arc<Topic>, bool) {
        let key = lookup_key(name);
        if let Some(topic) = self.topics.get(&key) {
            return (Arc::clone(topic), false);
        }
        let topic = Arc::new(Topic::new(name, self.broker_id));
        self.topics.insert(key, Arc::clone(&topic));
        (topic, true)
    }

    pub fn is_registered_queue(&self, queue: &Queue) -> bool {
        self.queues
            .get(&lookup_key(&queue.name))
            .is_some_and(|q| std::ptr::eq(Arc::as_ptr(q), queue))
    }

    pub fn is_registered_topic(&self, topic: &Topic) -> bool {
        self.topics
            .get(&lookup_key(&topic.name))
            .is_some_and(|t| std::ptr::eq(Arc::as_ptr(t), topic))
    }

    pub fn is_registered(&self, destination: &Destination) -> bool {
        match destination {
            Destination::Queue(q) => self.is_registered_queue(q),
            Destination::Topic(t) => self.is_registered_topic(t),
        }
    }

    pub fn queues(&self) -> Vec<Arc<Queue>> {
        self.queues.values().cloned().collect()
    }

    pub fn topics(&self) -> Vec<Arc<Topic>> {
        self.topics.values().cloned().collect()
    }
}
