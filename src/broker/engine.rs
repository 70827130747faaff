//! Broker engine
//!
//! This module contains the in-process broker responsible for:
//! - the destination registry (queues and topics, created lazily by name)
//! - the consumer registry (topic → consumers in registration order)
//! - synchronous dispatch of a message to every push consumer of a destination
//! - the per-consumer delivery log and its acknowledgment bookkeeping
//!
//! Concurrency and usage notes:
//! - A `Broker` is shared as `Arc<Broker>` between every connection to the
//!   same broker name. All methods take `&self`.
//! - Three locks guard the state and are always taken in the order
//!   `destinations → subscriptions → deliveries`.
//! - No lock is held while a listener runs. `send` copies the subscriber list
//!   under the lock and releases it before the first callback; a listener may
//!   therefore call back into the broker (register, send) without deadlocking.
//! - Queues are routed exactly like topics: a message sent to a destination
//!   with no registered consumer is dropped. There is no backlog and no
//!   point-to-point single delivery.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::{debug, warn};
use uuid::Uuid;

use crate::broker::consumer::{Consumer, ConsumerId};
use crate::broker::delivery::{Delivery, DeliveryRetention};
use crate::broker::destination::{Destination, DestinationRegistry, Queue, Topic};
use crate::broker::message::Message;
use crate::config::DeliverySettings;
use crate::utils::error::{Error, Result};

/// Identity of one broker instance, generated when the broker is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BrokerId(Uuid);

impl BrokerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BrokerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BrokerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for BrokerId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

#[derive(Debug)]
pub struct Broker {
    name: String,
    id: BrokerId,
    settings: DeliverySettings,
    destinations: RwLock<DestinationRegistry>,
    // keyed by lowercased topic name; membership is checked against `destinations` first
    subscriptions: RwLock<HashMap<String, Vec<Arc<Consumer>>>>,
    deliveries: Mutex<HashMap<ConsumerId, Vec<Arc<Delivery>>>>,
    next_delivery: AtomicU64,
}

impl Broker {
    pub fn new(name: &str) -> Self {
        Self::with_settings(name, DeliverySettings::default())
    }

    pub fn with_settings(name: &str, settings: DeliverySettings) -> Self {
        let id = BrokerId::new();
        Self {
            name: name.to_string(),
            id,
            settings,
            destinations: RwLock::new(DestinationRegistry::new(id)),
            subscriptions: RwLock::new(HashMap::new()),
            deliveries: Mutex::new(HashMap::new()),
            next_delivery: AtomicU64::new(1),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> BrokerId {
        self.id
    }

    pub fn settings(&self) -> &DeliverySettings {
        &self.settings
    }

    pub fn create_queue(&self, name: &str) -> Arc<Queue> {
        let (queue, created) = self
            .destinations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .create_or_get_queue(name);
        if created {
            debug!(broker = %self.name, queue = %queue.name(), "created queue");
        }
        queue
    }

    pub fn create_topic(&self, name: &str) -> Arc<Topic> {
        let (topic, created) = self
            .destinations
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .create_or_get_topic(name);
        if created {
            debug!(broker = %self.name, topic = %topic.name(), "created topic");
        }
        topic
    }

    pub fn is_registered_topic(&self, topic: &Topic) -> bool {
        self.destinations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_registered_topic(topic)
    }

    pub fn is_registered(&self, destination: &Destination) -> bool {
        self.destinations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_registered(destination)
    }

    pub fn queues(&self) -> Vec<Arc<Queue>> {
        self.destinations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .queues()
    }

    pub fn topics(&self) -> Vec<Arc<Topic>> {
        self.destinations
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .topics()
    }

    /// Subscribe `consumer` to `topic`.
    ///
    /// Fails if the topic was not created by this broker or if the consumer is
    /// already registered for it. Registration order is dispatch order.
    pub fn register_consumer(&self, topic: &Arc<Topic>, consumer: Arc<Consumer>) -> Result<()> {
        let destinations = self
            .destinations
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if !destinations.is_registered_topic(topic) {
            return Err(Error::UnknownDestination(
                Destination::from(topic).to_string(),
            ));
        }

        let mut subscriptions = self
            .subscriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let consumers = subscriptions
            .entry(topic.name().to_lowercase())
            .or_default();
        if consumers.iter().any(|c| c.id() == consumer.id()) {
            return Err(Error::DuplicateRegistration {
                consumer: consumer.id(),
                topic: topic.name().to_string(),
            });
        }

        debug!(broker = %self.name, topic = %topic.name(), consumer = %consumer.id(), "registered consumer");
        consumers.push(consumer);
        Ok(())
    }

    /// Consumers registered for `topic`, in registration order.
    pub fn consumers(&self, topic: &Topic) -> Vec<Arc<Consumer>> {
        self.subscriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&topic.name().to_lowercase())
            .cloned()
            .unwrap_or_default()
    }

    /// Dispatch `message` to every push consumer of `destination`.
    ///
    /// Listeners run synchronously on the calling thread in registration
    /// order, and one unacknowledged `Delivery` is logged per listener that
    /// returned. A listener error stops the pass: consumers already served
    /// keep their deliveries, the rest are not called. Returns the number of
    /// deliveries made.
    pub fn send(&self, destination: &Destination, message: Message) -> Result<usize> {
        let consumers = {
            let destinations = self
                .destinations
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if !destinations.is_registered(destination) {
                return Err(Error::UnknownDestination(destination.to_string()));
            }
            match destination {
                Destination::Topic(topic) => self.consumers(topic),
                // registration is topic-only, so nothing can be subscribed to a queue
                Destination::Queue(_) => Vec::new(),
            }
        };

        let message = Arc::new(message);
        let mut delivered = 0;

        for consumer in consumers {
            let Some(listener) = consumer.listener() else {
                continue;
            };

            if let Err(source) = listener.on_message(&message) {
                warn!(
                    broker = %self.name,
                    destination = %destination,
                    consumer = %consumer.id(),
                    error = %source,
                    "listener failed; aborting dispatch"
                );
                return Err(Error::Listener {
                    consumer: consumer.id(),
                    source,
                });
            }

            self.record_delivery(consumer.id(), Arc::clone(&message));
            delivered += 1;
        }

        debug!(
            broker = %self.name,
            destination = %destination,
            message_id = %message.message_id,
            delivered,
            "dispatched message"
        );
        Ok(delivered)
    }

    fn record_delivery(&self, consumer: ConsumerId, message: Arc<Message>) {
        let id = self.next_delivery.fetch_add(1, Ordering::Relaxed);
        let mut deliveries = self
            .deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let log = deliveries.entry(consumer).or_default();
        log.push(Arc::new(Delivery::new(id, consumer, message)));

        if let Some(max) = self.settings.max_log_len {
            if log.len() > max {
                let excess = log.len() - max;
                log.drain(..excess);
            }
        }
    }

    /// Snapshot of the delivery log of `consumer`, oldest first.
    pub fn deliveries(&self, consumer: ConsumerId) -> Vec<Arc<Delivery>> {
        self.deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&consumer)
            .cloned()
            .unwrap_or_default()
    }

    pub fn unacknowledged(&self, consumer: ConsumerId) -> Vec<Arc<Delivery>> {
        self.deliveries(consumer)
            .into_iter()
            .filter(|d| !d.is_acknowledged())
            .collect()
    }

    /// Acknowledge delivery `delivery` of `consumer`.
    ///
    /// Returns `false` if the record was already acknowledged. Under
    /// `DropOnAcknowledge` the record also leaves the log.
    pub fn acknowledge(&self, consumer: ConsumerId, delivery: u64) -> Result<bool> {
        let mut deliveries = self
            .deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(log) = deliveries.get_mut(&consumer) else {
            return Err(Error::UnknownDelivery { consumer, delivery });
        };
        let Some(pos) = log.iter().position(|d| d.id() == delivery) else {
            return Err(Error::UnknownDelivery { consumer, delivery });
        };

        let first = log[pos].acknowledge();
        if self.settings.retention == DeliveryRetention::DropOnAcknowledge {
            log.remove(pos);
        }
        Ok(first)
    }

    /// Drop every acknowledged record from the log of `consumer`.
    ///
    /// Returns how many records were removed.
    pub fn prune_acknowledged(&self, consumer: ConsumerId) -> usize {
        let mut deliveries = self
            .deliveries
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        match deliveries.get_mut(&consumer) {
            Some(log) => {
                let before = log.len();
                log.retain(|d| !d.is_acknowledged());
                before - log.len()
            }
            None => 0,
        }
    }
}
