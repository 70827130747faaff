//! Delivery records
//!
//! A `Delivery` is created each time a message is handed to a push consumer's
//! listener. The acknowledgment flag starts out false and only ever moves to
//! true.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Deserialize;

use crate::broker::consumer::ConsumerId;
use crate::broker::message::Message;

#[derive(Debug)]
pub struct Delivery {
    id: u64,
    consumer: ConsumerId,
    message: Arc<Message>,
    delivered_at: i64,
    acknowledged: AtomicBool,
}

impl Delivery {
    pub fn new(id: u64, consumer: ConsumerId, message: Arc<Message>) -> Self {
        Self {
            id,
            consumer,
            message,
            delivered_at: chrono::Utc::now().timestamp_millis(),
            acknowledged: AtomicBool::new(false),
        }
    }

    /// Sequence number, unique within the broker that made the delivery.
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn consumer(&self) -> ConsumerId {
        self.consumer
    }

    pub fn message(&self) -> &Arc<Message> {
        &self.message
    }

    /// Milliseconds since UNIX epoch at which the listener returned.
    pub fn delivered_at(&self) -> i64 {
        self.delivered_at
    }

    /// Mark this record acknowledged.
    ///
    /// Returns `false` if it already was.
    pub fn acknowledge(&self) -> bool {
        !self.acknowledged.swap(true, Ordering::AcqRel)
    }

    pub fn is_acknowledged(&self) -> bool {
        self.acknowledged.load(Ordering::Acquire)
    }
}

/// What happens to delivery records once they are acknowledged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryRetention {
    /// Keep every record. The log grows without bound and serves as a
    /// diagnostic trail, not as queuing state.
    #[default]
    Retain,
    /// Remove a record from the log when it is acknowledged through
    /// `Broker::acknowledge`.
    DropOnAcknowledge,
}
