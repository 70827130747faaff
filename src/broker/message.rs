//! Message handle routed by the broker.
//!
//! The broker never looks inside a `Message`. Header handling, body encoding
//! and read-only/write-only state belong to the message layer that builds
//! these handles; the core only moves them from sender to listeners. The body
//! is any `Send + Sync` value, recovered by its owner with `body::<T>()`.
//!
//! Notes on fields:
//! - `message_id`: generated when the handle is created
//! - `timestamp`: milliseconds since UNIX epoch at creation

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use uuid::Uuid;

#[derive(Clone)]
pub struct Message {
    pub message_id: String,
    pub timestamp: i64,
    body: Arc<dyn Any + Send + Sync>,
}

impl Message {
    pub fn new<B: Any + Send + Sync>(body: B) -> Self {
        Self {
            message_id: Uuid::new_v4().to_string(),
            timestamp: chrono::Utc::now().timestamp_millis(),
            body: Arc::new(body),
        }
    }

    /// The body, if it is a `B`.
    pub fn body<B: Any>(&self) -> Option<&B> {
        self.body.downcast_ref::<B>()
    }
}

impl fmt::Debug for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("message_id", &self.message_id)
            .field("timestamp", &self.timestamp)
            .finish_non_exhaustive()
    }
}
