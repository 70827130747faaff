//! Consumers and their listeners
//!
//! A `Consumer` is either push-style, holding a listener the dispatcher calls
//! synchronously, or pull-style, which the dispatcher skips. The mode can be
//! switched at any time; `send` looks at the mode current when it reaches the
//! consumer.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

use uuid::Uuid;

use crate::broker::message::Message;
use crate::utils::error::ListenerError;

/// Identity of a consumer; registration and delivery logs are keyed by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConsumerId(Uuid);

impl ConsumerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConsumerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ConsumerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "consumer-{}", self.0)
    }
}

/// Callback invoked once per dispatched message.
///
/// Returning an error aborts the dispatch pass that called it.
pub trait MessageListener: Send + Sync {
    fn on_message(&self, message: &Arc<Message>) -> Result<(), ListenerError>;
}

/// Listener backed by a closure. Built with [`listener_fn`].
pub struct FnListener<F>(F);

/// Wrap a closure as a `MessageListener`.
pub fn listener_fn<F>(f: F) -> FnListener<F>
where
    F: Fn(&Arc<Message>) -> Result<(), ListenerError> + Send + Sync,
{
    FnListener(f)
}

impl<F> MessageListener for FnListener<F>
where
    F: Fn(&Arc<Message>) -> Result<(), ListenerError> + Send + Sync,
{
    fn on_message(&self, message: &Arc<Message>) -> Result<(), ListenerError> {
        (self.0)(message)
    }
}

#[derive(Clone)]
pub enum ConsumerMode {
    Push { listener: Arc<dyn MessageListener> },
    Pull,
}

impl fmt::Debug for ConsumerMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsumerMode::Push { .. } => f.write_str("Push"),
            ConsumerMode::Pull => f.write_str("Pull"),
        }
    }
}

#[derive(Debug)]
pub struct Consumer {
    id: ConsumerId,
    mode: RwLock<ConsumerMode>,
}

impl Consumer {
    /// A consumer that receives messages through `listener`.
    pub fn push(listener: impl MessageListener + 'static) -> Arc<Self> {
        Arc::new(Self {
            id: ConsumerId::new(),
            mode: RwLock::new(ConsumerMode::Push {
                listener: Arc::new(listener),
            }),
        })
    }

    /// A consumer without a listener. Dispatch skips it.
    pub fn pull() -> Arc<Self> {
        Arc::new(Self {
            id: ConsumerId::new(),
            mode: RwLock::new(ConsumerMode::Pull),
        })
    }

    pub fn id(&self) -> ConsumerId {
        self.id
    }

    pub fn mode(&self) -> ConsumerMode {
        self.mode
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The listener currently attached, if any.
    pub fn listener(&self) -> Option<Arc<dyn MessageListener>> {
        match &*self.mode.read().unwrap_or_else(PoisonError::into_inner) {
            ConsumerMode::Push { listener } => Some(Arc::clone(listener)),
            ConsumerMode::Pull => None,
        }
    }

    pub fn set_listener(&self, listener: impl MessageListener + 'static) {
        *self.mode.write().unwrap_or_else(PoisonError::into_inner) = ConsumerMode::Push {
            listener: Arc::new(listener),
        };
    }

    pub fn clear_listener(&self) {
        *self.mode.write().unwrap_or_else(PoisonError::into_inner) = ConsumerMode::Pull;
    }
}
