//! The `error` module defines the error taxonomy of the `vmbroker` crate.
//!
//! Every failure is synchronous and returned to the caller of the operation
//! that caused it. Nothing here is retried internally.

use thiserror::Error;

use crate::broker::{BrokerId, ConsumerId};

/// Boxed error type returned by message listeners.
pub type ListenerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised by the broker directory, the registries and the dispatcher.
#[derive(Error, Debug)]
pub enum Error {
    /// No broker name could be derived from the connection input.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The connection handle refers to a broker instance that no longer
    /// exists under that name.
    #[error("broker id mismatch for '{broker_name}': expected {expected}, found {actual}")]
    IdentityMismatch {
        broker_name: String,
        expected: BrokerId,
        actual: BrokerId,
    },

    /// The destination was not created through this broker's registry.
    #[error("destination {0} is not registered for this broker")]
    UnknownDestination(String),

    /// The consumer is already registered for the topic.
    #[error("consumer {consumer} is already registered for topic {topic}")]
    DuplicateRegistration { consumer: ConsumerId, topic: String },

    /// No delivery with that id is held in the consumer's log.
    #[error("consumer {consumer} has no delivery {delivery}")]
    UnknownDelivery { consumer: ConsumerId, delivery: u64 },

    /// A listener failed; the dispatch pass was aborted.
    #[error("listener of consumer {consumer} failed: {source}")]
    Listener {
        consumer: ConsumerId,
        #[source]
        source: ListenerError,
    },

    /// Loading settings failed.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Result type alias for broker operations.
pub type Result<T> = std::result::Result<T, Error>;
