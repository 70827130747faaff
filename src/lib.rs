//! # vmbroker
//!
//! `vmbroker` is the in-process ("vm") transport of a messaging client: it lets
//! producers and consumers in one process exchange messages through a shared
//! in-memory broker, without any network in between.
//!
//! ## Core Modules
//!
//! - `broker`: a named broker with its destination registry, consumer
//!   registry, synchronous dispatcher and per-consumer delivery log.
//! - `directory`: maps broker names to brokers and implements connect/close.
//! - `connection`: connection handles, credentials and broker-name parsing.
//! - `config`: layered settings (file, environment, defaults).
//! - `utils`: error taxonomy and tracing initialisation.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use vmbroker::broker::{Consumer, Message, listener_fn};
//! use vmbroker::connection::Credentials;
//! use vmbroker::directory::BrokerDirectory;
//!
//! let directory = BrokerDirectory::new();
//! let conn = directory.connect("vm://localhost", &Credentials::anonymous()).unwrap();
//! let broker = directory.broker(&conn).unwrap();
//!
//! let topic = broker.create_topic("news");
//! let consumer = Consumer::push(listener_fn(|msg| {
//!     println!("got {:?}", msg.body::<&str>());
//!     Ok(())
//! }));
//! broker.register_consumer(&topic, Arc::clone(&consumer)).unwrap();
//!
//! assert_eq!(broker.send(&(&topic).into(), Message::new("hello")).unwrap(), 1);
//! assert_eq!(broker.deliveries(consumer.id()).len(), 1);
//! directory.close(&conn).unwrap();
//! ```

pub mod broker;
pub mod config;
pub mod connection;
pub mod directory;
pub mod utils;

pub use directory::BrokerDirectory;
pub use utils::error::{Error, Result};

#[cfg(test)]
mod tests;
