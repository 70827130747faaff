//! Broker directory
//!
//! Maps broker names to live `Broker` instances and owns the connect/close
//! lifecycle. A broker is created on the first connect to its name and lives
//! until `remove` is called; every connection to the same name in between
//! shares the one instance and observes the same `BrokerId`.
//!
//! The directory is an ordinary value. Construct one per composition root (or
//! per test) instead of reaching for a process-wide singleton.
//!
//! Concurrency note: the name → broker map sits behind a single mutex, held
//! only for the create-or-read step. Concurrent connects to a new name
//! therefore create exactly one broker.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info, warn};

use crate::broker::{Broker, BrokerId};
use crate::config::{Settings, load_config};
use crate::connection::{ConnectionContext, Credentials, broker_name_from_uri};
use crate::utils::error::{Error, Result};
use crate::utils::logging;

#[derive(Debug, Default)]
pub struct BrokerDirectory {
    settings: Settings,
    brokers: Mutex<HashMap<String, Arc<Broker>>>,
}

impl BrokerDirectory {
    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            brokers: Mutex::new(HashMap::new()),
        }
    }

    /// Build a directory from `load_config()` and install tracing at the
    /// configured `logging.level`.
    pub fn from_config() -> Result<Self> {
        let settings = load_config()?;
        logging::init(&settings.logging.level);
        Ok(Self::with_settings(settings))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Return the broker named `broker_name`, creating it if absent.
    ///
    /// With `expected_id` set, an existing broker under the name must carry
    /// exactly that id. A missing broker is created whatever `expected_id` is.
    pub fn resolve(&self, broker_name: &str, expected_id: Option<&BrokerId>) -> Result<Arc<Broker>> {
        let mut brokers = self.brokers.lock().unwrap_or_else(PoisonError::into_inner);

        match (brokers.get(broker_name), expected_id) {
            (Some(broker), Some(expected)) if broker.id() != *expected => {
                warn!(broker = %broker_name, expected = %expected, actual = %broker.id(), "broker id mismatch");
                Err(Error::IdentityMismatch {
                    broker_name: broker_name.to_string(),
                    expected: *expected,
                    actual: broker.id(),
                })
            }
            (Some(broker), _) => Ok(Arc::clone(broker)),
            (None, _) => {
                let broker = Arc::new(Broker::with_settings(
                    broker_name,
                    self.settings.delivery.clone(),
                ));
                info!(broker = %broker_name, id = %broker.id(), "created broker");
                brokers.insert(broker_name.to_string(), Arc::clone(&broker));
                Ok(broker)
            }
        }
    }

    /// Remove the named broker from memory, dropping all of its state.
    ///
    /// Removing an unknown name is a no-op. Threads still holding the
    /// `Arc<Broker>` finish their current calls against the removed instance.
    pub fn remove(&self, broker_name: &str) {
        let removed = self
            .brokers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(broker_name);
        if let Some(broker) = removed {
            info!(broker = %broker_name, id = %broker.id(), "removed broker");
        }
    }

    /// Open a connection to the broker named by `uri`.
    pub fn connect(&self, uri: &str, credentials: &Credentials) -> Result<ConnectionContext> {
        let broker_name = broker_name_from_uri(uri, &self.settings.provider.scheme)?;
        let broker = self.resolve(&broker_name, None)?;
        debug!(broker = %broker_name, id = %broker.id(), user = ?credentials.username, "connected");
        Ok(ConnectionContext {
            broker_name,
            broker_id: broker.id(),
        })
    }

    /// Close a connection. Only validates the handle against the directory.
    pub fn close(&self, context: &ConnectionContext) -> Result<()> {
        debug!(connection = %context, "closing connection");
        self.resolve(&context.broker_name, Some(&context.broker_id))?;
        debug!(connection = %context, "connection closed");
        Ok(())
    }

    /// The broker behind `context`, validated against the directory.
    pub fn broker(&self, context: &ConnectionContext) -> Result<Arc<Broker>> {
        self.resolve(&context.broker_name, Some(&context.broker_id))
    }

    pub fn contains(&self, broker_name: &str) -> bool {
        self.brokers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(broker_name)
    }

    /// Names of all live brokers, sorted.
    pub fn broker_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .brokers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}
