use std::fmt;

use crate::broker::BrokerId;

/// Handle of an open connection to a named broker.
///
/// The id pins the handle to one broker instance; once that broker is removed
/// the handle is stale and every directory call with it fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionContext {
    pub broker_name: String,
    pub broker_id: BrokerId,
}

impl fmt::Display for ConnectionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vm://{} ({})", self.broker_name, self.broker_id)
    }
}

/// Credentials presented on connect.
///
/// The in-process transport has no authentication; they are accepted as is.
#[derive(Clone, Default)]
pub struct Credentials {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
        }
    }

    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
