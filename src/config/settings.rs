use serde::Deserialize;

use crate::broker::DeliveryRetention;

/// Top-level configuration settings for the vm provider.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Settings {
    pub provider: ProviderSettings,
    pub delivery: DeliverySettings,
    pub logging: LoggingSettings,
}

/// How connection input is turned into a broker name.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct ProviderSettings {
    /// URI scheme accepted by `connect`, e.g. `vm` for `vm://localhost`.
    pub scheme: String,
}

/// Delivery log policy applied by every broker of a directory.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct DeliverySettings {
    pub retention: DeliveryRetention,
    /// Upper bound on records kept per consumer; oldest are evicted first.
    pub max_log_len: Option<usize>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct LoggingSettings {
    pub level: String,
}

/// Partial configuration settings loaded from files or environment.
///
/// Missing values are filled in from `Settings::default()`.
#[derive(Debug, Deserialize)]
pub struct PartialSettings {
    pub provider: Option<PartialProviderSettings>,
    pub delivery: Option<PartialDeliverySettings>,
    pub logging: Option<PartialLoggingSettings>,
}

#[derive(Debug, Deserialize)]
pub struct PartialProviderSettings {
    pub scheme: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PartialDeliverySettings {
    pub retention: Option<DeliveryRetention>,
    pub max_log_len: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PartialLoggingSettings {
    pub level: Option<String>,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            scheme: "vm".to_string(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}
