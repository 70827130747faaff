mod settings;

use crate::config::settings::PartialSettings;
use config::{Config, ConfigError, Environment, File};

pub use settings::{DeliverySettings, LoggingSettings, ProviderSettings, Settings};

/// Loads settings from `config/default.*` and `VMBROKER_*` environment
/// variables (a `.env` file is honoured), merged over `Settings::default()`.
///
/// Nested keys use `__`, e.g. `VMBROKER_DELIVERY__MAX_LOG_LEN=100`.
pub fn load_config() -> Result<Settings, ConfigError> {
    let _ = dotenvy::dotenv();

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix("VMBROKER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    // Merge with defaults
    let default = Settings::default();

    Ok(Settings {
        provider: ProviderSettings {
            scheme: partial
                .provider
                .as_ref()
                .and_then(|p| p.scheme.clone())
                .unwrap_or(default.provider.scheme),
        },
        delivery: DeliverySettings {
            retention: partial
                .delivery
                .as_ref()
                .and_then(|d| d.retention)
                .unwrap_or(default.delivery.retention),
            max_log_len: partial
                .delivery
                .as_ref()
                .and_then(|d| d.max_log_len)
                .or(default.delivery.max_log_len),
        },
        logging: LoggingSettings {
            level: partial
                .logging
                .as_ref()
                .and_then(|l| l.level.clone())
                .unwrap_or(default.logging.level),
        },
    })
}

#[cfg(test)]
mod tests;
