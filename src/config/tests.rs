use super::load_config;
use super::settings::Settings;
use crate::broker::DeliveryRetention;
use serial_test::serial;
use std::env;
use std::fs;
use tempfile::TempDir;

#[test]
fn test_default_settings() {
    let settings = Settings::default();
    assert_eq!(settings.provider.scheme, "vm");
    assert_eq!(settings.delivery.retention, DeliveryRetention::Retain);
    assert_eq!(settings.delivery.max_log_len, None);
    assert_eq!(settings.logging.level, "info");
}

#[test]
#[serial]
fn load_config_without_sources_yields_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    let cfg = load_config().expect("load_config failed");
    assert_eq!(cfg, Settings::default());

    env::set_current_dir(orig).expect("restore cwd");
}

#[test]
#[serial]
fn load_config_from_file_overrides_defaults() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    let toml = r#"
        [provider]
        scheme = "inproc"

        [delivery]
        retention = "drop_on_acknowledge"
        max_log_len = 25
    "#;
    fs::write("config/default.toml", toml).expect("write config file");

    let cfg = load_config().expect("load_config failed");
    assert_eq!(cfg.provider.scheme, "inproc");
    assert_eq!(cfg.delivery.retention, DeliveryRetention::DropOnAcknowledge);
    assert_eq!(cfg.delivery.max_log_len, Some(25));
    assert_eq!(cfg.logging.level, "info");

    env::set_current_dir(orig).expect("restore cwd");
}

#[test]
#[serial]
fn environment_overrides_file() {
    let tmp = TempDir::new().expect("create tempdir");
    let orig = env::current_dir().expect("current_dir");
    env::set_current_dir(tmp.path()).expect("set current dir");

    fs::create_dir_all("config").expect("create config dir");
    fs::write("config/default.toml", "[logging]\nlevel = \"warn\"\n").expect("write config file");

    temp_env::with_vars(
        [
            ("VMBROKER_LOGGING__LEVEL", Some("debug")),
            ("VMBROKER_DELIVERY__MAX_LOG_LEN", Some("10")),
        ],
        || {
            let cfg = load_config().expect("load_config failed");
            assert_eq!(cfg.logging.level, "debug");
            assert_eq!(cfg.delivery.max_log_len, Some(10));
            assert_eq!(cfg.provider.scheme, "vm");
        },
    );

    env::set_current_dir(orig).expect("restore cwd");
}
