use super::{Credentials, broker_name_from_uri};
use crate::utils::error::Error;

#[test]
fn test_host_of_vm_uri_is_broker_name() {
    assert_eq!(broker_name_from_uri("vm://localhost", "vm").unwrap(), "localhost");
    assert_eq!(
        broker_name_from_uri("vm://embedded:61616/path?x=1", "vm").unwrap(),
        "embedded"
    );
}

#[test]
fn test_broker_name_keeps_case() {
    assert_eq!(broker_name_from_uri("vm://MyBroker", "vm").unwrap(), "MyBroker");
}

#[test]
fn test_bare_name_is_accepted() {
    assert_eq!(broker_name_from_uri("  local  ", "vm").unwrap(), "local");
}

#[test]
fn test_missing_broker_name_is_invalid() {
    for input in ["", "   ", "vm://", "vm:///queue"] {
        let err = broker_name_from_uri(input, "vm").unwrap_err();
        assert!(
            matches!(err, Error::InvalidConfiguration(_)),
            "input {input:?} gave {err:?}"
        );
    }
}

#[test]
fn test_wrong_scheme_is_invalid() {
    let err = broker_name_from_uri("tcp://localhost", "vm").unwrap_err();
    assert!(matches!(err, Error::InvalidConfiguration(_)));
}

#[test]
fn test_credentials_debug_hides_password() {
    let creds = Credentials::new("admin", "secret");
    let shown = format!("{creds:?}");
    assert!(shown.contains("admin"));
    assert!(!shown.contains("secret"));
}
