//! The `utils` module holds the pieces shared by every other module of
//! `vmbroker`: the error taxonomy and tracing initialisation.

pub mod error;
pub mod logging;

#[cfg(test)]
mod tests {
    use super::error::Error;
    use super::logging;

    #[test]
    fn logging_init_accepts_levels() {
        // Should not panic
        logging::init("info");
        logging::init("debug");
        logging::init("warning");
        logging::init("bogus");
    }

    #[test]
    fn invalid_configuration_message_names_the_cause() {
        let err = Error::InvalidConfiguration("broker must be specified".into());
        assert_eq!(
            err.to_string(),
            "invalid configuration: broker must be specified"
        );
    }
}
