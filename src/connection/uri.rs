use url::Url;

use crate::utils::error::{Error, Result};

/// Derive the broker name from connection input.
///
/// `scheme://name[...]` yields the host part, provided the scheme matches.
/// Input without `://` is taken as the broker name itself. Names are kept
/// case-sensitive.
pub fn broker_name_from_uri(input: &str, scheme: &str) -> Result<String> {
    let input = input.trim();

    if !input.contains("://") {
        if input.is_empty() {
            return Err(Error::InvalidConfiguration(
                "broker must be specified".to_string(),
            ));
        }
        return Ok(input.to_string());
    }

    let url = Url::parse(input)
        .map_err(|e| Error::InvalidConfiguration(format!("invalid broker uri '{input}': {e}")))?;

    if !url.scheme().eq_ignore_ascii_case(scheme) {
        return Err(Error::InvalidConfiguration(format!(
            "unsupported scheme '{}', expected '{scheme}'",
            url.scheme()
        )));
    }

    match url.host_str().map(str::trim) {
        Some(host) if !host.is_empty() => Ok(host.to_string()),
        _ => Err(Error::InvalidConfiguration(
            "broker must be specified".to_string(),
        )),
    }
}
