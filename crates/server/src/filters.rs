//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the host of a URL, for labeling external links.
///
/// Falls back to the raw value when it does not parse as a URL.
///
/// Usage in templates: `{{ link.href|host }}`
#[askama::filter_fn]
pub fn host(value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(host_of(&value.to_string()))
}

fn host_of(raw: &str) -> String {
    url::Url::parse(raw)
        .ok()
        .and_then(|u| u.host_str().map(ToString::to_string))
        .unwrap_or_else(|| raw.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_extracts_domain() {
        assert_eq!(host_of("https://x.com/honyasan/status/1"), "x.com");
        assert_eq!(
            host_of("https://www.instagram.com/honyasan/"),
            "www.instagram.com"
        );
    }

    #[test]
    fn test_host_falls_back_to_raw_value() {
        assert_eq!(host_of("not a url"), "not a url");
    }
}
