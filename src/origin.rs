use crate::auth::{generate_auth_headers, HmacError};
use crate::config::Config;
use crate::endpoints::get_cll_avail_origins_header;

use reqwest::Client as HttpClient;
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;

/// Errors produced while discovering the set of WebSocket origins behind a
/// seed URL.
#[derive(Debug, Error)]
pub enum OriginDiscoveryError {
    #[error("discovery request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("HMAC generation failed: {0}")]
    HmacError(#[from] HmacError),

    #[error("no WebSocket origin configured")]
    NoSeedOrigin,
}

/// Expands a single seed `wsEndpoint` into the set of origins behind it by
/// sending an authenticated `HEAD` probe and reading the
/// `X-Cll-Available-Origins` response header.
///
/// If the caller already supplied more than one comma-separated static URL,
/// discovery is skipped entirely and that list is returned verbatim — this
/// mirrors the REST client's auth header generation so probes are
/// authenticated the same way as any other request.
///
/// # Errors
///
/// Returns `OriginDiscoveryError` if the seed list is empty or the probe
/// request fails. A missing `X-Cll-Available-Origins` header is not an
/// error: the seed URL alone is returned as the sole origin.
pub async fn discover_origins(
    http: &HttpClient,
    config: &Config,
) -> Result<Vec<String>, OriginDiscoveryError> {
    let seeds: Vec<&str> = config.ws_url.split(',').map(str::trim).collect();

    if seeds.len() > 1 {
        return Ok(seeds.into_iter().map(str::to_string).collect());
    }

    let seed = seeds
        .into_iter()
        .next()
        .filter(|s| !s.is_empty())
        .ok_or(OriginDiscoveryError::NoSeedOrigin)?;

    let probe_url = to_http_scheme(seed);

    let timestamp: i64 = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before the Unix epoch")
        .as_millis()
        .try_into()
        .expect("timestamp overflows i64");

    let headers = generate_auth_headers(
        "HEAD",
        "/",
        b"",
        &config.api_key,
        &config.api_secret,
        timestamp,
    )?;

    let response = http.head(&probe_url).headers(headers).send().await?;

    let tags = response
        .headers()
        .get(get_cll_avail_origins_header())
        .and_then(|v| v.to_str().ok())
        .map(parse_available_origins_header);

    match tags {
        Some(tags) if !tags.is_empty() => {
            Ok(tags.into_iter().map(|tag| format!("{seed}#{tag}")).collect())
        }
        _ => Ok(vec![seed.to_string()]),
    }
}

/// Parses the `X-Cll-Available-Origins` header value, which is a
/// comma-separated list of origin tags, optionally wrapped in `{...}`.
fn parse_available_origins_header(value: &str) -> Vec<String> {
    let trimmed = value.trim();
    let inner = trimmed
        .strip_prefix('{')
        .and_then(|s| s.strip_suffix('}'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Converts a `ws://`/`wss://` seed URL into its `http://`/`https://`
/// equivalent for the discovery probe.
fn to_http_scheme(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("wss://") {
        format!("https://{rest}")
    } else if let Some(rest) = url.strip_prefix("ws://") {
        format!("http://{rest}")
    } else {
        url.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_brace_wrapped_origins() {
        let tags = parse_available_origins_header("{tag-a,tag-b,tag-c}");
        assert_eq!(tags, vec!["tag-a", "tag-b", "tag-c"]);
    }

    #[test]
    fn parses_bare_origins() {
        let tags = parse_available_origins_header("tag-a, tag-b");
        assert_eq!(tags, vec!["tag-a", "tag-b"]);
    }

    #[test]
    fn empty_header_yields_no_tags() {
        let tags = parse_available_origins_header("");
        assert!(tags.is_empty());
    }

    #[test]
    fn converts_ws_scheme_to_http() {
        assert_eq!(to_http_scheme("ws://example.com"), "http://example.com");
        assert_eq!(to_http_scheme("wss://example.com"), "https://example.com");
        assert_eq!(to_http_scheme("https://example.com"), "https://example.com");
    }
}
