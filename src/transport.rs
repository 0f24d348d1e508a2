//! The boundary between the engine and the network.
//!
//! A transport receives a fully validated [`WireRequest`] and returns the raw
//! status, headers and body. TLS, authentication headers, default query pairs
//! and timeouts are the transport's business; the engine never retries.

use std::future::Future;

use reqwest::StatusCode;
use reqwest::header::HeaderMap;

use crate::TransportError;
use crate::config::ClientConfig;
use crate::request::WireRequest;

/// A completed HTTP round trip, body not yet decoded.
#[derive(Clone, Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Async transport used by [`crate::DiscoveryClient`].
///
/// Dropping the returned future must abandon the in-flight call.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        request: WireRequest,
    ) -> impl Future<Output = Result<RawResponse, TransportError>> + Send;
}

/// Blocking transport used by [`crate::BlockingDiscoveryClient`].
pub trait BlockingTransport {
    fn send(&self, request: WireRequest) -> Result<RawResponse, TransportError>;
}

/// Configured default headers with the request's own headers laid over them.
pub(crate) fn merged_headers(config: &ClientConfig, overrides: HeaderMap) -> HeaderMap {
    let mut headers = config.default_headers().clone();
    let mut last_name = None;
    for (name, value) in overrides {
        // `HeaderMap` iteration yields the name only for the first value.
        if let Some(name) = name {
            headers.remove(&name);
            last_name = Some(name);
        }
        if let Some(name) = &last_name {
            headers.append(name.clone(), value);
        }
    }
    headers
}

/// Configured default query pairs followed by the request's own query.
pub(crate) fn merged_query(
    config: &ClientConfig,
    query: Vec<(String, String)>,
) -> Vec<(String, String)> {
    let mut merged: Vec<_> = config.query_defaults_for(&query).cloned().collect();
    merged.extend(query);
    merged
}

#[cfg(test)]
mod tests {
    use reqwest::header::{HeaderMap, HeaderValue};

    use super::{merged_headers, merged_query};
    use crate::config::ClientConfig;

    fn config() -> ClientConfig {
        ClientConfig::new("https://example.com")
            .expect("valid url")
            .with_default_header("X-Watson-Learning-Opt-Out", "false")
            .expect("valid header")
            .with_default_header("X-Team", "search")
            .expect("valid header")
            .with_default_query("version", "2019-04-30")
    }

    #[test]
    fn request_headers_replace_defaults() {
        let mut overrides = HeaderMap::new();
        overrides.insert("x-watson-learning-opt-out", HeaderValue::from_static("true"));

        let headers = merged_headers(&config(), overrides);
        assert_eq!(headers["x-watson-learning-opt-out"], "true");
        assert_eq!(headers.get_all("x-watson-learning-opt-out").iter().count(), 1);
        assert_eq!(headers["x-team"], "search");
    }

    #[test]
    fn default_query_comes_first_unless_overridden() {
        let query = merged_query(&config(), vec![("count".to_owned(), "5".to_owned())]);
        assert_eq!(
            query,
            [
                ("version".to_owned(), "2019-04-30".to_owned()),
                ("count".to_owned(), "5".to_owned()),
            ]
        );

        let query = merged_query(&config(), vec![("version".to_owned(), "2020".to_owned())]);
        assert_eq!(query, [("version".to_owned(), "2020".to_owned())]);
    }
}
