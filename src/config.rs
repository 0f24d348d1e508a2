use std::time::Duration;

use reqwest::Url;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{ClientError, TransportError, ValidationError};

/// Default `User-Agent` sent by the HTTP transports.
pub const DEFAULT_USER_AGENT: &str = concat!("discovery-client/", env!("CARGO_PKG_VERSION"));

/// Immutable client configuration shared by every call.
///
/// The base URL is normalized to include a trailing slash, so relative
/// endpoint paths join correctly.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: Url,
    authorization_token: Option<String>,
    default_headers: HeaderMap,
    default_query: Vec<(String, String)>,
    timeout: Option<Duration>,
    user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: impl AsRef<str>) -> Result<Self, ClientError> {
        let parsed = Url::parse(base_url.as_ref())
            .map_err(|_| ClientError::InvalidBaseUrl(base_url.as_ref().to_owned()))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.as_ref().to_owned()));
        }

        Ok(Self {
            base_url: ensure_trailing_slash(parsed),
            authorization_token: None,
            default_headers: HeaderMap::new(),
            default_query: Vec::new(),
            timeout: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        })
    }

    /// Attaches `Authorization: Bearer <token>` to every request.
    #[must_use]
    pub fn with_authorization_token(mut self, token: impl Into<String>) -> Self {
        self.authorization_token = Some(token.into());
        self
    }

    /// Adds a header sent with every request. Per-call headers with the same
    /// name replace it.
    pub fn with_default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ClientError> {
        let invalid = || ValidationError::InvalidHeader {
            name: name.as_ref().to_owned(),
        };
        let header_name = HeaderName::from_bytes(name.as_ref().as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(value.as_ref()).map_err(|_| invalid())?;
        self.default_headers.insert(header_name, header_value);
        Ok(self)
    }

    /// Adds a query parameter sent with every request, typically the API
    /// `version` date.
    #[must_use]
    pub fn with_default_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.default_query.retain(|(existing, _)| *existing != name);
        self.default_query.push((name, value.into()));
        self
    }

    /// Timeout applied to calls that do not carry their own.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn authorization_token(&self) -> Option<&str> {
        self.authorization_token.as_deref()
    }

    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    pub fn default_query(&self) -> &[(String, String)] {
        &self.default_query
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Joins a rendered endpoint path onto the base URL.
    pub fn resolve(&self, path: &str) -> Result<Url, TransportError> {
        let relative = path.trim_start_matches('/');
        self.base_url
            .join(relative)
            .map_err(|_| TransportError::InvalidPath(path.to_owned()))
    }

    /// Default query pairs not overridden by the request's own query.
    pub(crate) fn query_defaults_for<'a>(
        &'a self,
        query: &'a [(String, String)],
    ) -> impl Iterator<Item = &'a (String, String)> {
        self.default_query
            .iter()
            .filter(move |(name, _)| !query.iter().any(|(other, _)| other == name))
    }
}

fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let mut path = url.path().to_owned();
        path.push('/');
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::ClientConfig;
    use crate::{ClientError, ValidationError};

    #[test]
    fn joins_paths_from_base_with_nested_prefix() {
        let config = ClientConfig::new("https://example.com/discovery/api").expect("valid url");
        let resolved = config.resolve("/v1/environments").expect("valid path");
        assert_eq!(
            resolved.as_str(),
            "https://example.com/discovery/api/v1/environments"
        );
    }

    #[test]
    fn rejects_relative_base_url() {
        let error = ClientConfig::new("not a url").expect_err("invalid");
        assert!(matches!(error, ClientError::InvalidBaseUrl(url) if url == "not a url"));
    }

    #[test]
    fn rejects_invalid_default_header() {
        let error = ClientConfig::new("https://example.com")
            .expect("valid url")
            .with_default_header("bad header", "x")
            .expect_err("space in name");
        assert!(matches!(
            error,
            ClientError::Validation(ValidationError::InvalidHeader { name }) if name == "bad header"
        ));
    }

    #[test]
    fn default_query_is_replaced_and_overridable() {
        let config = ClientConfig::new("https://example.com")
            .expect("valid url")
            .with_default_query("version", "2017-01-01")
            .with_default_query("version", "2019-04-30")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(
            config.default_query(),
            [("version".to_owned(), "2019-04-30".to_owned())]
        );
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));

        let overridden = [("version".to_owned(), "2020-01-01".to_owned())];
        assert_eq!(config.query_defaults_for(&overridden).count(), 0);
        assert_eq!(config.query_defaults_for(&[]).count(), 1);
    }
}
