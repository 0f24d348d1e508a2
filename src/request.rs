use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::form_urlencoded;

use crate::ValidationError;
use crate::body::RequestBody;
use crate::operation::{BodyKind, OperationDescriptor, QueryEncoding};

/// Characters left unescaped in a path segment (RFC 3986 unreserved).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A query argument as supplied by the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryValue {
    Single(String),
    List(Vec<String>),
}

/// Concrete arguments for one invocation.
///
/// Built by the options value of a typed operation, or directly for untyped
/// calls. Only set values are recorded; an optional parameter that was never
/// set leaves no trace in the request.
#[derive(Debug, Default)]
pub struct OperationArgs {
    path: Vec<(String, String)>,
    query: Vec<(String, QueryValue)>,
    headers: Vec<(String, String)>,
    body: RequestBody,
    timeout: Option<Duration>,
}

impl OperationArgs {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn path_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.query
            .push((name.into(), QueryValue::Single(value.to_string())));
        self
    }

    #[must_use]
    pub fn optional_query(self, name: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.query(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn query_list<S: Into<String>>(
        mut self,
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        let values = values.into_iter().map(Into::into).collect();
        self.query.push((name.into(), QueryValue::List(values)));
        self
    }

    #[must_use]
    pub fn optional_query_list<S: Into<String>>(
        self,
        name: impl Into<String>,
        values: Option<impl IntoIterator<Item = S>>,
    ) -> Self {
        match values {
            Some(values) => self.query_list(name, values),
            None => self,
        }
    }

    /// Adds a header override, replacing any transport default of the same name.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn optional_header(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.header(name, value),
            None => self,
        }
    }

    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Deadline forwarded to the transport for this call only.
    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// A transport-ready request with a rendered relative path.
#[derive(Clone, Debug)]
pub struct WireRequest {
    pub operation_id: &'static str,
    pub method: Method,
    /// Rendered path, for example `/v1/environments/env-1`.
    pub path: String,
    pub query: Vec<(String, String)>,
    pub headers: HeaderMap,
    pub body: RequestBody,
    pub timeout: Option<Duration>,
}

impl WireRequest {
    /// Path plus encoded query string, for example `/x/42/y?name=foo`.
    pub fn target(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(&self.query)
            .finish();
        format!("{}?{query}", self.path)
    }

    pub fn query_value(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// Validates `args` against `descriptor` and produces a wire request.
///
/// All checks run before anything is sent: empty path parameters count as
/// missing, list-valued query parameters are joined into one `a,b,c` value,
/// and body alternatives declared by the descriptor are enforced.
pub fn build_request(
    descriptor: &OperationDescriptor,
    args: OperationArgs,
) -> Result<WireRequest, ValidationError> {
    let OperationArgs {
        path,
        query,
        headers,
        body,
        timeout,
    } = args;

    let rendered = render_path(descriptor, &path)?;
    let query = encode_query(descriptor, query)?;
    let headers = header_map(headers)?;
    check_body(descriptor, &body)?;

    Ok(WireRequest {
        operation_id: descriptor.operation_id,
        method: descriptor.method.into(),
        path: rendered,
        query,
        headers,
        body,
        timeout,
    })
}

pub(crate) fn render_path(
    descriptor: &OperationDescriptor,
    path_params: &[(String, String)],
) -> Result<String, ValidationError> {
    let mut rendered = descriptor.path_template.to_owned();

    for required_param in descriptor.path_params {
        let value = path_params
            .iter()
            .find(|(name, _)| name == required_param)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.is_empty())
            .ok_or_else(|| ValidationError::MissingPathParameter {
                operation_id: descriptor.operation_id.to_owned(),
                parameter: (*required_param).to_owned(),
            })?;

        if matches!(value, "." | "..") {
            return Err(ValidationError::InvalidPathParameter {
                operation_id: descriptor.operation_id.to_owned(),
                parameter: (*required_param).to_owned(),
                value: value.to_owned(),
            });
        }

        let placeholder = format!("{{{required_param}}}");
        rendered = rendered.replace(&placeholder, &encode_path_segment(value));
    }

    Ok(rendered)
}

fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

fn encode_query(
    descriptor: &OperationDescriptor,
    query: Vec<(String, QueryValue)>,
) -> Result<Vec<(String, String)>, ValidationError> {
    let operation_id = || descriptor.operation_id.to_owned();

    if let Some((unknown, _)) = query
        .iter()
        .find(|(name, _)| descriptor.query_param(name).is_none())
    {
        return Err(ValidationError::UnknownQueryParameter {
            operation_id: operation_id(),
            parameter: unknown.clone(),
        });
    }

    if let Some((_, (duplicate, _))) = query
        .iter()
        .enumerate()
        .find(|(index, (name, _))| query[..*index].iter().any(|(seen, _)| seen == name))
    {
        return Err(ValidationError::DuplicateQueryParameter {
            operation_id: operation_id(),
            parameter: duplicate.clone(),
        });
    }

    let mut encoded = Vec::with_capacity(query.len());
    for param in descriptor.query_params {
        let Some((_, value)) = query.iter().find(|(name, _)| name == param.name) else {
            if param.required {
                return Err(ValidationError::MissingQueryParameter {
                    operation_id: operation_id(),
                    parameter: param.name.to_owned(),
                });
            }
            continue;
        };

        let value = match (param.encoding, value) {
            (_, QueryValue::Single(single)) => single.clone(),
            (QueryEncoding::CommaSeparated, QueryValue::List(values)) => values.join(","),
            (QueryEncoding::Scalar, QueryValue::List(_)) => {
                return Err(ValidationError::QueryNotAList {
                    operation_id: operation_id(),
                    parameter: param.name.to_owned(),
                });
            }
        };
        encoded.push((param.name.to_owned(), value));
    }

    Ok(encoded)
}

fn header_map(headers: Vec<(String, String)>) -> Result<HeaderMap, ValidationError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let invalid = || ValidationError::InvalidHeader { name: name.clone() };
        let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| invalid())?;
        let header_value = HeaderValue::from_str(&value).map_err(|_| invalid())?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

fn check_body(descriptor: &OperationDescriptor, body: &RequestBody) -> Result<(), ValidationError> {
    let operation_id = || descriptor.operation_id.to_owned();

    match (descriptor.body, body) {
        (BodyKind::None, RequestBody::None)
        | (BodyKind::Json { required: false }, RequestBody::None)
        | (BodyKind::Json { .. }, RequestBody::Json(_)) => Ok(()),
        (BodyKind::Json { required: true }, RequestBody::None) => {
            Err(ValidationError::MissingBody {
                operation_id: operation_id(),
            })
        }
        (BodyKind::Multipart { one_of }, RequestBody::None) => {
            if one_of.is_empty() {
                Ok(())
            } else {
                Err(missing_alternative(descriptor, one_of))
            }
        }
        (BodyKind::Multipart { one_of }, RequestBody::Multipart(form)) => {
            if one_of.is_empty() || one_of.iter().any(|name| form.has_part(name)) {
                Ok(())
            } else {
                Err(missing_alternative(descriptor, one_of))
            }
        }
        (BodyKind::None, _) => Err(ValidationError::UnexpectedBody {
            operation_id: operation_id(),
            expected: "no",
        }),
        (BodyKind::Json { .. }, _) => Err(ValidationError::UnexpectedBody {
            operation_id: operation_id(),
            expected: "a JSON",
        }),
        (BodyKind::Multipart { .. }, _) => Err(ValidationError::UnexpectedBody {
            operation_id: operation_id(),
            expected: "a multipart",
        }),
    }
}

fn missing_alternative(descriptor: &OperationDescriptor, one_of: &[&str]) -> ValidationError {
    ValidationError::MissingBodyAlternative {
        operation_id: descriptor.operation_id.to_owned(),
        alternatives: one_of.iter().map(|name| (*name).to_owned()).collect(),
    }
}
