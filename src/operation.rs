use reqwest::Method;
use serde::Serialize;

use crate::request::OperationArgs;
use crate::response::ResponsePayload;
use crate::{ClientError, DecodeError, DescriptorError};

/// HTTP methods used by the catalog.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
        }
    }
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
        }
    }
}

/// How a query parameter's value is put on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryEncoding {
    /// A single value.
    Scalar,
    /// A list joined with `,` into one parameter occurrence.
    CommaSeparated,
}

/// One declared query parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct QueryParam {
    pub name: &'static str,
    pub encoding: QueryEncoding,
    pub required: bool,
}

impl QueryParam {
    pub const fn scalar(name: &'static str) -> Self {
        Self {
            name,
            encoding: QueryEncoding::Scalar,
            required: false,
        }
    }

    pub const fn list(name: &'static str) -> Self {
        Self {
            name,
            encoding: QueryEncoding::CommaSeparated,
            required: false,
        }
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// The request body an operation accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BodyKind {
    None,
    Json {
        required: bool,
    },
    /// Multipart form; when `one_of` is non-empty at least one of those parts
    /// must be supplied.
    Multipart {
        one_of: &'static [&'static str],
    },
}

/// The shape of a successful response body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultShape {
    /// No body is decoded; only the status is returned.
    None,
    /// A single JSON object.
    Model,
    /// A JSON array of objects.
    Array,
}

/// Static metadata for one endpoint.
///
/// Descriptors are built once as constants and shared by every call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct OperationDescriptor {
    /// Stable operation identifier.
    pub operation_id: &'static str,
    pub method: HttpMethod,
    /// Path template, potentially containing `{param}` placeholders.
    pub path_template: &'static str,
    /// Required path parameter names, one per placeholder.
    pub path_params: &'static [&'static str],
    pub query_params: &'static [QueryParam],
    pub body: BodyKind,
    pub result: ResultShape,
}

impl OperationDescriptor {
    pub const fn new(
        operation_id: &'static str,
        method: HttpMethod,
        path_template: &'static str,
    ) -> Self {
        Self {
            operation_id,
            method,
            path_template,
            path_params: &[],
            query_params: &[],
            body: BodyKind::None,
            result: ResultShape::Model,
        }
    }

    #[must_use]
    pub const fn path_params(mut self, names: &'static [&'static str]) -> Self {
        self.path_params = names;
        self
    }

    #[must_use]
    pub const fn query(mut self, params: &'static [QueryParam]) -> Self {
        self.query_params = params;
        self
    }

    #[must_use]
    pub const fn body(mut self, body: BodyKind) -> Self {
        self.body = body;
        self
    }

    #[must_use]
    pub const fn returns(mut self, result: ResultShape) -> Self {
        self.result = result;
        self
    }

    pub fn query_param(&self, name: &str) -> Option<&QueryParam> {
        self.query_params.iter().find(|param| param.name == name)
    }

    /// Checks the descriptor is internally consistent.
    ///
    /// Every placeholder must be a declared path parameter and every declared
    /// path parameter must have a placeholder, so rendering a validated
    /// template never leaves a `{name}` behind.
    pub fn validate(&self) -> Result<(), DescriptorError> {
        let placeholders = template_placeholders(self.path_template).ok_or(
            DescriptorError::MalformedTemplate {
                operation_id: self.operation_id,
            },
        )?;

        if let Some(undeclared) = placeholders
            .iter()
            .find(|name| !self.path_params.contains(*name))
        {
            return Err(DescriptorError::UndeclaredPlaceholder {
                operation_id: self.operation_id,
                placeholder: (*undeclared).to_owned(),
            });
        }

        if let Some(unused) = self
            .path_params
            .iter()
            .find(|name| !placeholders.contains(*name))
        {
            return Err(DescriptorError::UnusedPathParameter {
                operation_id: self.operation_id,
                parameter: *unused,
            });
        }

        for (index, param) in self.query_params.iter().enumerate() {
            if self.query_params[..index]
                .iter()
                .any(|earlier| earlier.name == param.name)
            {
                return Err(DescriptorError::DuplicateQueryParameter {
                    operation_id: self.operation_id,
                    parameter: param.name,
                });
            }
        }

        Ok(())
    }
}

/// Extracts `{name}` placeholders, or `None` when braces are unbalanced.
fn template_placeholders(template: &str) -> Option<Vec<&str>> {
    let mut names = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find(['{', '}']) {
        if rest[open..].starts_with('}') {
            return None;
        }
        let after = &rest[open + 1..];
        let close = after.find('}')?;
        let name = &after[..close];
        if name.is_empty() || name.contains('{') {
            return None;
        }
        names.push(name);
        rest = &after[close + 1..];
    }
    Some(names)
}

/// A typed call against one catalog endpoint.
///
/// Implementors are the per-call options values: they own the arguments,
/// turn them into [`OperationArgs`] and pick the typed result out of the
/// decoded payload.
pub trait Operation {
    type Output;

    const DESCRIPTOR: &'static OperationDescriptor;

    /// Converts the options into request arguments, reading any upload
    /// streams fully.
    fn into_args(self) -> Result<OperationArgs, ClientError>;

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError>;
}

#[cfg(test)]
mod tests {
    use super::{
        BodyKind, HttpMethod, OperationDescriptor, QueryParam, ResultShape, template_placeholders,
    };
    use crate::DescriptorError;

    const GET_ITEM: OperationDescriptor =
        OperationDescriptor::new("getItem", HttpMethod::Get, "/x/{id}/y")
            .path_params(&["id"])
            .query(&[QueryParam::scalar("name")]);

    #[test]
    fn const_builder_sets_fields() {
        assert_eq!(GET_ITEM.path_params, ["id"]);
        assert_eq!(GET_ITEM.body, BodyKind::None);
        assert_eq!(GET_ITEM.result, ResultShape::Model);
        assert!(GET_ITEM.query_param("name").is_some());
        assert!(GET_ITEM.query_param("other").is_none());
        assert_eq!(GET_ITEM.validate(), Ok(()));
    }

    #[test]
    fn placeholders_are_extracted_in_order() {
        assert_eq!(
            template_placeholders("/v1/environments/{environment_id}/collections/{collection_id}"),
            Some(vec!["environment_id", "collection_id"])
        );
        assert_eq!(template_placeholders("/v1/plain"), Some(vec![]));
        assert_eq!(template_placeholders("/v1/{open"), None);
        assert_eq!(template_placeholders("/v1/close}"), None);
        assert_eq!(template_placeholders("/v1/{}"), None);
    }

    #[test]
    fn validation_catches_catalog_bugs() {
        let undeclared = OperationDescriptor::new("a", HttpMethod::Get, "/x/{id}");
        assert!(matches!(
            undeclared.validate(),
            Err(DescriptorError::UndeclaredPlaceholder { .. })
        ));

        let unused = OperationDescriptor::new("b", HttpMethod::Get, "/x").path_params(&["id"]);
        assert!(matches!(
            unused.validate(),
            Err(DescriptorError::UnusedPathParameter { parameter: "id", .. })
        ));

        let malformed = OperationDescriptor::new("c", HttpMethod::Get, "/x/{id");
        assert!(matches!(
            malformed.validate(),
            Err(DescriptorError::MalformedTemplate { operation_id: "c" })
        ));

        const DUPLICATE_QUERY: &[QueryParam] =
            &[QueryParam::scalar("q"), QueryParam::list("q")];
        let duplicate =
            OperationDescriptor::new("d", HttpMethod::Get, "/x").query(DUPLICATE_QUERY);
        assert!(matches!(
            duplicate.validate(),
            Err(DescriptorError::DuplicateQueryParameter { parameter: "q", .. })
        ));
    }
}
