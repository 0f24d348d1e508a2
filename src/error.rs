use thiserror::Error;

/// Errors returned by client operations.
///
/// Validation, transport and decode failures stay distinct so callers can tell
/// bad input from a network problem from a response that drifted away from the
/// expected schema.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL is not a valid absolute URL.
    #[error("invalid base URL '{0}'")]
    InvalidBaseUrl(String),

    /// The requested operation id is not present in the catalog.
    #[error("unknown operation '{0}'")]
    UnknownOperation(String),

    /// Caller input was rejected before any request was sent.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The transport failed to complete the round trip.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response body did not match the expected schema.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// Non-success HTTP status with response payload.
    #[error("server returned status {status}: {body}")]
    HttpStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    /// An upload stream could not be read into a multipart part.
    #[error("failed to read upload for part '{part}'")]
    Upload {
        part: String,
        #[source]
        source: std::io::Error,
    },
}

impl ClientError {
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }

    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode(_))
    }

    /// Returns the HTTP status when the service answered with a non-success code.
    pub fn status_code(&self) -> Option<reqwest::StatusCode> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Input problems detected while building a request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required path parameter was not provided, or was empty.
    #[error("missing required path parameter '{parameter}' for operation '{operation_id}'")]
    MissingPathParameter {
        operation_id: String,
        parameter: String,
    },

    /// A path parameter value would be normalized away as a dot segment.
    #[error("path parameter '{parameter}' of operation '{operation_id}' cannot be '{value}'")]
    InvalidPathParameter {
        operation_id: String,
        parameter: String,
        value: String,
    },

    /// A required query parameter was not provided.
    #[error("missing required query parameter '{parameter}' for operation '{operation_id}'")]
    MissingQueryParameter {
        operation_id: String,
        parameter: String,
    },

    /// A query parameter is not declared by the operation.
    #[error("operation '{operation_id}' does not accept query parameter '{parameter}'")]
    UnknownQueryParameter {
        operation_id: String,
        parameter: String,
    },

    /// The same query parameter was supplied more than once.
    #[error("query parameter '{parameter}' of operation '{operation_id}' was supplied twice")]
    DuplicateQueryParameter {
        operation_id: String,
        parameter: String,
    },

    /// A list was supplied for a query parameter declared as a single value.
    #[error("query parameter '{parameter}' of operation '{operation_id}' takes a single value")]
    QueryNotAList {
        operation_id: String,
        parameter: String,
    },

    /// A header override has an invalid name or value.
    #[error("invalid header '{name}'")]
    InvalidHeader { name: String },

    /// The operation requires a body and none was supplied.
    #[error("operation '{operation_id}' requires a request body")]
    MissingBody { operation_id: String },

    /// A body of the wrong kind, or a body for an operation that takes none.
    #[error("operation '{operation_id}' expects {expected} body")]
    UnexpectedBody {
        operation_id: String,
        expected: &'static str,
    },

    /// None of the alternative multipart parts was supplied.
    #[error("operation '{operation_id}' requires at least one of: {}", alternatives.join(", "))]
    MissingBodyAlternative {
        operation_id: String,
        alternatives: Vec<String>,
    },

    /// A required JSON body field was not set.
    #[error("operation '{operation_id}' requires body field '{field}'")]
    MissingBodyField {
        operation_id: String,
        field: String,
    },
}

/// Failures reported by a [`crate::Transport`] implementation.
///
/// These are surfaced to the caller unmodified; the engine never retries.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP transport-layer request failure.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Endpoint path could not be joined to the base URL.
    #[error("invalid endpoint path '{0}'")]
    InvalidPath(String),

    /// Any other failure raised by a custom transport.
    #[error("transport failure: {0}")]
    Other(String),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

/// Response decoding failures.
///
/// The `field` of each variant is a path relative to the decoded document,
/// for example `aggregations[0].results[2].key`. `$` names the document root.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The body is not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Malformed(#[from] serde_json::Error),

    /// A required field was absent or null.
    #[error("missing required field '{field}'")]
    MissingRequiredField { field: String },

    /// A field was present with a value of the wrong JSON type.
    #[error("field '{field}' expected {expected}, found {raw}")]
    TypeMismatch {
        field: String,
        expected: &'static str,
        raw: String,
    },

    /// A variant family's discriminator field was absent.
    #[error("missing discriminator field '{field}'")]
    MissingDiscriminator { field: String },

    /// A discriminator value outside the family's member table.
    #[error("unrecognized value '{value}' for discriminator '{field}'")]
    UnrecognizedVariant { field: String, value: String },
}

const RAW_PREVIEW_LIMIT: usize = 64;

impl DecodeError {
    pub(crate) fn missing(field: &str) -> Self {
        Self::MissingRequiredField {
            field: field.to_owned(),
        }
    }

    pub(crate) fn mismatch(field: &str, expected: &'static str, raw: &serde_json::Value) -> Self {
        let mut preview = raw.to_string();
        if preview.len() > RAW_PREVIEW_LIMIT {
            let mut end = RAW_PREVIEW_LIMIT;
            while !preview.is_char_boundary(end) {
                end -= 1;
            }
            preview.truncate(end);
            preview.push('…');
        }
        Self::TypeMismatch {
            field: field.to_owned(),
            expected,
            raw: preview,
        }
    }

    /// Returns the field path this error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Malformed(_) => None,
            Self::MissingRequiredField { field }
            | Self::TypeMismatch { field, .. }
            | Self::MissingDiscriminator { field }
            | Self::UnrecognizedVariant { field, .. } => Some(field),
        }
    }

    /// Prefixes the field path with the name of the enclosing field.
    #[must_use]
    pub(crate) fn within(self, parent: &str) -> Self {
        self.map_field(|field| join_path(parent, field))
    }

    /// Prefixes the field path with an array index.
    #[must_use]
    pub(crate) fn at_index(self, index: usize) -> Self {
        self.map_field(|field| {
            if field == "$" {
                format!("[{index}]")
            } else if field.starts_with('[') {
                format!("[{index}]{field}")
            } else {
                format!("[{index}].{field}")
            }
        })
    }

    fn map_field(self, rewrite: impl FnOnce(&str) -> String) -> Self {
        match self {
            Self::Malformed(e) => Self::Malformed(e),
            Self::MissingRequiredField { field } => Self::MissingRequiredField {
                field: rewrite(&field),
            },
            Self::TypeMismatch {
                field,
                expected,
                raw,
            } => Self::TypeMismatch {
                field: rewrite(&field),
                expected,
                raw,
            },
            Self::MissingDiscriminator { field } => Self::MissingDiscriminator {
                field: rewrite(&field),
            },
            Self::UnrecognizedVariant { field, value } => Self::UnrecognizedVariant {
                field: rewrite(&field),
                value,
            },
        }
    }
}

fn join_path(parent: &str, child: &str) -> String {
    if child == "$" {
        parent.to_owned()
    } else if child.starts_with('[') {
        format!("{parent}{child}")
    } else {
        format!("{parent}.{child}")
    }
}

/// Problems with a static operation descriptor or variant table.
///
/// These indicate a bug in the catalog rather than bad caller input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("operation '{operation_id}': placeholder '{{{placeholder}}}' is not a declared path parameter")]
    UndeclaredPlaceholder {
        operation_id: &'static str,
        placeholder: String,
    },

    #[error("operation '{operation_id}': path parameter '{parameter}' has no placeholder")]
    UnusedPathParameter {
        operation_id: &'static str,
        parameter: &'static str,
    },

    #[error("operation '{operation_id}': unbalanced braces in path template")]
    MalformedTemplate { operation_id: &'static str },

    #[error("operation '{operation_id}': query parameter '{parameter}' declared twice")]
    DuplicateQueryParameter {
        operation_id: &'static str,
        parameter: &'static str,
    },

    #[error("variant family '{discriminator}': tag '{tag}' declared twice")]
    DuplicateVariantTag {
        discriminator: &'static str,
        tag: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, ValidationError};

    #[test]
    fn nested_paths_compose() {
        let error = DecodeError::missing("key").at_index(2).within("results");
        assert_eq!(error.field(), Some("results[2].key"));

        let error = DecodeError::missing("key")
            .within("results")
            .at_index(0)
            .within("aggregations");
        assert_eq!(error.field(), Some("aggregations[0].results.key"));
    }

    #[test]
    fn root_mismatch_takes_parent_name() {
        let error =
            DecodeError::mismatch("$", "object", &serde_json::json!(3)).within("result_metadata");
        assert_eq!(error.field(), Some("result_metadata"));
    }

    #[test]
    fn mismatch_preview_is_truncated() {
        let long = serde_json::Value::String("x".repeat(200));
        let DecodeError::TypeMismatch { raw, .. } = DecodeError::mismatch("f", "integer", &long)
        else {
            panic!("expected type mismatch");
        };
        assert!(raw.chars().count() <= 65);
        assert!(raw.ends_with('…'));
    }

    #[test]
    fn body_alternative_lists_names() {
        let error = ValidationError::MissingBodyAlternative {
            operation_id: "addDocument".to_owned(),
            alternatives: vec!["file".to_owned(), "metadata".to_owned()],
        };
        assert_eq!(
            error.to_string(),
            "operation 'addDocument' requires at least one of: file, metadata"
        );
    }
}
