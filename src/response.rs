use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde_json::{Map, Value};

use crate::codec::{Model, decode_array};
use crate::operation::ResultShape;
use crate::transport::RawResponse;
use crate::{ClientError, DecodeError};

/// A decoded response together with its HTTP metadata.
#[derive(Clone, Debug)]
pub struct Response<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub result: T,
}

impl<T> Response<T> {
    pub fn into_result(self) -> T {
        self.result
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            status: self.status,
            headers: self.headers,
            result: f(self.result),
        }
    }
}

/// A response body parsed to the shape the descriptor declares, not yet typed.
#[derive(Clone, Debug, PartialEq)]
pub enum ResponsePayload {
    Empty,
    Object(Map<String, Value>),
    Array(Vec<Value>),
}

impl ResponsePayload {
    /// Parses `body` according to `shape`.
    ///
    /// `ResultShape::None` never looks at the body.
    pub fn parse(shape: ResultShape, body: &[u8]) -> Result<Self, DecodeError> {
        match shape {
            ResultShape::None => Ok(Self::Empty),
            ResultShape::Model => match parse_json(body)? {
                Value::Object(object) => Ok(Self::Object(object)),
                other => Err(DecodeError::mismatch("$", "object", &other)),
            },
            ResultShape::Array => match parse_json(body)? {
                Value::Array(values) => Ok(Self::Array(values)),
                other => Err(DecodeError::mismatch("$", "array", &other)),
            },
        }
    }

    pub fn into_model<M: Model>(self) -> Result<M, DecodeError> {
        match self {
            Self::Object(object) => M::from_object(&object),
            other => Err(other.shape_mismatch("object")),
        }
    }

    pub fn into_models<M: Model>(self) -> Result<Vec<M>, DecodeError> {
        match self {
            Self::Array(values) => decode_array(&values, M::from_value),
            other => Err(other.shape_mismatch("array")),
        }
    }

    /// For operations without a result body.
    pub fn into_empty(self) -> Result<(), DecodeError> {
        Ok(())
    }

    /// The payload as an untyped JSON value; `Empty` becomes `null`.
    pub fn into_value(self) -> Value {
        match self {
            Self::Empty => Value::Null,
            Self::Object(object) => Value::Object(object),
            Self::Array(values) => Value::Array(values),
        }
    }

    fn shape_mismatch(self, expected: &'static str) -> DecodeError {
        DecodeError::mismatch("$", expected, &self.into_value())
    }
}

fn parse_json(body: &[u8]) -> Result<Value, DecodeError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(DecodeError::mismatch("$", "JSON document", &Value::Null));
    }
    Ok(serde_json::from_slice(body)?)
}

/// Turns a non-success status into [`ClientError::HttpStatus`].
pub(crate) fn ensure_success(raw: &RawResponse) -> Result<(), ClientError> {
    if raw.status.is_success() {
        return Ok(());
    }
    Err(ClientError::HttpStatus {
        status: raw.status,
        body: String::from_utf8_lossy(&raw.body).into_owned(),
    })
}

/// Status check, shape dispatch and typed decode for one completed round trip.
pub(crate) fn complete<T>(
    shape: ResultShape,
    raw: RawResponse,
    decode: impl FnOnce(ResponsePayload) -> Result<T, DecodeError>,
) -> Result<Response<T>, ClientError> {
    ensure_success(&raw)?;
    let result = ResponsePayload::parse(shape, &raw.body)
        .and_then(decode)
        .inspect_err(|error| {
            tracing::warn!(%error, "response did not match the expected schema");
        })?;
    Ok(Response {
        status: raw.status,
        headers: raw.headers,
        result,
    })
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;
    use serde_json::json;

    use super::{ResponsePayload, complete};
    use crate::models::{DeleteCollectionResponse, Notice};
    use crate::operation::ResultShape;
    use crate::transport::RawResponse;
    use crate::{ClientError, DecodeError};

    fn raw(status: u16, body: &str) -> RawResponse {
        RawResponse {
            status: StatusCode::from_u16(status).expect("valid status"),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn none_shape_skips_the_body() {
        let payload = ResponsePayload::parse(ResultShape::None, b"not json at all")
            .expect("body is ignored");
        assert_eq!(payload, ResponsePayload::Empty);
    }

    #[test]
    fn model_shape_decodes_status() {
        let response = complete(
            ResultShape::Model,
            raw(200, r#"{"collection_id": "c1", "status": "deleted"}"#),
            ResponsePayload::into_model::<DeleteCollectionResponse>,
        )
        .expect("decodes");
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.result.status, "deleted");
    }

    #[test]
    fn array_shape_decodes_elements() {
        let payload = ResponsePayload::parse(
            ResultShape::Array,
            br#"[{"notice_id": "n1"}, {"notice_id": "n2"}]"#,
        )
        .expect("parses");
        let notices: Vec<Notice> = payload.into_models().expect("decodes");
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[1].notice_id, "n2");
    }

    #[test]
    fn shape_mismatches_are_decode_errors() {
        let error = ResponsePayload::parse(ResultShape::Model, b"[1, 2]").expect_err("array");
        assert!(matches!(error, DecodeError::TypeMismatch { expected: "object", .. }));

        let error = ResponsePayload::parse(ResultShape::Model, b"   ").expect_err("empty");
        assert_eq!(error.field(), Some("$"));

        let error = ResponsePayload::parse(ResultShape::Array, b"{oops").expect_err("invalid");
        assert!(matches!(error, DecodeError::Malformed(_)));
    }

    #[test]
    fn error_status_is_not_decoded() {
        let error = complete(
            ResultShape::Model,
            raw(404, r#"{"code": 404, "error": "Collection not found"}"#),
            ResponsePayload::into_model::<DeleteCollectionResponse>,
        )
        .expect_err("404");
        match error {
            ClientError::HttpStatus { status, body } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert!(body.contains("Collection not found"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn untyped_payload_round_trips_to_value() {
        let payload = ResponsePayload::parse(ResultShape::Model, br#"{"a": [1]}"#).expect("parses");
        assert_eq!(payload.into_value(), json!({"a": [1]}));
        assert_eq!(ResponsePayload::Empty.into_value(), serde_json::Value::Null);
    }
}
