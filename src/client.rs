use reqwest::header::ACCEPT;
use reqwest::multipart::{Form, Part as FormPart};
use serde_json::Value;

use crate::body::{MultipartBody, Part, PartContent, RequestBody};
use crate::catalog::find_operation;
use crate::config::ClientConfig;
use crate::operation::{Operation, OperationDescriptor};
use crate::request::{OperationArgs, WireRequest, build_request};
use crate::response::{Response, ResponsePayload, complete};
use crate::transport::{RawResponse, Transport, merged_headers, merged_query};
use crate::{ClientError, DecodeError, TransportError};

/// [`Transport`] backed by an async `reqwest` client.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    config: ClientConfig,
    http: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent())
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl Transport for HttpTransport {
    async fn send(&self, request: WireRequest) -> Result<RawResponse, TransportError> {
        let url = self.config.resolve(&request.path)?;
        let mut builder = self
            .http
            .request(request.method, url)
            .header(ACCEPT, "application/json");

        if let Some(token) = self.config.authorization_token() {
            builder = builder.bearer_auth(token);
        }

        builder = builder.headers(merged_headers(&self.config, request.headers));

        let query = merged_query(&self.config, request.query);
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        if let Some(timeout) = request.timeout.or(self.config.timeout()) {
            builder = builder.timeout(timeout);
        }

        builder = match request.body {
            RequestBody::None => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Multipart(body) => builder.multipart(multipart_form(body)?),
        };

        let response = builder.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

fn multipart_form(body: MultipartBody) -> Result<Form, TransportError> {
    let mut form = Form::new();
    for Part { name, content } in body.into_parts() {
        let part = match content {
            PartContent::Binary {
                data,
                filename,
                content_type,
            } => {
                let part = FormPart::bytes(data).mime_str(&content_type)?;
                match filename {
                    Some(filename) => part.file_name(filename),
                    None => part,
                }
            }
            PartContent::Text {
                value,
                content_type,
            } => {
                let part = FormPart::text(value);
                match content_type {
                    Some(content_type) => part.mime_str(&content_type)?,
                    None => part,
                }
            }
        };
        form = form.part(name, part);
    }
    Ok(form)
}

/// Async client for the document-search service.
///
/// Typed calls go through [`Self::invoke`]; [`Self::call_operation`] calls an
/// endpoint by operation id and returns the untyped JSON result.
#[derive(Clone, Debug)]
pub struct DiscoveryClient<T = HttpTransport> {
    transport: T,
}

impl DiscoveryClient<HttpTransport> {
    /// Creates a client over the default `reqwest` transport.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_transport(HttpTransport::new(config)?))
    }
}

impl<T: Transport> DiscoveryClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds, sends and decodes one typed operation.
    ///
    /// Validation errors are returned before the transport is touched.
    /// Dropping the returned future cancels the in-flight request.
    pub async fn invoke<O: Operation>(
        &self,
        operation: O,
    ) -> Result<Response<O::Output>, ClientError> {
        let args = operation.into_args()?;
        self.execute(O::DESCRIPTOR, args, O::decode_output).await
    }

    /// Calls an endpoint by operation id.
    ///
    /// Arguments are validated against the catalog descriptor. Operations
    /// without a result body yield [`Value::Null`].
    pub async fn call_operation(
        &self,
        operation_id: &str,
        args: OperationArgs,
    ) -> Result<Response<Value>, ClientError> {
        let descriptor = find_operation(operation_id)
            .ok_or_else(|| ClientError::UnknownOperation(operation_id.to_owned()))?;
        self.execute(descriptor, args, |payload| Ok(payload.into_value()))
            .await
    }

    #[tracing::instrument(
        name = "invoke",
        skip_all,
        fields(operation = descriptor.operation_id)
    )]
    async fn execute<R>(
        &self,
        descriptor: &'static OperationDescriptor,
        args: OperationArgs,
        decode: impl FnOnce(ResponsePayload) -> Result<R, DecodeError>,
    ) -> Result<Response<R>, ClientError> {
        let request = build_request(descriptor, args)?;
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let raw = self.transport.send(request).await?;
        tracing::debug!(status = %raw.status, bytes = raw.body.len(), "received response");

        complete(descriptor.result, raw, decode)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;
    use serde_json::json;
    use tracing_test::traced_test;

    use super::DiscoveryClient;
    use crate::operations::{DeleteCollection, GetCollection};
    use crate::request::WireRequest;
    use crate::transport::{RawResponse, Transport};
    use crate::{ClientError, TransportError};

    struct CannedTransport {
        status: StatusCode,
        body: &'static str,
        seen: Mutex<Vec<WireRequest>>,
    }

    impl CannedTransport {
        fn new(status: u16, body: &'static str) -> Self {
            Self {
                status: StatusCode::from_u16(status).expect("valid status"),
                body,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl Transport for CannedTransport {
        async fn send(&self, request: WireRequest) -> Result<RawResponse, TransportError> {
            self.seen.lock().expect("not poisoned").push(request);
            Ok(RawResponse {
                status: self.status,
                headers: HeaderMap::new(),
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    #[tokio::test]
    async fn invoke_builds_sends_and_decodes() {
        let client = DiscoveryClient::with_transport(CannedTransport::new(
            200,
            r#"{"collection_id": "c1", "status": "deleted"}"#,
        ));

        let response = client
            .invoke(DeleteCollection::new("env-1", "c1"))
            .await
            .expect("succeeds");
        assert_eq!(response.result.status, "deleted");

        let seen = client.transport().seen.lock().expect("not poisoned");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].method, reqwest::Method::DELETE);
        assert_eq!(seen[0].path, "/v1/environments/env-1/collections/c1");
    }

    #[tokio::test]
    async fn validation_failure_never_reaches_the_transport() {
        let client = DiscoveryClient::with_transport(CannedTransport::new(200, "{}"));

        let error = client
            .invoke(GetCollection::new("env-1", ""))
            .await
            .expect_err("empty collection id");
        assert!(error.is_validation());
        assert!(client.transport().seen.lock().expect("not poisoned").is_empty());
    }

    #[tokio::test]
    async fn call_operation_returns_untyped_json() {
        let client =
            DiscoveryClient::with_transport(CannedTransport::new(200, r#"{"environments": []}"#));

        let response = client
            .call_operation("listEnvironments", crate::OperationArgs::new())
            .await
            .expect("succeeds");
        assert_eq!(response.result, json!({"environments": []}));

        let error = client
            .call_operation("noSuchOperation", crate::OperationArgs::new())
            .await
            .expect_err("unknown id");
        assert!(matches!(error, ClientError::UnknownOperation(id) if id == "noSuchOperation"));
    }

    #[tokio::test]
    #[traced_test]
    async fn schema_drift_is_logged_and_reported() {
        let client = DiscoveryClient::with_transport(CannedTransport::new(
            200,
            r#"{"collection_id": "c1"}"#,
        ));

        let error = client
            .invoke(DeleteCollection::new("env-1", "c1"))
            .await
            .expect_err("status is required");
        assert!(error.is_decode());
        assert!(logs_contain("sending request"));
        assert!(logs_contain("response did not match the expected schema"));
    }
}
