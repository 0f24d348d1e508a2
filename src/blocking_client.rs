use reqwest::blocking::multipart::{Form, Part as FormPart};
use reqwest::header::ACCEPT;
use serde_json::Value;

use crate::body::{MultipartBody, Part, PartContent, RequestBody};
use crate::catalog::find_operation;
use crate::config::ClientConfig;
use crate::operation::{Operation, OperationDescriptor};
use crate::request::{OperationArgs, WireRequest, build_request};
use crate::response::{Response, ResponsePayload, complete};
use crate::transport::{BlockingTransport, RawResponse, merged_headers, merged_query};
use crate::{ClientError, DecodeError, TransportError};

/// [`BlockingTransport`] backed by a blocking `reqwest` client.
///
/// Must not be created or dropped inside an async runtime.
#[derive(Clone, Debug)]
pub struct BlockingHttpTransport {
    config: ClientConfig,
    http: reqwest::blocking::Client,
}

impl BlockingHttpTransport {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let http = reqwest::blocking::Client::builder()
            .user_agent(config.user_agent())
            .build()
            .map_err(TransportError::from)?;
        Ok(Self { config, http })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

impl BlockingTransport for BlockingHttpTransport {
    fn send(&self, request: WireRequest) -> Result<RawResponse, TransportError> {
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

        let response = builder.send()?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes()?.to_vec();

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

/// Blocking client for the document-search service.
///
/// This is the synchronous counterpart of [`crate::DiscoveryClient`].
#[derive(Clone, Debug)]
pub struct BlockingDiscoveryClient<T = BlockingHttpTransport> {
    transport: T,
}

impl BlockingDiscoveryClient<BlockingHttpTransport> {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self::with_transport(BlockingHttpTransport::new(config)?))
    }
}

impl<T: BlockingTransport> BlockingDiscoveryClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Builds, sends and decodes one typed operation.
    pub fn invoke<O: Operation>(&self, operation: O) -> Result<Response<O::Output>, ClientError> {
        let args = operation.into_args()?;
        self.execute(O::DESCRIPTOR, args, O::decode_output)
    }

    /// Calls an endpoint by operation id, returning the untyped JSON result.
    pub fn call_operation(
        &self,
        operation_id: &str,
        args: OperationArgs,
    ) -> Result<Response<Value>, ClientError> {
        let descriptor = find_operation(operation_id)
            .ok_or_else(|| ClientError::UnknownOperation(operation_id.to_owned()))?;
        self.execute(descriptor, args, |payload| Ok(payload.into_value()))
    }

    #[tracing::instrument(
        name = "invoke",
        skip_all,
        fields(operation = descriptor.operation_id)
    )]
    fn execute<R>(
        &self,
        descriptor: &'static OperationDescriptor,
        args: OperationArgs,
        decode: impl FnOnce(ResponsePayload) -> Result<R, DecodeError>,
    ) -> Result<Response<R>, ClientError> {
        let request = build_request(descriptor, args)?;
        tracing::debug!(method = %request.method, path = %request.path, "sending request");

        let raw = self.transport.send(request)?;
        tracing::debug!(status = %raw.status, bytes = raw.body.len(), "received response");

        complete(descriptor.result, raw, decode)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use reqwest::StatusCode;
    use reqwest::header::HeaderMap;

    use super::BlockingDiscoveryClient;
    use crate::operations::{QueryCollection, QueryNotices};
    use crate::request::WireRequest;
    use crate::transport::{BlockingTransport, RawResponse};
    use crate::{ClientError, TransportError};

    #[derive(Default)]
    struct RecordingTransport {
        seen: RefCell<Vec<WireRequest>>,
        body: &'static str,
    }

    impl BlockingTransport for RecordingTransport {
        fn send(&self, request: WireRequest) -> Result<RawResponse, TransportError> {
            self.seen.borrow_mut().push(request);
            Ok(RawResponse {
                status: StatusCode::OK,
                headers: HeaderMap::new(),
                body: self.body.as_bytes().to_vec(),
            })
        }
    }

    struct FailingTransport;

    impl BlockingTransport for FailingTransport {
        fn send(&self, _request: WireRequest) -> Result<RawResponse, TransportError> {
            Err(TransportError::Other("connection reset".to_owned()))
        }
    }

    #[test]
    fn list_query_parameters_are_comma_joined() {
        let client = BlockingDiscoveryClient::with_transport(RecordingTransport {
            body: r#"{"matching_results": 0, "results": []}"#,
            ..RecordingTransport::default()
        });

        let response = client
            .invoke(
                QueryNotices::new("env-1", "c1")
                    .with_return_fields(["notice_id", "severity"])
                    .with_count(5),
            )
            .expect("succeeds");
        assert_eq!(response.result.matching_results, Some(0));

        let seen = client.transport().seen.borrow();
        assert_eq!(seen[0].query_value("return"), Some("notice_id,severity"));
        assert_eq!(seen[0].query_value("count"), Some("5"));
        assert_eq!(seen[0].query_value("sort"), None);
    }

    #[test]
    fn query_body_is_sparse_and_opt_out_header_is_sent() {
        let client = BlockingDiscoveryClient::with_transport(RecordingTransport {
            body: r#"{"matching_results": 0}"#,
            ..RecordingTransport::default()
        });

        client
            .invoke(
                QueryCollection::new("env-1", "c1")
                    .with_natural_language_query("what is rust")
                    .with_logging_opt_out(true),
            )
            .expect("succeeds");

        let seen = client.transport().seen.borrow();
        assert_eq!(
            seen[0].body.as_json(),
            Some(&serde_json::json!({"natural_language_query": "what is rust"}))
        );
        assert_eq!(seen[0].headers["x-watson-logging-opt-out"], "true");
    }

    #[test]
    fn transport_errors_pass_through_unchanged() {
        let client = BlockingDiscoveryClient::with_transport(FailingTransport);
        let error = client
            .invoke(QueryNotices::new("env-1", "c1"))
            .expect_err("transport fails");
        assert!(matches!(
            error,
            ClientError::Transport(TransportError::Other(message)) if message == "connection reset"
        ));
    }
}
