//! Rust client library for the Discovery document-search REST API.
//!
//! Public API layers:
//! - [`DiscoveryClient`]/[`BlockingDiscoveryClient`]: invoke typed
//!   [`operations`] or call any catalog endpoint by operation id.
//! - [`catalog`]: the static endpoint table (method, path template, declared
//!   parameters, body kind and result shape per operation).
//! - [`models`]: response and request records decoded through the
//!   [`codec`] engine, which tells absent, null and present fields apart.
//! - [`ClientError`]: unified error type used by all clients.
//!
//! Requests are built by [`build_request`] and sent through a [`Transport`]
//! (or [`BlockingTransport`]); the HTTP implementations use `reqwest`.

mod blocking_client;
mod client;
mod config;
mod error;
mod operation;
mod request;
mod response;
mod transport;

pub mod body;
pub mod catalog;
pub mod codec;
pub mod models;
pub mod operations;

pub use body::{FileUpload, MultipartBody, RequestBody};
/// Blocking client and its `reqwest` transport.
pub use blocking_client::{BlockingDiscoveryClient, BlockingHttpTransport};
/// Async client and its `reqwest` transport.
pub use client::{DiscoveryClient, HttpTransport};
pub use config::{ClientConfig, DEFAULT_USER_AGENT};
/// Error types returned by all client operations.
pub use error::{ClientError, DecodeError, DescriptorError, TransportError, ValidationError};
pub use operation::{
    BodyKind, HttpMethod, Operation, OperationDescriptor, QueryEncoding, QueryParam, ResultShape,
};
pub use request::{OperationArgs, QueryValue, WireRequest, build_request};
pub use response::{Response, ResponsePayload};
pub use transport::{BlockingTransport, RawResponse, Transport};
