use crate::body::RequestBody;
use crate::catalog;
use crate::codec::ObjectWriter;
use crate::models::{
    DeleteEnvironmentResponse, Environment, ListCollectionFieldsResponse, ListEnvironmentsResponse,
};
use crate::operation::{Operation, OperationDescriptor};
use crate::request::OperationArgs;
use crate::response::ResponsePayload;
use crate::{ClientError, DecodeError};

use super::require_body_field;

#[derive(Clone, Debug, Default)]
pub struct ListEnvironments {
    name: Option<String>,
}

impl ListEnvironments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only environments with exactly this name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Operation for ListEnvironments {
    type Output = ListEnvironmentsResponse;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::LIST_ENVIRONMENTS;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(OperationArgs::new().optional_query("name", self.name))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[derive(Clone, Debug)]
pub struct CreateEnvironment {
    name: String,
    description: Option<String>,
    size: Option<String>,
}

impl CreateEnvironment {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            size: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Capacity plan, for example `LT` or `XS`.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

impl Operation for CreateEnvironment {
    type Output = Environment;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::CREATE_ENVIRONMENT;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        require_body_field(Self::DESCRIPTOR.operation_id, "name", &self.name)?;

        let mut body = ObjectWriter::new();
        body.field("name", &self.name)
            .optional("description", self.description.as_ref())
            .optional("size", self.size.as_ref());
        Ok(OperationArgs::new().body(RequestBody::sparse(body)))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[derive(Clone, Debug)]
pub struct GetEnvironment {
    environment_id: String,
}

impl GetEnvironment {
    pub fn new(environment_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
        }
    }
}

impl Operation for GetEnvironment {
    type Output = Environment;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::GET_ENVIRONMENT;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(OperationArgs::new().path_param("environment_id", self.environment_id))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

/// Partial update: only the fields that were set are sent.
#[derive(Clone, Debug)]
pub struct UpdateEnvironment {
    environment_id: String,
    name: Option<String>,
    description: Option<String>,
    size: Option<String>,
}

impl UpdateEnvironment {
    pub fn new(environment_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            name: None,
            description: None,
            size: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = Some(size.into());
        self
    }
}

impl Operation for UpdateEnvironment {
    type Output = Environment;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::UPDATE_ENVIRONMENT;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        let mut body = ObjectWriter::new();
        body.optional("name", self.name.as_ref())
            .optional("description", self.description.as_ref())
            .optional("size", self.size.as_ref());
        Ok(OperationArgs::new()
            .path_param("environment_id", self.environment_id)
            .body(RequestBody::sparse(body)))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[derive(Clone, Debug)]
pub struct DeleteEnvironment {
    environment_id: String,
}

impl DeleteEnvironment {
    pub fn new(environment_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
        }
    }
}

impl Operation for DeleteEnvironment {
    type Output = DeleteEnvironmentResponse;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::DELETE_ENVIRONMENT;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(OperationArgs::new().path_param("environment_id", self.environment_id))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

/// Fields indexed across several collections of one environment.
#[derive(Clone, Debug)]
pub struct ListFields {
    environment_id: String,
    collection_ids: Vec<String>,
}

impl ListFields {
    pub fn new<S: Into<String>>(
        environment_id: impl Into<String>,
        collection_ids: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_ids: collection_ids.into_iter().map(Into::into).collect(),
        }
    }
}

impl Operation for ListFields {
    type Output = ListCollectionFieldsResponse;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::LIST_FIELDS;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        // An empty list is reported as a missing parameter.
        let ids = (!self.collection_ids.is_empty()).then_some(self.collection_ids);
        Ok(OperationArgs::new()
            .path_param("environment_id", self.environment_id)
            .optional_query_list("collection_ids", ids))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}
