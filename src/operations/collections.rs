use crate::body::RequestBody;
use crate::catalog;
use crate::codec::ObjectWriter;
use crate::models::{
    Collection, DeleteCollectionResponse, ListCollectionFieldsResponse, ListCollectionsResponse,
};
use crate::operation::{Operation, OperationDescriptor};
use crate::request::OperationArgs;
use crate::response::ResponsePayload;
use crate::{ClientError, DecodeError};

use super::require_body_field;

fn collection_args(environment_id: String, collection_id: String) -> OperationArgs {
    OperationArgs::new()
        .path_param("environment_id", environment_id)
        .path_param("collection_id", collection_id)
}

#[derive(Clone, Debug)]
pub struct ListCollections {
    environment_id: String,
    name: Option<String>,
}

impl ListCollections {
    pub fn new(environment_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            name: None,
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

impl Operation for ListCollections {
    type Output = ListCollectionsResponse;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::LIST_COLLECTIONS;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(OperationArgs::new()
            .path_param("environment_id", self.environment_id)
            .optional_query("name", self.name))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[derive(Clone, Debug)]
pub struct CreateCollection {
    environment_id: String,
    name: String,
    description: Option<String>,
    configuration_id: Option<String>,
    language: Option<String>,
}

impl CreateCollection {
    pub fn new(environment_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            name: name.into(),
            description: None,
            configuration_id: None,
            language: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_configuration_id(mut self, configuration_id: impl Into<String>) -> Self {
        self.configuration_id = Some(configuration_id.into());
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

impl Operation for CreateCollection {
    type Output = Collection;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::CREATE_COLLECTION;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        require_body_field(Self::DESCRIPTOR.operation_id, "name", &self.name)?;

        let mut body = ObjectWriter::new();
        body.field("name", &self.name)
            .optional("description", self.description.as_ref())
            .optional("configuration_id", self.configuration_id.as_ref())
            .optional("language", self.language.as_ref());
        Ok(OperationArgs::new()
            .path_param("environment_id", self.environment_id)
            .body(RequestBody::sparse(body)))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[derive(Clone, Debug)]
pub struct GetCollection {
    environment_id: String,
    collection_id: String,
}

impl GetCollection {
    pub fn new(environment_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

impl Operation for GetCollection {
    type Output = Collection;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::GET_COLLECTION;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(collection_args(self.environment_id, self.collection_id))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

/// Partial update: only the fields that were set are sent.
#[derive(Clone, Debug)]
pub struct UpdateCollection {
    environment_id: String,
    collection_id: String,
    name: Option<String>,
    description: Option<String>,
    configuration_id: Option<String>,
}

impl UpdateCollection {
    pub fn new(environment_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
            name: None,
            description: None,
            configuration_id: None,
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
    pub fn with_configuration_id(mut self, configuration_id: impl Into<String>) -> Self {
        self.configuration_id = Some(configuration_id.into());
        self
    }
}

impl Operation for UpdateCollection {
    type Output = Collection;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::UPDATE_COLLECTION;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        let mut body = ObjectWriter::new();
        body.optional("name", self.name.as_ref())
            .optional("description", self.description.as_ref())
            .optional("configuration_id", self.configuration_id.as_ref());
        Ok(collection_args(self.environment_id, self.collection_id).body(RequestBody::sparse(body)))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[derive(Clone, Debug)]
pub struct DeleteCollection {
    environment_id: String,
    collection_id: String,
}

impl DeleteCollection {
    pub fn new(environment_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

impl Operation for DeleteCollection {
    type Output = DeleteCollectionResponse;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::DELETE_COLLECTION;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(collection_args(self.environment_id, self.collection_id))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[derive(Clone, Debug)]
pub struct ListCollectionFields {
    environment_id: String,
    collection_id: String,
}

impl ListCollectionFields {
    pub fn new(environment_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

impl Operation for ListCollectionFields {
    type Output = ListCollectionFieldsResponse;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::LIST_COLLECTION_FIELDS;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(collection_args(self.environment_id, self.collection_id))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{CreateCollection, DeleteCollection, GetCollection, UpdateCollection};
    use crate::ValidationError;
    use crate::operation::Operation;
    use crate::request::build_request;

    #[test]
    fn create_body_has_exactly_the_set_fields() {
        let args = CreateCollection::new("env-1", "news")
            .with_language("en")
            .into_args()
            .expect("args");
        let request = build_request(CreateCollection::DESCRIPTOR, args).expect("valid");
        assert_eq!(
            request.body.as_json(),
            Some(&json!({"name": "news", "language": "en"}))
        );
    }

    #[test]
    fn empty_update_sends_an_empty_object() {
        let args = UpdateCollection::new("env-1", "c1").into_args().expect("args");
        let request = build_request(UpdateCollection::DESCRIPTOR, args).expect("valid");
        assert_eq!(request.body.as_json(), Some(&json!({})));
        assert_eq!(request.method, reqwest::Method::PUT);
    }

    #[test]
    fn collection_id_is_escaped_into_the_path() {
        let args = GetCollection::new("env 1", "a/b").into_args().expect("args");
        let request = build_request(GetCollection::DESCRIPTOR, args).expect("valid");
        assert_eq!(request.path, "/v1/environments/env%201/collections/a%2Fb");

        let args = GetCollection::new("env-1", "").into_args().expect("args");
        let error = build_request(GetCollection::DESCRIPTOR, args).expect_err("empty id");
        assert_eq!(
            error,
            ValidationError::MissingPathParameter {
                operation_id: "getCollection".to_owned(),
                parameter: "collection_id".to_owned(),
            }
        );
    }

    #[test]
    fn parent_segment_cannot_retarget_the_call() {
        let args = DeleteCollection::new("env-1", "..").into_args().expect("args");
        let error = build_request(DeleteCollection::DESCRIPTOR, args).expect_err("dot segment");
        assert!(matches!(
            error,
            ValidationError::InvalidPathParameter { ref parameter, .. } if parameter == "collection_id"
        ));
    }
}
