use crate::body::RequestBody;
use crate::catalog;
use crate::codec::ObjectWriter;
use crate::models::{TrainingDataSet, TrainingExample, TrainingQuery};
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
pub struct ListTrainingData {
    environment_id: String,
    collection_id: String,
}

impl ListTrainingData {
    pub fn new(environment_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

impl Operation for ListTrainingData {
    type Output = TrainingDataSet;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::LIST_TRAINING_DATA;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(collection_args(self.environment_id, self.collection_id))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

/// Adds a training query with its rated examples.
#[derive(Clone, Debug)]
pub struct AddTrainingData {
    environment_id: String,
    collection_id: String,
    natural_language_query: String,
    filter: Option<String>,
    examples: Option<Vec<TrainingExample>>,
}

impl AddTrainingData {
    pub fn new(
        environment_id: impl Into<String>,
        collection_id: impl Into<String>,
        natural_language_query: impl Into<String>,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
            natural_language_query: natural_language_query.into(),
            filter: None,
            examples: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_examples(mut self, examples: Vec<TrainingExample>) -> Self {
        self.examples = Some(examples);
        self
    }
}

impl Operation for AddTrainingData {
    type Output = TrainingQuery;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::ADD_TRAINING_DATA;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        require_body_field(
            Self::DESCRIPTOR.operation_id,
            "natural_language_query",
            &self.natural_language_query,
        )?;

        let mut body = ObjectWriter::new();
        body.field("natural_language_query", &self.natural_language_query)
            .optional("filter", self.filter.as_ref())
            .optional_models("examples", self.examples.as_deref());
        Ok(collection_args(self.environment_id, self.collection_id).body(RequestBody::sparse(body)))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

/// Removes every training query of a collection. The service answers with
/// an empty body.
#[derive(Clone, Debug)]
pub struct DeleteAllTrainingData {
    environment_id: String,
    collection_id: String,
}

impl DeleteAllTrainingData {
    pub fn new(environment_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
        }
    }
}

impl Operation for DeleteAllTrainingData {
    type Output = ();

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::DELETE_ALL_TRAINING_DATA;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(collection_args(self.environment_id, self.collection_id))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_empty()
    }
}

#[derive(Clone, Debug)]
pub struct DeleteTrainingData {
    environment_id: String,
    collection_id: String,
    query_id: String,
}

impl DeleteTrainingData {
    pub fn new(
        environment_id: impl Into<String>,
        collection_id: impl Into<String>,
        query_id: impl Into<String>,
    ) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
            query_id: query_id.into(),
        }
    }
}

impl Operation for DeleteTrainingData {
    type Output = ();

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::DELETE_TRAINING_DATA;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(collection_args(self.environment_id, self.collection_id)
            .path_param("query_id", self.query_id))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_empty()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::AddTrainingData;
    use crate::models::TrainingExample;
    use crate::operation::Operation;
    use crate::request::build_request;

    #[test]
    fn examples_are_encoded_as_nested_objects() {
        let args = AddTrainingData::new("env-1", "c1", "who maintains tokio")
            .with_examples(vec![TrainingExample::new("doc-1", 10)])
            .into_args()
            .expect("args");
        let request = build_request(AddTrainingData::DESCRIPTOR, args).expect("valid");
        assert_eq!(
            request.body.as_json(),
            Some(&json!({
                "natural_language_query": "who maintains tokio",
                "examples": [{"document_id": "doc-1", "relevance": 10}]
            }))
        );
    }
}
