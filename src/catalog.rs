//! Static operation descriptors for the document-search service.
//!
//! Each endpoint is described once; typed operations in [`crate::operations`]
//! reference these constants, and [`find_operation`] resolves them by id for
//! untyped calls.

use crate::operation::{BodyKind, HttpMethod, OperationDescriptor, QueryParam, ResultShape};

/// Default service root used by the CLI when no URL is configured.
pub const DEFAULT_SERVICE_URL: &str = "https://gateway.watsonplatform.net/discovery/api";

/// API version date the catalog was written against. The service expects it
/// as the `version` query parameter on every call; see
/// [`crate::ClientConfig::with_default_query`].
pub const API_VERSION: &str = "2019-04-30";

const ENVIRONMENT: &[&str] = &["environment_id"];
const COLLECTION: &[&str] = &["environment_id", "collection_id"];
const DOCUMENT: &[&str] = &["environment_id", "collection_id", "document_id"];
const TRAINING_QUERY: &[&str] = &["environment_id", "collection_id", "query_id"];

const DOCUMENT_PARTS: BodyKind = BodyKind::Multipart {
    one_of: &["file", "metadata"],
};

pub const LIST_ENVIRONMENTS: OperationDescriptor =
    OperationDescriptor::new("listEnvironments", HttpMethod::Get, "/v1/environments")
        .query(&[QueryParam::scalar("name")]);

pub const CREATE_ENVIRONMENT: OperationDescriptor =
    OperationDescriptor::new("createEnvironment", HttpMethod::Post, "/v1/environments")
        .body(BodyKind::Json { required: true });

pub const GET_ENVIRONMENT: OperationDescriptor = OperationDescriptor::new(
    "getEnvironment",
    HttpMethod::Get,
    "/v1/environments/{environment_id}",
)
.path_params(ENVIRONMENT);

pub const UPDATE_ENVIRONMENT: OperationDescriptor = OperationDescriptor::new(
    "updateEnvironment",
    HttpMethod::Put,
    "/v1/environments/{environment_id}",
)
.path_params(ENVIRONMENT)
.body(BodyKind::Json { required: false });

pub const DELETE_ENVIRONMENT: OperationDescriptor = OperationDescriptor::new(
    "deleteEnvironment",
    HttpMethod::Delete,
    "/v1/environments/{environment_id}",
)
.path_params(ENVIRONMENT);

pub const LIST_FIELDS: OperationDescriptor = OperationDescriptor::new(
    "listFields",
    HttpMethod::Get,
    "/v1/environments/{environment_id}/fields",
)
.path_params(ENVIRONMENT)
.query(&[QueryParam::list("collection_ids").required()]);

pub const LIST_COLLECTIONS: OperationDescriptor = OperationDescriptor::new(
    "listCollections",
    HttpMethod::Get,
    "/v1/environments/{environment_id}/collections",
)
.path_params(ENVIRONMENT)
.query(&[QueryParam::scalar("name")]);

pub const CREATE_COLLECTION: OperationDescriptor = OperationDescriptor::new(
    "createCollection",
    HttpMethod::Post,
    "/v1/environments/{environment_id}/collections",
)
.path_params(ENVIRONMENT)
.body(BodyKind::Json { required: true });

pub const GET_COLLECTION: OperationDescriptor = OperationDescriptor::new(
    "getCollection",
    HttpMethod::Get,
    "/v1/environments/{environment_id}/collections/{collection_id}",
)
.path_params(COLLECTION);

pub const UPDATE_COLLECTION: OperationDescriptor = OperationDescriptor::new(
    "updateCollection",
    HttpMethod::Put,
    "/v1/environments/{environment_id}/collections/{collection_id}",
)
.path_params(COLLECTION)
.body(BodyKind::Json { required: false });

pub const DELETE_COLLECTION: OperationDescriptor = OperationDescriptor::new(
    "deleteCollection",
    HttpMethod::Delete,
    "/v1/environments/{environment_id}/collections/{collection_id}",
)
.path_params(COLLECTION);

pub const LIST_COLLECTION_FIELDS: OperationDescriptor = OperationDescriptor::new(
    "listCollectionFields",
    HttpMethod::Get,
    "/v1/environments/{environment_id}/collections/{collection_id}/fields",
)
.path_params(COLLECTION);

pub const ADD_DOCUMENT: OperationDescriptor = OperationDescriptor::new(
    "addDocument",
    HttpMethod::Post,
    "/v1/environments/{environment_id}/collections/{collection_id}/documents",
)
.path_params(COLLECTION)
.body(DOCUMENT_PARTS);

pub const UPDATE_DOCUMENT: OperationDescriptor = OperationDescriptor::new(
    "updateDocument",
    HttpMethod::Post,
    "/v1/environments/{environment_id}/collections/{collection_id}/documents/{document_id}",
)
.path_params(DOCUMENT)
.body(DOCUMENT_PARTS);

pub const DELETE_DOCUMENT: OperationDescriptor = OperationDescriptor::new(
    "deleteDocument",
    HttpMethod::Delete,
    "/v1/environments/{environment_id}/collections/{collection_id}/documents/{document_id}",
)
.path_params(DOCUMENT);

pub const QUERY: OperationDescriptor = OperationDescriptor::new(
    "query",
    HttpMethod::Post,
    "/v1/environments/{environment_id}/collections/{collection_id}/query",
)
.path_params(COLLECTION)
.body(BodyKind::Json { required: false });

pub const QUERY_NOTICES: OperationDescriptor = OperationDescriptor::new(
    "queryNotices",
    HttpMethod::Get,
    "/v1/environments/{environment_id}/collections/{collection_id}/notices",
)
.path_params(COLLECTION)
.query(&[
    QueryParam::scalar("filter"),
    QueryParam::scalar("query"),
    QueryParam::scalar("natural_language_query"),
    QueryParam::scalar("passages"),
    QueryParam::scalar("aggregation"),
    QueryParam::scalar("count"),
    QueryParam::list("return"),
    QueryParam::scalar("offset"),
    QueryParam::list("sort"),
    QueryParam::scalar("highlight"),
    QueryParam::list("passages.fields"),
    QueryParam::scalar("passages.count"),
    QueryParam::scalar("passages.characters"),
    QueryParam::scalar("deduplicate.field"),
    QueryParam::scalar("similar"),
    QueryParam::list("similar.document_ids"),
    QueryParam::list("similar.fields"),
]);

pub const LIST_TRAINING_DATA: OperationDescriptor = OperationDescriptor::new(
    "listTrainingData",
    HttpMethod::Get,
    "/v1/environments/{environment_id}/collections/{collection_id}/training_data",
)
.path_params(COLLECTION);

pub const ADD_TRAINING_DATA: OperationDescriptor = OperationDescriptor::new(
    "addTrainingData",
    HttpMethod::Post,
    "/v1/environments/{environment_id}/collections/{collection_id}/training_data",
)
.path_params(COLLECTION)
.body(BodyKind::Json { required: true });

pub const DELETE_ALL_TRAINING_DATA: OperationDescriptor = OperationDescriptor::new(
    "deleteAllTrainingData",
    HttpMethod::Delete,
    "/v1/environments/{environment_id}/collections/{collection_id}/training_data",
)
.path_params(COLLECTION)
.returns(ResultShape::None);

pub const DELETE_TRAINING_DATA: OperationDescriptor = OperationDescriptor::new(
    "deleteTrainingData",
    HttpMethod::Delete,
    "/v1/environments/{environment_id}/collections/{collection_id}/training_data/{query_id}",
)
.path_params(TRAINING_QUERY)
.returns(ResultShape::None);

static OPERATIONS: &[OperationDescriptor] = &[
    LIST_ENVIRONMENTS,
    CREATE_ENVIRONMENT,
    GET_ENVIRONMENT,
    UPDATE_ENVIRONMENT,
    DELETE_ENVIRONMENT,
    LIST_FIELDS,
    LIST_COLLECTIONS,
    CREATE_COLLECTION,
    GET_COLLECTION,
    UPDATE_COLLECTION,
    DELETE_COLLECTION,
    LIST_COLLECTION_FIELDS,
    ADD_DOCUMENT,
    UPDATE_DOCUMENT,
    DELETE_DOCUMENT,
    QUERY,
    QUERY_NOTICES,
    LIST_TRAINING_DATA,
    ADD_TRAINING_DATA,
    DELETE_ALL_TRAINING_DATA,
    DELETE_TRAINING_DATA,
];

/// Returns every described operation.
pub fn operations() -> &'static [OperationDescriptor] {
    OPERATIONS
}

pub fn find_operation(operation_id: &str) -> Option<&'static OperationDescriptor> {
    OPERATIONS
        .iter()
        .find(|operation| operation.operation_id == operation_id)
}

#[cfg(test)]
mod tests {
    use super::{find_operation, operations};
    use crate::operation::{BodyKind, ResultShape};

    #[test]
    fn every_descriptor_validates() {
        for operation in operations() {
            assert_eq!(
                operation.validate(),
                Ok(()),
                "{} is inconsistent",
                operation.operation_id
            );
        }
    }

    #[test]
    fn operation_ids_are_unique() {
        let all = operations();
        for (index, operation) in all.iter().enumerate() {
            assert!(
                all[..index]
                    .iter()
                    .all(|earlier| earlier.operation_id != operation.operation_id),
                "{} listed twice",
                operation.operation_id
            );
        }
    }

    #[test]
    fn lookup_by_id() {
        let operation = find_operation("addDocument").expect("present");
        assert_eq!(
            operation.body,
            BodyKind::Multipart {
                one_of: &["file", "metadata"]
            }
        );
        assert_eq!(
            find_operation("deleteAllTrainingData").map(|op| op.result),
            Some(ResultShape::None)
        );
        assert!(find_operation("nope").is_none());
    }
}
