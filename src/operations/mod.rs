//! Typed options for each catalog endpoint.
//!
//! An options value is built with its required identifiers, refined with
//! `with_*` setters, and handed to [`crate::DiscoveryClient::invoke`]. Only
//! setters that were called contribute to the request.

mod collections;
mod documents;
mod environments;
mod query;
mod training;

pub use collections::{
    CreateCollection, DeleteCollection, GetCollection, ListCollectionFields, ListCollections,
    UpdateCollection,
};
pub use documents::{AddDocument, DeleteDocument, UpdateDocument};
pub use environments::{
    CreateEnvironment, DeleteEnvironment, GetEnvironment, ListEnvironments, ListFields,
    UpdateEnvironment,
};
pub use query::{QueryCollection, QueryNotices};
pub use training::{AddTrainingData, DeleteAllTrainingData, DeleteTrainingData, ListTrainingData};

use crate::ValidationError;

/// Rejects an empty value for a body field the service requires.
fn require_body_field(operation_id: &str, field: &str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::MissingBodyField {
            operation_id: operation_id.to_owned(),
            field: field.to_owned(),
        });
    }
    Ok(())
}
