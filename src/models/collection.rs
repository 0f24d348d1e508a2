use chrono::{DateTime, Utc};

use crate::DecodeError;
use crate::codec::{FieldReader, Model, ObjectWriter};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Collection {
    pub collection_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub configuration_id: Option<String>,
    pub language: Option<String>,
    pub document_counts: Option<DocumentCounts>,
}

impl Model for Collection {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            collection_id: fields.optional("collection_id")?,
            name: fields.optional("name")?,
            description: fields.optional("description")?,
            created: fields.optional("created")?,
            updated: fields.optional("updated")?,
            status: fields.optional("status")?,
            configuration_id: fields.optional("configuration_id")?,
            language: fields.optional("language")?,
            document_counts: fields.optional_model("document_counts")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("collection_id", self.collection_id.as_ref())
            .optional("name", self.name.as_ref())
            .optional("description", self.description.as_ref())
            .optional("created", self.created.as_ref())
            .optional("updated", self.updated.as_ref())
            .optional("status", self.status.as_ref())
            .optional("configuration_id", self.configuration_id.as_ref())
            .optional("language", self.language.as_ref())
            .optional_model("document_counts", self.document_counts.as_ref());
    }
}

/// Per-state document totals of a collection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentCounts {
    pub available: Option<i64>,
    pub processing: Option<i64>,
    pub failed: Option<i64>,
    pub pending: Option<i64>,
}

impl Model for DocumentCounts {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            available: fields.optional("available")?,
            processing: fields.optional("processing")?,
            failed: fields.optional("failed")?,
            pending: fields.optional("pending")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("available", self.available.as_ref())
            .optional("processing", self.processing.as_ref())
            .optional("failed", self.failed.as_ref())
            .optional("pending", self.pending.as_ref());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListCollectionsResponse {
    pub collections: Option<Vec<Collection>>,
}

impl Model for ListCollectionsResponse {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            collections: fields.optional_models("collections")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional_models("collections", self.collections.as_deref());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeleteCollectionResponse {
    pub collection_id: String,
    pub status: String,
}

impl Model for DeleteCollectionResponse {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            collection_id: fields.required("collection_id")?,
            status: fields.required("status")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.field("collection_id", &self.collection_id)
            .field("status", &self.status);
    }
}

/// One indexed field and its type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Field {
    pub field: Option<String>,
    /// Wire name `type`.
    pub field_type: Option<String>,
}

impl Model for Field {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            field: fields.optional("field")?,
            field_type: fields.optional("type")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("field", self.field.as_ref())
            .optional("type", self.field_type.as_ref());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListCollectionFieldsResponse {
    pub fields: Option<Vec<Field>>,
}

impl Model for ListCollectionFieldsResponse {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            fields: fields.optional_models("fields")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional_models("fields", self.fields.as_deref());
    }
}
