use crate::DecodeError;
use crate::codec::{FieldReader, Model, ObjectWriter};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingDataSet {
    pub environment_id: Option<String>,
    pub collection_id: Option<String>,
    pub queries: Option<Vec<TrainingQuery>>,
}

impl Model for TrainingDataSet {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            environment_id: fields.optional("environment_id")?,
            collection_id: fields.optional("collection_id")?,
            queries: fields.optional_models("queries")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("environment_id", self.environment_id.as_ref())
            .optional("collection_id", self.collection_id.as_ref())
            .optional_models("queries", self.queries.as_deref());
    }
}

/// A natural language query with relevance-rated example documents.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingQuery {
    pub query_id: Option<String>,
    pub natural_language_query: Option<String>,
    pub filter: Option<String>,
    pub examples: Option<Vec<TrainingExample>>,
}

impl Model for TrainingQuery {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            query_id: fields.optional("query_id")?,
            natural_language_query: fields.optional("natural_language_query")?,
            filter: fields.optional("filter")?,
            examples: fields.optional_models("examples")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("query_id", self.query_id.as_ref())
            .optional("natural_language_query", self.natural_language_query.as_ref())
            .optional("filter", self.filter.as_ref())
            .optional_models("examples", self.examples.as_deref());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TrainingExample {
    pub document_id: Option<String>,
    pub cross_reference: Option<String>,
    pub relevance: Option<i64>,
}

impl TrainingExample {
    pub fn new(document_id: impl Into<String>, relevance: i64) -> Self {
        Self {
            document_id: Some(document_id.into()),
            cross_reference: None,
            relevance: Some(relevance),
        }
    }
}

impl Model for TrainingExample {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            document_id: fields.optional("document_id")?,
            cross_reference: fields.optional("cross_reference")?,
            relevance: fields.optional("relevance")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("document_id", self.document_id.as_ref())
            .optional("cross_reference", self.cross_reference.as_ref())
            .optional("relevance", self.relevance.as_ref());
    }
}
