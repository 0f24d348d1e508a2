use chrono::{DateTime, Utc};

use crate::DecodeError;
use crate::codec::{FieldReader, Model, ObjectWriter};

/// Ingestion status returned when a document is added or updated.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DocumentAccepted {
    pub document_id: Option<String>,
    pub status: Option<String>,
    pub notices: Option<Vec<Notice>>,
}

impl Model for DocumentAccepted {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            document_id: fields.optional("document_id")?,
            status: fields.optional("status")?,
            notices: fields.optional_models("notices")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("document_id", self.document_id.as_ref())
            .optional("status", self.status.as_ref())
            .optional_models("notices", self.notices.as_deref());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeleteDocumentResponse {
    pub document_id: String,
    pub status: String,
}

impl Model for DeleteDocumentResponse {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            document_id: fields.required("document_id")?,
            status: fields.required("status")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.field("document_id", &self.document_id)
            .field("status", &self.status);
    }
}

/// A warning or error raised while ingesting or querying a document.
#[derive(Clone, Debug, PartialEq)]
pub struct Notice {
    pub notice_id: String,
    pub created: Option<DateTime<Utc>>,
    pub document_id: Option<String>,
    pub query_id: Option<String>,
    pub severity: Option<String>,
    pub step: Option<String>,
    pub description: Option<String>,
}

impl Model for Notice {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            notice_id: fields.required("notice_id")?,
            created: fields.optional("created")?,
            document_id: fields.optional("document_id")?,
            query_id: fields.optional("query_id")?,
            severity: fields.optional("severity")?,
            step: fields.optional("step")?,
            description: fields.optional("description")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.field("notice_id", &self.notice_id)
            .optional("created", self.created.as_ref())
            .optional("document_id", self.document_id.as_ref())
            .optional("query_id", self.query_id.as_ref())
            .optional("severity", self.severity.as_ref())
            .optional("step", self.step.as_ref())
            .optional("description", self.description.as_ref());
    }
}
