use chrono::{DateTime, Utc};

use crate::DecodeError;
use crate::codec::{FieldReader, Model, ObjectWriter};

/// A search environment and its capacity.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Environment {
    pub environment_id: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub created: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub read_only: Option<bool>,
    pub size: Option<String>,
    pub requested_size: Option<String>,
    pub index_capacity: Option<IndexCapacity>,
}

impl Model for Environment {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            environment_id: fields.optional("environment_id")?,
            name: fields.optional("name")?,
            description: fields.optional("description")?,
            created: fields.optional("created")?,
            updated: fields.optional("updated")?,
            status: fields.optional("status")?,
            read_only: fields.optional("read_only")?,
            size: fields.optional("size")?,
            requested_size: fields.optional("requested_size")?,
            index_capacity: fields.optional_model("index_capacity")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("environment_id", self.environment_id.as_ref())
            .optional("name", self.name.as_ref())
            .optional("description", self.description.as_ref())
            .optional("created", self.created.as_ref())
            .optional("updated", self.updated.as_ref())
            .optional("status", self.status.as_ref())
            .optional("read_only", self.read_only.as_ref())
            .optional("size", self.size.as_ref())
            .optional("requested_size", self.requested_size.as_ref())
            .optional_model("index_capacity", self.index_capacity.as_ref());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct IndexCapacity {
    pub documents: Option<EnvironmentDocuments>,
    pub disk_usage: Option<DiskUsage>,
}

impl Model for IndexCapacity {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            documents: fields.optional_model("documents")?,
            disk_usage: fields.optional_model("disk_usage")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional_model("documents", self.documents.as_ref())
            .optional_model("disk_usage", self.disk_usage.as_ref());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnvironmentDocuments {
    pub available: Option<i64>,
    pub maximum_allowed: Option<i64>,
}

impl Model for EnvironmentDocuments {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            available: fields.optional("available")?,
            maximum_allowed: fields.optional("maximum_allowed")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("available", self.available.as_ref())
            .optional("maximum_allowed", self.maximum_allowed.as_ref());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DiskUsage {
    pub used_bytes: Option<i64>,
    pub maximum_allowed_bytes: Option<i64>,
}

impl Model for DiskUsage {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            used_bytes: fields.optional("used_bytes")?,
            maximum_allowed_bytes: fields.optional("maximum_allowed_bytes")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("used_bytes", self.used_bytes.as_ref())
            .optional("maximum_allowed_bytes", self.maximum_allowed_bytes.as_ref());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ListEnvironmentsResponse {
    pub environments: Option<Vec<Environment>>,
}

impl Model for ListEnvironmentsResponse {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            environments: fields.optional_models("environments")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional_models("environments", self.environments.as_deref());
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct DeleteEnvironmentResponse {
    pub environment_id: String,
    pub status: String,
}

impl Model for DeleteEnvironmentResponse {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            environment_id: fields.required("environment_id")?,
            status: fields.required("status")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.field("environment_id", &self.environment_id)
            .field("status", &self.status);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::{Environment, ListEnvironmentsResponse};
    use crate::DecodeError;
    use crate::codec::Model;

    #[test]
    fn decodes_nested_capacity() {
        let environment = Environment::from_value(&json!({
            "environment_id": "env-1",
            "name": "byod",
            "created": "2019-04-30T12:00:00Z",
            "read_only": false,
            "index_capacity": {
                "documents": {"available": 10, "maximum_allowed": 1000},
                "disk_usage": {"used_bytes": 2048}
            }
        }))
        .expect("decodes");

        assert_eq!(environment.environment_id.as_deref(), Some("env-1"));
        assert_eq!(
            environment.created,
            Some(Utc.with_ymd_and_hms(2019, 4, 30, 12, 0, 0).unwrap())
        );
        let capacity = environment.index_capacity.expect("capacity");
        assert_eq!(capacity.documents.and_then(|d| d.maximum_allowed), Some(1000));
        assert_eq!(capacity.disk_usage.and_then(|d| d.maximum_allowed_bytes), None);
    }

    #[test]
    fn nested_error_names_the_full_path() {
        let error = ListEnvironmentsResponse::from_value(&json!({
            "environments": [
                {"environment_id": "ok"},
                {"index_capacity": {"documents": {"available": "many"}}}
            ]
        }))
        .expect_err("available is an integer");

        assert!(matches!(error, DecodeError::TypeMismatch { .. }));
        assert_eq!(
            error.field(),
            Some("environments[1].index_capacity.documents.available")
        );
    }
}
