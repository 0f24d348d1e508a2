use serde_json::{Map, Value};

use crate::DecodeError;
use crate::codec::{FieldReader, Model, ObjectWriter, PropertyBag};

use super::aggregation::QueryAggregation;
use super::document::Notice;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResponse {
    pub matching_results: Option<i64>,
    pub results: Option<Vec<QueryResult>>,
    pub aggregations: Option<Vec<QueryAggregation>>,
    pub passages: Option<Vec<QueryPassage>>,
    pub duplicates_removed: Option<i64>,
    pub session_token: Option<String>,
}

impl Model for QueryResponse {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            matching_results: fields.optional("matching_results")?,
            results: fields.optional_models("results")?,
            aggregations: fields.optional_models("aggregations")?,
            passages: fields.optional_models("passages")?,
            duplicates_removed: fields.optional("duplicates_removed")?,
            session_token: fields.optional("session_token")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("matching_results", self.matching_results.as_ref())
            .optional_models("results", self.results.as_deref())
            .optional_models("aggregations", self.aggregations.as_deref())
            .optional_models("passages", self.passages.as_deref())
            .optional("duplicates_removed", self.duplicates_removed.as_ref())
            .optional("session_token", self.session_token.as_ref());
    }
}

/// One matching document.
///
/// Documents carry whatever fields were indexed, so every key beyond the
/// declared ones is kept in [`QueryResult::properties`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResult {
    pub id: Option<String>,
    pub metadata: Option<Map<String, Value>>,
    pub collection_id: Option<String>,
    pub result_metadata: Option<QueryResultMetadata>,
    pub properties: PropertyBag,
}

impl Model for QueryResult {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: fields.optional("id")?,
            metadata: fields.optional("metadata")?,
            collection_id: fields.optional("collection_id")?,
            result_metadata: fields.optional_model("result_metadata")?,
            properties: PropertyBag::new(),
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("id", self.id.as_ref())
            .optional("metadata", self.metadata.as_ref())
            .optional("collection_id", self.collection_id.as_ref())
            .optional_model("result_metadata", self.result_metadata.as_ref());
    }

    fn properties(&self) -> Option<&PropertyBag> {
        Some(&self.properties)
    }

    fn properties_mut(&mut self) -> Option<&mut PropertyBag> {
        Some(&mut self.properties)
    }
}

/// Relevance details attached to a [`QueryResult`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryResultMetadata {
    pub score: f64,
    pub confidence: Option<f64>,
    /// Published under the flat key `extracted_metadata.filename`.
    pub filename: Option<String>,
}

impl Model for QueryResultMetadata {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            score: fields.required("score")?,
            confidence: fields.optional("confidence")?,
            filename: fields.optional("extracted_metadata.filename")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.field("score", &self.score)
            .optional("confidence", self.confidence.as_ref())
            .optional("extracted_metadata.filename", self.filename.as_ref());
    }
}

/// A passage extracted from a matching document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryPassage {
    pub document_id: Option<String>,
    pub passage_score: Option<f64>,
    pub passage_text: Option<String>,
    pub start_offset: Option<i64>,
    pub end_offset: Option<i64>,
    pub field: Option<String>,
}

impl Model for QueryPassage {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            document_id: fields.optional("document_id")?,
            passage_score: fields.optional("passage_score")?,
            passage_text: fields.optional("passage_text")?,
            start_offset: fields.optional("start_offset")?,
            end_offset: fields.optional("end_offset")?,
            field: fields.optional("field")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("document_id", self.document_id.as_ref())
            .optional("passage_score", self.passage_score.as_ref())
            .optional("passage_text", self.passage_text.as_ref())
            .optional("start_offset", self.start_offset.as_ref())
            .optional("end_offset", self.end_offset.as_ref())
            .optional("field", self.field.as_ref());
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct QueryNoticesResponse {
    pub matching_results: Option<i64>,
    pub results: Option<Vec<NoticeResult>>,
    pub aggregations: Option<Vec<QueryAggregation>>,
    pub duplicates_removed: Option<i64>,
}

impl Model for QueryNoticesResponse {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            matching_results: fields.optional("matching_results")?,
            results: fields.optional_models("results")?,
            aggregations: fields.optional_models("aggregations")?,
            duplicates_removed: fields.optional("duplicates_removed")?,
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("matching_results", self.matching_results.as_ref())
            .optional_models("results", self.results.as_deref())
            .optional_models("aggregations", self.aggregations.as_deref())
            .optional("duplicates_removed", self.duplicates_removed.as_ref());
    }
}

/// A document that raised notices, with its indexed fields kept open.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NoticeResult {
    pub id: Option<String>,
    pub collection_id: Option<String>,
    pub code: Option<i64>,
    pub filename: Option<String>,
    pub file_type: Option<String>,
    pub sha1: Option<String>,
    pub notices: Option<Vec<Notice>>,
    pub properties: PropertyBag,
}

impl Model for NoticeResult {
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            id: fields.optional("id")?,
            collection_id: fields.optional("collection_id")?,
            code: fields.optional("code")?,
            filename: fields.optional("filename")?,
            file_type: fields.optional("file_type")?,
            sha1: fields.optional("sha1")?,
            notices: fields.optional_models("notices")?,
            properties: PropertyBag::new(),
        })
    }

    fn encode(&self, out: &mut ObjectWriter) {
        out.optional("id", self.id.as_ref())
            .optional("collection_id", self.collection_id.as_ref())
            .optional("code", self.code.as_ref())
            .optional("filename", self.filename.as_ref())
            .optional("file_type", self.file_type.as_ref())
            .optional("sha1", self.sha1.as_ref())
            .optional_models("notices", self.notices.as_deref());
    }

    fn properties(&self) -> Option<&PropertyBag> {
        Some(&self.properties)
    }

    fn properties_mut(&mut self) -> Option<&mut PropertyBag> {
        Some(&mut self.properties)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{NoticeResult, QueryResponse, QueryResult, QueryResultMetadata};
    use crate::DecodeError;
    use crate::codec::Model;

    #[test]
    fn open_result_round_trips_losslessly() {
        let raw = json!({
            "id": "doc-1",
            "collection_id": "c1",
            "metadata": null,
            "result_metadata": {"score": 1.5, "confidence": 0.75},
            "title": "Quarterly report",
            "enriched_text": {"sentiment": {"document": {"label": "positive"}}},
            "tags": ["finance", null, 3]
        });

        let result = QueryResult::from_value(&raw).expect("decodes");
        assert_eq!(result.id.as_deref(), Some("doc-1"));
        assert_eq!(result.metadata, None);
        assert_eq!(result.properties.len(), 3);
        assert!(!result.properties.contains_key("id"));
        assert!(!result.properties.contains_key("metadata"));
        assert_eq!(result.to_value(), raw);

        let raw = json!({
            "id": null,
            "collection_id": "c1",
            "result_metadata": {"score": 1},
            "title": "t"
        });
        let result = QueryResult::from_value(&raw).expect("decodes");
        assert_eq!(result.id, None);
        assert_eq!(result.to_value(), raw);
    }

    #[test]
    fn dotted_key_is_read_flat() {
        let metadata = QueryResultMetadata::from_value(&json!({
            "score": 2.0,
            "extracted_metadata.filename": "report.pdf",
            "extracted_metadata": {"filename": "nested.pdf"}
        }))
        .expect("decodes");
        assert_eq!(metadata.filename.as_deref(), Some("report.pdf"));

        let metadata = QueryResultMetadata::from_value(&json!({
            "score": 2.0,
            "extracted_metadata": {"filename": "nested.pdf"}
        }))
        .expect("decodes");
        assert_eq!(metadata.filename, None);
    }

    #[test]
    fn missing_score_fails_the_whole_response() {
        let error = QueryResponse::from_value(&json!({
            "matching_results": 2,
            "results": [
                {"id": "a", "result_metadata": {"score": 1.0}},
                {"id": "b", "result_metadata": {"confidence": 0.1}}
            ]
        }))
        .expect_err("score is required");
        assert!(matches!(
            error,
            DecodeError::MissingRequiredField { ref field }
                if field == "results[1].result_metadata.score"
        ));
    }

    #[test]
    fn notice_result_keeps_indexed_fields() {
        let raw = json!({
            "id": "doc-9",
            "code": 200,
            "filename": "a.json",
            "notices": [{"notice_id": "n1", "severity": "warning"}],
            "author": "ann"
        });
        let result = NoticeResult::from_value(&raw).expect("decodes");
        assert_eq!(result.properties.get("author"), Some(&json!("ann")));
        assert_eq!(result.to_value(), raw);
    }

    mod properties {
        use proptest::prelude::*;
        use serde_json::{Map, Value};

        use super::QueryResult;
        use crate::codec::Model;

        fn json_value() -> impl Strategy<Value = Value> {
            let leaf = prop_oneof![
                Just(Value::Null),
                any::<bool>().prop_map(Value::from),
                any::<i64>().prop_map(Value::from),
                "[a-z ]{0,12}".prop_map(Value::from),
            ];
            leaf.prop_recursive(3, 24, 4, |inner| {
                prop_oneof![
                    prop::collection::vec(inner.clone(), 0..4).prop_map(Value::from),
                    prop::collection::btree_map("[a-z]{1,6}", inner, 0..4)
                        .prop_map(|entries| Value::Object(entries.into_iter().collect())),
                ]
            })
        }

        /// Absent, `null` or a value produced by `present`.
        fn tri_state(
            present: impl Strategy<Value = Value>,
        ) -> impl Strategy<Value = Option<Value>> {
            prop_oneof![Just(None), Just(Some(Value::Null)), present.prop_map(Some)]
        }

        fn score() -> impl Strategy<Value = Value> {
            prop_oneof![
                (-1_000_000_i64..1_000_000).prop_map(Value::from),
                (-1000_i32..1000).prop_map(|n| Value::from(f64::from(n) + 0.5)),
            ]
        }

        proptest! {
            #[test]
            fn open_result_round_trips_any_extra_properties(
                id in tri_state("[a-z0-9-]{1,8}".prop_map(Value::from)),
                collection_id in tri_state("[a-z0-9]{1,8}".prop_map(Value::from)),
                score in score(),
                extras in prop::collection::btree_map("x_[a-z_.]{1,10}", json_value(), 0..6),
            ) {
                let mut object = Map::new();
                if let Some(id) = id {
                    object.insert("id".to_owned(), id);
                }
                if let Some(collection_id) = collection_id {
                    object.insert("collection_id".to_owned(), collection_id);
                }
                let mut metadata = Map::new();
                metadata.insert("score".to_owned(), score);
                object.insert("result_metadata".to_owned(), Value::Object(metadata));
                for (key, value) in &extras {
                    object.insert(key.clone(), value.clone());
                }
                let raw = Value::Object(object);

                let result = QueryResult::from_value(&raw).expect("decodes");
                let bag_keys: Vec<&str> = result.properties.keys().collect();
                let extra_keys: Vec<&str> = extras.keys().map(String::as_str).collect();
                prop_assert_eq!(bag_keys, extra_keys);
                prop_assert_eq!(result.to_value(), raw);
            }
        }
    }
}
