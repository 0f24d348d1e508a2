//! Typed models decoded field by field from raw JSON objects.
//!
//! A [`Model`] implementation *is* the schema of its type: `decode` walks the
//! declared fields in order through a [`FieldReader`], and `encode` writes the
//! same fields back through an [`ObjectWriter`]. The reader records every key
//! it consumes, which is what lets open models capture the remainder into a
//! [`PropertyBag`].

use serde_json::{Map, Value};

use super::array::{decode_array, encode_array};
use super::field::{FieldValue, Presence, decode_field, decode_value};
use super::open::{PropertyBag, capture_residual};
use crate::DecodeError;

/// A typed result graph node decoded from one JSON object.
pub trait Model: Sized {
    /// Decodes the declared fields of `Self`.
    fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError>;

    /// Writes the declared, non-absent fields of `self` in declaration order.
    fn encode(&self, out: &mut ObjectWriter);

    /// Property bag of an open model. Closed models return `None`.
    fn properties(&self) -> Option<&PropertyBag> {
        None
    }

    /// Mutable property bag of an open model. Closed models return `None`.
    fn properties_mut(&mut self) -> Option<&mut PropertyBag> {
        None
    }

    /// Decodes a model from a raw JSON object.
    ///
    /// For open models every key the schema did not consume lands in the
    /// property bag.
    fn from_object(object: &Map<String, Value>) -> Result<Self, DecodeError> {
        let mut fields = FieldReader::new(object);
        let mut model = Self::decode(&mut fields)?;
        if let Some(bag) = model.properties_mut() {
            *bag = capture_residual(object, fields.consumed());
        }
        Ok(model)
    }

    /// Decodes a model from any JSON value, which must be an object.
    fn from_value(value: &Value) -> Result<Self, DecodeError> {
        match value {
            Value::Object(object) => Self::from_object(object),
            other => Err(DecodeError::mismatch("$", "object", other)),
        }
    }

    /// Re-serializes the model: declared fields first, then the property bag.
    fn to_object(&self) -> Map<String, Value> {
        let mut out = ObjectWriter::new();
        self.encode(&mut out);
        if let Some(bag) = self.properties() {
            out.properties(bag);
        }
        out.into_object()
    }

    fn to_value(&self) -> Value {
        Value::Object(self.to_object())
    }
}

/// Reads declared fields out of one raw JSON object.
///
/// Field names are opaque keys: a name containing a dot is looked up as is,
/// never traversed as a path.
#[derive(Debug)]
pub struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    consumed: Vec<&'a str>,
}

impl<'a> FieldReader<'a> {
    pub fn new(object: &'a Map<String, Value>) -> Self {
        Self {
            object,
            consumed: Vec::new(),
        }
    }

    /// The full object being decoded.
    pub fn object(&self) -> &'a Map<String, Value> {
        self.object
    }

    /// Keys consumed so far, in the order they were read.
    pub fn consumed(&self) -> &[&'a str] {
        &self.consumed
    }

    fn mark(&mut self, name: &str) {
        if let Some((key, _)) = self.object.get_key_value(name) {
            if !self.consumed.contains(&key.as_str()) {
                self.consumed.push(key.as_str());
            }
        }
    }

    fn raw(&mut self, name: &str) -> Presence<&'a Value> {
        self.mark(name);
        match self.object.get(name) {
            None => Presence::Absent,
            Some(Value::Null) => Presence::Null,
            Some(value) => Presence::Present(value),
        }
    }

    /// Reads a scalar with its tri-state presence.
    pub fn presence<T: FieldValue>(&mut self, name: &str) -> Result<Presence<T>, DecodeError> {
        self.mark(name);
        decode_field(self.object, name)
    }

    /// Reads a scalar that must be present and non-null.
    pub fn required<T: FieldValue>(&mut self, name: &str) -> Result<T, DecodeError> {
        self.presence(name)?
            .into_option()
            .ok_or_else(|| DecodeError::missing(name))
    }

    /// Reads a scalar that may be absent or null.
    pub fn optional<T: FieldValue>(&mut self, name: &str) -> Result<Option<T>, DecodeError> {
        Ok(self.presence(name)?.into_option())
    }

    /// Reads a scalar published under alternative names.
    ///
    /// Names are tried in order; a later name is consulted only when every
    /// earlier one is entirely absent. A `null` under an earlier name stops
    /// the search.
    pub fn optional_aliased<T: FieldValue>(
        &mut self,
        names: &[&str],
    ) -> Result<Option<T>, DecodeError> {
        for name in names {
            match self.presence(name)? {
                Presence::Absent => {}
                Presence::Null => return Ok(None),
                Presence::Present(value) => return Ok(Some(value)),
            }
        }
        Ok(None)
    }

    /// Reads a nested model that must be present.
    pub fn required_model<M: Model>(&mut self, name: &str) -> Result<M, DecodeError> {
        self.optional_model(name)?
            .ok_or_else(|| DecodeError::missing(name))
    }

    /// Reads a nested model that may be absent or null.
    pub fn optional_model<M: Model>(&mut self, name: &str) -> Result<Option<M>, DecodeError> {
        match self.raw(name) {
            Presence::Absent | Presence::Null => Ok(None),
            Presence::Present(value) => M::from_value(value)
                .map(Some)
                .map_err(|e| e.within(name)),
        }
    }

    /// Reads an array of models that must be present. An empty array is valid.
    pub fn required_models<M: Model>(&mut self, name: &str) -> Result<Vec<M>, DecodeError> {
        self.optional_models(name)?
            .ok_or_else(|| DecodeError::missing(name))
    }

    /// Reads an array of models.
    ///
    /// An absent or null field yields `None`, distinct from `Some(vec![])`.
    pub fn optional_models<M: Model>(
        &mut self,
        name: &str,
    ) -> Result<Option<Vec<M>>, DecodeError> {
        self.optional_array(name, M::from_value)
    }

    /// Reads an array of scalars, keeping absence distinct from emptiness.
    pub fn optional_list<T: FieldValue>(
        &mut self,
        name: &str,
    ) -> Result<Option<Vec<T>>, DecodeError> {
        self.optional_array(name, |value| decode_value(value, "$"))
    }

    fn optional_array<T>(
        &mut self,
        name: &str,
        element: impl FnMut(&Value) -> Result<T, DecodeError>,
    ) -> Result<Option<Vec<T>>, DecodeError> {
        match self.raw(name) {
            Presence::Absent | Presence::Null => Ok(None),
            Presence::Present(Value::Array(values)) => decode_array(values, element)
                .map(Some)
                .map_err(|e| e.within(name)),
            Presence::Present(other) => Err(DecodeError::mismatch(name, "array", other)),
        }
    }
}

/// Builds a JSON object from typed fields.
///
/// Optional setters skip `None` entirely: an unset field never appears in the
/// output, not even as `null`. The same writer assembles sparse request bodies.
#[derive(Clone, Debug, Default)]
pub struct ObjectWriter {
    object: Map<String, Value>,
}

impl ObjectWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field<T: FieldValue>(&mut self, name: &str, value: &T) -> &mut Self {
        self.object.insert(name.to_owned(), value.to_json());
        self
    }

    /// Writes a string literal, typically a discriminator tag.
    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.object
            .insert(name.to_owned(), Value::String(value.to_owned()));
        self
    }

    pub fn optional<T: FieldValue>(&mut self, name: &str, value: Option<&T>) -> &mut Self {
        if let Some(value) = value {
            self.field(name, value);
        }
        self
    }

    pub fn model<M: Model>(&mut self, name: &str, value: &M) -> &mut Self {
        self.object.insert(name.to_owned(), value.to_value());
        self
    }

    pub fn optional_model<M: Model>(&mut self, name: &str, value: Option<&M>) -> &mut Self {
        if let Some(value) = value {
            self.model(name, value);
        }
        self
    }

    pub fn models<M: Model>(&mut self, name: &str, values: &[M]) -> &mut Self {
        self.object
            .insert(name.to_owned(), encode_array(values, Model::to_value));
        self
    }

    pub fn optional_models<M: Model>(&mut self, name: &str, values: Option<&[M]>) -> &mut Self {
        if let Some(values) = values {
            self.models(name, values);
        }
        self
    }

    pub fn list<T: FieldValue>(&mut self, name: &str, values: &[T]) -> &mut Self {
        self.object
            .insert(name.to_owned(), encode_array(values, FieldValue::to_json));
        self
    }

    pub fn optional_list<T: FieldValue>(&mut self, name: &str, values: Option<&[T]>) -> &mut Self {
        if let Some(values) = values {
            self.list(name, values);
        }
        self
    }

    /// Appends property-bag entries and declared nulls. Keys already written
    /// are left untouched.
    pub fn properties(&mut self, bag: &PropertyBag) -> &mut Self {
        for key in bag.declared_nulls() {
            if !self.object.contains_key(key) {
                self.object.insert(key.to_owned(), Value::Null);
            }
        }
        for (key, value) in bag.iter() {
            if !self.object.contains_key(key) {
                self.object.insert(key.clone(), value.clone());
            }
        }
        self
    }

    pub fn contains(&self, name: &str) -> bool {
        self.object.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.object.is_empty()
    }

    pub fn into_object(self) -> Map<String, Value> {
        self.object
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.object)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{FieldReader, Model, ObjectWriter};
    use crate::DecodeError;

    #[derive(Debug, PartialEq)]
    struct Status {
        status: String,
        detail: Option<String>,
    }

    impl Model for Status {
        fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
            Ok(Self {
                status: fields.required("status")?,
                detail: fields.optional("detail")?,
            })
        }

        fn encode(&self, out: &mut ObjectWriter) {
            out.field("status", &self.status)
                .optional("detail", self.detail.as_ref());
        }
    }

    #[derive(Debug, PartialEq)]
    struct Envelope {
        status: Status,
        history: Option<Vec<Status>>,
        tags: Option<Vec<String>>,
    }

    impl Model for Envelope {
        fn decode(fields: &mut FieldReader<'_>) -> Result<Self, DecodeError> {
            Ok(Self {
                status: fields.required_model("status")?,
                history: fields.optional_models("history")?,
                tags: fields.optional_list("tags")?,
            })
        }

        fn encode(&self, out: &mut ObjectWriter) {
            out.model("status", &self.status)
                .optional_models("history", self.history.as_deref())
                .optional_list("tags", self.tags.as_deref());
        }
    }

    #[test]
    fn decodes_required_string() {
        let model = Status::from_value(&json!({"status": "deleted"})).expect("decodes");
        assert_eq!(model.status, "deleted");
        assert_eq!(model.detail, None);
    }

    #[test]
    fn missing_required_field_is_an_error() {
        let error = Status::from_value(&json!({"detail": "gone"})).expect_err("status missing");
        assert!(matches!(
            error,
            DecodeError::MissingRequiredField { ref field } if field == "status"
        ));
    }

    #[test]
    fn required_null_counts_as_missing() {
        let error = Status::from_value(&json!({"status": null})).expect_err("status null");
        assert_eq!(error.field(), Some("status"));
    }

    #[test]
    fn non_object_documents_are_rejected() {
        let error = Status::from_value(&json!(["status"])).expect_err("array is not a model");
        assert!(matches!(error, DecodeError::TypeMismatch { expected: "object", .. }));
    }

    #[test]
    fn absent_array_differs_from_empty_array() {
        let absent = Envelope::from_value(&json!({"status": {"status": "ok"}})).expect("decodes");
        assert_eq!(absent.history, None);

        let empty = Envelope::from_value(&json!({"status": {"status": "ok"}, "history": []}))
            .expect("decodes");
        assert_eq!(empty.history, Some(Vec::new()));

        assert!(!absent.to_object().contains_key("history"));
        assert_eq!(empty.to_object()["history"], json!([]));
    }

    #[test]
    fn nested_errors_carry_the_full_path() {
        let error = Envelope::from_value(&json!({
            "status": {"status": "ok"},
            "history": [{"status": "ok"}, {"detail": "no status"}]
        }))
        .expect_err("second element is missing status");
        assert_eq!(error.field(), Some("history[1].status"));

        let error = Envelope::from_value(&json!({"status": {"status": "ok"}, "tags": ["a", 2]}))
            .expect_err("second tag is not a string");
        assert_eq!(error.field(), Some("tags[1]"));
    }

    #[test]
    fn aliases_fall_back_only_when_absent() {
        let doc = json!({"key_as_string": "2019-01-01", "other": "x"});
        let object = doc.as_object().expect("object");

        let mut fields = FieldReader::new(object);
        let value: Option<String> = fields
            .optional_aliased(&["key", "key_as_string"])
            .expect("decodes");
        assert_eq!(value.as_deref(), Some("2019-01-01"));
        assert_eq!(fields.consumed(), ["key_as_string"]);

        let doc = json!({"key": null, "key_as_string": "ignored"});
        let object = doc.as_object().expect("object");
        let mut fields = FieldReader::new(object);
        let value: Option<String> = fields
            .optional_aliased(&["key", "key_as_string"])
            .expect("decodes");
        assert_eq!(value, None);
    }

    #[test]
    fn dotted_names_are_flat_keys() {
        let doc = json!({
            "extracted_metadata.filename": "flat.pdf",
            "extracted_metadata": {"filename": "nested.pdf"}
        });
        let object = doc.as_object().expect("object");
        let mut fields = FieldReader::new(object);
        let value: Option<String> = fields
            .optional("extracted_metadata.filename")
            .expect("decodes");
        assert_eq!(value.as_deref(), Some("flat.pdf"));
    }

    #[test]
    fn writer_skips_unset_fields() {
        let mut out = ObjectWriter::new();
        out.optional::<String>("name", None)
            .optional("description", Some(&"docs".to_owned()))
            .optional::<i64>("size", None);
        assert_eq!(out.into_value(), json!({"description": "docs"}));
    }

    #[test]
    fn encode_emits_declared_order() {
        let model = Status {
            status: "ok".to_owned(),
            detail: Some("fine".to_owned()),
        };
        let keys: Vec<String> = model.to_object().keys().cloned().collect();
        assert_eq!(keys, ["status", "detail"]);
        assert_eq!(model.to_value(), Value::from(model.to_object()));
    }
}
