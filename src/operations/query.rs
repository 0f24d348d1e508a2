use crate::body::RequestBody;
use crate::catalog;
use crate::codec::ObjectWriter;
use crate::models::{QueryNoticesResponse, QueryResponse};
use crate::operation::{Operation, OperationDescriptor};
use crate::request::OperationArgs;
use crate::response::ResponsePayload;
use crate::{ClientError, DecodeError};

const LOGGING_OPT_OUT: &str = "X-Watson-Logging-Opt-Out";

/// Searches one collection.
///
/// Parameters travel in a sparse JSON body; list-valued parameters are joined
/// with `,` the same way the notices endpoint joins them in its query string.
#[derive(Clone, Debug)]
pub struct QueryCollection {
    environment_id: String,
    collection_id: String,
    filter: Option<String>,
    query: Option<String>,
    natural_language_query: Option<String>,
    passages: Option<bool>,
    aggregation: Option<String>,
    count: Option<i64>,
    return_fields: Option<Vec<String>>,
    offset: Option<i64>,
    sort: Option<Vec<String>>,
    highlight: Option<bool>,
    passages_fields: Option<Vec<String>>,
    passages_count: Option<i64>,
    deduplicate_field: Option<String>,
    logging_opt_out: Option<bool>,
}

impl QueryCollection {
    pub fn new(environment_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
            filter: None,
            query: None,
            natural_language_query: None,
            passages: None,
            aggregation: None,
            count: None,
            return_fields: None,
            offset: None,
            sort: None,
            highlight: None,
            passages_fields: None,
            passages_count: None,
            deduplicate_field: None,
            logging_opt_out: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_natural_language_query(mut self, query: impl Into<String>) -> Self {
        self.natural_language_query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_passages(mut self, passages: bool) -> Self {
        self.passages = Some(passages);
        self
    }

    /// Aggregation expression, for example `term(author,count:10)`.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: impl Into<String>) -> Self {
        self.aggregation = Some(aggregation.into());
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_return_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.return_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Sort keys; prefix a field with `-` for descending order.
    #[must_use]
    pub fn with_sort<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.sort = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = Some(highlight);
        self
    }

    #[must_use]
    pub fn with_passages_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.passages_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_passages_count(mut self, count: i64) -> Self {
        self.passages_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_deduplicate_field(mut self, field: impl Into<String>) -> Self {
        self.deduplicate_field = Some(field.into());
        self
    }

    /// Asks the service not to log this query.
    #[must_use]
    pub fn with_logging_opt_out(mut self, opt_out: bool) -> Self {
        self.logging_opt_out = Some(opt_out);
        self
    }
}

fn joined(values: Option<Vec<String>>) -> Option<String> {
    values.map(|values| values.join(","))
}

impl Operation for QueryCollection {
    type Output = QueryResponse;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::QUERY;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        let mut body = ObjectWriter::new();
        body.optional("filter", self.filter.as_ref())
            .optional("query", self.query.as_ref())
            .optional("natural_language_query", self.natural_language_query.as_ref())
            .optional("passages", self.passages.as_ref())
            .optional("aggregation", self.aggregation.as_ref())
            .optional("count", self.count.as_ref())
            .optional("return", joined(self.return_fields).as_ref())
            .optional("offset", self.offset.as_ref())
            .optional("sort", joined(self.sort).as_ref())
            .optional("highlight", self.highlight.as_ref())
            .optional("passages.fields", joined(self.passages_fields).as_ref())
            .optional("passages.count", self.passages_count.as_ref())
            .optional("deduplicate.field", self.deduplicate_field.as_ref());

        Ok(OperationArgs::new()
            .path_param("environment_id", self.environment_id)
            .path_param("collection_id", self.collection_id)
            .optional_header(LOGGING_OPT_OUT, self.logging_opt_out.map(|v| v.to_string()))
            .body(RequestBody::sparse(body)))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}

/// Searches the notices raised while ingesting a collection.
#[derive(Clone, Debug)]
pub struct QueryNotices {
    environment_id: String,
    collection_id: String,
    filter: Option<String>,
    query: Option<String>,
    natural_language_query: Option<String>,
    passages: Option<bool>,
    aggregation: Option<String>,
    count: Option<i64>,
    return_fields: Option<Vec<String>>,
    offset: Option<i64>,
    sort: Option<Vec<String>>,
    highlight: Option<bool>,
    passages_fields: Option<Vec<String>>,
    passages_count: Option<i64>,
    deduplicate_field: Option<String>,
}

impl QueryNotices {
    pub fn new(environment_id: impl Into<String>, collection_id: impl Into<String>) -> Self {
        Self {
            environment_id: environment_id.into(),
            collection_id: collection_id.into(),
            filter: None,
            query: None,
            natural_language_query: None,
            passages: None,
            aggregation: None,
            count: None,
            return_fields: None,
            offset: None,
            sort: None,
            highlight: None,
            passages_fields: None,
            passages_count: None,
            deduplicate_field: None,
        }
    }

    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    #[must_use]
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_natural_language_query(mut self, query: impl Into<String>) -> Self {
        self.natural_language_query = Some(query.into());
        self
    }

    #[must_use]
    pub fn with_passages(mut self, passages: bool) -> Self {
        self.passages = Some(passages);
        self
    }

    #[must_use]
    pub fn with_aggregation(mut self, aggregation: impl Into<String>) -> Self {
        self.aggregation = Some(aggregation.into());
        self
    }

    #[must_use]
    pub fn with_count(mut self, count: i64) -> Self {
        self.count = Some(count);
        self
    }

    #[must_use]
    pub fn with_return_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.return_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    #[must_use]
    pub fn with_sort<S: Into<String>>(mut self, keys: impl IntoIterator<Item = S>) -> Self {
        self.sort = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_highlight(mut self, highlight: bool) -> Self {
        self.highlight = Some(highlight);
        self
    }

    #[must_use]
    pub fn with_passages_fields<S: Into<String>>(
        mut self,
        fields: impl IntoIterator<Item = S>,
    ) -> Self {
        self.passages_fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn with_passages_count(mut self, count: i64) -> Self {
        self.passages_count = Some(count);
        self
    }

    #[must_use]
    pub fn with_deduplicate_field(mut self, field: impl Into<String>) -> Self {
        self.deduplicate_field = Some(field.into());
        self
    }
}

impl Operation for QueryNotices {
    type Output = QueryNoticesResponse;

    const DESCRIPTOR: &'static OperationDescriptor = &catalog::QUERY_NOTICES;

    fn into_args(self) -> Result<OperationArgs, ClientError> {
        Ok(OperationArgs::new()
            .path_param("environment_id", self.environment_id)
            .path_param("collection_id", self.collection_id)
            .optional_query("filter", self.filter)
            .optional_query("query", self.query)
            .optional_query("natural_language_query", self.natural_language_query)
            .optional_query("passages", self.passages)
            .optional_query("aggregation", self.aggregation)
            .optional_query("count", self.count)
            .optional_query_list("return", self.return_fields)
            .optional_query("offset", self.offset)
            .optional_query_list("sort", self.sort)
            .optional_query("highlight", self.highlight)
            .optional_query_list("passages.fields", self.passages_fields)
            .optional_query("passages.count", self.passages_count)
            .optional_query("deduplicate.field", self.deduplicate_field))
    }

    fn decode_output(payload: ResponsePayload) -> Result<Self::Output, DecodeError> {
        payload.into_model()
    }
}
